// Event domain types
//
// These types represent the Event entity as seen on the wire and by both
// storage backends. Stores convert their own representation into `Event`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const ANONYMOUS_CREATOR: &str = "anonymous";

/// Event classification.
/// - `hackathon`: multi-hour build competition
/// - `tech-talk`: talk or panel
/// - `workshop`: hands-on session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    Hackathon,
    TechTalk,
    Workshop,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Hackathon => "hackathon",
            EventType::TechTalk => "tech-talk",
            EventType::Workshop => "workshop",
        }
    }

    /// Parse the wire name. Returns `None` for anything outside the enumeration.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hackathon" => Some(EventType::Hackathon),
            "tech-talk" => Some(EventType::TechTalk),
            "workshop" => Some(EventType::Workshop),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Campus tech event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Store-assigned identifier.
    pub id: String,
    #[cfg_attr(feature = "openapi", schema(example = "CodeCrush Hackathon"))]
    pub title: String,
    pub description: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    pub location: String,
    pub college: String,
    pub event_type: EventType,
    /// External page for the event.
    pub link: String,
    /// Free-text labels, matched by search.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_creator")]
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub registration_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    /// User ids holding a registration. Set semantics.
    #[serde(default)]
    pub registered_users: Vec<String>,
    /// Denormalized size of `registered_users`.
    #[serde(default)]
    pub registration_count: u32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_creator() -> String {
    ANONYMOUS_CREATOR.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Event {
    /// Build a stored event from validated input.
    /// Registration membership starts empty.
    pub fn from_new(id: String, input: NewEvent, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            date: input.date,
            location: input.location,
            college: input.college,
            event_type: input.event_type,
            link: input.link,
            tags: input.tags,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
            registration_enabled: input.registration_enabled,
            registration_deadline: input.registration_deadline,
            max_participants: input.max_participants,
            registered_users: Vec::new(),
            registration_count: 0,
            is_featured: input.is_featured,
            image_url: input.image_url,
            organizer: input.organizer,
            contact_email: input.contact_email,
            prerequisites: input.prerequisites,
            price: input.price,
            currency: input.currency,
        }
    }

    /// Apply a partial update. `updated_at` is always refreshed.
    pub fn apply_patch(&mut self, patch: EventPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(college) = patch.college {
            self.college = college;
        }
        if let Some(event_type) = patch.event_type {
            self.event_type = event_type;
        }
        if let Some(link) = patch.link {
            self.link = link;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(enabled) = patch.registration_enabled {
            self.registration_enabled = enabled;
        }
        if let Some(deadline) = patch.registration_deadline {
            self.registration_deadline = Some(deadline);
        }
        if let Some(max) = patch.max_participants {
            self.max_participants = Some(max);
        }
        if let Some(featured) = patch.is_featured {
            self.is_featured = featured;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(organizer) = patch.organizer {
            self.organizer = Some(organizer);
        }
        if let Some(contact_email) = patch.contact_email {
            self.contact_email = Some(contact_email);
        }
        if let Some(prerequisites) = patch.prerequisites {
            self.prerequisites = prerequisites;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency;
        }
        self.updated_at = now;
    }

    /// Whether the registration deadline lies before `now`.
    pub fn registration_closed_at(&self, now: DateTime<Utc>) -> bool {
        self.registration_deadline
            .map(|deadline| now > deadline)
            .unwrap_or(false)
    }
}

/// Validated input for creating an event. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub college: String,
    pub event_type: EventType,
    pub link: String,
    pub tags: Vec<String>,
    pub created_by: String,
    pub registration_enabled: bool,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub max_participants: Option<u32>,
    pub is_featured: bool,
    pub image_url: Option<String>,
    pub organizer: Option<String>,
    pub contact_email: Option<String>,
    pub prerequisites: Vec<String>,
    pub price: f64,
    pub currency: String,
}

/// Re-create a stored event elsewhere. Id, timestamps and registration
/// state are left for the target store to assign.
impl From<Event> for NewEvent {
    fn from(event: Event) -> Self {
        Self {
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            college: event.college,
            event_type: event.event_type,
            link: event.link,
            tags: event.tags,
            created_by: event.created_by,
            registration_enabled: event.registration_enabled,
            registration_deadline: event.registration_deadline,
            max_participants: event.max_participants,
            is_featured: event.is_featured,
            image_url: event.image_url,
            organizer: event.organizer,
            contact_email: event.contact_email,
            prerequisites: event.prerequisites,
            price: event.price,
            currency: event.currency,
        }
    }
}

/// Partial update for an event. Only `Some` fields change.
/// Registration membership is managed by registration operations, not patches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub college: Option<String>,
    pub event_type: Option<EventType>,
    pub link: Option<String>,
    pub tags: Option<Vec<String>>,
    pub registration_enabled: Option<bool>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub max_participants: Option<u32>,
    pub is_featured: Option<bool>,
    pub image_url: Option<String>,
    pub organizer: Option<String>,
    pub contact_email: Option<String>,
    pub prerequisites: Option<Vec<String>>,
    pub price: Option<f64>,
    pub currency: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        *self == EventPatch::default()
    }
}

/// A list field that clients may send either as `"a, b, c"` or `["a", "b", "c"]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(untagged)]
pub enum ListField {
    Text(String),
    Items(Vec<String>),
}

impl ListField {
    /// Normalize into a list. Text is split on commas, entries trimmed and
    /// empty entries dropped.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            ListField::Text(text) => split_list(&text),
            ListField::Items(items) => items,
        }
    }
}

/// Split a comma-separated string into trimmed, non-empty entries.
pub fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Per-type event counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EventTypeCount {
    pub hackathon: u64,
    #[serde(rename = "tech-talk")]
    pub tech_talk: u64,
    pub workshop: u64,
}

impl EventTypeCount {
    pub fn add(&mut self, event_type: EventType, n: u64) {
        match event_type {
            EventType::Hackathon => self.hackathon += n,
            EventType::TechTalk => self.tech_talk += n,
            EventType::Workshop => self.workshop += n,
        }
    }
}

/// Aggregate statistics over the event collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub total_events: u64,
    pub event_type_count: EventTypeCount,
    pub total_colleges: u64,
    pub total_locations: u64,
}

impl EventStats {
    /// Compute statistics over an in-memory slice of events.
    pub fn from_events(events: &[Event]) -> Self {
        let mut event_type_count = EventTypeCount::default();
        for event in events {
            event_type_count.add(event.event_type, 1);
        }
        Self {
            total_events: events.len() as u64,
            event_type_count,
            total_colleges: distinct_sorted(events.iter().map(|e| e.college.as_str())).len() as u64,
            total_locations: distinct_sorted(events.iter().map(|e| e.location.as_str())).len()
                as u64,
        }
    }
}

/// Distinct values in ascending order.
pub fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let set: std::collections::BTreeSet<&str> = values.collect();
    set.into_iter().map(str::to_string).collect()
}
