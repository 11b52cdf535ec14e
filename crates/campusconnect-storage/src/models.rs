// MongoDB document models (internal, may differ from public DTOs)
//
// Documents keep the camelCase field names of the wire format, store `_id` as
// an ObjectId and timestamps as BSON dates. Conversion to and from the core
// types goes through epoch milliseconds.

use anyhow::Result;
use campusconnect_core::{
    Event, EventPatch, EventType, NewEvent, NewNotification, NewRegistration, NewUserProfile,
    Notification, NotificationType, Registration, RegistrationStatus, SocialLinks, UserProfile,
    UserProfilePatch, ANONYMOUS_CREATOR, DEFAULT_CURRENCY,
};
use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

pub(crate) fn to_bson_date(ts: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(ts.timestamp_millis())
}

pub(crate) fn from_bson_date(ts: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap_or_default()
}

fn hex_id(id: Option<ObjectId>) -> String {
    id.map(|oid| oid.to_hex()).unwrap_or_default()
}

fn default_creator() -> String {
    ANONYMOUS_CREATOR.to_string()
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

// ============================================
// Events
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub description: String,
    pub date: bson::DateTime,
    pub location: String,
    pub college: String,
    pub event_type: EventType,
    pub link: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_creator")]
    pub created_by: String,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
    #[serde(default)]
    pub registration_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_deadline: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<i64>,
    #[serde(default)]
    pub registered_users: Vec<String>,
    #[serde(default)]
    pub registration_count: i64,
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

impl EventDocument {
    pub fn from_new(input: NewEvent, now: DateTime<Utc>) -> Self {
        let now = to_bson_date(now);
        Self {
            id: None,
            title: input.title,
            description: input.description,
            date: to_bson_date(input.date),
            location: input.location,
            college: input.college,
            event_type: input.event_type,
            link: input.link,
            tags: input.tags,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
            registration_enabled: input.registration_enabled,
            registration_deadline: input.registration_deadline.map(to_bson_date),
            max_participants: input.max_participants.map(i64::from),
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

    pub fn into_event(self) -> Event {
        Event {
            id: hex_id(self.id),
            title: self.title,
            description: self.description,
            date: from_bson_date(self.date),
            location: self.location,
            college: self.college,
            event_type: self.event_type,
            link: self.link,
            tags: self.tags,
            created_by: self.created_by,
            created_at: from_bson_date(self.created_at),
            updated_at: from_bson_date(self.updated_at),
            registration_enabled: self.registration_enabled,
            registration_deadline: self.registration_deadline.map(from_bson_date),
            max_participants: self.max_participants.and_then(|n| u32::try_from(n).ok()),
            registered_users: self.registered_users,
            registration_count: u32::try_from(self.registration_count).unwrap_or(0),
            is_featured: self.is_featured,
            image_url: self.image_url,
            organizer: self.organizer,
            contact_email: self.contact_email,
            prerequisites: self.prerequisites,
            price: self.price,
            currency: self.currency,
        }
    }
}

#[cfg(test)]
impl From<&Event> for EventDocument {
    fn from(event: &Event) -> Self {
        Self {
            id: ObjectId::parse_str(&event.id).ok(),
            title: event.title.clone(),
            description: event.description.clone(),
            date: to_bson_date(event.date),
            location: event.location.clone(),
            college: event.college.clone(),
            event_type: event.event_type,
            link: event.link.clone(),
            tags: event.tags.clone(),
            created_by: event.created_by.clone(),
            created_at: to_bson_date(event.created_at),
            updated_at: to_bson_date(event.updated_at),
            registration_enabled: event.registration_enabled,
            registration_deadline: event.registration_deadline.map(to_bson_date),
            max_participants: event.max_participants.map(i64::from),
            registered_users: event.registered_users.clone(),
            registration_count: i64::from(event.registration_count),
            is_featured: event.is_featured,
            image_url: event.image_url.clone(),
            organizer: event.organizer.clone(),
            contact_email: event.contact_email.clone(),
            prerequisites: event.prerequisites.clone(),
            price: event.price,
            currency: event.currency.clone(),
        }
    }
}

/// `$set` body for a partial event update. `updatedAt` is always present.
pub fn event_patch_document(patch: EventPatch, now: DateTime<Utc>) -> Document {
    let mut set = doc! { "updatedAt": to_bson_date(now) };
    if let Some(title) = patch.title {
        set.insert("title", title);
    }
    if let Some(description) = patch.description {
        set.insert("description", description);
    }
    if let Some(date) = patch.date {
        set.insert("date", to_bson_date(date));
    }
    if let Some(location) = patch.location {
        set.insert("location", location);
    }
    if let Some(college) = patch.college {
        set.insert("college", college);
    }
    if let Some(event_type) = patch.event_type {
        set.insert("eventType", event_type.as_str());
    }
    if let Some(link) = patch.link {
        set.insert("link", link);
    }
    if let Some(tags) = patch.tags {
        set.insert("tags", tags);
    }
    if let Some(enabled) = patch.registration_enabled {
        set.insert("registrationEnabled", enabled);
    }
    if let Some(deadline) = patch.registration_deadline {
        set.insert("registrationDeadline", to_bson_date(deadline));
    }
    if let Some(max) = patch.max_participants {
        set.insert("maxParticipants", i64::from(max));
    }
    if let Some(featured) = patch.is_featured {
        set.insert("isFeatured", featured);
    }
    if let Some(image_url) = patch.image_url {
        set.insert("imageUrl", image_url);
    }
    if let Some(organizer) = patch.organizer {
        set.insert("organizer", organizer);
    }
    if let Some(contact_email) = patch.contact_email {
        set.insert("contactEmail", contact_email);
    }
    if let Some(prerequisites) = patch.prerequisites {
        set.insert("prerequisites", prerequisites);
    }
    if let Some(price) = patch.price {
        set.insert("price", price);
    }
    if let Some(currency) = patch.currency {
        set.insert("currency", currency);
    }
    set
}

// ============================================
// Registrations
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub event_id: String,
    pub user_id: String,
    pub registered_at: bson::DateTime,
    #[serde(default)]
    pub status: RegistrationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl RegistrationDocument {
    pub fn from_new(input: NewRegistration, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            event_id: input.event_id,
            user_id: input.user_id,
            registered_at: to_bson_date(now),
            status: input.status,
            additional_info: input.additional_info,
        }
    }

    pub fn into_registration(self) -> Registration {
        Registration {
            id: hex_id(self.id),
            event_id: self.event_id,
            user_id: self.user_id,
            registered_at: from_bson_date(self.registered_at),
            status: self.status,
            additional_info: self.additional_info,
        }
    }
}

// ============================================
// User profiles
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(default)]
    pub interests: Vec<EventType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(default)]
    pub favorite_events: Vec<String>,
    #[serde(default)]
    pub registered_events: Vec<String>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl UserDocument {
    pub fn from_new(input: NewUserProfile, now: DateTime<Utc>) -> Self {
        let now = to_bson_date(now);
        Self {
            id: None,
            name: input.name,
            email: input.email,
            college: input.college,
            year: input.year,
            major: input.major,
            interests: input.interests,
            bio: input.bio,
            social_links: input.social_links,
            favorite_events: Vec::new(),
            registered_events: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            id: hex_id(self.id),
            name: self.name,
            email: self.email,
            college: self.college,
            year: self.year,
            major: self.major,
            interests: self.interests,
            bio: self.bio,
            social_links: self.social_links,
            favorite_events: self.favorite_events,
            registered_events: self.registered_events,
            created_at: from_bson_date(self.created_at),
            updated_at: from_bson_date(self.updated_at),
        }
    }
}

/// `$set` body for a partial profile update.
pub fn user_patch_document(patch: UserProfilePatch, now: DateTime<Utc>) -> Result<Document> {
    let mut set = doc! { "updatedAt": to_bson_date(now) };
    if let Some(name) = patch.name {
        set.insert("name", name);
    }
    if let Some(college) = patch.college {
        set.insert("college", college);
    }
    if let Some(year) = patch.year {
        set.insert("year", year);
    }
    if let Some(major) = patch.major {
        set.insert("major", major);
    }
    if let Some(interests) = patch.interests {
        let names: Vec<&str> = interests.iter().map(EventType::as_str).collect();
        set.insert("interests", names);
    }
    if let Some(bio) = patch.bio {
        set.insert("bio", bio);
    }
    if let Some(social_links) = patch.social_links {
        set.insert("socialLinks", bson::to_bson(&social_links)?);
    }
    Ok(set)
}

// ============================================
// Notifications
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub created_at: bson::DateTime,
}

impl NotificationDocument {
    pub fn from_new(input: NewNotification, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            user_id: input.user_id,
            notification_type: input.notification_type,
            title: input.title,
            message: input.message,
            event_id: input.event_id,
            read: false,
            created_at: to_bson_date(now),
        }
    }

    pub fn into_notification(self) -> Notification {
        Notification {
            id: hex_id(self.id),
            user_id: self.user_id,
            notification_type: self.notification_type,
            title: self.title,
            message: self.message,
            event_id: self.event_id,
            read: self.read,
            created_at: from_bson_date(self.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusconnect_core::sample_new_events;
    use chrono::TimeZone;

    #[test]
    fn test_event_document_uses_wire_field_names() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let doc = bson::to_document(&EventDocument::from_new(sample_new_events().remove(0), now))
            .unwrap();

        assert!(!doc.contains_key("_id"));
        assert_eq!(doc.get_str("eventType").unwrap(), "tech-talk");
        assert_eq!(doc.get_str("createdBy").unwrap(), "anonymous");
        assert_eq!(doc.get_i64("registrationCount").unwrap(), 0);
        assert!(doc.get_datetime("date").is_ok());
    }

    #[test]
    fn test_into_event_exposes_hex_id() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let oid = ObjectId::new();
        let mut document = EventDocument::from_new(sample_new_events().remove(1), now);
        document.id = Some(oid);
        document.max_participants = Some(-3);

        let event = document.into_event();
        assert_eq!(event.id, oid.to_hex());
        assert_eq!(event.created_at, now);
        assert_eq!(event.max_participants, None);
    }

    #[test]
    fn test_event_patch_document_always_sets_updated_at() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let set = event_patch_document(EventPatch::default(), now);
        assert_eq!(set.len(), 1);
        assert!(set.get_datetime("updatedAt").is_ok());

        let set = event_patch_document(
            EventPatch {
                event_type: Some(EventType::Hackathon),
                max_participants: Some(30),
                ..Default::default()
            },
            now,
        );
        assert_eq!(set.get_str("eventType").unwrap(), "hackathon");
        assert_eq!(set.get_i64("maxParticipants").unwrap(), 30);
    }

    #[test]
    fn test_user_patch_document_serializes_nested_fields() {
        let now = Utc::now();
        let set = user_patch_document(
            UserProfilePatch {
                interests: Some(vec![EventType::TechTalk]),
                social_links: Some(SocialLinks {
                    github: Some("ada".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            now,
        )
        .unwrap();

        assert_eq!(
            set.get_array("interests").unwrap(),
            &vec![bson::Bson::String("tech-talk".to_string())]
        );
        assert_eq!(
            set.get_document("socialLinks").unwrap().get_str("github").unwrap(),
            "ada"
        );
    }
}
