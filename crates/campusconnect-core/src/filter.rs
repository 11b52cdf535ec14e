// Event filtering
// Decision: One normalized predicate set drives both storage backends
//
// `FilterParams` is the raw query-string shape. `EventFilters` is the
// normalized form: blank values removed, `eventType=all` dropped, dates parsed.
// The fallback store evaluates `EventFilters::matches` in memory; the primary
// store translates the same struct into a native query. Both must agree.

use chrono::{DateTime, NaiveDate, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::error::{CampusError, Result};
use crate::event::{Event, EventType};

/// Sentinel accepted for `eventType` meaning "no constraint".
pub const ALL_EVENT_TYPES: &str = "all";

/// Raw filter parameters as received in a query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    /// Case-insensitive substring over title, description, college, location and tags.
    #[serde(default)]
    pub search: Option<String>,
    /// `hackathon`, `tech-talk`, `workshop` or `all`.
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Inclusive lower bound (RFC 3339 or `YYYY-MM-DD`).
    #[serde(default)]
    pub date_from: Option<String>,
    /// Inclusive upper bound (RFC 3339 or `YYYY-MM-DD`).
    #[serde(default)]
    pub date_to: Option<String>,
}

impl FilterParams {
    /// Normalize into a predicate set.
    pub fn into_filters(self) -> Result<EventFilters> {
        let event_type = match present(self.event_type) {
            None => None,
            Some(value) if value.eq_ignore_ascii_case(ALL_EVENT_TYPES) => None,
            Some(value) => Some(
                EventType::parse(&value)
                    .ok_or_else(|| CampusError::validation(format!("Invalid event type: {value}")))?,
            ),
        };

        let date_from = present(self.date_from)
            .map(|value| parse_filter_date(&value, "dateFrom"))
            .transpose()?;
        let date_to = present(self.date_to)
            .map(|value| parse_filter_date(&value, "dateTo"))
            .transpose()?;

        Ok(EventFilters {
            search: present(self.search),
            event_type,
            college: present(self.college),
            location: present(self.location),
            date_from,
            date_to,
        })
    }
}

/// Treat blank strings and the client's literal "undefined" as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && v != "undefined")
}

/// Parse a filter or form date: RFC 3339, or a bare date at midnight UTC.
pub fn parse_filter_date(value: &str, field: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(CampusError::validation(format!(
        "Invalid date for {field}: {value}"
    )))
}

/// Normalized predicate set. Every `Some` field constrains the result; all
/// constraints are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilters {
    pub search: Option<String>,
    pub event_type: Option<EventType>,
    pub college: Option<String>,
    pub location: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

impl EventFilters {
    pub fn is_empty(&self) -> bool {
        *self == EventFilters::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn with_college(mut self, college: impl Into<String>) -> Self {
        self.college = Some(college.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_date_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// In-memory evaluation of the predicate set.
    pub fn matches(&self, event: &Event) -> bool {
        EventMatcher::new(self).matches(event)
    }

    /// Filter a collection and order it by date ascending.
    /// Ties keep input order; callers must not rely on it.
    pub fn apply(&self, events: impl IntoIterator<Item = Event>) -> Vec<Event> {
        let matcher = EventMatcher::new(self);
        let mut matched: Vec<Event> = events.into_iter().filter(|e| matcher.matches(e)).collect();
        matched.sort_by(|a, b| a.date.cmp(&b.date));
        matched
    }
}

/// Case-insensitive literal substring test.
///
/// Uses Unicode simple case folding, the same folding the primary store
/// applies to `$regex` with the `i` option. Full lowercasing differs: it
/// maps a final `Σ` to `ς` and `İ` to `i` plus a combining dot.
#[derive(Debug, Clone)]
enum TermMatcher {
    Pattern(Regex),
    /// The term exceeded the regex size limit and matches nothing.
    Never,
}

impl TermMatcher {
    fn new(term: &str) -> Self {
        RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
            .map(TermMatcher::Pattern)
            .unwrap_or(TermMatcher::Never)
    }

    fn is_match(&self, haystack: &str) -> bool {
        match self {
            TermMatcher::Pattern(re) => re.is_match(haystack),
            TermMatcher::Never => false,
        }
    }
}

/// `EventFilters` with its text terms compiled once.
struct EventMatcher<'a> {
    filters: &'a EventFilters,
    search: Option<TermMatcher>,
    college: Option<TermMatcher>,
    location: Option<TermMatcher>,
}

impl<'a> EventMatcher<'a> {
    fn new(filters: &'a EventFilters) -> Self {
        Self {
            filters,
            search: filters.search.as_deref().map(TermMatcher::new),
            college: filters.college.as_deref().map(TermMatcher::new),
            location: filters.location.as_deref().map(TermMatcher::new),
        }
    }

    fn matches(&self, event: &Event) -> bool {
        if let Some(search) = &self.search {
            let hit = search.is_match(&event.title)
                || search.is_match(&event.description)
                || search.is_match(&event.college)
                || search.is_match(&event.location)
                || event.tags.iter().any(|tag| search.is_match(tag));
            if !hit {
                return false;
            }
        }

        if let Some(event_type) = self.filters.event_type {
            if event.event_type != event_type {
                return false;
            }
        }

        if let Some(college) = &self.college {
            if !college.is_match(&event.college) {
                return false;
            }
        }

        if let Some(location) = &self.location {
            if !location.is_match(&event.location) {
                return false;
            }
        }

        if let Some(from) = self.filters.date_from {
            if event.date < from {
                return false;
            }
        }

        if let Some(to) = self.filters.date_to {
            if event.date > to {
                return false;
            }
        }

        true
    }
}
