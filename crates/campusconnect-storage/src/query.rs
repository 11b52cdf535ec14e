// Native MongoDB translation of EventFilters
//
// Must return the same id set as `EventFilters::matches`. User input is
// regex-escaped so `$regex` behaves as a literal case-insensitive substring.

use campusconnect_core::{EventFilters, DEFAULT_CURRENCY};
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, Document};

use crate::models::to_bson_date;

/// Case-insensitive literal substring match.
fn contains_pattern(term: &str) -> Document {
    doc! { "$regex": regex::escape(term), "$options": "i" }
}

/// Build the `find` filter for a normalized predicate set.
pub fn event_filter_document(filters: &EventFilters) -> Document {
    let mut filter = Document::new();

    if let Some(search) = &filters.search {
        let pattern = contains_pattern(search);
        let clauses: Vec<Document> = ["title", "description", "college", "location", "tags"]
            .iter()
            .map(|field| {
                let mut clause = Document::new();
                clause.insert(*field, pattern.clone());
                clause
            })
            .collect();
        filter.insert("$or", clauses);
    }

    if let Some(event_type) = filters.event_type {
        filter.insert("eventType", event_type.as_str());
    }

    if let Some(college) = &filters.college {
        filter.insert("college", contains_pattern(college));
    }

    if let Some(location) = &filters.location {
        filter.insert("location", contains_pattern(location));
    }

    if filters.date_from.is_some() || filters.date_to.is_some() {
        let mut range = Document::new();
        if let Some(from) = filters.date_from {
            range.insert("$gte", to_bson_date(from));
        }
        if let Some(to) = filters.date_to {
            range.insert("$lte", to_bson_date(to));
        }
        filter.insert("date", range);
    }

    filter
}

/// Sort applied to every event listing.
pub fn event_sort_document() -> Document {
    doc! { "date": 1 }
}

/// Pipeline update that adds `event_id` to a user's favorites, or removes
/// it when already present.
///
/// The id is wrapped in `$literal` so a value such as `"$email"` is stored
/// as text and never read as a field path or operator.
pub fn toggle_favorite_pipeline(event_id: &str, now: DateTime<Utc>) -> Vec<Document> {
    let id = doc! { "$literal": event_id };
    let favorites = doc! { "$ifNull": ["$favoriteEvents", []] };
    vec![doc! {
        "$set": {
            "favoriteEvents": {
                "$cond": [
                    { "$in": [id.clone(), favorites.clone()] },
                    { "$setDifference": [favorites.clone(), [id.clone()]] },
                    { "$concatArrays": [favorites, [id]] },
                ]
            },
            "updatedAt": to_bson_date(now),
        }
    }]
}

/// Values written into event documents that lack newer fields.
pub fn event_field_defaults() -> Document {
    doc! {
        "registrationEnabled": false,
        "registrationCount": 0_i64,
        "registeredUsers": [],
        "isFeatured": false,
        "prerequisites": [],
        "price": 0.0,
        "currency": DEFAULT_CURRENCY,
    }
}

/// Values written into profile documents that lack newer fields.
pub fn user_field_defaults() -> Document {
    doc! {
        "favoriteEvents": [],
        "registeredEvents": [],
    }
}

/// Matches documents missing at least one key of `defaults`.
pub fn missing_any_field(defaults: &Document) -> Document {
    let clauses: Vec<Document> = defaults
        .keys()
        .map(|field| {
            let mut clause = Document::new();
            clause.insert(field.as_str(), doc! { "$exists": false });
            clause
        })
        .collect();
    doc! { "$or": clauses }
}

/// Pipeline update that fills each key of `defaults` only where it is absent
/// or null. Present values are kept.
pub fn backfill_pipeline(defaults: &Document) -> Vec<Document> {
    let mut set = Document::new();
    for (field, value) in defaults {
        set.insert(
            field.as_str(),
            doc! { "$ifNull": [format!("${field}"), { "$literal": value.clone() }] },
        );
    }
    vec![doc! { "$set": set }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventDocument;
    use campusconnect_core::{
        sample_events, Event, EventType, EVENT_DEFAULTED_FIELDS, USER_DEFAULTED_FIELDS,
    };
    use chrono::{TimeZone, Utc};
    use mongodb::bson::{self, Bson};

    // Evaluates the subset of query operators `event_filter_document` emits
    // against a serialized event document.
    fn eval(filter: &Document, doc: &Document) -> bool {
        filter.iter().all(|(key, cond)| match key.as_str() {
            "$or" => cond
                .as_array()
                .map(|clauses| {
                    clauses.iter().any(|c| c.as_document().is_some_and(|c| eval(c, doc)))
                })
                .unwrap_or(false),
            field => field_matches(doc.get(field), cond),
        })
    }

    fn field_matches(value: Option<&Bson>, cond: &Bson) -> bool {
        let Some(value) = value else {
            return false;
        };
        if let Bson::Array(items) = value {
            return items.iter().any(|item| field_matches(Some(item), cond));
        }
        match cond {
            Bson::Document(ops) => ops.iter().all(|(op, arg)| match op.as_str() {
                "$regex" => {
                    let pattern = format!("(?i){}", arg.as_str().unwrap_or_default());
                    let re = regex::Regex::new(&pattern).unwrap();
                    value.as_str().is_some_and(|s| re.is_match(s))
                }
                "$options" => true,
                "$gte" => value.as_datetime() >= arg.as_datetime(),
                "$lte" => value.as_datetime() <= arg.as_datetime(),
                other => panic!("unsupported operator {other}"),
            }),
            other => value == other,
        }
    }

    fn ids_via_query(filters: &EventFilters, events: &[Event]) -> Vec<String> {
        let filter = event_filter_document(filters);
        events
            .iter()
            .filter(|e| eval(&filter, &bson::to_document(&EventDocument::from(*e)).unwrap()))
            .map(|e| e.id.clone())
            .collect()
    }

    fn ids_via_memory(filters: &EventFilters, events: &[Event]) -> Vec<String> {
        events
            .iter()
            .filter(|e| filters.matches(e))
            .map(|e| e.id.clone())
            .collect()
    }

    #[test]
    fn test_empty_filters_match_everything() {
        assert!(event_filter_document(&EventFilters::default()).is_empty());
    }

    #[test]
    fn test_search_builds_or_over_text_fields() {
        let filter = event_filter_document(&EventFilters::default().with_search("a.b"));
        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 5);
        let title = clauses[0].as_document().unwrap().get_document("title").unwrap();
        assert_eq!(title.get_str("$regex").unwrap(), "a\\.b");
        assert_eq!(title.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_date_range_uses_inclusive_operators() {
        let from = Utc.with_ymd_and_hms(2025, 7, 21, 0, 0, 0).unwrap();
        let filter =
            event_filter_document(&EventFilters::default().with_date_range(Some(from), None));
        let range = filter.get_document("date").unwrap();
        assert!(range.contains_key("$gte"));
        assert!(!range.contains_key("$lte"));
    }

    #[test]
    fn test_toggle_favorite_pipeline_quotes_event_id() {
        let pipeline = toggle_favorite_pipeline("$email", Utc::now());
        assert_eq!(pipeline.len(), 1);
        let cond = pipeline[0]
            .get_document("$set")
            .unwrap()
            .get_document("favoriteEvents")
            .unwrap()
            .get_array("$cond")
            .unwrap();

        let literal = doc! { "$literal": "$email" };
        let contains = cond[0].as_document().unwrap().get_array("$in").unwrap();
        assert_eq!(contains[0], Bson::Document(literal.clone()));
        let removed = cond[1].as_document().unwrap().get_array("$setDifference").unwrap();
        assert_eq!(removed[1], Bson::Array(vec![Bson::Document(literal.clone())]));
        let appended = cond[2].as_document().unwrap().get_array("$concatArrays").unwrap();
        assert_eq!(appended[1], Bson::Array(vec![Bson::Document(literal)]));
    }

    #[test]
    fn test_field_defaults_cover_defaulted_fields() {
        let event_defaults = event_field_defaults();
        let keys: Vec<&str> = event_defaults.keys().map(String::as_str).collect();
        assert_eq!(keys, EVENT_DEFAULTED_FIELDS);
        let user_defaults = user_field_defaults();
        let keys: Vec<&str> = user_defaults.keys().map(String::as_str).collect();
        assert_eq!(keys, USER_DEFAULTED_FIELDS);
    }

    #[test]
    fn test_backfill_keeps_present_values() {
        let defaults = doc! { "currency": "USD", "prerequisites": [] };

        let filter = missing_any_field(&defaults);
        let clauses = filter.get_array("$or").unwrap();
        assert_eq!(clauses.len(), 2);
        assert_eq!(
            clauses[0].as_document().unwrap(),
            &doc! { "currency": { "$exists": false } }
        );

        let pipeline = backfill_pipeline(&defaults);
        let set = pipeline[0].get_document("$set").unwrap();
        assert_eq!(
            set.get_document("currency").unwrap(),
            &doc! { "$ifNull": ["$currency", { "$literal": "USD" }] }
        );
        assert_eq!(
            set.get_document("prerequisites").unwrap(),
            &doc! { "$ifNull": ["$prerequisites", { "$literal": [] }] }
        );
    }

    #[test]
    fn test_query_and_memory_filters_agree() {
        let mut events = sample_events();
        events[0].title = "C++ (advanced) Summit".to_string();
        events[2].tags.push("AI for good".to_string());
        events[0].location = "ΟΔΟΣ Hall".to_string();
        events[1].title = "İstanbul Workshop".to_string();
        events[1].college = "İstanbul".to_string();

        let day = |d| Utc.with_ymd_and_hms(2025, 7, d, 0, 0, 0).unwrap();
        let cases = vec![
            EventFilters::default(),
            EventFilters::default().with_search("ai"),
            EventFilters::default().with_search("STANFORD"),
            EventFilters::default().with_search("c++ ("),
            EventFilters::default().with_search("social impact"),
            EventFilters::default().with_search("nothing-matches-this"),
            EventFilters::default().with_event_type(EventType::Workshop),
            EventFilters::default()
                .with_event_type(EventType::Hackathon)
                .with_college("stan"),
            EventFilters::default().with_college("mi"),
            EventFilters::default().with_location("new york"),
            EventFilters::default().with_search("σ"),
            EventFilters::default().with_search("ς"),
            EventFilters::default().with_location("οδοσ"),
            EventFilters::default().with_search("i"),
            EventFilters::default().with_college("i"),
            EventFilters::default().with_search("İSTANBUL"),
            EventFilters::default().with_date_range(Some(day(21)), None),
            EventFilters::default().with_date_range(None, Some(day(26))),
            EventFilters::default().with_date_range(Some(events[1].date), Some(events[1].date)),
            EventFilters::default()
                .with_search("ai")
                .with_date_range(Some(day(26)), Some(day(31))),
        ];

        for filters in cases {
            assert_eq!(
                ids_via_query(&filters, &events),
                ids_via_memory(&filters, &events),
                "filters disagree: {filters:?}"
            );
        }
    }
}
