// Input validation for event APIs
//
// Turns loosely-typed request bodies into validated domain inputs. Messages
// are returned to clients verbatim, so they name the offending field.

use campusconnect_core::{
    parse_filter_date, CampusError, CurrentUser, EventPatch, EventType, NewEvent,
    Result, ANONYMOUS_CREATOR, DEFAULT_CURRENCY,
};
use chrono::{DateTime, Utc};
use url::Url;

use super::common::present;
use super::events::EventRequest;

/// Required on every new event, checked in this order.
pub const REQUIRED_EVENT_FIELDS: [&str; 7] = [
    "title",
    "description",
    "date",
    "location",
    "college",
    "eventType",
    "link",
];

/// Value of a required field, or "Missing required field: <field>".
pub fn required(value: Option<String>, field: &str) -> Result<String> {
    present(value).ok_or_else(|| CampusError::missing_field(field))
}

/// Absolute http(s) URL.
pub fn validate_url(value: &str, field: &str) -> Result<()> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(CampusError::validation(format!(
            "Invalid URL for {field}: {value}"
        ))),
    }
}

pub fn parse_event_type(value: &str) -> Result<EventType> {
    EventType::parse(value)
        .ok_or_else(|| CampusError::validation(format!("Invalid event type: {value}")))
}

/// Event date that is not in the past.
pub fn parse_event_date(value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let date = parse_filter_date(value, "date")?;
    if date < now {
        return Err(CampusError::validation("Event date cannot be in the past"));
    }
    Ok(date)
}

pub fn validate_price(price: f64) -> Result<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(CampusError::validation("Price cannot be negative"));
    }
    Ok(price)
}

fn optional_url(value: Option<String>, field: &str) -> Result<Option<String>> {
    let value = present(value);
    if let Some(url) = &value {
        validate_url(url, field)?;
    }
    Ok(value)
}

/// Validate a create request. `createdBy` falls back to the caller, then to
/// "anonymous".
pub fn validate_new_event(
    req: EventRequest,
    current_user: Option<&CurrentUser>,
    now: DateTime<Utc>,
) -> Result<NewEvent> {
    let title = required(req.title, "title")?;
    let description = required(req.description, "description")?;
    let date = required(req.date, "date")?;
    let location = required(req.location, "location")?;
    let college = required(req.college, "college")?;
    let event_type = required(req.event_type, "eventType")?;
    let link = required(req.link, "link")?;

    let event_type = parse_event_type(&event_type)?;
    let date = parse_event_date(&date, now)?;
    validate_url(&link, "link")?;

    let created_by = present(req.created_by)
        .or_else(|| current_user.map(|u| u.id.clone()))
        .unwrap_or_else(|| ANONYMOUS_CREATOR.to_string());

    Ok(NewEvent {
        title,
        description,
        date,
        location,
        college,
        event_type,
        link,
        tags: req.tags.map(|t| t.into_vec()).unwrap_or_default(),
        created_by,
        registration_enabled: req.registration_enabled.unwrap_or(false),
        registration_deadline: present(req.registration_deadline)
            .map(|v| parse_filter_date(&v, "registrationDeadline"))
            .transpose()?,
        max_participants: req.max_participants,
        is_featured: req.is_featured.unwrap_or(false),
        image_url: optional_url(req.image_url, "imageUrl")?,
        organizer: present(req.organizer),
        contact_email: present(req.contact_email),
        prerequisites: req.prerequisites.map(|p| p.into_vec()).unwrap_or_default(),
        price: validate_price(req.price.unwrap_or(0.0))?,
        currency: present(req.currency).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
    })
}

/// Validate an update request. Only supplied fields are checked; a blank
/// required field is rejected rather than cleared.
pub fn validate_event_patch(req: EventRequest) -> Result<EventPatch> {
    fn keep(value: Option<String>, field: &str) -> Result<Option<String>> {
        match value {
            None => Ok(None),
            Some(v) => required(Some(v), field).map(Some),
        }
    }

    let link = keep(req.link, "link")?;
    if let Some(link) = &link {
        validate_url(link, "link")?;
    }

    Ok(EventPatch {
        title: keep(req.title, "title")?,
        description: keep(req.description, "description")?,
        date: keep(req.date, "date")?
            .map(|v| parse_filter_date(&v, "date"))
            .transpose()?,
        location: keep(req.location, "location")?,
        college: keep(req.college, "college")?,
        event_type: keep(req.event_type, "eventType")?
            .map(|v| parse_event_type(&v))
            .transpose()?,
        link,
        tags: req.tags.map(|t| t.into_vec()),
        registration_enabled: req.registration_enabled,
        registration_deadline: present(req.registration_deadline)
            .map(|v| parse_filter_date(&v, "registrationDeadline"))
            .transpose()?,
        max_participants: req.max_participants,
        is_featured: req.is_featured,
        image_url: optional_url(req.image_url, "imageUrl")?,
        organizer: present(req.organizer),
        contact_email: present(req.contact_email),
        prerequisites: req.prerequisites.map(|p| p.into_vec()),
        price: req.price.map(validate_price).transpose()?,
        currency: present(req.currency),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusconnect_core::ListField;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    fn complete_request() -> EventRequest {
        EventRequest {
            title: Some("CodeCrush Hackathon".to_string()),
            description: Some("48 hours of building".to_string()),
            date: Some("2030-02-01T09:00:00Z".to_string()),
            location: Some("Stanford University".to_string()),
            college: Some("Stanford".to_string()),
            event_type: Some("hackathon".to_string()),
            link: Some("https://example.com/hackathon".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_each_required_field_is_reported() {
        for field in REQUIRED_EVENT_FIELDS {
            let mut req = complete_request();
            match field {
                "title" => req.title = None,
                "description" => req.description = Some("   ".to_string()),
                "date" => req.date = None,
                "location" => req.location = None,
                "college" => req.college = Some(String::new()),
                "eventType" => req.event_type = None,
                "link" => req.link = None,
                _ => unreachable!(),
            }
            let err = validate_new_event(req, None, now()).unwrap_err();
            assert_eq!(err.to_string(), format!("Missing required field: {field}"));
        }
    }

    #[test]
    fn test_defaults_applied() {
        let event = validate_new_event(complete_request(), None, now()).unwrap();
        assert_eq!(event.created_by, "anonymous");
        assert_eq!(event.currency, "USD");
        assert_eq!(event.price, 0.0);
        assert!(event.tags.is_empty());
        assert!(!event.registration_enabled);
    }

    #[test]
    fn test_created_by_falls_back_to_current_user() {
        let user = CurrentUser::new("user_42");
        let event = validate_new_event(complete_request(), Some(&user), now()).unwrap();
        assert_eq!(event.created_by, "user_42");

        let mut req = complete_request();
        req.created_by = Some("organizer".to_string());
        let event = validate_new_event(req, Some(&user), now()).unwrap();
        assert_eq!(event.created_by, "organizer");
    }

    #[test]
    fn test_list_fields_accept_comma_separated_text() {
        let mut req = complete_request();
        req.prerequisites = Some(ListField::Text("a, b, ,c".to_string()));
        req.tags = Some(ListField::Items(vec!["rust".to_string()]));
        let event = validate_new_event(req, None, now()).unwrap();
        assert_eq!(event.prerequisites, vec!["a", "b", "c"]);
        assert_eq!(event.tags, vec!["rust"]);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut req = complete_request();
        req.link = Some("not a url".to_string());
        assert!(validate_new_event(req, None, now())
            .unwrap_err()
            .to_string()
            .contains("link"));

        let mut req = complete_request();
        req.image_url = Some("ftp://example.com/a.png".to_string());
        assert!(validate_new_event(req, None, now())
            .unwrap_err()
            .to_string()
            .contains("imageUrl"));

        let mut req = complete_request();
        req.event_type = Some("meetup".to_string());
        assert!(validate_new_event(req, None, now()).is_err());

        let mut req = complete_request();
        req.date = Some("2029-12-31".to_string());
        assert_eq!(
            validate_new_event(req, None, now()).unwrap_err().to_string(),
            "Event date cannot be in the past"
        );

        let mut req = complete_request();
        req.price = Some(-1.0);
        assert!(validate_new_event(req, None, now()).is_err());
    }

    #[test]
    fn test_empty_patch() {
        let patch = validate_event_patch(EventRequest::default()).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_patch_rejects_blank_required_field() {
        let req = EventRequest {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_event_patch(req).unwrap_err().to_string(),
            "Missing required field: title"
        );
    }

    #[test]
    fn test_patch_allows_past_dates() {
        let req = EventRequest {
            date: Some("2020-01-01".to_string()),
            max_participants: Some(10),
            ..Default::default()
        };
        let patch = validate_event_patch(req).unwrap();
        assert!(patch.date.is_some());
        assert_eq!(patch.max_participants, Some(10));
    }
}
