// Sample events
//
// Served by the fallback store when its data file is missing or empty, and
// inserted by the seed endpoint.

use chrono::{DateTime, TimeZone, Utc};

use crate::event::{Event, EventType, NewEvent, ANONYMOUS_CREATOR, DEFAULT_CURRENCY};

fn ts(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Input for the three sample events.
pub fn sample_new_events() -> Vec<NewEvent> {
    let base = |title: &str,
                description: &str,
                date: DateTime<Utc>,
                location: &str,
                college: &str,
                event_type: EventType,
                link: &str,
                tags: &[&str]| NewEvent {
        title: title.to_string(),
        description: description.to_string(),
        date,
        location: location.to_string(),
        college: college.to_string(),
        event_type,
        link: link.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_by: ANONYMOUS_CREATOR.to_string(),
        registration_enabled: false,
        registration_deadline: None,
        max_participants: None,
        is_featured: false,
        image_url: None,
        organizer: None,
        contact_email: None,
        prerequisites: Vec::new(),
        price: 0.0,
        currency: DEFAULT_CURRENCY.to_string(),
    };

    vec![
        base(
            "Tech Innovation Summit 2025",
            "Join us for the biggest tech summit of the year featuring industry leaders and cutting-edge technology demonstrations.",
            ts(2025, 7, 20, 10),
            "Convention Center, New York",
            "NYU",
            EventType::TechTalk,
            "https://example.com/tech-summit",
            &["technology", "innovation", "networking"],
        ),
        base(
            "AI/ML Workshop Series",
            "Hands-on workshop covering machine learning fundamentals and practical AI applications.",
            ts(2025, 7, 25, 14),
            "Computer Science Building, MIT",
            "MIT",
            EventType::Workshop,
            "https://example.com/ai-workshop",
            &["AI", "machine learning", "workshop"],
        ),
        base(
            "CodeCrush Hackathon",
            "48-hour hackathon focused on building solutions for social good. Great prizes and networking opportunities!",
            ts(2025, 7, 30, 9),
            "Stanford University",
            "Stanford",
            EventType::Hackathon,
            "https://example.com/hackathon",
            &["hackathon", "coding", "social impact"],
        ),
    ]
}

/// Sample events with fixed ids `"1"`, `"2"`, `"3"`.
pub fn sample_events() -> Vec<Event> {
    let created = ts(2025, 7, 15, 0);
    sample_new_events()
        .into_iter()
        .enumerate()
        .map(|(i, input)| Event::from_new((i + 1).to_string(), input, created))
        .collect()
}
