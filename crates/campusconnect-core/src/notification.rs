// Notification domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Maximum notifications returned per listing.
pub const NOTIFICATION_PAGE_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    EventReminder,
    RegistrationConfirmed,
    EventUpdated,
    EventCancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: String,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub event_id: Option<String>,
}

impl NewNotification {
    /// Notification recorded after a registration, naming the resulting status.
    pub fn registration(
        user_id: &str,
        event_id: &str,
        event_title: &str,
        status: crate::RegistrationStatus,
    ) -> Self {
        Self {
            user_id: user_id.to_string(),
            notification_type: NotificationType::RegistrationConfirmed,
            title: "Registration Confirmed".to_string(),
            message: format!("You have been {status} for \"{event_title}\""),
            event_id: Some(event_id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RegistrationStatus;

    #[test]
    fn test_registration_notification_message() {
        let n = NewNotification::registration(
            "u1",
            "e1",
            "CodeCrush Hackathon",
            RegistrationStatus::Waitlisted,
        );
        assert_eq!(n.message, "You have been waitlisted for \"CodeCrush Hackathon\"");
        assert_eq!(n.notification_type, NotificationType::RegistrationConfirmed);
    }

    #[test]
    fn test_notification_type_field_name() {
        let n = Notification {
            id: "n1".to_string(),
            user_id: "u1".to_string(),
            notification_type: NotificationType::EventReminder,
            title: "t".to_string(),
            message: "m".to_string(),
            event_id: None,
            read: false,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "event_reminder");
        assert_eq!(json["userId"], "u1");
    }
}
