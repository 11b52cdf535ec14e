// Registration domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Registration status.
/// - `confirmed`: holds a seat
/// - `waitlisted`: event was at capacity when the user registered
/// - `cancelled`: kept for history
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[default]
    Confirmed,
    Waitlisted,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Confirmed => "confirmed",
            RegistrationStatus::Waitlisted => "waitlisted",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }

    /// Status for a new registration given the current confirmed count.
    pub fn for_capacity(confirmed: u64, max_participants: Option<u32>) -> Self {
        match max_participants {
            Some(max) if max > 0 && confirmed >= u64::from(max) => RegistrationStatus::Waitlisted,
            _ => RegistrationStatus::Confirmed,
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's registration for an event. Unique per `(event_id, user_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub registered_at: DateTime<Utc>,
    pub status: RegistrationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

/// Input for creating a registration.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRegistration {
    pub event_id: String,
    pub user_id: String,
    pub status: RegistrationStatus,
    pub additional_info: Option<String>,
}
