// Collection counts and schema backfill results

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Event fields that older records may lack, with their defaults applied on
/// read. A migration writes the defaults back.
pub const EVENT_DEFAULTED_FIELDS: [&str; 7] = [
    "registrationEnabled",
    "registrationCount",
    "registeredUsers",
    "isFeatured",
    "prerequisites",
    "price",
    "currency",
];

/// Profile fields that older records may lack.
pub const USER_DEFAULTED_FIELDS: [&str; 2] = ["favoriteEvents", "registeredEvents"];

/// Document count per collection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CollectionCounts {
    pub events: u64,
    pub users: u64,
    pub registrations: u64,
    pub notifications: u64,
    /// Sum of the four collections.
    pub total: u64,
}

impl CollectionCounts {
    pub fn new(events: u64, users: u64, registrations: u64, notifications: u64) -> Self {
        Self {
            events,
            users,
            registrations,
            notifications,
            total: events + users + registrations + notifications,
        }
    }
}

/// Records rewritten by a migration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub events_updated: u64,
    pub users_updated: u64,
}

/// Outcome of copying events into a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: u64,
    pub failed: u64,
}
