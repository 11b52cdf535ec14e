// CampusConnect core
//
// DB-agnostic domain types shared by the storage adapters and the API:
// - Event, registration, profile and notification entities
// - Filter normalization and the in-memory predicate both stores must agree with
// - Error taxonomy mapped to HTTP status codes by the API

pub mod database;
pub mod error;
pub mod event;
pub mod filter;
pub mod notification;
pub mod registration;
pub mod sample;
pub mod user;

pub use database::{
    CollectionCounts, ImportReport, MigrationReport, EVENT_DEFAULTED_FIELDS, USER_DEFAULTED_FIELDS,
};
pub use error::{CampusError, Result};
pub use event::{
    distinct_sorted, split_list, Event, EventPatch, EventStats, EventType, EventTypeCount,
    ListField, NewEvent, ANONYMOUS_CREATOR, DEFAULT_CURRENCY,
};
pub use filter::{parse_filter_date, EventFilters, FilterParams, ALL_EVENT_TYPES};
pub use notification::{NewNotification, Notification, NotificationType, NOTIFICATION_PAGE_SIZE};
pub use registration::{NewRegistration, Registration, RegistrationStatus};
pub use sample::{sample_events, sample_new_events};
pub use user::{CurrentUser, NewUserProfile, SocialLinks, UserProfile, UserProfilePatch};
