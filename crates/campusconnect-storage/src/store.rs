// Store interface shared by both backends
// Decision: async_trait so the backend enum and tests can hold `&dyn EventStore`
//
// Every operation has identical semantics on MongoDB and on the JSON file
// store. Lookups by an id the backend cannot parse return `None`/`false`
// rather than an error.

use anyhow::Result;
use async_trait::async_trait;
use campusconnect_core::{
    CollectionCounts, Event, EventFilters, EventPatch, EventStats, ImportReport, MigrationReport,
    NewEvent, NewNotification, NewRegistration, NewUserProfile, Notification, Registration,
    RegistrationStatus, UserProfile, UserProfilePatch,
};
use campusconnect_core::sample_new_events;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Lightweight read used to decide whether the store is reachable.
    async fn ping(&self) -> Result<()>;

    // ============================================
    // Events
    // ============================================

    /// Events matching `filters`, ordered by date ascending.
    async fn list_events(&self, filters: &EventFilters) -> Result<Vec<Event>>;

    async fn get_event(&self, id: &str) -> Result<Option<Event>>;

    async fn create_event(&self, input: NewEvent) -> Result<Event>;

    /// Partial update; `updatedAt` is refreshed even when the patch is empty.
    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<Option<Event>>;

    async fn delete_event(&self, id: &str) -> Result<bool>;

    /// Events created by `created_by`, newest first.
    async fn list_events_by_creator(&self, created_by: &str) -> Result<Vec<Event>>;

    async fn list_colleges(&self) -> Result<Vec<String>>;

    async fn list_locations(&self) -> Result<Vec<String>>;

    async fn event_stats(&self) -> Result<EventStats>;

    /// Insert the sample events through `create_event`, so they get fresh ids.
    async fn seed_sample_events(&self) -> Result<Vec<Event>> {
        let mut created = Vec::new();
        for input in sample_new_events() {
            created.push(self.create_event(input).await?);
        }
        Ok(created)
    }

    /// Add `user_id` to the event's registered set and bump the count, as one
    /// atomic step. Returns false when the event is unknown or the user is
    /// already in the set.
    async fn add_registered_user(&self, event_id: &str, user_id: &str) -> Result<bool>;

    /// Inverse of [`EventStore::add_registered_user`].
    async fn remove_registered_user(&self, event_id: &str, user_id: &str) -> Result<bool>;

    // ============================================
    // Registrations
    // ============================================

    /// Insert a registration. Returns `None` if `(event_id, user_id)` exists.
    async fn create_registration(&self, input: NewRegistration) -> Result<Option<Registration>>;

    async fn find_registration(&self, event_id: &str, user_id: &str)
        -> Result<Option<Registration>>;

    async fn count_registrations(&self, event_id: &str, status: RegistrationStatus)
        -> Result<u64>;

    async fn delete_registration(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<Registration>>;

    /// Newest first.
    async fn list_registrations(
        &self,
        event_id: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Vec<Registration>>;

    // ============================================
    // User profiles
    // ============================================

    /// Insert a profile. Returns `None` if the email is taken.
    async fn create_user(&self, input: NewUserProfile) -> Result<Option<UserProfile>>;

    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserProfile>>;

    async fn update_user(&self, id: &str, patch: UserProfilePatch) -> Result<Option<UserProfile>>;

    /// Flip `event_id` in the user's favorites. `None` when the user is unknown.
    async fn toggle_favorite(&self, user_id: &str, event_id: &str) -> Result<Option<bool>>;

    // ============================================
    // Notifications
    // ============================================

    async fn create_notification(&self, input: NewNotification) -> Result<Notification>;

    /// Latest notifications first, capped at `NOTIFICATION_PAGE_SIZE`.
    async fn list_notifications(&self, user_id: &str, unread_only: bool)
        -> Result<Vec<Notification>>;

    async fn set_notification_read(&self, id: &str, read: bool) -> Result<Option<Notification>>;

    /// Returns how many notifications changed.
    async fn mark_all_notifications_read(&self, user_id: &str) -> Result<u64>;

    // ============================================
    // Maintenance
    // ============================================

    async fn collection_counts(&self) -> Result<CollectionCounts>;

    /// Write defaults into records that predate newer fields, then make sure
    /// the store's indexes exist. Safe to run repeatedly.
    async fn migrate(&self) -> Result<MigrationReport>;

    /// Copy `events` in through `create_event`, so each gets a fresh id and
    /// empty registration state. A failed insert is logged and skipped.
    async fn import_events(&self, events: Vec<Event>) -> Result<ImportReport> {
        let mut report = ImportReport::default();
        for event in events {
            let title = event.title.clone();
            match self.create_event(NewEvent::from(event)).await {
                Ok(created) => {
                    tracing::info!(event_id = %created.id, title = %title, "Imported event");
                    report.imported += 1;
                }
                Err(e) => {
                    tracing::warn!(error = %e, title = %title, "Failed to import event");
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }
}
