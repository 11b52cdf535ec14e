// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// This module provides a unified StorageBackend enum that can work with
// either MongoDB (primary) or the JSON file store (fallback).

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use campusconnect_core::{
    CollectionCounts, Event, EventFilters, EventPatch, EventStats, MigrationReport, NewEvent,
    NewNotification, NewRegistration, NewUserProfile, Notification, Registration,
    RegistrationStatus, UserProfile, UserProfilePatch,
};
use serde::Serialize;

use crate::file::FileStore;
use crate::mongo::MongoStore;
use crate::store::EventStore;

/// Which store is serving requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Primary,
    Fallback,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Primary => "primary",
            ConnectionStatus::Fallback => "fallback",
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, ConnectionStatus::Primary)
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage backend that can be either MongoDB or the JSON file store
#[derive(Clone)]
pub enum StorageBackend {
    /// MongoDB (primary)
    Primary(Arc<MongoStore>),
    /// JSON file (fallback)
    Fallback(Arc<FileStore>),
}

impl StorageBackend {
    pub fn fallback(store: FileStore) -> Self {
        Self::Fallback(Arc::new(store))
    }

    pub fn status(&self) -> ConnectionStatus {
        match self {
            Self::Primary(_) => ConnectionStatus::Primary,
            Self::Fallback(_) => ConnectionStatus::Fallback,
        }
    }

    fn inner(&self) -> &dyn EventStore {
        match self {
            Self::Primary(db) => db.as_ref(),
            Self::Fallback(db) => db.as_ref(),
        }
    }
}

#[async_trait]
impl EventStore for StorageBackend {
    async fn ping(&self) -> Result<()> {
        self.inner().ping().await
    }

    // ============================================
    // Events
    // ============================================

    async fn list_events(&self, filters: &EventFilters) -> Result<Vec<Event>> {
        self.inner().list_events(filters).await
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        self.inner().get_event(id).await
    }

    async fn create_event(&self, input: NewEvent) -> Result<Event> {
        self.inner().create_event(input).await
    }

    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<Option<Event>> {
        self.inner().update_event(id, patch).await
    }

    async fn delete_event(&self, id: &str) -> Result<bool> {
        self.inner().delete_event(id).await
    }

    async fn list_events_by_creator(&self, created_by: &str) -> Result<Vec<Event>> {
        self.inner().list_events_by_creator(created_by).await
    }

    async fn list_colleges(&self) -> Result<Vec<String>> {
        self.inner().list_colleges().await
    }

    async fn list_locations(&self) -> Result<Vec<String>> {
        self.inner().list_locations().await
    }

    async fn event_stats(&self) -> Result<EventStats> {
        self.inner().event_stats().await
    }

    async fn add_registered_user(&self, event_id: &str, user_id: &str) -> Result<bool> {
        self.inner().add_registered_user(event_id, user_id).await
    }

    async fn remove_registered_user(&self, event_id: &str, user_id: &str) -> Result<bool> {
        self.inner().remove_registered_user(event_id, user_id).await
    }

    // ============================================
    // Registrations
    // ============================================

    async fn create_registration(&self, input: NewRegistration) -> Result<Option<Registration>> {
        self.inner().create_registration(input).await
    }

    async fn find_registration(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<Registration>> {
        self.inner().find_registration(event_id, user_id).await
    }

    async fn count_registrations(
        &self,
        event_id: &str,
        status: RegistrationStatus,
    ) -> Result<u64> {
        self.inner().count_registrations(event_id, status).await
    }

    async fn delete_registration(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<Registration>> {
        self.inner().delete_registration(event_id, user_id).await
    }

    async fn list_registrations(
        &self,
        event_id: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Vec<Registration>> {
        self.inner().list_registrations(event_id, user_id).await
    }

    // ============================================
    // User profiles
    // ============================================

    async fn create_user(&self, input: NewUserProfile) -> Result<Option<UserProfile>> {
        self.inner().create_user(input).await
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>> {
        self.inner().get_user(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        self.inner().get_user_by_email(email).await
    }

    async fn update_user(&self, id: &str, patch: UserProfilePatch) -> Result<Option<UserProfile>> {
        self.inner().update_user(id, patch).await
    }

    async fn toggle_favorite(&self, user_id: &str, event_id: &str) -> Result<Option<bool>> {
        self.inner().toggle_favorite(user_id, event_id).await
    }

    // ============================================
    // Notifications
    // ============================================

    async fn create_notification(&self, input: NewNotification) -> Result<Notification> {
        self.inner().create_notification(input).await
    }

    async fn list_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        self.inner().list_notifications(user_id, unread_only).await
    }

    async fn set_notification_read(&self, id: &str, read: bool) -> Result<Option<Notification>> {
        self.inner().set_notification_read(id, read).await
    }

    async fn mark_all_notifications_read(&self, user_id: &str) -> Result<u64> {
        self.inner().mark_all_notifications_read(user_id).await
    }

    // ============================================
    // Maintenance
    // ============================================

    async fn collection_counts(&self) -> Result<CollectionCounts> {
        self.inner().collection_counts().await
    }

    async fn migrate(&self) -> Result<MigrationReport> {
        self.inner().migrate().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_status_names() {
        assert_eq!(ConnectionStatus::Primary.to_string(), "primary");
        assert_eq!(ConnectionStatus::Fallback.to_string(), "fallback");
        assert_eq!(
            serde_json::to_value(ConnectionStatus::Fallback).unwrap(),
            serde_json::json!("fallback")
        );
    }

    #[tokio::test]
    async fn test_fallback_backend_delegates() {
        let dir = tempfile::tempdir().unwrap();
        let backend = StorageBackend::fallback(FileStore::new(dir.path().join("events.json")));
        assert_eq!(backend.status(), ConnectionStatus::Fallback);
        assert!(!backend.status().is_primary());
        assert_eq!(backend.list_colleges().await.unwrap(), vec!["MIT", "NYU", "Stanford"]);
    }
}
