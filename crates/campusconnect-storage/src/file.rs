// JSON file storage implementation (fallback backend)
// Decision: tokio RwLock held across the file write serializes mutations
// Decision: Event ids are millisecond timestamps, other ids are UUID v7
//
// `events.json` is a flat array of events. Registrations, profiles and
// notifications live in sibling files in the same directory. Files are read
// on first use, so a corrupt file surfaces as an error from the first
// operation rather than at startup. A missing or empty events file serves the
// sample events.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use campusconnect_core::{
    distinct_sorted, sample_events, CollectionCounts, Event, EventFilters, EventPatch, EventStats,
    MigrationReport, NewEvent, NewNotification, NewRegistration, NewUserProfile, Notification,
    Registration, RegistrationStatus, UserProfile, UserProfilePatch, EVENT_DEFAULTED_FIELDS,
    NOTIFICATION_PAGE_SIZE, USER_DEFAULTED_FIELDS,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::{RwLock, RwLockMappedWriteGuard, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::store::EventStore;

#[derive(Debug, Default)]
struct FileData {
    events: Vec<Event>,
    registrations: Vec<Registration>,
    users: Vec<UserProfile>,
    notifications: Vec<Notification>,
}

/// File-backed event store.
pub struct FileStore {
    events_path: PathBuf,
    registrations_path: PathBuf,
    users_path: PathBuf,
    notifications_path: PathBuf,
    state: RwLock<Option<FileData>>,
}

impl FileStore {
    /// Store rooted at `events_path`. Nothing is read until the first operation.
    pub fn new(events_path: impl Into<PathBuf>) -> Self {
        let events_path = events_path.into();
        let dir = events_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            registrations_path: dir.join("registrations.json"),
            users_path: dir.join("users.json"),
            notifications_path: dir.join("notifications.json"),
            events_path,
            state: RwLock::new(None),
        }
    }

    pub fn events_path(&self) -> &Path {
        &self.events_path
    }

    async fn load(&self) -> Result<FileData> {
        let mut events: Vec<Event> = read_json(&self.events_path).await?;
        if events.is_empty() {
            tracing::info!(
                path = %self.events_path.display(),
                "Events file missing or empty, serving sample events"
            );
            events = sample_events();
        }
        Ok(FileData {
            events,
            registrations: read_json(&self.registrations_path).await?,
            users: read_json(&self.users_path).await?,
            notifications: read_json(&self.notifications_path).await?,
        })
    }

    async fn data(&self) -> Result<RwLockReadGuard<'_, FileData>> {
        loop {
            match RwLockReadGuard::try_map(self.state.read().await, Option::as_ref) {
                Ok(data) => return Ok(data),
                Err(unloaded) => drop(unloaded),
            }
            drop(self.data_mut().await?);
        }
    }

    async fn data_mut(&self) -> Result<RwLockMappedWriteGuard<'_, FileData>> {
        let mut guard = self.state.write().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        RwLockWriteGuard::try_map(guard, Option::as_mut)
            .map_err(|_| anyhow!("file store state was not loaded"))
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Replace `path` with `items` through a temp file and rename.
async fn write_json<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let body = serde_json::to_vec_pretty(items)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, body)
        .await
        .with_context(|| format!("failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

/// Records in `path` that lack at least one of `fields`.
async fn count_missing_fields(path: &Path, fields: &[&str]) -> Result<u64> {
    let records: Vec<serde_json::Value> = read_json(path).await?;
    Ok(records
        .iter()
        .filter(|record| fields.iter().any(|field| record.get(field).is_none()))
        .count() as u64)
}

/// Millisecond timestamp, bumped until it no longer collides.
fn next_event_id(events: &[Event], now: DateTime<Utc>) -> String {
    let mut candidate = now.timestamp_millis();
    while events.iter().any(|e| e.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(key(item)));
}

#[async_trait]
impl EventStore for FileStore {
    async fn ping(&self) -> Result<()> {
        self.data().await.map(|_| ())
    }

    // ============================================
    // Events
    // ============================================

    async fn list_events(&self, filters: &EventFilters) -> Result<Vec<Event>> {
        let data = self.data().await?;
        Ok(filters.apply(data.events.iter().cloned()))
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        let data = self.data().await?;
        Ok(data.events.iter().find(|e| e.id == id).cloned())
    }

    async fn create_event(&self, input: NewEvent) -> Result<Event> {
        let mut data = self.data_mut().await?;
        let now = Utc::now();
        let event = Event::from_new(next_event_id(&data.events, now), input, now);

        let mut events = data.events.clone();
        events.push(event.clone());
        write_json(&self.events_path, &events).await?;
        data.events = events;

        tracing::debug!(event_id = %event.id, "Created event");
        Ok(event)
    }

    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<Option<Event>> {
        let mut data = self.data_mut().await?;
        let mut events = data.events.clone();
        let Some(event) = events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        event.apply_patch(patch, Utc::now());
        let updated = event.clone();

        write_json(&self.events_path, &events).await?;
        data.events = events;
        Ok(Some(updated))
    }

    async fn delete_event(&self, id: &str) -> Result<bool> {
        let mut data = self.data_mut().await?;
        let mut events = data.events.clone();
        let before = events.len();
        events.retain(|e| e.id != id);
        if events.len() == before {
            return Ok(false);
        }

        write_json(&self.events_path, &events).await?;
        data.events = events;
        Ok(true)
    }

    async fn list_events_by_creator(&self, created_by: &str) -> Result<Vec<Event>> {
        let data = self.data().await?;
        let mut events: Vec<Event> = data
            .events
            .iter()
            .filter(|e| e.created_by == created_by)
            .cloned()
            .collect();
        newest_first(&mut events, |e| e.created_at);
        Ok(events)
    }

    async fn list_colleges(&self) -> Result<Vec<String>> {
        let data = self.data().await?;
        Ok(distinct_sorted(data.events.iter().map(|e| e.college.as_str())))
    }

    async fn list_locations(&self) -> Result<Vec<String>> {
        let data = self.data().await?;
        Ok(distinct_sorted(data.events.iter().map(|e| e.location.as_str())))
    }

    async fn event_stats(&self) -> Result<EventStats> {
        let data = self.data().await?;
        Ok(EventStats::from_events(&data.events))
    }

    async fn add_registered_user(&self, event_id: &str, user_id: &str) -> Result<bool> {
        let mut data = self.data_mut().await?;
        let mut events = data.events.clone();
        let Some(event) = events.iter_mut().find(|e| e.id == event_id) else {
            return Ok(false);
        };
        if event.registered_users.iter().any(|u| u == user_id) {
            return Ok(false);
        }
        event.registered_users.push(user_id.to_string());
        event.registration_count += 1;

        write_json(&self.events_path, &events).await?;
        data.events = events;
        Ok(true)
    }

    async fn remove_registered_user(&self, event_id: &str, user_id: &str) -> Result<bool> {
        let mut data = self.data_mut().await?;
        let mut events = data.events.clone();
        let Some(event) = events.iter_mut().find(|e| e.id == event_id) else {
            return Ok(false);
        };
        let Some(pos) = event.registered_users.iter().position(|u| u == user_id) else {
            return Ok(false);
        };
        event.registered_users.remove(pos);
        event.registration_count = event.registration_count.saturating_sub(1);

        write_json(&self.events_path, &events).await?;
        data.events = events;
        Ok(true)
    }

    // ============================================
    // Registrations
    // ============================================

    async fn create_registration(&self, input: NewRegistration) -> Result<Option<Registration>> {
        let mut data = self.data_mut().await?;
        if data
            .registrations
            .iter()
            .any(|r| r.event_id == input.event_id && r.user_id == input.user_id)
        {
            return Ok(None);
        }

        let registration = Registration {
            id: Uuid::now_v7().to_string(),
            event_id: input.event_id,
            user_id: input.user_id,
            registered_at: Utc::now(),
            status: input.status,
            additional_info: input.additional_info,
        };
        let mut registrations = data.registrations.clone();
        registrations.push(registration.clone());
        write_json(&self.registrations_path, &registrations).await?;
        data.registrations = registrations;
        Ok(Some(registration))
    }

    async fn find_registration(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<Registration>> {
        let data = self.data().await?;
        Ok(data
            .registrations
            .iter()
            .find(|r| r.event_id == event_id && r.user_id == user_id)
            .cloned())
    }

    async fn count_registrations(
        &self,
        event_id: &str,
        status: RegistrationStatus,
    ) -> Result<u64> {
        let data = self.data().await?;
        Ok(data
            .registrations
            .iter()
            .filter(|r| r.event_id == event_id && r.status == status)
            .count() as u64)
    }

    async fn delete_registration(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<Registration>> {
        let mut data = self.data_mut().await?;
        let Some(pos) = data
            .registrations
            .iter()
            .position(|r| r.event_id == event_id && r.user_id == user_id)
        else {
            return Ok(None);
        };
        let mut registrations = data.registrations.clone();
        let removed = registrations.remove(pos);
        write_json(&self.registrations_path, &registrations).await?;
        data.registrations = registrations;
        Ok(Some(removed))
    }

    async fn list_registrations(
        &self,
        event_id: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Vec<Registration>> {
        let data = self.data().await?;
        let mut registrations: Vec<Registration> = data
            .registrations
            .iter()
            .filter(|r| event_id.map_or(true, |id| r.event_id == id))
            .filter(|r| user_id.map_or(true, |id| r.user_id == id))
            .cloned()
            .collect();
        newest_first(&mut registrations, |r| r.registered_at);
        Ok(registrations)
    }

    // ============================================
    // User profiles
    // ============================================

    async fn create_user(&self, input: NewUserProfile) -> Result<Option<UserProfile>> {
        let mut data = self.data_mut().await?;
        if data.users.iter().any(|u| u.email == input.email) {
            return Ok(None);
        }

        let profile = UserProfile::from_new(Uuid::now_v7().to_string(), input, Utc::now());
        let mut users = data.users.clone();
        users.push(profile.clone());
        write_json(&self.users_path, &users).await?;
        data.users = users;
        Ok(Some(profile))
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>> {
        let data = self.data().await?;
        Ok(data.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        let data = self.data().await?;
        Ok(data.users.iter().find(|u| u.email == email).cloned())
    }

    async fn update_user(&self, id: &str, patch: UserProfilePatch) -> Result<Option<UserProfile>> {
        let mut data = self.data_mut().await?;
        let mut users = data.users.clone();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.apply_patch(patch, Utc::now());
        let updated = user.clone();

        write_json(&self.users_path, &users).await?;
        data.users = users;
        Ok(Some(updated))
    }

    async fn toggle_favorite(&self, user_id: &str, event_id: &str) -> Result<Option<bool>> {
        let mut data = self.data_mut().await?;
        let mut users = data.users.clone();
        let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };
        let is_favorite = user.toggle_favorite(event_id);
        user.updated_at = Utc::now();

        write_json(&self.users_path, &users).await?;
        data.users = users;
        Ok(Some(is_favorite))
    }

    // ============================================
    // Notifications
    // ============================================

    async fn create_notification(&self, input: NewNotification) -> Result<Notification> {
        let mut data = self.data_mut().await?;
        let notification = Notification {
            id: Uuid::now_v7().to_string(),
            user_id: input.user_id,
            notification_type: input.notification_type,
            title: input.title,
            message: input.message,
            event_id: input.event_id,
            read: false,
            created_at: Utc::now(),
        };
        let mut notifications = data.notifications.clone();
        notifications.push(notification.clone());
        write_json(&self.notifications_path, &notifications).await?;
        data.notifications = notifications;
        Ok(notification)
    }

    async fn list_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        let data = self.data().await?;
        let mut notifications: Vec<Notification> = data
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !(unread_only && n.read))
            .cloned()
            .collect();
        newest_first(&mut notifications, |n| n.created_at);
        notifications.truncate(NOTIFICATION_PAGE_SIZE);
        Ok(notifications)
    }

    async fn set_notification_read(&self, id: &str, read: bool) -> Result<Option<Notification>> {
        let mut data = self.data_mut().await?;
        let mut notifications = data.notifications.clone();
        let Some(notification) = notifications.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        notification.read = read;
        let updated = notification.clone();

        write_json(&self.notifications_path, &notifications).await?;
        data.notifications = notifications;
        Ok(Some(updated))
    }

    async fn mark_all_notifications_read(&self, user_id: &str) -> Result<u64> {
        let mut data = self.data_mut().await?;
        let mut notifications = data.notifications.clone();
        let mut changed = 0;
        for notification in notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.read)
        {
            notification.read = true;
            changed += 1;
        }
        if changed == 0 {
            return Ok(0);
        }

        write_json(&self.notifications_path, &notifications).await?;
        data.notifications = notifications;
        Ok(changed)
    }

    // ============================================
    // Maintenance
    // ============================================

    async fn collection_counts(&self) -> Result<CollectionCounts> {
        let data = self.data().await?;
        Ok(CollectionCounts::new(
            data.events.len() as u64,
            data.users.len() as u64,
            data.registrations.len() as u64,
            data.notifications.len() as u64,
        ))
    }

    // Loaded records already carry the defaults, so rewriting a file from
    // memory is the backfill.
    async fn migrate(&self) -> Result<MigrationReport> {
        let data = self.data_mut().await?;
        let events_updated = count_missing_fields(&self.events_path, &EVENT_DEFAULTED_FIELDS).await?;
        let users_updated = count_missing_fields(&self.users_path, &USER_DEFAULTED_FIELDS).await?;

        if events_updated > 0 {
            write_json(&self.events_path, &data.events).await?;
        }
        if users_updated > 0 {
            write_json(&self.users_path, &data.users).await?;
        }

        tracing::info!(events_updated, users_updated, "File store migration complete");
        Ok(MigrationReport {
            events_updated,
            users_updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusconnect_core::{sample_new_events, EventType, NotificationType};
    use chrono::TimeZone;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("events.json"));
        (dir, store)
    }

    fn new_registration(event_id: &str, user_id: &str) -> NewRegistration {
        NewRegistration {
            event_id: event_id.to_string(),
            user_id: user_id.to_string(),
            status: RegistrationStatus::Confirmed,
            additional_info: None,
        }
    }

    #[tokio::test]
    async fn test_missing_file_serves_sample_events() {
        let (_dir, store) = store();
        let events = store.list_events(&EventFilters::default()).await.unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        // nothing is written until a mutation
        assert!(!store.events_path().exists());
    }

    #[tokio::test]
    async fn test_empty_array_file_serves_sample_events() {
        let (_dir, store) = store();
        tokio::fs::write(store.events_path(), "[]").await.unwrap();
        assert_eq!(store.event_stats().await.unwrap().total_events, 3);
    }

    #[tokio::test]
    async fn test_create_persists_across_instances() {
        let (dir, store) = store();
        let created = store.create_event(sample_new_events().remove(2)).await.unwrap();
        assert!(created.id.parse::<i64>().is_ok());
        assert_eq!(created.created_at, created.updated_at);

        let reopened = FileStore::new(dir.path().join("events.json"));
        let found = reopened.get_event(&created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(reopened.event_stats().await.unwrap().total_events, 4);
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_lazily() {
        let (_dir, store) = store();
        tokio::fs::write(store.events_path(), "{not json").await.unwrap();
        let err = store.list_events(&EventFilters::default()).await.unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn test_event_id_bumps_on_collision() {
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        let mut events = sample_events();
        assert_eq!(next_event_id(&events, now), "1000");
        events[0].id = "1000".to_string();
        events[1].id = "1001".to_string();
        assert_eq!(next_event_id(&events, now), "1002");
    }

    #[tokio::test]
    async fn test_update_unknown_event_returns_none() {
        let (_dir, store) = store();
        let result = store
            .update_event("missing", EventPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(!store.delete_event("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_patch_only_refreshes_updated_at() {
        let (_dir, store) = store();
        let before = store.get_event("2").await.unwrap().unwrap();
        let after = store
            .update_event("2", EventPatch::default())
            .await
            .unwrap()
            .unwrap();
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.title, before.title);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let (_dir, store) = store();
        assert!(store.delete_event("1").await.unwrap());
        assert!(store.get_event("1").await.unwrap().is_none());
        assert_eq!(store.list_colleges().await.unwrap(), vec!["MIT", "Stanford"]);
    }

    #[tokio::test]
    async fn test_concurrent_add_registered_user_counts_once() {
        let (_dir, store) = store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.add_registered_user("3", "u1").await.unwrap() })
            })
            .collect();
        let mut added = 0;
        for handle in handles {
            if handle.await.unwrap() {
                added += 1;
            }
        }

        assert_eq!(added, 1);
        let event = store.get_event("3").await.unwrap().unwrap();
        assert_eq!(event.registration_count, 1);
        assert_eq!(event.registered_users, vec!["u1"]);

        assert!(store.remove_registered_user("3", "u1").await.unwrap());
        assert!(!store.remove_registered_user("3", "u1").await.unwrap());
        let event = store.get_event("3").await.unwrap().unwrap();
        assert_eq!(event.registration_count, 0);
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_rejected() {
        let (_dir, store) = store();
        assert!(store
            .create_registration(new_registration("1", "u1"))
            .await
            .unwrap()
            .is_some());
        assert!(store
            .create_registration(new_registration("1", "u1"))
            .await
            .unwrap()
            .is_none());
        assert_eq!(
            store
                .count_registrations("1", RegistrationStatus::Confirmed)
                .await
                .unwrap(),
            1
        );

        let removed = store.delete_registration("1", "u1").await.unwrap();
        assert_eq!(removed.map(|r| r.user_id), Some("u1".to_string()));
        assert!(store.find_registration("1", "u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_registrations_filters() {
        let (_dir, store) = store();
        for (event, user) in [("1", "u1"), ("2", "u1"), ("2", "u2")] {
            store
                .create_registration(new_registration(event, user))
                .await
                .unwrap();
        }
        assert_eq!(store.list_registrations(None, None).await.unwrap().len(), 3);
        assert_eq!(
            store.list_registrations(Some("2"), None).await.unwrap().len(),
            2
        );
        assert_eq!(
            store
                .list_registrations(Some("2"), Some("u1"))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_users_and_favorites() {
        let (_dir, store) = store();
        let input = NewUserProfile {
            name: "Ada".to_string(),
            email: "ada@example.edu".to_string(),
            interests: vec![EventType::Hackathon],
            ..Default::default()
        };
        let user = store.create_user(input.clone()).await.unwrap().unwrap();
        assert!(store.create_user(input).await.unwrap().is_none());

        assert_eq!(store.toggle_favorite(&user.id, "2").await.unwrap(), Some(true));
        assert_eq!(store.toggle_favorite(&user.id, "3").await.unwrap(), Some(true));
        assert_eq!(store.toggle_favorite(&user.id, "2").await.unwrap(), Some(false));
        assert_eq!(store.toggle_favorite("nobody", "2").await.unwrap(), None);

        let found = store.get_user_by_email("ada@example.edu").await.unwrap().unwrap();
        assert_eq!(found.favorite_events, vec!["3"]);

        let updated = store
            .update_user(
                &user.id,
                UserProfilePatch {
                    major: Some("CS".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.major.as_deref(), Some("CS"));
        assert_eq!(updated.name, "Ada");
    }

    #[tokio::test]
    async fn test_notifications_read_state() {
        let (_dir, store) = store();
        let mut ids = Vec::new();
        for title in ["first", "second"] {
            let n = store
                .create_notification(NewNotification {
                    user_id: "u1".to_string(),
                    notification_type: NotificationType::EventReminder,
                    title: title.to_string(),
                    message: String::new(),
                    event_id: None,
                })
                .await
                .unwrap();
            ids.push(n.id);
        }

        let listed = store.list_notifications("u1", false).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at >= listed[1].created_at);

        let read = store.set_notification_read(&ids[0], true).await.unwrap();
        assert!(read.unwrap().read);
        assert_eq!(store.list_notifications("u1", true).await.unwrap().len(), 1);

        assert_eq!(store.mark_all_notifications_read("u1").await.unwrap(), 1);
        assert!(store.list_notifications("u1", true).await.unwrap().is_empty());
        assert!(store
            .set_notification_read("missing", true)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_collection_counts() {
        let (_dir, store) = store();
        let counts = store.collection_counts().await.unwrap();
        assert_eq!(counts, CollectionCounts::new(3, 0, 0, 0));

        store
            .create_registration(new_registration("1", "u1"))
            .await
            .unwrap();
        store
            .create_notification(NewNotification::registration(
                "u1",
                "1",
                "Tech Innovation Summit 2025",
                RegistrationStatus::Confirmed,
            ))
            .await
            .unwrap();
        let counts = store.collection_counts().await.unwrap();
        assert_eq!(counts.registrations, 1);
        assert_eq!(counts.notifications, 1);
        assert_eq!(counts.total, 5);
    }

    #[tokio::test]
    async fn test_migrate_backfills_legacy_records() {
        let (dir, store) = store();
        let legacy_event = serde_json::json!([{
            "id": "42",
            "title": "Legacy Meetup",
            "description": "Imported before registration existed",
            "date": "2025-08-01T18:00:00Z",
            "location": "Library",
            "college": "NYU",
            "eventType": "tech-talk",
            "link": "https://example.com/legacy",
            "createdAt": "2025-07-01T00:00:00Z",
            "updatedAt": "2025-07-01T00:00:00Z"
        }]);
        std::fs::write(store.events_path(), legacy_event.to_string()).unwrap();
        let legacy_user = serde_json::json!([{
            "id": "u1",
            "name": "Ada",
            "email": "ada@example.edu",
            "createdAt": "2025-07-01T00:00:00Z",
            "updatedAt": "2025-07-01T00:00:00Z"
        }]);
        std::fs::write(dir.path().join("users.json"), legacy_user.to_string()).unwrap();

        let report = store.migrate().await.unwrap();
        assert_eq!(
            report,
            MigrationReport {
                events_updated: 1,
                users_updated: 1
            }
        );

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.events_path()).unwrap()).unwrap();
        assert_eq!(raw[0]["currency"], "USD");
        assert_eq!(raw[0]["registrationCount"], 0);
        assert_eq!(raw[0]["registeredUsers"], serde_json::json!([]));
        let raw: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("users.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(raw[0]["favoriteEvents"], serde_json::json!([]));

        // Second run finds nothing to do
        assert_eq!(store.migrate().await.unwrap(), MigrationReport::default());
    }

    #[tokio::test]
    async fn test_migrate_leaves_missing_files_alone() {
        let (_dir, store) = store();
        assert_eq!(store.migrate().await.unwrap(), MigrationReport::default());
        assert!(!store.events_path().exists());
    }

    #[tokio::test]
    async fn test_import_events_assigns_fresh_ids() {
        let (_dir, source) = store();
        let mut events = source.list_events(&EventFilters::default()).await.unwrap();
        events[0].registered_users = vec!["u1".to_string()];
        events[0].registration_count = 1;

        let target_dir = tempfile::tempdir().unwrap();
        let target = FileStore::new(target_dir.path().join("events.json"));
        let report = target.import_events(events).await.unwrap();
        assert_eq!(report.imported, 3);
        assert_eq!(report.failed, 0);

        // Three samples plus three copies
        let all = target.list_events(&EventFilters::default()).await.unwrap();
        assert_eq!(all.len(), 6);
        let copies: Vec<&Event> = all.iter().filter(|e| !["1", "2", "3"].contains(&e.id.as_str())).collect();
        assert_eq!(copies.len(), 3);
        assert!(copies.iter().all(|e| e.registration_count == 0 && e.registered_users.is_empty()));
    }
}
