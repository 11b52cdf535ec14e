// Notification service

use std::sync::Arc;

use campusconnect_core::{CampusError, Notification, Result};
use campusconnect_storage::{EventStore, StorageBackend, StoreSelector};

pub struct NotificationService {
    selector: Arc<StoreSelector>,
}

impl NotificationService {
    pub fn new(selector: Arc<StoreSelector>) -> Self {
        Self { selector }
    }

    fn store(&self) -> &StorageBackend {
        self.selector.backend()
    }

    pub async fn list(&self, user_id: &str, unread_only: bool) -> Result<Vec<Notification>> {
        Ok(self.store().list_notifications(user_id, unread_only).await?)
    }

    pub async fn set_read(&self, id: &str, read: bool) -> Result<Notification> {
        self.store()
            .set_notification_read(id, read)
            .await?
            .ok_or_else(|| CampusError::not_found("Notification not found"))
    }

    pub async fn mark_all_read(&self, user_id: &str) -> Result<u64> {
        Ok(self.store().mark_all_notifications_read(user_id).await?)
    }
}
