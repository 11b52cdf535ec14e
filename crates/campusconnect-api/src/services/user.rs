// User profile service, including favorites

use std::sync::Arc;

use campusconnect_core::{CampusError, NewUserProfile, Result, UserProfile, UserProfilePatch};
use campusconnect_storage::{EventStore, StorageBackend, StoreSelector};

fn profile_not_found() -> CampusError {
    CampusError::not_found("User profile not found")
}

pub struct UserService {
    selector: Arc<StoreSelector>,
}

impl UserService {
    pub fn new(selector: Arc<StoreSelector>) -> Self {
        Self { selector }
    }

    fn store(&self) -> &StorageBackend {
        self.selector.backend()
    }

    pub async fn create(&self, input: NewUserProfile) -> Result<UserProfile> {
        let profile = self
            .store()
            .create_user(input)
            .await?
            .ok_or_else(|| CampusError::rule("User with this email already exists"))?;
        tracing::info!(user_id = %profile.id, "User profile created");
        Ok(profile)
    }

    pub async fn get(&self, id: &str) -> Result<UserProfile> {
        self.store().get_user(id).await?.ok_or_else(profile_not_found)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<UserProfile> {
        self.store()
            .get_user_by_email(email)
            .await?
            .ok_or_else(profile_not_found)
    }

    pub async fn update(&self, id: &str, patch: UserProfilePatch) -> Result<UserProfile> {
        self.store()
            .update_user(id, patch)
            .await?
            .ok_or_else(profile_not_found)
    }

    /// Flip `event_id` in the user's favorites; returns the new state.
    pub async fn toggle_favorite(&self, user_id: &str, event_id: &str) -> Result<bool> {
        self.store()
            .toggle_favorite(user_id, event_id)
            .await?
            .ok_or_else(profile_not_found)
    }

    pub async fn favorites(&self, user_id: &str) -> Result<Vec<String>> {
        Ok(self.get(user_id).await?.favorite_events)
    }
}
