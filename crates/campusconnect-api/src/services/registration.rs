// Registration service for business logic
// Decision: Uniqueness is decided by the store insert, not the pre-check
//
// Registering checks that the event exists, accepts registrations and has
// not passed its deadline. Capacity only decides the status: a full event
// waitlists rather than rejects.

use std::sync::Arc;

use campusconnect_core::{
    CampusError, NewNotification, NewRegistration, Registration, RegistrationStatus, Result,
};
use campusconnect_storage::{EventStore, StorageBackend, StoreSelector};
use chrono::{DateTime, Utc};

const ALREADY_REGISTERED: &str = "User is already registered for this event";

pub struct RegistrationService {
    selector: Arc<StoreSelector>,
}

impl RegistrationService {
    pub fn new(selector: Arc<StoreSelector>) -> Self {
        Self { selector }
    }

    fn store(&self) -> &StorageBackend {
        self.selector.backend()
    }

    /// Register `user_id` for `event_id` as of `now`.
    pub async fn register(
        &self,
        event_id: &str,
        user_id: &str,
        additional_info: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Registration> {
        let store = self.store();
        let event = store
            .get_event(event_id)
            .await?
            .ok_or_else(|| CampusError::not_found("Event not found"))?;

        if !event.registration_enabled {
            return Err(CampusError::rule(
                "Registration is not enabled for this event",
            ));
        }
        if event.registration_closed_at(now) {
            return Err(CampusError::rule("Registration deadline has passed"));
        }
        if store.find_registration(event_id, user_id).await?.is_some() {
            return Err(CampusError::rule(ALREADY_REGISTERED));
        }

        let confirmed = store
            .count_registrations(event_id, RegistrationStatus::Confirmed)
            .await?;
        let status = RegistrationStatus::for_capacity(confirmed, event.max_participants);

        // A concurrent request may have inserted the same pair since the
        // check above; the store's uniqueness decides the winner.
        let registration = store
            .create_registration(NewRegistration {
                event_id: event_id.to_string(),
                user_id: user_id.to_string(),
                status,
                additional_info,
            })
            .await?
            .ok_or_else(|| CampusError::rule(ALREADY_REGISTERED))?;

        if !store.add_registered_user(event_id, user_id).await? {
            tracing::warn!(
                event_id = %event_id,
                user_id = %user_id,
                "User was already in the event's registered set"
            );
        }

        let notification = NewNotification::registration(user_id, event_id, &event.title, status);
        if let Err(e) = store.create_notification(notification).await {
            tracing::warn!(error = %e, "Failed to record registration notification");
        }

        tracing::info!(
            event_id = %event_id,
            user_id = %user_id,
            status = %status,
            "User registered for event"
        );
        Ok(registration)
    }

    /// Remove a registration and release the user's place.
    pub async fn cancel(&self, event_id: &str, user_id: &str) -> Result<Registration> {
        let store = self.store();
        let registration = store
            .delete_registration(event_id, user_id)
            .await?
            .ok_or_else(|| CampusError::not_found("Registration not found"))?;
        store.remove_registered_user(event_id, user_id).await?;
        Ok(registration)
    }

    pub async fn list(
        &self,
        event_id: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Vec<Registration>> {
        Ok(self.store().list_registrations(event_id, user_id).await?)
    }
}
