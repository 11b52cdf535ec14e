// Event service for business logic

use std::sync::Arc;

use campusconnect_core::{
    CampusError, Event, EventFilters, EventPatch, EventStats, NewEvent, Result,
};
use campusconnect_storage::{ConnectionStatus, EventStore, StorageBackend, StoreSelector};

pub struct EventService {
    selector: Arc<StoreSelector>,
}

impl EventService {
    pub fn new(selector: Arc<StoreSelector>) -> Self {
        Self { selector }
    }

    fn store(&self) -> &StorageBackend {
        self.selector.backend()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.selector.connection_status()
    }

    pub async fn list(&self, filters: &EventFilters) -> Result<Vec<Event>> {
        Ok(self.store().list_events(filters).await?)
    }

    pub async fn get(&self, id: &str) -> Result<Event> {
        self.store()
            .get_event(id)
            .await?
            .ok_or_else(|| CampusError::not_found("Event not found"))
    }

    pub async fn create(&self, input: NewEvent) -> Result<Event> {
        let event = self.store().create_event(input).await?;
        tracing::info!(event_id = %event.id, title = %event.title, "Event created");
        Ok(event)
    }

    pub async fn update(&self, id: &str, patch: EventPatch) -> Result<Event> {
        self.store()
            .update_event(id, patch)
            .await?
            .ok_or_else(|| CampusError::not_found("Event not found"))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store().delete_event(id).await? {
            return Err(CampusError::not_found("Event not found"));
        }
        tracing::info!(event_id = %id, "Event deleted");
        Ok(())
    }

    pub async fn list_by_creator(&self, created_by: &str) -> Result<Vec<Event>> {
        Ok(self.store().list_events_by_creator(created_by).await?)
    }

    pub async fn colleges(&self) -> Result<Vec<String>> {
        Ok(self.store().list_colleges().await?)
    }

    pub async fn locations(&self) -> Result<Vec<String>> {
        Ok(self.store().list_locations().await?)
    }

    pub async fn stats(&self) -> Result<EventStats> {
        Ok(self.store().event_stats().await?)
    }

    pub async fn seed(&self) -> Result<Vec<Event>> {
        let events = self.store().seed_sample_events().await?;
        tracing::info!(count = events.len(), "Seeded sample events");
        Ok(events)
    }
}
