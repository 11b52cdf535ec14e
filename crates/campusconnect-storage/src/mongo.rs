// MongoDB storage implementation (primary backend)
// Decision: Registration count and membership change in one update_one
// Decision: Uniqueness (registration pair, profile email) enforced by indexes
//
// Ids that are not valid ObjectIds never reach the server; lookups with them
// behave as "not found".

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use campusconnect_core::{
    distinct_sorted, CollectionCounts, Event, EventFilters, EventPatch, EventStats, EventType,
    EventTypeCount, MigrationReport, NewEvent, NewNotification, NewRegistration, NewUserProfile,
    Notification, Registration, RegistrationStatus, UserProfile, UserProfilePatch,
    NOTIFICATION_PAGE_SIZE,
};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::models::{
    event_patch_document, to_bson_date, user_patch_document, EventDocument, NotificationDocument,
    RegistrationDocument, UserDocument,
};
use crate::query::{
    backfill_pipeline, event_field_defaults, event_filter_document, event_sort_document,
    missing_any_field, toggle_favorite_pipeline, user_field_defaults,
};
use crate::store::EventStore;

const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_POOL_SIZE: u32 = 10;
const DUPLICATE_KEY: i32 = 11000;

fn object_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id).ok()
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

fn inserted_object_id(id: &Bson) -> Result<ObjectId> {
    id.as_object_id()
        .ok_or_else(|| anyhow!("insert returned a non-ObjectId id: {id}"))
}

fn as_count(value: Option<&Bson>) -> u64 {
    match value {
        Some(Bson::Int32(n)) => u64::try_from(*n).unwrap_or(0),
        Some(Bson::Int64(n)) => u64::try_from(*n).unwrap_or(0),
        Some(Bson::Double(n)) if *n > 0.0 => *n as u64,
        _ => 0,
    }
}

/// MongoDB-backed event store.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    events: Collection<EventDocument>,
    registrations: Collection<RegistrationDocument>,
    users: Collection<UserDocument>,
    notifications: Collection<NotificationDocument>,
}

impl MongoStore {
    /// Build a pooled client. No network traffic happens until the first
    /// operation, so an unreachable server is only detected by `ping`.
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        if options.server_selection_timeout.is_none() {
            options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        }
        if options.max_pool_size.is_none() {
            options.max_pool_size = Some(MAX_POOL_SIZE);
        }
        let client = Client::with_options(options)?;
        Ok(Self::from_database(client.clone(), client.database(database)))
    }

    fn from_database(client: Client, db: Database) -> Self {
        Self {
            client,
            events: db.collection("events"),
            registrations: db.collection("registrations"),
            users: db.collection("users"),
            notifications: db.collection("notifications"),
        }
    }

    /// Create the indexes the store relies on. Idempotent.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let unique = || IndexOptions::builder().unique(true).build();

        self.registrations
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "eventId": 1, "userId": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;
        self.users
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "email": 1 })
                    .options(unique())
                    .build(),
            )
            .await?;
        self.events
            .create_index(IndexModel::builder().keys(doc! { "date": 1 }).build())
            .await?;
        self.notifications
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "userId": 1, "createdAt": -1 })
                    .build(),
            )
            .await?;
        Ok(())
    }

    /// Close pooled connections.
    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }

    async fn distinct_strings(&self, field: &str) -> Result<Vec<String>> {
        let values = self.events.distinct(field, doc! {}).await?;
        Ok(distinct_sorted(values.iter().filter_map(Bson::as_str)))
    }

    async fn find_events(&self, filter: Document, sort: Document) -> Result<Vec<Event>> {
        let docs: Vec<EventDocument> = self.events.find(filter).sort(sort).await?.try_collect().await?;
        Ok(docs.into_iter().map(EventDocument::into_event).collect())
    }
}

#[async_trait]
impl EventStore for MongoStore {
    async fn ping(&self) -> Result<()> {
        self.events
            .clone_with_type::<Document>()
            .find_one(doc! {})
            .projection(doc! { "_id": 1 })
            .await?;
        Ok(())
    }

    // ============================================
    // Events
    // ============================================

    async fn list_events(&self, filters: &EventFilters) -> Result<Vec<Event>> {
        self.find_events(event_filter_document(filters), event_sort_document())
            .await
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        let Some(oid) = object_id(id) else {
            return Ok(None);
        };
        let doc = self.events.find_one(doc! { "_id": oid }).await?;
        Ok(doc.map(EventDocument::into_event))
    }

    async fn create_event(&self, input: NewEvent) -> Result<Event> {
        let mut doc = EventDocument::from_new(input, Utc::now());
        let result = self.events.insert_one(&doc).await?;
        doc.id = Some(inserted_object_id(&result.inserted_id)?);
        let event = doc.into_event();
        tracing::debug!(event_id = %event.id, "Created event");
        Ok(event)
    }

    async fn update_event(&self, id: &str, patch: EventPatch) -> Result<Option<Event>> {
        let Some(oid) = object_id(id) else {
            return Ok(None);
        };
        let set = event_patch_document(patch, Utc::now());
        let updated = self
            .events
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(EventDocument::into_event))
    }

    async fn delete_event(&self, id: &str) -> Result<bool> {
        let Some(oid) = object_id(id) else {
            return Ok(false);
        };
        let result = self.events.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn list_events_by_creator(&self, created_by: &str) -> Result<Vec<Event>> {
        self.find_events(doc! { "createdBy": created_by }, doc! { "createdAt": -1 })
            .await
    }

    async fn list_colleges(&self) -> Result<Vec<String>> {
        self.distinct_strings("college").await
    }

    async fn list_locations(&self) -> Result<Vec<String>> {
        self.distinct_strings("location").await
    }

    async fn event_stats(&self) -> Result<EventStats> {
        let total_events = self.events.count_documents(doc! {}).await?;

        let pipeline = vec![doc! { "$group": { "_id": "$eventType", "count": { "$sum": 1 } } }];
        let groups: Vec<Document> = self.events.aggregate(pipeline).await?.try_collect().await?;
        let mut event_type_count = EventTypeCount::default();
        for group in &groups {
            if let Some(event_type) = group.get_str("_id").ok().and_then(EventType::parse) {
                event_type_count.add(event_type, as_count(group.get("count")));
            }
        }

        Ok(EventStats {
            total_events,
            event_type_count,
            total_colleges: self.list_colleges().await?.len() as u64,
            total_locations: self.list_locations().await?.len() as u64,
        })
    }

    async fn add_registered_user(&self, event_id: &str, user_id: &str) -> Result<bool> {
        let Some(oid) = object_id(event_id) else {
            return Ok(false);
        };
        let result = self
            .events
            .update_one(
                doc! { "_id": oid, "registeredUsers": { "$ne": user_id } },
                doc! {
                    "$addToSet": { "registeredUsers": user_id },
                    "$inc": { "registrationCount": 1 },
                },
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn remove_registered_user(&self, event_id: &str, user_id: &str) -> Result<bool> {
        let Some(oid) = object_id(event_id) else {
            return Ok(false);
        };
        let result = self
            .events
            .update_one(
                doc! { "_id": oid, "registeredUsers": user_id },
                doc! {
                    "$pull": { "registeredUsers": user_id },
                    "$inc": { "registrationCount": -1 },
                },
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    // ============================================
    // Registrations
    // ============================================

    async fn create_registration(&self, input: NewRegistration) -> Result<Option<Registration>> {
        let mut doc = RegistrationDocument::from_new(input, Utc::now());
        match self.registrations.insert_one(&doc).await {
            Ok(result) => {
                doc.id = Some(inserted_object_id(&result.inserted_id)?);
                Ok(Some(doc.into_registration()))
            }
            Err(err) if is_duplicate_key(&err) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_registration(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<Registration>> {
        let doc = self
            .registrations
            .find_one(doc! { "eventId": event_id, "userId": user_id })
            .await?;
        Ok(doc.map(RegistrationDocument::into_registration))
    }

    async fn count_registrations(
        &self,
        event_id: &str,
        status: RegistrationStatus,
    ) -> Result<u64> {
        Ok(self
            .registrations
            .count_documents(doc! { "eventId": event_id, "status": status.as_str() })
            .await?)
    }

    async fn delete_registration(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<Registration>> {
        let doc = self
            .registrations
            .find_one_and_delete(doc! { "eventId": event_id, "userId": user_id })
            .await?;
        Ok(doc.map(RegistrationDocument::into_registration))
    }

    async fn list_registrations(
        &self,
        event_id: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Vec<Registration>> {
        let mut filter = Document::new();
        if let Some(event_id) = event_id {
            filter.insert("eventId", event_id);
        }
        if let Some(user_id) = user_id {
            filter.insert("userId", user_id);
        }
        let docs: Vec<RegistrationDocument> = self
            .registrations
            .find(filter)
            .sort(doc! { "registeredAt": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(docs
            .into_iter()
            .map(RegistrationDocument::into_registration)
            .collect())
    }

    // ============================================
    // User profiles
    // ============================================

    async fn create_user(&self, input: NewUserProfile) -> Result<Option<UserProfile>> {
        let mut doc = UserDocument::from_new(input, Utc::now());
        match self.users.insert_one(&doc).await {
            Ok(result) => {
                doc.id = Some(inserted_object_id(&result.inserted_id)?);
                Ok(Some(doc.into_profile()))
            }
            Err(err) if is_duplicate_key(&err) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn get_user(&self, id: &str) -> Result<Option<UserProfile>> {
        let Some(oid) = object_id(id) else {
            return Ok(None);
        };
        let doc = self.users.find_one(doc! { "_id": oid }).await?;
        Ok(doc.map(UserDocument::into_profile))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserProfile>> {
        let doc = self.users.find_one(doc! { "email": email }).await?;
        Ok(doc.map(UserDocument::into_profile))
    }

    async fn update_user(&self, id: &str, patch: UserProfilePatch) -> Result<Option<UserProfile>> {
        let Some(oid) = object_id(id) else {
            return Ok(None);
        };
        let set = user_patch_document(patch, Utc::now())?;
        let updated = self
            .users
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(UserDocument::into_profile))
    }

    async fn toggle_favorite(&self, user_id: &str, event_id: &str) -> Result<Option<bool>> {
        let Some(oid) = object_id(user_id) else {
            return Ok(None);
        };
        // Single pipeline update so concurrent toggles cannot interleave a
        // read and a write.
        let pipeline = toggle_favorite_pipeline(event_id, Utc::now());
        let updated = self
            .users
            .find_one_and_update(doc! { "_id": oid }, pipeline)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(|user| user.favorite_events.iter().any(|id| id == event_id)))
    }

    // ============================================
    // Notifications
    // ============================================

    async fn create_notification(&self, input: NewNotification) -> Result<Notification> {
        let mut doc = NotificationDocument::from_new(input, Utc::now());
        let result = self.notifications.insert_one(&doc).await?;
        doc.id = Some(inserted_object_id(&result.inserted_id)?);
        Ok(doc.into_notification())
    }

    async fn list_notifications(
        &self,
        user_id: &str,
        unread_only: bool,
    ) -> Result<Vec<Notification>> {
        let mut filter = doc! { "userId": user_id };
        if unread_only {
            filter.insert("read", false);
        }
        let docs: Vec<NotificationDocument> = self
            .notifications
            .find(filter)
            .sort(doc! { "createdAt": -1 })
            .limit(NOTIFICATION_PAGE_SIZE as i64)
            .await?
            .try_collect()
            .await?;
        Ok(docs
            .into_iter()
            .map(NotificationDocument::into_notification)
            .collect())
    }

    async fn set_notification_read(&self, id: &str, read: bool) -> Result<Option<Notification>> {
        let Some(oid) = object_id(id) else {
            return Ok(None);
        };
        let updated = self
            .notifications
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": { "read": read } })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(NotificationDocument::into_notification))
    }

    async fn mark_all_notifications_read(&self, user_id: &str) -> Result<u64> {
        let result = self
            .notifications
            .update_many(
                doc! { "userId": user_id, "read": false },
                doc! { "$set": { "read": true } },
            )
            .await?;
        Ok(result.modified_count)
    }

    // ============================================
    // Maintenance
    // ============================================

    async fn collection_counts(&self) -> Result<CollectionCounts> {
        Ok(CollectionCounts::new(
            self.events.count_documents(doc! {}).await?,
            self.users.count_documents(doc! {}).await?,
            self.registrations.count_documents(doc! {}).await?,
            self.notifications.count_documents(doc! {}).await?,
        ))
    }

    async fn migrate(&self) -> Result<MigrationReport> {
        let event_defaults = event_field_defaults();
        let events = self
            .events
            .update_many(
                missing_any_field(&event_defaults),
                backfill_pipeline(&event_defaults),
            )
            .await?;

        let user_defaults = user_field_defaults();
        let users = self
            .users
            .update_many(
                missing_any_field(&user_defaults),
                backfill_pipeline(&user_defaults),
            )
            .await?;

        self.ensure_indexes().await?;

        tracing::info!(
            events_updated = events.modified_count,
            users_updated = users.modified_count,
            "MongoDB migration complete"
        );
        Ok(MigrationReport {
            events_updated: events.modified_count,
            users_updated: users.modified_count,
        })
    }
}
