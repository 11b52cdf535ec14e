// Database maintenance service
// Decision: Migration runs against whichever store was selected at startup

use std::sync::Arc;

use campusconnect_core::{CollectionCounts, MigrationReport, Result};
use campusconnect_storage::{ConnectionStatus, EventStore, StorageBackend, StoreSelector};

pub struct DatabaseService {
    selector: Arc<StoreSelector>,
}

impl DatabaseService {
    pub fn new(selector: Arc<StoreSelector>) -> Self {
        Self { selector }
    }

    fn store(&self) -> &StorageBackend {
        self.selector.backend()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.selector.connection_status()
    }

    pub async fn counts(&self) -> Result<CollectionCounts> {
        Ok(self.store().collection_counts().await?)
    }

    /// Backfill defaults, then report the counts after the run.
    pub async fn migrate(&self) -> Result<(MigrationReport, CollectionCounts)> {
        let report = self.store().migrate().await?;
        tracing::info!(
            database = %self.connection_status(),
            events_updated = report.events_updated,
            users_updated = report.users_updated,
            "Database migration completed"
        );
        Ok((report, self.counts().await?))
    }
}
