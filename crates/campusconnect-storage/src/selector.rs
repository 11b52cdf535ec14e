// Startup store selection
// Decision: Check the primary store once; the choice holds for the process
// Decision: Selector is an explicit value shared via Arc, not a global
//
// The check is a single lightweight read raced against a timeout. Any error
// or timeout routes every later call to the file store. Nothing here returns
// an error to the caller.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::backend::{ConnectionStatus, StorageBackend};
use crate::file::FileStore;
use crate::mongo::MongoStore;
use crate::store::EventStore;

pub const DEFAULT_DATABASE: &str = "campusconnect";
pub const DEFAULT_EVENTS_FILE: &str = "data/events.json";
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(8);

/// Where the two stores live.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Unset means "fallback only".
    pub mongodb_uri: Option<String>,
    pub database: String,
    pub events_file: PathBuf,
    pub startup_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mongodb_uri: None,
            database: DEFAULT_DATABASE.to_string(),
            events_file: PathBuf::from(DEFAULT_EVENTS_FILE),
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
        }
    }
}

/// Backend chosen at startup.
pub struct StoreSelector {
    backend: StorageBackend,
}

impl StoreSelector {
    /// Check the primary store and pick a backend. Infallible.
    pub async fn initialize(config: &StoreConfig) -> Self {
        let Some(uri) = config.mongodb_uri.as_deref() else {
            tracing::info!(
                path = %config.events_file.display(),
                "MONGODB_URI not set, using file store"
            );
            return Self::fallback(config);
        };

        let store = match MongoStore::connect(uri, &config.database).await {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid MongoDB configuration, falling back to file store");
                return Self::fallback(config);
            }
        };

        let pinger = store.clone();
        Self::select(store, config, async move { pinger.ping().await }).await
    }

    /// Pick the primary if `reachable` resolves `Ok` within the startup timeout.
    async fn select<F>(store: MongoStore, config: &StoreConfig, reachable: F) -> Self
    where
        F: Future<Output = Result<()>>,
    {
        if let Err(e) = within(reachable, config.startup_timeout).await {
            tracing::warn!(
                error = %e,
                timeout_secs = config.startup_timeout.as_secs(),
                path = %config.events_file.display(),
                "MongoDB unavailable, falling back to file store"
            );
            store.shutdown().await;
            return Self::fallback(config);
        }

        if let Err(e) = store.ensure_indexes().await {
            tracing::warn!(error = %e, "Failed to create MongoDB indexes");
        }

        tracing::info!(database = %config.database, "Connected to MongoDB");
        Self::new(StorageBackend::Primary(std::sync::Arc::new(store)))
    }

    fn fallback(config: &StoreConfig) -> Self {
        Self::new(StorageBackend::fallback(FileStore::new(
            config.events_file.clone(),
        )))
    }

    pub fn new(backend: StorageBackend) -> Self {
        Self { backend }
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.backend.status()
    }

    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    /// Release the primary store's connections, if any.
    pub async fn shutdown(&self) {
        if let StorageBackend::Primary(store) = &self.backend {
            store.shutdown().await;
        }
    }
}

/// Race `attempt` against `limit`.
async fn within<F>(attempt: F, limit: Duration) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match tokio::time::timeout(limit, attempt).await {
        Ok(result) => result,
        Err(_) => anyhow::bail!("timed out after {}s", limit.as_secs()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_pending_attempt_times_out() {
        let err = within(std::future::pending::<Result<()>>(), Duration::from_secs(8))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_attempt_errors_pass_through() {
        let err = within(async { Err::<(), _>(anyhow::anyhow!("refused")) }, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "refused");
        assert!(within(async { Ok::<(), anyhow::Error>(()) }, Duration::from_secs(1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_no_uri_goes_straight_to_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let selector = StoreSelector::initialize(&StoreConfig {
            events_file: dir.path().join("events.json"),
            ..Default::default()
        })
        .await;
        assert_eq!(selector.connection_status(), ConnectionStatus::Fallback);
        assert_eq!(selector.backend().event_stats().await.unwrap().total_events, 3);
    }

    #[tokio::test]
    async fn test_refused_connection_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let selector = StoreSelector::initialize(&StoreConfig {
            mongodb_uri: Some(
                "mongodb://127.0.0.1:9/?serverSelectionTimeoutMS=200&connectTimeoutMS=200"
                    .to_string(),
            ),
            events_file: dir.path().join("events.json"),
            startup_timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .await;
        assert_eq!(selector.connection_status(), ConnectionStatus::Fallback);
    }

    #[tokio::test]
    async fn test_malformed_uri_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let selector = StoreSelector::initialize(&StoreConfig {
            mongodb_uri: Some("not-a-mongodb-uri".to_string()),
            events_file: dir.path().join("events.json"),
            ..Default::default()
        })
        .await;
        assert_eq!(selector.connection_status(), ConnectionStatus::Fallback);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_ping_times_out_to_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            mongodb_uri: Some("mongodb://127.0.0.1:9".to_string()),
            events_file: dir.path().join("events.json"),
            ..Default::default()
        };
        // Connecting is lazy; no server is contacted here.
        let store = MongoStore::connect("mongodb://127.0.0.1:9", &config.database)
            .await
            .unwrap();

        let started = tokio::time::Instant::now();
        let selector =
            StoreSelector::select(store, &config, std::future::pending::<Result<()>>()).await;

        assert_eq!(selector.connection_status(), ConnectionStatus::Fallback);
        assert!(started.elapsed() >= DEFAULT_STARTUP_TIMEOUT);
    }
}
