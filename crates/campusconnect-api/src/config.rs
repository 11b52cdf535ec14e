// Server configuration loaded from environment variables.
// Decision: Every setting has a working default; no variable is required
// Decision: MONGODB_URI unset means "run on the file store"

use std::path::PathBuf;
use std::time::Duration;

use campusconnect_storage::{
    StoreConfig, DEFAULT_DATABASE, DEFAULT_EVENTS_FILE, DEFAULT_STARTUP_TIMEOUT,
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9000";
pub const DEFAULT_API_PREFIX: &str = "/api";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub store: StoreConfig,
    /// Socket address for the HTTP listener
    pub bind_addr: String,
    /// Prefix for every route except `/health` and the OpenAPI UI.
    /// Empty means no prefix.
    pub api_prefix: String,
    /// Origins allowed by CORS. Empty disables the CORS layer.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| var(key).map(|v| v.trim().to_string());
        let non_empty = |key: &str| var(key).filter(|v| !v.is_empty());

        let startup_timeout = non_empty("STORE_STARTUP_TIMEOUT_SECS")
            .and_then(|s| match s.parse() {
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    tracing::warn!(value = %s, "Invalid STORE_STARTUP_TIMEOUT_SECS, using default");
                    None
                }
            })
            .unwrap_or(DEFAULT_STARTUP_TIMEOUT);

        let store = StoreConfig {
            mongodb_uri: non_empty("MONGODB_URI"),
            database: non_empty("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            events_file: PathBuf::from(
                non_empty("EVENTS_FILE").unwrap_or_else(|| DEFAULT_EVENTS_FILE.to_string()),
            ),
            startup_timeout,
        };

        // API_PREFIX="" is honored and serves routes at the root
        let api_prefix = var("API_PREFIX")
            .map(|p| p.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());

        // Example: CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
        let cors_allowed_origins = non_empty("CORS_ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            store,
            bind_addr: non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            api_prefix,
            cors_allowed_origins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ApiConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.store.mongodb_uri, None);
        assert_eq!(config.store.database, "campusconnect");
        assert_eq!(config.store.events_file, PathBuf::from("data/events.json"));
        assert_eq!(config.store.startup_timeout, Duration::from_secs(8));
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.api_prefix, "/api");
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("MONGODB_URI", "mongodb://db:27017"),
            ("MONGODB_DATABASE", "events"),
            ("EVENTS_FILE", "/var/lib/campus/events.json"),
            ("STORE_STARTUP_TIMEOUT_SECS", "2"),
            ("API_PREFIX", "/v2/"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
        ]);
        assert_eq!(config.store.mongodb_uri.as_deref(), Some("mongodb://db:27017"));
        assert_eq!(config.store.database, "events");
        assert_eq!(config.store.startup_timeout, Duration::from_secs(2));
        assert_eq!(config.api_prefix, "/v2");
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("MONGODB_URI", "  "),
            ("STORE_STARTUP_TIMEOUT_SECS", "soon"),
            ("API_PREFIX", ""),
        ]);
        assert_eq!(config.store.mongodb_uri, None);
        assert_eq!(config.store.startup_timeout, DEFAULT_STARTUP_TIMEOUT);
        assert_eq!(config.api_prefix, "");
    }
}
