// CampusConnect storage layer
//
// This crate provides both store adapters behind one trait:
// - MongoStore: MongoDB, the primary backend
// - FileStore: JSON files, the fallback backend
// - StoreSelector: checks the primary once at startup and picks a backend

pub mod backend;
pub mod file;
pub mod models;
pub mod mongo;
pub mod query;
pub mod selector;
pub mod store;

pub use backend::{ConnectionStatus, StorageBackend};
pub use file::FileStore;
pub use mongo::MongoStore;
pub use query::event_filter_document;
pub use selector::{
    StoreConfig, StoreSelector, DEFAULT_DATABASE, DEFAULT_EVENTS_FILE, DEFAULT_STARTUP_TIMEOUT,
};
pub use store::EventStore;
