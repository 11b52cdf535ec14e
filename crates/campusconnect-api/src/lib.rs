// CampusConnect API library
// Decision: Shared library for the server binary and integration tests

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Environment configuration
pub mod config;
pub use config::ApiConfig;

// Router assembly
pub mod router;
pub use router::build_router;

// Services layer
pub mod services;

// OpenAPI spec generation
pub mod openapi;
