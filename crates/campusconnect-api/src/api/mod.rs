// HTTP API routes
//
// Each submodule handles one resource with its own AppState. Paths are
// relative; the router nests them under the configured prefix.

pub mod common;
pub mod current_user;
pub mod database;
pub mod events;
pub mod favorites;
pub mod notifications;
pub mod registrations;
pub mod users;
pub mod validation;

// Re-export common types
pub use common::{ApiError, ApiResponse};
pub use current_user::MaybeUser;
