// OpenAPI specification generation
//
// Served by the API server under /api-doc/openapi.json with Swagger UI at
// /swagger-ui. Documented paths assume the default `/api` prefix.

use crate::api;
use crate::api::ApiResponse;
use campusconnect_core::{
    CollectionCounts, Event, EventStats, EventType, EventTypeCount, ListField, MigrationReport,
    Notification, NotificationType, Registration, RegistrationStatus, SocialLinks, UserProfile,
    UserProfilePatch,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the CampusConnect API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::events::list_events,
        api::events::create_event,
        api::events::list_my_events,
        api::events::get_event,
        api::events::update_event,
        api::events::delete_event,
        api::events::list_colleges,
        api::events::list_locations,
        api::events::get_stats,
        api::events::get_status,
        api::events::seed_events,
        api::registrations::register,
        api::registrations::list_registrations,
        api::registrations::cancel_registration,
        api::favorites::toggle_favorite,
        api::favorites::list_favorites,
        api::notifications::list_notifications,
        api::notifications::update_notification,
        api::notifications::mark_all_read,
        api::users::create_user,
        api::users::get_user,
        api::users::update_user,
        api::database::get_database,
        api::database::run_database_action,
    ),
    components(
        schemas(
            Event, EventType, EventStats, EventTypeCount, ListField,
            Registration, RegistrationStatus,
            Notification, NotificationType,
            UserProfile, UserProfilePatch, SocialLinks,
            CollectionCounts, MigrationReport,
            api::events::EventRequest, api::events::StatusResponse, api::events::SeedResponse,
            api::registrations::RegistrationRequest, api::registrations::RegistrationResponse,
            api::favorites::FavoriteRequest, api::favorites::FavoriteResponse,
            api::notifications::UpdateNotificationRequest, api::notifications::MarkAllReadRequest,
            api::users::CreateUserRequest, api::users::UpdateUserRequest,
            api::database::DatabaseStatusResponse, api::database::DatabaseActionRequest,
            api::database::MigrationResponse,
            ApiResponse<Event>,
            ApiResponse<Vec<Event>>,
            ApiResponse<UserProfile>,
        )
    ),
    tags(
        (name = "events", description = "Event discovery and management endpoints"),
        (name = "registrations", description = "Event registration endpoints"),
        (name = "favorites", description = "Favorite event endpoints"),
        (name = "notifications", description = "User notification endpoints"),
        (name = "users", description = "User profile endpoints"),
        (name = "database", description = "Collection counts and schema migration")
    ),
    info(
        title = "CampusConnect API",
        version = "0.1.0",
        description = "API for discovering campus tech events, registering for them and managing profiles",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> serde_json::Result<String> {
        Self::openapi().to_pretty_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_every_resource() {
        let json = ApiDoc::to_json().unwrap();
        for path in [
            "/api/events",
            "/api/events/{id}",
            "/api/events/mine",
            "/api/registrations",
            "/api/favorites",
            "/api/notifications",
            "/api/users",
            "/api/database",
        ] {
            assert!(json.contains(&format!("\"{path}\"")), "missing {path}");
        }
    }
}
