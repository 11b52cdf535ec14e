// Event HTTP routes
// Decision: Event responses carry the active store in `database`

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use campusconnect_core::{Event, EventStats, FilterParams, ListField};
use campusconnect_storage::StoreSelector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common::{ApiError, ApiResponse};
use super::current_user::MaybeUser;
use super::validation::{validate_event_patch, validate_new_event};
use crate::services::EventService;

/// Request body for creating or updating an event.
///
/// Every field is optional at the wire level so that missing required fields
/// produce a field-specific message instead of a deserialization error.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    #[schema(example = "CodeCrush Hackathon")]
    pub title: Option<String>,
    pub description: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[schema(example = "2030-02-01T09:00:00Z")]
    pub date: Option<String>,
    pub location: Option<String>,
    pub college: Option<String>,
    /// `hackathon`, `tech-talk` or `workshop`.
    #[schema(example = "hackathon")]
    pub event_type: Option<String>,
    #[schema(example = "https://example.com/hackathon")]
    pub link: Option<String>,
    /// Comma-separated text or an array of strings.
    pub tags: Option<ListField>,
    pub created_by: Option<String>,
    pub registration_enabled: Option<bool>,
    pub registration_deadline: Option<String>,
    pub max_participants: Option<u32>,
    pub is_featured: Option<bool>,
    pub image_url: Option<String>,
    pub organizer: Option<String>,
    pub contact_email: Option<String>,
    /// Comma-separated text or an array of strings.
    pub prerequisites: Option<ListField>,
    pub price: Option<f64>,
    #[schema(example = "USD")]
    pub currency: Option<String>,
}

/// Active store report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[schema(example = "primary")]
    pub database: String,
    pub timestamp: DateTime<Utc>,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub events_created: usize,
    pub events: Vec<Event>,
}

/// App state for event routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EventService>,
}

impl AppState {
    pub fn new(selector: Arc<StoreSelector>) -> Self {
        Self {
            service: Arc::new(EventService::new(selector)),
        }
    }
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/mine", get(list_my_events))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/colleges", get(list_colleges))
        .route("/locations", get(list_locations))
        .route("/stats", get(get_stats))
        .route("/status", get(get_status))
        .route("/seed-events", post(seed_events))
        .with_state(state)
}

/// GET /api/events - List events matching the filters, ascending by date
#[utoipa::path(
    get,
    path = "/api/events",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive substring over title, description, college, location and tags"),
        ("eventType" = Option<String>, Query, description = "hackathon, tech-talk, workshop or all"),
        ("college" = Option<String>, Query, description = "Case-insensitive substring of the college"),
        ("location" = Option<String>, Query, description = "Case-insensitive substring of the location"),
        ("dateFrom" = Option<String>, Query, description = "Inclusive lower bound"),
        ("dateTo" = Option<String>, Query, description = "Inclusive upper bound"),
    ),
    responses(
        (status = 200, description = "Matching events", body = ApiResponse<Vec<Event>>),
        (status = 400, description = "Invalid filter value"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    query: Result<Query<FilterParams>, QueryRejection>,
) -> Result<ApiResponse<Vec<Event>>, ApiError> {
    let Query(params) = query?;
    let filters = params
        .into_filters()
        .map_err(|e| ApiError::from_error(e, "Failed to fetch events"))?;
    let events = state
        .service
        .list(&filters)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to fetch events"))?;

    Ok(ApiResponse::ok(events).with_database(state.service.connection_status()))
}

/// POST /api/events - Create an event
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = EventRequest,
    responses(
        (status = 200, description = "Event created", body = ApiResponse<Event>),
        (status = 400, description = "Missing or invalid field"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    body: Result<Json<EventRequest>, JsonRejection>,
) -> Result<ApiResponse<Event>, ApiError> {
    let Json(req) = body?;
    let input = validate_new_event(req, user.as_ref(), Utc::now())
        .map_err(|e| ApiError::from_error(e, "Failed to create event"))?;
    let event = state
        .service
        .create(input)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to create event"))?;

    Ok(ApiResponse::ok(event).with_database(state.service.connection_status()))
}

/// GET /api/events/mine - Events created by the current user
#[utoipa::path(
    get,
    path = "/api/events/mine",
    responses(
        (status = 200, description = "Events created by the caller", body = ApiResponse<Vec<Event>>),
        (status = 400, description = "No current user"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn list_my_events(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<ApiResponse<Vec<Event>>, ApiError> {
    let user = user.ok_or_else(|| ApiError::bad_request("User ID is required"))?;
    let events = state
        .service
        .list_by_creator(&user.id)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to fetch events"))?;

    Ok(ApiResponse::ok(events).with_database(state.service.connection_status()))
}

/// GET /api/events/{id} - Get event by ID
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = ApiResponse<Event>),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Event>, ApiError> {
    let event = state
        .service
        .get(&id)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to fetch event"))?;

    Ok(ApiResponse::ok(event).with_database(state.service.connection_status()))
}

/// PUT /api/events/{id} - Update event. Only provided fields are changed.
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    request_body = EventRequest,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<Event>),
        (status = 400, description = "Invalid field"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<EventRequest>, JsonRejection>,
) -> Result<ApiResponse<Event>, ApiError> {
    let Json(req) = body?;
    let patch =
        validate_event_patch(req).map_err(|e| ApiError::from_error(e, "Failed to update event"))?;
    let event = state
        .service
        .update(&id, patch)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to update event"))?;

    Ok(ApiResponse::ok(event).with_database(state.service.connection_status()))
}

/// DELETE /api/events/{id} - Delete event
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    state
        .service
        .delete(&id)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to delete event"))?;

    Ok(ApiResponse::message("Event deleted successfully")
        .with_database(state.service.connection_status()))
}

/// GET /api/colleges - Distinct colleges, sorted
#[utoipa::path(
    get,
    path = "/api/colleges",
    responses(
        (status = 200, description = "Distinct colleges", body = ApiResponse<Vec<String>>),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn list_colleges(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<String>>, ApiError> {
    let colleges = state
        .service
        .colleges()
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to fetch colleges"))?;

    Ok(ApiResponse::ok(colleges).with_database(state.service.connection_status()))
}

/// GET /api/locations - Distinct locations, sorted
#[utoipa::path(
    get,
    path = "/api/locations",
    responses(
        (status = 200, description = "Distinct locations", body = ApiResponse<Vec<String>>),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn list_locations(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<String>>, ApiError> {
    let locations = state
        .service
        .locations()
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to fetch locations"))?;

    Ok(ApiResponse::ok(locations).with_database(state.service.connection_status()))
}

/// GET /api/stats - Aggregate statistics
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Event statistics", body = ApiResponse<EventStats>),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn get_stats(State(state): State<AppState>) -> Result<ApiResponse<EventStats>, ApiError> {
    let stats = state
        .service
        .stats()
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to fetch stats"))?;

    Ok(ApiResponse::ok(stats).with_database(state.service.connection_status()))
}

/// GET /api/status - Which store is serving requests
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Store status", body = ApiResponse<StatusResponse>)
    ),
    tag = "events"
)]
pub async fn get_status(State(state): State<AppState>) -> ApiResponse<StatusResponse> {
    let status = state.service.connection_status();
    ApiResponse::ok(StatusResponse {
        database: status.to_string(),
        timestamp: Utc::now(),
        is_primary: status.is_primary(),
    })
}

/// POST /api/seed-events - Insert the sample events into the active store
#[utoipa::path(
    post,
    path = "/api/seed-events",
    responses(
        (status = 200, description = "Sample events inserted", body = ApiResponse<SeedResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "events"
)]
pub async fn seed_events(
    State(state): State<AppState>,
) -> Result<ApiResponse<SeedResponse>, ApiError> {
    let events = state
        .service
        .seed()
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to seed events"))?;

    let mut response = ApiResponse::ok(SeedResponse {
        events_created: events.len(),
        events,
    })
    .with_database(state.service.connection_status());
    response.message = Some("Sample events seeded successfully".to_string());
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use campusconnect_storage::{FileStore, StorageBackend};
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_router() -> (TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let selector = Arc::new(StoreSelector::new(StorageBackend::fallback(FileStore::new(
            dir.path().join("events.json"),
        ))));
        (dir, routes(AppState::new(selector)))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_list_reports_fallback_store() {
        let (_dir, router) = test_router();
        let (status, json) = send(router, get("/events")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["database"], "fallback");
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_event_type_filter_is_bad_request() {
        let (_dir, router) = test_router();
        let (status, json) = send(router, get("/events?eventType=meetup")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid event type: meetup");
    }

    #[tokio::test]
    async fn test_event_type_all_means_no_filter() {
        let (_dir, router) = test_router();
        let (_, json) = send(router, get("/events?eventType=all&college=undefined")).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_mine_requires_current_user() {
        let (_dir, router) = test_router();
        let (status, _) = send(router.clone(), get("/events/mine")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .uri("/events/mine")
            .header("x-user-id", "anonymous")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (_dir, router) = test_router();
        let request = Request::builder()
            .method("POST")
            .uri("/events")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, json) = send(router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_status_and_stats() {
        let (_dir, router) = test_router();
        let (_, json) = send(router.clone(), get("/status")).await;
        assert_eq!(json["data"]["database"], "fallback");
        assert_eq!(json["data"]["isPrimary"], false);

        let (_, json) = send(router, get("/stats")).await;
        assert_eq!(json["data"]["totalEvents"], 3);
        assert_eq!(json["data"]["eventTypeCount"]["tech-talk"], 1);
    }
}
