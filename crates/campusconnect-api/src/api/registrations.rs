// Registration HTTP routes
//
// `userId` may be omitted when the caller is identified by headers.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::post,
    Json, Router,
};
use campusconnect_core::{Registration, RegistrationStatus};
use campusconnect_storage::StoreSelector;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common::{present, ApiError, ApiResponse};
use super::current_user::MaybeUser;
use crate::services::RegistrationService;

/// Request to register for, or cancel, an event.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub event_id: Option<String>,
    /// Defaults to the current user.
    pub user_id: Option<String>,
    /// Free-form note from the registrant. Ignored on cancel.
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegistrationResponse {
    pub registration: Registration,
    pub status: RegistrationStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationQuery {
    pub event_id: Option<String>,
    pub user_id: Option<String>,
}

/// App state for registration routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RegistrationService>,
}

impl AppState {
    pub fn new(selector: Arc<StoreSelector>) -> Self {
        Self {
            service: Arc::new(RegistrationService::new(selector)),
        }
    }
}

/// Create registration routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/registrations",
            post(register)
                .get(list_registrations)
                .delete(cancel_registration),
        )
        .with_state(state)
}

fn ids(req: RegistrationRequest, user: MaybeUser) -> Result<(String, String), ApiError> {
    let event_id = present(req.event_id);
    let user_id = present(req.user_id).or_else(|| user.0.map(|u| u.id));
    match (event_id, user_id) {
        (Some(event_id), Some(user_id)) => Ok((event_id, user_id)),
        _ => Err(ApiError::bad_request("Event ID and User ID are required")),
    }
}

/// POST /api/registrations - Register for an event
#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = RegistrationRequest,
    responses(
        (status = 200, description = "Registered (confirmed or waitlisted)", body = ApiResponse<RegistrationResponse>),
        (status = 400, description = "Missing ids, registration closed or already registered"),
        (status = 404, description = "Event not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "registrations"
)]
pub async fn register(
    State(state): State<AppState>,
    user: MaybeUser,
    body: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<ApiResponse<RegistrationResponse>, ApiError> {
    let Json(req) = body?;
    let additional_info = present(req.additional_info.clone());
    let (event_id, user_id) = ids(req, user)?;

    let registration = state
        .service
        .register(&event_id, &user_id, additional_info, Utc::now())
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to register for event"))?;

    Ok(ApiResponse::ok(RegistrationResponse {
        status: registration.status,
        registration,
    }))
}

/// GET /api/registrations - List registrations, newest first
#[utoipa::path(
    get,
    path = "/api/registrations",
    params(
        ("eventId" = Option<String>, Query, description = "Only registrations for this event"),
        ("userId" = Option<String>, Query, description = "Only registrations by this user"),
    ),
    responses(
        (status = 200, description = "Registrations", body = ApiResponse<Vec<Registration>>),
        (status = 500, description = "Internal server error")
    ),
    tag = "registrations"
)]
pub async fn list_registrations(
    State(state): State<AppState>,
    query: Result<Query<RegistrationQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<Registration>>, ApiError> {
    let Query(query) = query?;
    let event_id = present(query.event_id);
    let user_id = present(query.user_id);

    let registrations = state
        .service
        .list(event_id.as_deref(), user_id.as_deref())
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to get registrations"))?;

    Ok(ApiResponse::ok(registrations))
}

/// DELETE /api/registrations - Cancel a registration
#[utoipa::path(
    delete,
    path = "/api/registrations",
    request_body = RegistrationRequest,
    responses(
        (status = 200, description = "Registration cancelled"),
        (status = 400, description = "Missing ids"),
        (status = 404, description = "Registration not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "registrations"
)]
pub async fn cancel_registration(
    State(state): State<AppState>,
    user: MaybeUser,
    body: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<ApiResponse<()>, ApiError> {
    let Json(req) = body?;
    let (event_id, user_id) = ids(req, user)?;

    state
        .service
        .cancel(&event_id, &user_id)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to cancel registration"))?;

    Ok(ApiResponse::message("Registration cancelled successfully"))
}
