// Favorite event HTTP routes

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::post,
    Json, Router,
};
use campusconnect_storage::StoreSelector;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common::{present, ApiError, ApiResponse};
use crate::services::UserService;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub user_id: Option<String>,
    pub event_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    /// Whether the event is a favorite after the toggle.
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesQuery {
    pub user_id: Option<String>,
}

/// App state for favorite routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<UserService>,
}

impl AppState {
    pub fn new(selector: Arc<StoreSelector>) -> Self {
        Self {
            service: Arc::new(UserService::new(selector)),
        }
    }
}

/// Create favorite routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/favorites", post(toggle_favorite).get(list_favorites))
        .with_state(state)
}

/// POST /api/favorites - Toggle an event in the user's favorites
#[utoipa::path(
    post,
    path = "/api/favorites",
    request_body = FavoriteRequest,
    responses(
        (status = 200, description = "New favorite state", body = ApiResponse<FavoriteResponse>),
        (status = 400, description = "Missing ids"),
        (status = 404, description = "User profile not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "favorites"
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    body: Result<Json<FavoriteRequest>, JsonRejection>,
) -> Result<ApiResponse<FavoriteResponse>, ApiError> {
    let Json(req) = body?;
    let (Some(user_id), Some(event_id)) = (present(req.user_id), present(req.event_id)) else {
        return Err(ApiError::bad_request("User ID and Event ID are required"));
    };

    let is_favorite = state
        .service
        .toggle_favorite(&user_id, &event_id)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to toggle favorite"))?;

    Ok(ApiResponse::ok(FavoriteResponse { is_favorite }))
}

/// GET /api/favorites - The user's favorite event ids
#[utoipa::path(
    get,
    path = "/api/favorites",
    params(
        ("userId" = String, Query, description = "User ID")
    ),
    responses(
        (status = 200, description = "Favorite event ids", body = ApiResponse<Vec<String>>),
        (status = 400, description = "Missing userId"),
        (status = 404, description = "User profile not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "favorites"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    query: Result<Query<FavoritesQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<String>>, ApiError> {
    let Query(query) = query?;
    let user_id =
        present(query.user_id).ok_or_else(|| ApiError::bad_request("User ID is required"))?;

    let favorites = state
        .service
        .favorites(&user_id)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to get favorites"))?;

    Ok(ApiResponse::ok(favorites))
}
