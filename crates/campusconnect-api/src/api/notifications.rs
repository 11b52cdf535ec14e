// Notification HTTP routes

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::get,
    Json, Router,
};
use campusconnect_core::Notification;
use campusconnect_storage::StoreSelector;
use serde::Deserialize;
use utoipa::ToSchema;

use super::common::{present, ApiError, ApiResponse};
use crate::services::NotificationService;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsQuery {
    pub user_id: Option<String>,
    /// Only the literal `true` enables the filter.
    pub unread_only: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNotificationRequest {
    pub notification_id: Option<String>,
    /// Defaults to `true`.
    pub read: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadRequest {
    pub user_id: Option<String>,
}

/// App state for notification routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<NotificationService>,
}

impl AppState {
    pub fn new(selector: Arc<StoreSelector>) -> Self {
        Self {
            service: Arc::new(NotificationService::new(selector)),
        }
    }
}

/// Create notification routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/notifications",
            get(list_notifications)
                .put(update_notification)
                .post(mark_all_read),
        )
        .with_state(state)
}

/// GET /api/notifications - Latest notifications for a user
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(
        ("userId" = String, Query, description = "User ID"),
        ("unreadOnly" = Option<bool>, Query, description = "Only unread notifications"),
    ),
    responses(
        (status = 200, description = "Up to 50 notifications, newest first", body = ApiResponse<Vec<Notification>>),
        (status = 400, description = "Missing userId"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    query: Result<Query<NotificationsQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<Notification>>, ApiError> {
    let Query(query) = query?;
    let user_id =
        present(query.user_id).ok_or_else(|| ApiError::bad_request("User ID is required"))?;
    let unread_only = query.unread_only.as_deref() == Some("true");

    let notifications = state
        .service
        .list(&user_id, unread_only)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to get notifications"))?;

    Ok(ApiResponse::ok(notifications))
}

/// PUT /api/notifications - Mark one notification read or unread
#[utoipa::path(
    put,
    path = "/api/notifications",
    request_body = UpdateNotificationRequest,
    responses(
        (status = 200, description = "Notification updated", body = ApiResponse<Notification>),
        (status = 400, description = "Missing notificationId"),
        (status = 404, description = "Notification not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notifications"
)]
pub async fn update_notification(
    State(state): State<AppState>,
    body: Result<Json<UpdateNotificationRequest>, JsonRejection>,
) -> Result<ApiResponse<Notification>, ApiError> {
    let Json(req) = body?;
    let id = present(req.notification_id)
        .ok_or_else(|| ApiError::bad_request("Notification ID is required"))?;

    let notification = state
        .service
        .set_read(&id, req.read.unwrap_or(true))
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to update notification"))?;

    Ok(ApiResponse::ok(notification))
}

/// POST /api/notifications - Mark all of a user's notifications read
#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = MarkAllReadRequest,
    responses(
        (status = 200, description = "All notifications marked as read"),
        (status = 400, description = "Missing userId"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notifications"
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    body: Result<Json<MarkAllReadRequest>, JsonRejection>,
) -> Result<ApiResponse<()>, ApiError> {
    let Json(req) = body?;
    let user_id =
        present(req.user_id).ok_or_else(|| ApiError::bad_request("User ID is required"))?;

    let updated = state
        .service
        .mark_all_read(&user_id)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to mark all notifications as read"))?;
    tracing::debug!(user_id = %user_id, updated, "Marked notifications read");

    Ok(ApiResponse::message("All notifications marked as read"))
}
