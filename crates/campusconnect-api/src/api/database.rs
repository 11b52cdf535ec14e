// Database status and migration HTTP routes

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use campusconnect_core::{CollectionCounts, MigrationReport};
use campusconnect_storage::StoreSelector;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common::{present, ApiError, ApiResponse};
use crate::services::DatabaseService;

const MIGRATE_ACTION: &str = "migrate";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DatabaseStatusResponse {
    pub collections: CollectionCounts,
    #[schema(example = "operational")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct DatabaseActionRequest {
    /// Only `migrate` is supported.
    #[schema(example = "migrate")]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MigrationResponse {
    pub collections: CollectionCounts,
    pub migration: MigrationReport,
}

/// App state for database routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DatabaseService>,
}

impl AppState {
    pub fn new(selector: Arc<StoreSelector>) -> Self {
        Self {
            service: Arc::new(DatabaseService::new(selector)),
        }
    }
}

/// Create database routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/database", get(get_database).post(run_database_action))
        .with_state(state)
}

/// GET /api/database - Document counts for every collection
#[utoipa::path(
    get,
    path = "/api/database",
    responses(
        (status = 200, description = "Collection counts", body = ApiResponse<DatabaseStatusResponse>),
        (status = 500, description = "Database health check failed")
    ),
    tag = "database"
)]
pub async fn get_database(
    State(state): State<AppState>,
) -> Result<ApiResponse<DatabaseStatusResponse>, ApiError> {
    let collections = state
        .service
        .counts()
        .await
        .map_err(|e| ApiError::from_error(e, "Database health check failed"))?;

    let mut response = ApiResponse::ok(DatabaseStatusResponse {
        collections,
        status: "operational".to_string(),
    })
    .with_database(state.service.connection_status());
    response.message = Some("CampusConnect database is healthy".to_string());
    Ok(response)
}

/// POST /api/database - Run a maintenance action
#[utoipa::path(
    post,
    path = "/api/database",
    request_body = DatabaseActionRequest,
    responses(
        (status = 200, description = "Migration completed", body = ApiResponse<MigrationResponse>),
        (status = 400, description = "Invalid action specified"),
        (status = 500, description = "Database migration failed")
    ),
    tag = "database"
)]
pub async fn run_database_action(
    State(state): State<AppState>,
    body: Result<Json<DatabaseActionRequest>, JsonRejection>,
) -> Result<ApiResponse<MigrationResponse>, ApiError> {
    let Json(req) = body?;
    if present(req.action).as_deref() != Some(MIGRATE_ACTION) {
        return Err(ApiError::bad_request("Invalid action specified"));
    }

    let (migration, collections) = state
        .service
        .migrate()
        .await
        .map_err(|e| ApiError::from_error(e, "Database migration failed"))?;

    let mut response = ApiResponse::ok(MigrationResponse {
        collections,
        migration,
    })
    .with_database(state.service.connection_status());
    response.message = Some("CampusConnect database migration completed successfully".to_string());
    Ok(response)
}
