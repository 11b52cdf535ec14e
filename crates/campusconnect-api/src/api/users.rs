// User profile HTTP routes

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::post,
    Json, Router,
};
use campusconnect_core::{EventType, NewUserProfile, SocialLinks, UserProfile, UserProfilePatch};
use campusconnect_storage::StoreSelector;
use serde::Deserialize;
use utoipa::ToSchema;

use super::common::{present, ApiError, ApiResponse};
use crate::services::UserService;

/// Request to create a profile. `name` and `email` are required.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "ada@example.edu")]
    pub email: Option<String>,
    pub college: Option<String>,
    pub year: Option<String>,
    pub major: Option<String>,
    #[serde(default)]
    pub interests: Vec<EventType>,
    pub bio: Option<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
}

impl CreateUserRequest {
    fn into_new_profile(self) -> Result<NewUserProfile, ApiError> {
        let (Some(name), Some(email)) = (present(self.name), present(self.email)) else {
            return Err(ApiError::bad_request("Name and email are required"));
        };
        Ok(NewUserProfile {
            name,
            email,
            college: present(self.college),
            year: present(self.year),
            major: present(self.major),
            interests: self.interests,
            bio: present(self.bio),
            social_links: self.social_links,
        })
    }
}

/// Request to update a profile: `userId` plus any patchable fields.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub patch: UserProfilePatch,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub user_id: Option<String>,
    pub email: Option<String>,
}

/// App state for user routes
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

/// Create user routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/users", post(create_user).get(get_user).put(update_user))
        .with_state(state)
}

/// POST /api/users - Create a profile
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Profile created", body = ApiResponse<UserProfile>),
        (status = 400, description = "Missing name or email, or email already in use"),
        (status = 500, description = "Internal server error")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<ApiResponse<UserProfile>, ApiError> {
    let Json(req) = body?;
    let input = req.into_new_profile()?;

    let profile = state
        .service
        .create(input)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to create user profile"))?;

    Ok(ApiResponse::ok(profile))
}

/// GET /api/users - Look up a profile by id or email
#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("userId" = Option<String>, Query, description = "Profile ID, takes precedence over email"),
        ("email" = Option<String>, Query, description = "Profile email"),
    ),
    responses(
        (status = 200, description = "Profile found", body = ApiResponse<UserProfile>),
        (status = 400, description = "Neither userId nor email given"),
        (status = 404, description = "User profile not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<ApiResponse<UserProfile>, ApiError> {
    let Query(query) = query?;

    let result = match (present(query.user_id), present(query.email)) {
        (Some(id), _) => state.service.get(&id).await,
        (None, Some(email)) => state.service.get_by_email(&email).await,
        (None, None) => return Err(ApiError::bad_request("User ID or email is required")),
    };
    let profile = result.map_err(|e| ApiError::from_error(e, "Failed to get user profile"))?;

    Ok(ApiResponse::ok(profile))
}

/// PUT /api/users - Update a profile
#[utoipa::path(
    put,
    path = "/api/users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserProfile>),
        (status = 400, description = "Missing userId"),
        (status = 404, description = "User profile not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    body: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<ApiResponse<UserProfile>, ApiError> {
    let Json(req) = body?;
    let user_id =
        present(req.user_id).ok_or_else(|| ApiError::bad_request("User ID is required"))?;

    let profile = state
        .service
        .update(&user_id, req.patch)
        .await
        .map_err(|e| ApiError::from_error(e, "Failed to update user profile"))?;

    Ok(ApiResponse::ok(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_name_and_email() {
        let req = CreateUserRequest {
            name: Some("Ada".to_string()),
            email: Some(" ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            req.into_new_profile().unwrap_err().message,
            "Name and email are required"
        );
    }

    #[test]
    fn test_update_request_flattens_patch() {
        let req: UpdateUserRequest = serde_json::from_value(serde_json::json!({
            "userId": "u1",
            "major": "Physics",
            "interests": ["workshop"]
        }))
        .unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u1"));
        assert_eq!(req.patch.major.as_deref(), Some("Physics"));
        assert_eq!(req.patch.interests, Some(vec![EventType::Workshop]));
    }
}
