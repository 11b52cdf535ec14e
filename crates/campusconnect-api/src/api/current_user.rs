// Caller identity
// Decision: Identity comes from headers set by the fronting auth proxy
//
// `x-user-id` identifies the caller; `x-user-email` and `x-user-name` are
// optional. A request without `x-user-id` is anonymous.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use campusconnect_core::CurrentUser;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Extractor for the optional current user. Never rejects.
#[derive(Debug, Clone, Default)]
pub struct MaybeUser(pub Option<CurrentUser>);

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn current_user_from_headers(headers: &HeaderMap) -> Option<CurrentUser> {
    let id = header_value(headers, USER_ID_HEADER)?;
    Some(CurrentUser {
        id,
        email: header_value(headers, USER_EMAIL_HEADER),
        display_name: header_value(headers, USER_NAME_HEADER),
    })
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(current_user_from_headers(&parts.headers)))
    }
}
