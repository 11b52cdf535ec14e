// Router assembly
// Decision: /health and the OpenAPI UI are never prefixed
// Decision: CORS layer only when origins are configured

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::{extract::State, routing::get, Json, Router};
use campusconnect_storage::StoreSelector;
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::config::ApiConfig;
use crate::openapi::ApiDoc;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    database: String,
}

async fn health(State(selector): State<Arc<StoreSelector>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        database: selector.connection_status().to_string(),
    })
}

/// Build the full application router over an already-selected store.
pub fn build_router(selector: Arc<StoreSelector>, config: &ApiConfig) -> Router {
    let api_routes = Router::new()
        .merge(api::events::routes(api::events::AppState::new(
            selector.clone(),
        )))
        .merge(api::registrations::routes(
            api::registrations::AppState::new(selector.clone()),
        ))
        .merge(api::favorites::routes(api::favorites::AppState::new(
            selector.clone(),
        )))
        .merge(api::notifications::routes(
            api::notifications::AppState::new(selector.clone()),
        ))
        .merge(api::users::routes(api::users::AppState::new(
            selector.clone(),
        )))
        .merge(api::database::routes(api::database::AppState::new(
            selector.clone(),
        )));

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }

    let app = Router::new()
        .route("/health", get(health).with_state(selector))
        .merge(build_router_with_prefix(api_routes, &config.api_prefix))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    let cors_origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let app = if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
        app
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                    header::HeaderName::from_static(api::current_user::USER_ID_HEADER),
                ]),
        )
    };

    app.layer(TraceLayer::new_for_http())
}

/// Nest `api_routes` under `api_prefix`, or serve them at the root when empty.
pub fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use campusconnect_storage::{FileStore, StorageBackend};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_routes() -> Router {
        Router::new().route("/events", get(|| async { "ok" }))
    }

    fn request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_api_prefix_empty() {
        let app = build_router_with_prefix(test_routes(), "");
        let response = app.oneshot(request("/events")).await.unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_api_prefix_set() {
        let app = build_router_with_prefix(test_routes(), "/api");

        let response = app.clone().oneshot(request("/api/events")).await.unwrap();
        assert_eq!(response.status(), 200);

        // Unprefixed path is not served
        let response = app.oneshot(request("/events")).await.unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_health_reports_store() {
        let dir = tempfile::tempdir().unwrap();
        let selector = Arc::new(StoreSelector::new(StorageBackend::fallback(FileStore::new(
            dir.path().join("events.json"),
        ))));
        let app = build_router(selector, &ApiConfig::default());

        let response = app.oneshot(request("/health")).await.unwrap();
        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["database"], "fallback");
    }

    #[tokio::test]
    async fn test_cors_layer_answers_preflight() {
        let dir = tempfile::tempdir().unwrap();
        let selector = Arc::new(StoreSelector::new(StorageBackend::fallback(FileStore::new(
            dir.path().join("events.json"),
        ))));
        let config = ApiConfig {
            cors_allowed_origins: vec!["https://campus.example".to_string()],
            ..Default::default()
        };
        let app = build_router(selector, &config);

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/events")
                    .header("origin", "https://campus.example")
                    .header("access-control-request-method", "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "https://campus.example"
        );
    }
}
