//! API routes module
//!
//! This module defines all HTTP API routes for the catalog.

pub mod health;
pub mod items;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
/// Note: These are nested under /api by axum_helpers::create_router
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/items", items::router(state))
        .nest("/stats", items::stats_router(state))
        .merge(health::router(state.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{app_info, server::ServerConfig, storage::StorageConfig};
    use domain_items::{ItemService, JsonFileItemRepository};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(dir: &TempDir) -> Router {
        let storage = StorageConfig::new(dir.path().join("items.json"), Duration::from_secs(5));
        let state = AppState {
            items: ItemService::new(JsonFileItemRepository::new(&storage.data_path)),
            config: Config {
                app: app_info!(),
                server: ServerConfig::default(),
                storage,
                environment: Environment::Development,
            },
        };

        axum_helpers::create_router::<crate::openapi::ApiDoc>(routes(&state), &state.config.server)
            .unwrap()
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_routes_are_mounted_under_api() {
        let dir = TempDir::new().unwrap();
        let router = app(&dir);

        let (status, body) = get(router.clone(), "/api/items").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);

        let (status, body) = get(router, "/api/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 0);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_404() {
        let dir = TempDir::new().unwrap();

        let (status, body) = get(app(&dir), "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Route Not Found");
    }

    #[tokio::test]
    async fn test_readiness_reports_storage() {
        let dir = TempDir::new().unwrap();

        let (status, body) = get(app(&dir), "/api/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["storage"], "ok");
        assert_eq!(body["status"], "ready");

        std::fs::write(dir.path().join("items.json"), "garbage").unwrap();
        let (status, body) = get(app(&dir), "/api/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["storage"], "failing");
    }

    #[test]
    fn test_openapi_documents_catalog_paths() {
        use utoipa::OpenApi;

        let doc = crate::openapi::ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/items"));
        assert!(doc.paths.paths.contains_key("/api/items/{id}"));
        assert!(doc.paths.paths.contains_key("/api/stats"));
    }
}
