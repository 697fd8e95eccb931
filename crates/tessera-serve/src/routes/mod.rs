//! API route definitions.

mod health;
mod publish;
mod settings;
mod tiles;
mod types;

use axum::http::{HeaderValue, header};
use axum::middleware;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::auth::require_auth;
use crate::state::AppState;

/// Success envelope: `{"success": true, "data": ...}`.
#[derive(Debug, Clone, Serialize)]
pub struct Success<T> {
    success: bool,
    data: T,
}

/// Wrap `data` in the success envelope.
pub(crate) fn success<T: Serialize>(data: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        data,
    })
}

/// Build the complete API router.
///
/// # Route Structure
///
/// ## Public (no auth)
/// - `GET /health` - Health check
/// - `GET /metrics` - Prometheus metrics
///
/// ## Protected (auth required)
///
/// ### Tiles
/// - `GET /api/v1/tile-types` - Registered tile types and their fields
/// - `GET /api/v1/tiles` - All tiles ordered by position
/// - `POST /api/v1/tiles` - Create a tile (or update when the body has an id)
/// - `GET /api/v1/tiles/{id}` - One tile
/// - `PUT /api/v1/tiles/{id}` - Update a tile
/// - `DELETE /api/v1/tiles/{id}` - Delete a tile
/// - `POST /api/v1/tiles/positions` - Reorder tiles
///
/// ### Publishing
/// - `POST /api/v1/generate` - Write the published page
/// - `GET /api/v1/preview` - The page as it would be published
///
/// ### Settings
/// - `GET /api/v1/settings` - Site settings
/// - `PUT /api/v1/settings` - Update site settings
pub fn router(state: AppState) -> Router {
    // Public routes (no authentication)
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics));

    // Protected API routes
    let api_v1 = Router::new()
        .route("/tile-types", get(types::list_tile_types))
        .route("/tiles", get(tiles::list_tiles).post(tiles::save_tile))
        .route("/tiles/positions", post(tiles::update_positions))
        .route(
            "/tiles/{id}",
            get(tiles::get_tile)
                .put(tiles::update_tile)
                .delete(tiles::delete_tile),
        )
        .route("/generate", post(publish::generate))
        .route("/preview", get(publish::preview))
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        // Auth middleware
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        // Editor responses reflect unpublished state and must not be cached
        .layer(middleware::map_response(no_store));

    Router::new()
        .merge(public)
        .nest("/api/v1", api_v1)
        .with_state(state)
}

async fn no_store(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use std::collections::HashSet;
    use tempfile::TempDir;
    use tessera_publish::PublishConfig;
    use tower::ServiceExt;

    const TOKEN: &str = "test-token";

    fn app(tmp: &TempDir) -> Router {
        let config = Config {
            bind_addr: "127.0.0.1:0".to_string(),
            api_tokens: HashSet::from([TOKEN.to_string()]),
            publish: PublishConfig::with_data_dir(
                tmp.path().join("data"),
                tmp.path().join("public/index.html"),
            ),
        };
        router(AppState::new(config))
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", format!("Bearer {TOKEN}"));
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_is_public() {
        let tmp = TempDir::new().unwrap();
        let response = app(&tmp)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_absent_without_recorder() {
        let tmp = TempDir::new().unwrap();
        let response = app(&tmp)
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn api_requires_valid_token() {
        let tmp = TempDir::new().unwrap();
        let app = app(&tmp);

        let response = app
            .clone()
            .oneshot(Request::get("/api/v1/tiles").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::get("/api/v1/tiles")
                    .header("authorization", "Bearer wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn lists_tile_types_with_fields() {
        let tmp = TempDir::new().unwrap();
        let (status, body) = call(&app(&tmp), "GET", "/api/v1/tile-types", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["link"]["name"], "Link");
        assert_eq!(body["data"]["link"]["fields"][0]["name"], "title");
        assert_eq!(body["data"]["link"]["fields"][0]["required"], true);
    }

    #[tokio::test]
    async fn tile_lifecycle() {
        let tmp = TempDir::new().unwrap();
        let app = app(&tmp);

        let (status, created) = call(
            &app,
            "POST",
            "/api/v1/tiles",
            Some(json!({"type": "text", "data": {"title": "Welcome"}})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["data"]["position"], 10);
        assert_eq!(created["data"]["size"], "medium");
        assert_eq!(created["data"]["visibility"]["reason"], "visible");

        let (status, updated) = call(
            &app,
            "PUT",
            &format!("/api/v1/tiles/{id}"),
            Some(json!({"type": "text", "data": {"title": "Hello"}, "size": "large"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["data"]["title"], "Hello");
        assert_eq!(updated["data"]["created"], created["data"]["created"]);

        let (status, fetched) = call(&app, "GET", &format!("/api/v1/tiles/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["data"]["size"], "large");

        let (_, hidden) = call(
            &app,
            "PUT",
            &format!("/api/v1/tiles/{id}"),
            Some(json!({"type": "text", "data": {"title": "Hello"}, "visible": false})),
        )
        .await;
        assert_eq!(hidden["data"]["visibility"]["hiddenFromOutput"], true);
        assert_eq!(hidden["data"]["visibility"]["reason"], "manually_hidden");
        assert_eq!(hidden["data"]["size"], "large");

        let (status, _) = call(&app, "DELETE", &format!("/api/v1/tiles/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&app, "GET", &format!("/api/v1/tiles/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn invalid_tile_returns_messages() {
        let tmp = TempDir::new().unwrap();
        let app = app(&tmp);

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/tiles",
            Some(json!({"type": "image", "data": {"image": "not-a-path"}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(
            body["errors"][0]
                .as_str()
                .unwrap()
                .contains("valid image path")
        );

        let (_, list) = call(&app, "GET", "/api/v1/tiles", None).await;
        assert_eq!(list["data"], json!([]));
    }

    #[tokio::test]
    async fn unknown_type_and_malformed_body_are_bad_requests() {
        let tmp = TempDir::new().unwrap();
        let app = app(&tmp);

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/tiles",
            Some(json!({"type": "gallery", "data": {}})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0], "Unknown tile type: gallery");

        let (status, body) = call(&app, "POST", "/api/v1/tiles", Some(json!({"data": {}}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn reorders_tiles() {
        let tmp = TempDir::new().unwrap();
        let app = app(&tmp);

        let mut ids = Vec::new();
        for title in ["First", "Second"] {
            let (_, body) = call(
                &app,
                "POST",
                "/api/v1/tiles",
                Some(json!({"type": "text", "data": {"title": title}})),
            )
            .await;
            ids.push(body["data"]["id"].as_str().unwrap().to_string());
        }

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/tiles/positions",
            Some(json!([{"id": ids[1], "position": 5}])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["id"], ids[1].as_str());
        assert_eq!(body["data"][1]["id"], ids[0].as_str());

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/tiles/positions",
            Some(json!([{"id": ids[0], "position": 1}, {"id": "tile_missing", "position": 2}])),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, list) = call(&app, "GET", "/api/v1/tiles", None).await;
        assert_eq!(list["data"][0]["id"], ids[1].as_str());
    }

    #[tokio::test]
    async fn settings_update_is_validated() {
        let tmp = TempDir::new().unwrap();
        let app = app(&tmp);

        let (status, body) = call(
            &app,
            "PUT",
            "/api/v1/settings",
            Some(json!({"siteTitle": "Village Fête", "accent1": "#123456", "admin": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["siteTitle"], "Village Fête");
        assert_eq!(body["data"]["theme"]["accent1"], "#123456");
        assert!(body["data"].get("admin").is_none());

        let (status, body) = call(
            &app,
            "PUT",
            "/api/v1/settings",
            Some(json!({"backgroundColor": "red"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (_, body) = call(&app, "GET", "/api/v1/settings", None).await;
        assert_eq!(body["data"]["theme"]["backgroundColor"], "#f5f5f5");
    }

    #[tokio::test]
    async fn generate_and_preview() {
        let tmp = TempDir::new().unwrap();
        let app = app(&tmp);

        call(
            &app,
            "POST",
            "/api/v1/tiles",
            Some(json!({
                "type": "link",
                "data": {"title": "Site", "url": "https://example.org", "external": true}
            })),
        )
        .await;

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/v1/preview")
                    .header("authorization", format!("Bearer {TOKEN}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["cache-control"], "no-store");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let preview = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(preview.starts_with("<!DOCTYPE html>"));
        assert!(!tmp.path().join("public/index.html").exists());

        let (status, body) = call(&app, "POST", "/api/v1/generate", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["tilesPublished"], 1);

        let published = std::fs::read_to_string(tmp.path().join("public/index.html")).unwrap();
        assert_eq!(published, preview);
    }
}
