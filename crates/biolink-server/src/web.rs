use axum::Router;
use biolink_core::AppState;
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// The API plus, when a web root is given, `/admin` and static files.
pub fn build_app(state: AppState, web_dir: Option<&Path>) -> Router {
    let router = biolink_api::build_router().with_state(state);

    let router = match web_dir {
        Some(dir) => {
            let admin = ServeFile::new(dir.join("admin").join("index.html"));
            router
                .route_service("/admin", admin)
                .fallback_service(ServeDir::new(dir))
        }
        None => router,
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("admin")).unwrap();
        std::fs::write(dir.path().join("index.html"), "profile page").unwrap();
        std::fs::write(dir.path().join("admin/index.html"), "admin page").unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{"profile":{"username":"static"}}"#,
        )
        .unwrap();
        dir
    }

    #[tokio::test]
    async fn admin_route_serves_admin_index() {
        let web = site();
        let data = tempfile::tempdir().unwrap();
        let app = build_app(AppState::new(data.path()), Some(web.path()));

        let (status, body) = get(app, "/admin").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"admin page");
    }

    #[tokio::test]
    async fn static_files_and_fallback_config_are_served() {
        let web = site();
        let data = tempfile::tempdir().unwrap();
        let app = build_app(AppState::new(data.path()), Some(web.path()));

        let (status, body) = get(app.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"profile page");

        let (status, body) = get(app.clone(), "/config.json").await;
        assert_eq!(status, StatusCode::OK);
        let doc: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(doc["profile"]["username"], "static");

        let (status, _) = get(app, "/missing.png").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn api_routes_take_precedence_over_files() {
        let web = site();
        let data = tempfile::tempdir().unwrap();
        let app = build_app(AppState::new(data.path()), Some(web.path()));

        let (status, body) = get(app, "/api/config").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Config file not found");
    }

    #[tokio::test]
    async fn api_only_without_web_root() {
        let data = tempfile::tempdir().unwrap();
        let app = build_app(AppState::new(data.path()), None);

        let (status, body) = get(app, "/api/view").await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["count"], 0);
    }
}
