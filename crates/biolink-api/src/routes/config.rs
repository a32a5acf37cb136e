use axum::{extract::State, Json};
use biolink_core::{events::StoreEvent, AppState};
use serde_json::{json, Value};

use crate::error::ApiError;

pub async fn get_config(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let document = state
        .config_store
        .load()
        .await
        .map_err(ApiError::ConfigRead)?
        .ok_or(ApiError::ConfigNotFound)?;
    Ok(Json(document))
}

/// Replace the stored document with the request body. No merge: the body is
/// the complete new document.
pub async fn save_config(
    State(state): State<AppState>,
    Json(document): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let bytes = state
        .config_store
        .save(&document)
        .await
        .map_err(ApiError::ConfigWrite)?;

    tracing::info!("Configuration updated via admin panel");
    state.event_bus.publish(StoreEvent::ConfigSaved { bytes });

    Ok(Json(json!({
        "success": true,
        "message": "Configuration saved successfully",
    })))
}

#[cfg(test)]
mod tests {
    use crate::build_router;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use biolink_core::{events::StoreEvent, AppState};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(state: AppState) -> Router {
        build_router().with_state(state)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn get_before_any_save_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(app(AppState::new(dir.path())), get("/api/config")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Config file not found"}));
    }

    #[tokio::test]
    async fn posted_document_is_returned_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path());
        let doc = json!({"profile": {"username": "a"}, "badges": [], "socialLinks": []});

        let (status, body) = send(app(state.clone()), post("/api/config", &doc)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "message": "Configuration saved successfully"})
        );

        let (status, body) = send(app(state), get("/api/config?t=1700000000000")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, doc);
    }

    #[tokio::test]
    async fn last_post_wins() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path());

        let first = json!({"theme": {"accentColor": "#111111"}});
        send(app(state.clone()), post("/api/config", &first)).await;
        send(app(state.clone()), post("/api/config", &json!({"profile": {"bio": "later"}}))).await;

        let (_, body) = send(app(state), get("/api/config")).await;
        assert_eq!(body, json!({"profile": {"bio": "later"}}));
    }

    #[tokio::test]
    async fn save_publishes_store_event() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(dir.path());
        let mut events = state.event_bus.subscribe();

        send(app(state), post("/api/config", &json!({"badges": []}))).await;

        assert!(matches!(
            events.recv().await.unwrap(),
            StoreEvent::ConfigSaved { bytes } if bytes > 0
        ));
    }

    #[tokio::test]
    async fn unwritable_store_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the data directory should be.
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "").unwrap();
        let state = AppState::new(&blocker);

        let (status, body) = send(app(state), post("/api/config", &json!({}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"success": false, "message": "Failed to save configuration"})
        );
    }
}
