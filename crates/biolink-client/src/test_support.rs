use axum::{routing::get, Json};
use biolink_core::AppState;
use serde_json::Value;
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Nothing listens on port 1, so every request fails fast.
pub(crate) const UNREACHABLE: &str = "http://127.0.0.1:1/";

/// A real store served over loopback for the lifetime of the value.
pub(crate) struct TestStore {
    pub url: String,
    pub state: AppState,
    _dir: TempDir,
    server: JoinHandle<()>,
}

impl Drop for TestStore {
    fn drop(&mut self) {
        self.server.abort();
    }
}

pub(crate) async fn spawn_store() -> TestStore {
    spawn_store_with_static(None).await
}

/// Also serves `doc` as the static `/config.json` fallback file.
pub(crate) async fn spawn_store_with_static(doc: Option<Value>) -> TestStore {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(dir.path());

    let mut app = biolink_api::build_router().with_state(state.clone());
    if let Some(doc) = doc {
        app = app.route(
            "/config.json",
            get(move || {
                let doc = doc.clone();
                async move { Json(doc) }
            }),
        );
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestStore {
        url: format!("http://{addr}/"),
        state,
        _dir: dir,
        server,
    }
}
