use axum::{extract::State, Json};
use biolink_core::{events::StoreEvent, AppState};
use serde_json::{json, Value};

use crate::error::ApiError;

pub async fn get_views(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let count = state
        .view_counter
        .current()
        .await
        .map_err(ApiError::ViewRead)?;
    Ok(Json(json!({ "count": count })))
}

pub async fn record_view(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let count = state
        .view_counter
        .increment()
        .await
        .map_err(ApiError::ViewIncrement)?;
    tracing::debug!("view recorded, total {count}");
    state.event_bus.publish(StoreEvent::ViewRecorded { count });
    Ok(Json(json!({ "success": true, "count": count })))
}
