pub mod dashboard;
pub mod response;
pub mod transactions;

use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Liveness only; storage is not probed.
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "OK" }))
}
