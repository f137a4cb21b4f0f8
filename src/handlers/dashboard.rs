use axum::{extract::State, response::IntoResponse};

use super::response::ApiResponse;
use crate::error::AppError;
use crate::AppState;

/// `GET /api/dashboard/summary`. Any failed aggregate is a 500; partial
/// summaries are never returned.
pub async fn get_summary(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let summary = state
        .dashboard
        .get_summary()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(ApiResponse::ok(
        summary,
        "Dashboard summary retrieved successfully",
    ))
}
