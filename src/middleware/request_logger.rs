use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use uuid::Uuid;

use crate::handlers::response::ErrorResponse;
use crate::utils::sanitize::sanitize_json;
use crate::AppState;

const MAX_BODY_LOG_SIZE: usize = 1024;
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs every request and its outcome, tagging both with a request id that is
/// echoed back in the `x-request-id` response header.
pub async fn request_logger_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let header_value = HeaderValue::from_str(&request_id).ok();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let user_agent = req
        .headers()
        .get(axum::http::header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let start = Instant::now();

    if let Some(value) = &header_value {
        req.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
    }

    if state.log_request_body {
        let (parts, body) = req.into_parts();
        let bytes = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    method = %method,
                    uri = %uri,
                    "failed to read request body: {e}"
                );
                return (
                    StatusCode::BAD_REQUEST,
                    axum::Json(ErrorResponse::new("Invalid request body")),
                )
                    .into_response();
            }
        };

        let logged_body = loggable_body(&bytes);

        tracing::info!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            user_agent = %user_agent,
            body_size = bytes.len(),
            body = %logged_body,
            "incoming request"
        );

        req = Request::from_parts(parts, Body::from(bytes));
    } else {
        tracing::info!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            user_agent = %user_agent,
            "incoming request"
        );
    }

    let mut response = next.run(req).await;

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "outgoing response"
    );

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// What goes into the log for a request body. The request itself is never altered.
fn loggable_body(bytes: &[u8]) -> String {
    if bytes.len() > MAX_BODY_LOG_SIZE {
        return format!("[body too large to log, {} bytes]", bytes.len());
    }

    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(json) => sanitize_json(&json).to_string(),
        Err(_) if bytes.is_empty() => String::new(),
        Err(_) => format!("[non-json, {} bytes]", bytes.len()),
    }
}
