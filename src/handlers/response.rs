//! JSON envelopes shared by every endpoint.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// 200 with a payload.
    pub fn ok(data: T, message: impl Into<String>) -> impl IntoResponse {
        (StatusCode::OK, Json(Self::new(Some(data), message)))
    }

    /// 201 with the created resource.
    pub fn created(data: T, message: impl Into<String>) -> impl IntoResponse {
        (StatusCode::CREATED, Json(Self::new(Some(data), message)))
    }
}

impl ApiResponse<()> {
    /// 200 with `data: null`.
    pub fn empty(message: impl Into<String>) -> impl IntoResponse {
        (StatusCode::OK, Json(Self::new(None, message)))
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
