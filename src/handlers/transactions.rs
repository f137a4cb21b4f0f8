use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    Json,
};
use serde::{de, Deserialize, Deserializer};
use std::{fmt, str::FromStr};

use super::response::ApiResponse;
use crate::domain::{CreateTransactionRequest, TransactionFilters, UpdateTransactionRequest};
use crate::error::AppError;
use crate::services::ServiceError;
use crate::validation::{validate_create_request, validate_update_request};
use crate::AppState;

/// Query string of `GET /api/transactions`.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user_id: Option<i64>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub offset: Option<i64>,
}

/// `?user_id=` carries no value, so it reads as absent rather than unparsable.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

impl TryFrom<ListTransactionsParams> for TransactionFilters {
    type Error = AppError;

    fn try_from(params: ListTransactionsParams) -> Result<Self, Self::Error> {
        if params.user_id.is_some_and(|user_id| user_id < 0) {
            return Err(invalid_query());
        }

        Ok(TransactionFilters {
            user_id: params.user_id.filter(|user_id| *user_id != 0),
            status: params.status.filter(|status| !status.is_empty()),
            limit: params.limit.unwrap_or(0),
            offset: params.offset.unwrap_or(0),
        })
    }
}

fn invalid_query() -> AppError {
    AppError::BadRequest("Invalid query parameters".to_string())
}

fn invalid_body(rejection: JsonRejection) -> AppError {
    tracing::debug!("rejected request body: {rejection}");
    AppError::BadRequest("Invalid request body".to_string())
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| AppError::BadRequest("Invalid transaction ID".to_string()))
}

/// Not-found becomes 404; everything else is a server fault.
fn lookup_error(err: ServiceError) -> AppError {
    match err {
        ServiceError::NotFound(_) => AppError::NotFound("Transaction not found".to_string()),
        other => AppError::Internal(other.to_string()),
    }
}

pub async fn create_transaction(
    State(state): State<AppState>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(invalid_body)?;
    validate_create_request(&request)
        .map_err(|e| AppError::BadRequest(format!("Validation failed: {e}")))?;

    let created = state
        .transactions
        .create_transaction(request)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(ApiResponse::created(created, "Transaction created successfully"))
}

/// Every service failure here is reported as a client error, including
/// storage faults.
pub async fn list_transactions(
    State(state): State<AppState>,
    params: Result<Query<ListTransactionsParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = params.map_err(|rejection| {
        tracing::debug!("rejected query string: {rejection}");
        invalid_query()
    })?;
    let filters = TransactionFilters::try_from(params)?;

    let transactions = state
        .transactions
        .get_transactions(filters)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    Ok(ApiResponse::ok(
        transactions,
        "Transactions retrieved successfully",
    ))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;

    let transaction = state
        .transactions
        .get_transaction(id)
        .await
        .map_err(lookup_error)?;

    Ok(ApiResponse::ok(
        transaction,
        "Transaction retrieved successfully",
    ))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTransactionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let Json(request) = payload.map_err(invalid_body)?;
    validate_update_request(&request)
        .map_err(|e| AppError::BadRequest(format!("Validation failed: {e}")))?;

    state
        .transactions
        .update_transaction_status(id, &request.status)
        .await
        .map_err(|e| match e {
            ServiceError::Validation(_) => AppError::BadRequest("Invalid status".to_string()),
            other => lookup_error(other),
        })?;

    Ok(ApiResponse::empty("Transaction updated successfully"))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;

    state
        .transactions
        .delete_transaction(id)
        .await
        .map_err(lookup_error)?;

    Ok(ApiResponse::empty("Transaction deleted successfully"))
}
