// Handlers are split by security tier:
// public (no auth, token acquisition) and protected (Bearer JWT, everything under /v1 else).

pub mod protected;
pub mod public;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;

use crate::error::ApiError;

/// Unwrap a query string, reporting malformed input in the error envelope
pub(crate) fn query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query.map(|Query(value)| value).map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Unwrap a JSON body, reporting malformed input in the error envelope
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| ApiError::invalid_json(rejection.body_text()))
}
