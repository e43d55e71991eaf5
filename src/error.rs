// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::services::ServiceError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },
    InvalidJson(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::InvalidJson(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to the failure envelope
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "success": false,
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        });

        if let ApiError::ValidationError { field_errors: Some(field_errors), .. } = self {
            response["field_errors"] = json!(field_errors);
        }

        response
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>, field_errors: Option<HashMap<String, String>>) -> Self {
        ApiError::ValidationError { message: message.into(), field_errors }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::Conflict(msg) => ApiError::conflict(msg),
            ServiceError::Validation { message, field_errors } => {
                let field_errors = if field_errors.is_empty() { None } else { Some(field_errors) };
                ApiError::validation_error(message, field_errors)
            }
            ServiceError::PasswordMismatch => ApiError::unauthorized("Password salah"),
            ServiceError::Token(e) => {
                tracing::error!("Token error: {}", e);
                ApiError::internal_server_error("Gagal membuat token")
            }
            ServiceError::Database(e) if e.is_unavailable() => {
                tracing::error!("Database unavailable: {}", e);
                ApiError::service_unavailable("Basis data sedang tidak tersedia")
            }
            ServiceError::Database(e) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("Database error: {}", e);
                ApiError::internal_server_error("Terjadi kesalahan saat memproses permintaan")
            }
            ServiceError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ApiError::internal_server_error("Terjadi kesalahan saat memproses permintaan")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseError;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = vec![
            (ServiceError::not_found("x"), StatusCode::NOT_FOUND),
            (ServiceError::conflict("x"), StatusCode::CONFLICT),
            (ServiceError::validation("x"), StatusCode::BAD_REQUEST),
            (ServiceError::PasswordMismatch, StatusCode::UNAUTHORIZED),
            (ServiceError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ServiceError::Database(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut)),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn sql_details_stay_out_of_the_body() {
        let err = ApiError::from(ServiceError::Database(DatabaseError::QueryError("relation users missing".into())));
        let body = err.to_json();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["code"], json!("INTERNAL_SERVER_ERROR"));
        assert!(!body["message"].as_str().unwrap().contains("users"));
    }

    #[test]
    fn field_errors_are_included() {
        let err = ApiError::from(ServiceError::invalid_field("catatan", "Catatan wajib diisi"));
        let body = err.to_json();
        assert_eq!(body["code"], json!("VALIDATION_ERROR"));
        assert_eq!(body["field_errors"]["catatan"], json!("Catatan wajib diisi"));
    }
}
