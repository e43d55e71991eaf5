use std::collections::HashMap;

use thiserror::Error;

use crate::auth::JwtError;
use crate::database::DatabaseError;
use crate::master::PayloadError;

/// Failures a service reports to the transport layer; messages are shown to users as-is
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("Password salah")]
    PasswordMismatch,

    #[error("Token tidak valid: {0}")]
    Token(#[from] JwtError),

    #[error("Kesalahan basis data: {0}")]
    Database(DatabaseError),

    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation { message: message.into(), field_errors: HashMap::new() }
    }

    /// A validation failure pinned to one field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), message.clone());
        ServiceError::Validation { message, field_errors }
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        if err.is_row_not_found() {
            return ServiceError::not_found("Data tidak ditemukan");
        }
        if err.is_unique_violation() {
            return ServiceError::conflict("Data sudah ada");
        }
        match err {
            DatabaseError::Filter(e) => ServiceError::validation(e.to_string()),
            other => ServiceError::Database(other),
        }
    }
}

impl From<PayloadError> for ServiceError {
    fn from(err: PayloadError) -> Self {
        ServiceError::Validation { message: err.to_string(), field_errors: err.field_errors }
    }
}

impl From<bcrypt::BcryptError> for ServiceError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!("Password hashing failed: {}", err);
        ServiceError::Internal("Gagal memproses password".to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
