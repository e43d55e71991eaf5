use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::ApiError;

/// JSON body that has passed its `validator` rules
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| ApiError::validation_error("Data tidak valid", Some(field_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

/// Flatten nested errors into `field`, `parent.field` and `list[i].field` keys
pub fn field_errors(errors: &ValidationErrors) -> HashMap<String, String> {
    let mut out = HashMap::new();
    collect("", errors, &mut out);
    out
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut HashMap<String, String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() { field.to_string() } else { format!("{}.{}", prefix, field) };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(first) = list.first() {
                    let message = first.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| first.code.to_string());
                    out.insert(path, message);
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (i, inner) in items {
                    collect(&format!("{}[{}]", path, i), inner, out);
                }
            }
        }
    }
}
