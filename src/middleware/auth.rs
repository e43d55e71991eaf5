use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::Claims;
use crate::error::ApiError;
use crate::services::ClientInfo;
use crate::state::AppState;
use crate::types::Actor;

use super::client::client_info;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub claims: Claims,
    pub client: ClientInfo,
}

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.claims.sub
    }

    pub fn id_role(&self) -> Uuid {
        self.claims.id_role
    }

    /// The caller as written to audit rows
    pub fn actor(&self) -> Actor {
        Actor {
            id_user: self.claims.sub,
            username: self.claims.username.clone(),
            ip: self.client.ip.clone(),
            user_agent: self.client.user_agent.clone(),
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(request.headers()).map_err(ApiError::unauthorized)?;

    let claims = state.keys.verify(&token).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        ApiError::unauthorized("Token tidak valid atau kedaluwarsa")
    })?;

    let client = client_info(request.headers(), request.extensions());
    request.extensions_mut().insert(AuthUser { claims, client });

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
