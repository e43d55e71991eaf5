use axum::extract::State;

use crate::api::LoginRequest;
use crate::middleware::{ApiResponse, ApiResult, RequestClient, ValidatedJson};
use crate::services::LoginResult;
use crate::state::AppState;

/// POST /v1/auth/login - exchange username and password for a Bearer token
pub async fn login(
    State(state): State<AppState>,
    RequestClient(client): RequestClient,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<LoginResult> {
    let result = state.users.login(req, client).await?;
    Ok(ApiResponse::success(result))
}
