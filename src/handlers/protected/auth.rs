use axum::{extract::State, Extension};
use serde_json::{json, Value};

use crate::api::ChangePasswordRequest;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /v1/auth/profile
pub async fn profile(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<User> {
    let profile = state.users.profile(&user.actor()).await?;
    Ok(ApiResponse::success(profile))
}

/// PUT /v1/auth/password - change the caller's own password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<Value> {
    state.users.change_password(req, &user.actor()).await?;
    Ok(ApiResponse::success(json!({ "message": "Password berhasil diubah" })))
}
