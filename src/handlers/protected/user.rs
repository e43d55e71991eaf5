use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::{CreateUserRequest, ResetPasswordRequest, UpdateUserRequest};
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidatedJson};
use crate::state::AppState;
use crate::types::{ListParams, Page};

pub async fn list(State(state): State<AppState>, Query(params): Query<ListParams>) -> ApiResult<Page<User>> {
    Ok(ApiResponse::success(state.users.list(&params).await?))
}

/// Soft-deleted users stay readable by id
pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<User> {
    Ok(ApiResponse::success(state.users.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<User> {
    let created = state.users.create(req, &user.actor()).await?;
    Ok(ApiResponse::created(created))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<User> {
    Ok(ApiResponse::success(state.users.update(id, req, &user.actor()).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    state.users.delete(id, &user.actor()).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}

/// PUT /v1/users/:id/reset-password - administrative reset, no old password needed
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<Value> {
    state.users.reset_password(id, req, &user.actor()).await?;
    Ok(ApiResponse::success(json!({ "id": id, "message": "Password berhasil direset" })))
}
