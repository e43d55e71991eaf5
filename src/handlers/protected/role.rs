use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::{RoleMenusRequest, RoleRequest};
use crate::database::models::{Role, RoleMenu};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidatedJson};
use crate::state::AppState;
use crate::types::{ListParams, Page};

pub async fn list(State(state): State<AppState>, Query(params): Query<ListParams>) -> ApiResult<Page<Role>> {
    Ok(ApiResponse::success(state.roles.list(&params).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Role> {
    Ok(ApiResponse::success(state.roles.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<RoleRequest>,
) -> ApiResult<Role> {
    Ok(ApiResponse::created(state.roles.create(req, &user.actor()).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<RoleRequest>,
) -> ApiResult<Role> {
    Ok(ApiResponse::success(state.roles.update(id, req, &user.actor()).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    state.roles.delete(id, &user.actor()).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}

/// GET /v1/roles/:id/menus
pub async fn menus(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Vec<RoleMenu>> {
    Ok(ApiResponse::success(state.roles.menus(id).await?))
}

/// PUT /v1/roles/:id/menus - upsert the role and replace its whole menu set
pub async fn replace_menus(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<RoleMenusRequest>,
) -> ApiResult<Value> {
    let role = state.roles.replace_menus(id, req, &user.actor()).await?;
    let menus = state.roles.menus(role.id).await?;
    Ok(ApiResponse::success(json!({ "role": role, "menus": menus })))
}
