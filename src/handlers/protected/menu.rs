use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::MenuRequest;
use crate::database::models::{Menu, MenuUser, SortDirection};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidatedJson};
use crate::services::NavItem;
use crate::state::AppState;
use crate::types::{ListParams, Page};

pub async fn list(State(state): State<AppState>, Query(params): Query<ListParams>) -> ApiResult<Page<Menu>> {
    Ok(ApiResponse::success(state.menus.list(&params).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Menu> {
    Ok(ApiResponse::success(state.menus.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<MenuRequest>,
) -> ApiResult<Menu> {
    Ok(ApiResponse::created(state.menus.create(req, &user.actor()).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<MenuRequest>,
) -> ApiResult<Menu> {
    Ok(ApiResponse::success(state.menus.update(id, req, &user.actor()).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    state.menus.delete(id, &user.actor()).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}

/// PUT /v1/menus/sort/:id/:direction - `id` is the `menu_user` row, direction `up` or `down`
pub async fn sort(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, direction)): Path<(Uuid, String)>,
) -> ApiResult<Vec<MenuUser>> {
    let direction: SortDirection = direction.parse().map_err(|msg: String| ApiError::validation_error(msg, None))?;
    Ok(ApiResponse::success(state.menus.sort(id, direction, &user.actor()).await?))
}

/// GET /v1/menus/navigation - menu tree of the caller's role
pub async fn navigation(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<NavItem>> {
    Ok(ApiResponse::success(state.menus.navigation(user.id_role()).await?))
}
