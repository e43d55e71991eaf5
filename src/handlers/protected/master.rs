use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::types::{ListParams, Page};

// Bodies are free-form JSON here; the entity registry validates them column by column.

pub async fn list(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Page<Value>> {
    Ok(ApiResponse::success(state.master.list(&entity, &params).await?))
}

pub async fn get(State(state): State<AppState>, Path((entity, id)): Path<(String, Uuid)>) -> ApiResult<Value> {
    Ok(ApiResponse::success(state.master.get(&entity, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(entity): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let body = json_body(body)?;
    Ok(ApiResponse::created(state.master.create(&entity, body, &user.actor()).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((entity, id)): Path<(String, Uuid)>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let body = json_body(body)?;
    Ok(ApiResponse::success(state.master.update(&entity, id, body, &user.actor()).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((entity, id)): Path<(String, Uuid)>,
) -> ApiResult<Value> {
    state.master.delete(&entity, id, &user.actor()).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
