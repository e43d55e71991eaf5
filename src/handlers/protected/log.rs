use axum::extract::{Query, State};

use crate::database::models::{LogSystem, LoginActivity};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::types::{ListParams, Page};

/// GET /v1/logs/system
pub async fn system(State(state): State<AppState>, Query(params): Query<ListParams>) -> ApiResult<Page<LogSystem>> {
    Ok(ApiResponse::success(state.audit.list_log_system(&params).await?))
}

/// GET /v1/logs/login
pub async fn login(State(state): State<AppState>, Query(params): Query<ListParams>) -> ApiResult<Page<LoginActivity>> {
    Ok(ApiResponse::success(state.audit.list_login_activity(&params).await?))
}
