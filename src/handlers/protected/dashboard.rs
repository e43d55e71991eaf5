use axum::extract::{Query, State};

use crate::api::ScopeQuery;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Dashboard;
use crate::state::AppState;

/// GET /v1/dashboard?tahun=&id_bidang=
pub async fn dashboard(State(state): State<AppState>, Query(scope): Query<ScopeQuery>) -> ApiResult<Dashboard> {
    Ok(ApiResponse::success(state.dashboard.dashboard(scope.tahun, scope.id_bidang).await?))
}
