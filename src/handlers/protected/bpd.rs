use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;
use validator::Validate;

use crate::api::{BiayaRequest, BpdRequest, DokumenRequest, KendaraanRequest, ScopeQuery, TransitionRequest};
use crate::database::models::{Biaya, BpdAction, Dokumen, Histori, Kendaraan, PerjalananDinas};
use crate::error::ApiError;
use crate::middleware::validate::field_errors;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidatedJson};
use crate::services::BpdDetail;
use crate::state::AppState;
use crate::types::{ListParams, Page};

/// GET /v1/bpd?tahun=&id_bidang=&search=&page=&limit=&sort=
pub async fn list(
    State(state): State<AppState>,
    Query(scope): Query<ScopeQuery>,
    Query(params): Query<ListParams>,
) -> ApiResult<Page<Value>> {
    Ok(ApiResponse::success(state.bpd.list(&scope, &params).await?))
}

/// GET /v1/bpd/selesai - finished trips only
pub async fn list_selesai(
    State(state): State<AppState>,
    Query(scope): Query<ScopeQuery>,
    Query(params): Query<ListParams>,
) -> ApiResult<Page<Value>> {
    Ok(ApiResponse::success(state.bpd.list_selesai(&scope, &params).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<BpdDetail> {
    Ok(ApiResponse::success(state.bpd.get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<BpdRequest>,
) -> ApiResult<PerjalananDinas> {
    Ok(ApiResponse::created(state.bpd.create(req, &user.actor()).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<BpdRequest>,
) -> ApiResult<PerjalananDinas> {
    Ok(ApiResponse::success(state.bpd.update(id, req, &user.actor()).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Value> {
    state.bpd.delete(id, &user.actor()).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}

/// POST /v1/bpd/:id/:action - `ajukan`, `setujui`, `revisi`, `tolak` or `selesaikan`.
///
/// The body is optional; `revisi` and `tolak` need `{"catatan": "..."}`.
pub async fn transition(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, action)): Path<(Uuid, String)>,
    body: Option<Json<TransitionRequest>>,
) -> ApiResult<PerjalananDinas> {
    let action: BpdAction = action.parse().map_err(ApiError::not_found)?;
    let req = body.map(|Json(req)| req).unwrap_or_default();
    req.validate()
        .map_err(|errors| ApiError::validation_error("Data tidak valid", Some(field_errors(&errors))))?;

    Ok(ApiResponse::success(state.bpd.transition(id, action, req, &user.actor()).await?))
}

/// GET /v1/bpd/:id/histori
pub async fn histori(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Vec<Histori>> {
    Ok(ApiResponse::success(state.bpd.histori(id).await?))
}

// ---- biaya ----

pub async fn add_biaya(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<BiayaRequest>,
) -> ApiResult<Biaya> {
    Ok(ApiResponse::created(state.bpd.add_biaya(id, req, &user.actor()).await?))
}

pub async fn update_biaya(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, biaya_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<BiayaRequest>,
) -> ApiResult<Biaya> {
    Ok(ApiResponse::success(state.bpd.update_biaya(id, biaya_id, req, &user.actor()).await?))
}

pub async fn delete_biaya(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, biaya_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Value> {
    state.bpd.delete_biaya(id, biaya_id, &user.actor()).await?;
    Ok(ApiResponse::success(json!({ "id": biaya_id, "deleted": true })))
}

// ---- kendaraan ----

pub async fn add_kendaraan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<KendaraanRequest>,
) -> ApiResult<Kendaraan> {
    Ok(ApiResponse::created(state.bpd.add_kendaraan(id, req, &user.actor()).await?))
}

pub async fn update_kendaraan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, kendaraan_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<KendaraanRequest>,
) -> ApiResult<Kendaraan> {
    Ok(ApiResponse::success(state.bpd.update_kendaraan(id, kendaraan_id, req, &user.actor()).await?))
}

pub async fn delete_kendaraan(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, kendaraan_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Value> {
    state.bpd.delete_kendaraan(id, kendaraan_id, &user.actor()).await?;
    Ok(ApiResponse::success(json!({ "id": kendaraan_id, "deleted": true })))
}

// ---- dokumen ----

pub async fn add_dokumen(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<DokumenRequest>,
) -> ApiResult<Dokumen> {
    Ok(ApiResponse::created(state.bpd.add_dokumen(id, req, &user.actor()).await?))
}

pub async fn update_dokumen(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, dokumen_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(req): ValidatedJson<DokumenRequest>,
) -> ApiResult<Dokumen> {
    Ok(ApiResponse::success(state.bpd.update_dokumen(id, dokumen_id, req, &user.actor()).await?))
}

pub async fn delete_dokumen(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, dokumen_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Value> {
    state.bpd.delete_dokumen(id, dokumen_id, &user.actor()).await?;
    Ok(ApiResponse::success(json!({ "id": dokumen_id, "deleted": true })))
}
