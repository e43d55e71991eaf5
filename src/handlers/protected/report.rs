use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::api::ReportQuery;
use crate::error::ApiError;
use crate::handlers::query;
use crate::middleware::{ApiResponse, ApiResult};
use crate::report::ReportKind;
use crate::services::{ReportData, XLSX_CONTENT_TYPE};
use crate::state::AppState;

fn report_kind(report: &str) -> Result<ReportKind, ApiError> {
    report.parse().map_err(ApiError::not_found)
}

/// GET /v1/report/:report?tgl_awal=&tgl_akhir=&id_bidang=
pub async fn data(
    State(state): State<AppState>,
    Path(report): Path<String>,
    params: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<ReportData> {
    let kind = report_kind(&report)?;
    let params = query(params)?;
    Ok(ApiResponse::success(state.reports.data(kind, params).await?))
}

/// GET /v1/report/:report/export - the same recap as an `.xlsx` attachment
pub async fn export(
    State(state): State<AppState>,
    Path(report): Path<String>,
    params: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let kind = report_kind(&report)?;
    let params = query(params)?;
    let file = state.reports.export(kind, params).await?;

    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [(header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()), (header::CONTENT_DISPOSITION, disposition)],
        file.bytes,
    )
        .into_response())
}
