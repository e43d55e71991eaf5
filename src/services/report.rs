use std::sync::Arc;

use chrono::Local;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::api::ReportQuery;
use crate::master::find_entity;
use crate::report::{ReportColumn, ReportKind, ReportParams, SheetLayout};
use crate::repository::{MasterRepository, ReportRepository};

use super::error::{ServiceError, ServiceResult};

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const ALL_UNITS: &str = "Semua Bidang";

/// JSON form of a recap
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub judul: &'static str,
    pub tgl_awal: chrono::NaiveDate,
    pub tgl_akhir: chrono::NaiveDate,
    pub unit: String,
    pub columns: &'static [ReportColumn],
    pub rows: Vec<Value>,
    pub total: Decimal,
}

#[derive(Debug, Clone)]
pub struct ReportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
    master: Arc<dyn MasterRepository>,
}

impl ReportService {
    pub fn new(reports: Arc<dyn ReportRepository>, master: Arc<dyn MasterRepository>) -> Self {
        Self { reports, master }
    }

    pub fn params(query: ReportQuery) -> ServiceResult<ReportParams> {
        if query.tgl_awal > query.tgl_akhir {
            return Err(ServiceError::invalid_field("tgl_akhir", "Tanggal akhir tidak boleh sebelum tanggal awal"));
        }
        Ok(ReportParams { tgl_awal: query.tgl_awal, tgl_akhir: query.tgl_akhir, id_bidang: query.id_bidang })
    }

    pub async fn data(&self, kind: ReportKind, query: ReportQuery) -> ServiceResult<ReportData> {
        let params = Self::params(query)?;
        let (unit, rows) = self.fetch(kind, &params).await?;
        let total = SheetLayout::build(kind, &params, &unit, &rows).total;

        Ok(ReportData {
            judul: kind.title(),
            tgl_awal: params.tgl_awal,
            tgl_akhir: params.tgl_akhir,
            unit,
            columns: kind.columns(),
            rows,
            total,
        })
    }

    pub async fn export(&self, kind: ReportKind, query: ReportQuery) -> ServiceResult<ReportFile> {
        let params = Self::params(query)?;
        let (unit, rows) = self.fetch(kind, &params).await?;

        let bytes = SheetLayout::build(kind, &params, &unit, &rows).render().map_err(|e| {
            tracing::error!(report = kind.slug(), "Workbook rendering failed: {}", e);
            ServiceError::Internal("Gagal membuat file laporan".to_string())
        })?;

        let file_name = format!("{}-{}.xlsx", kind.slug(), Local::now().format("%Y%m%d_%H%M%S"));
        tracing::info!(report = kind.slug(), rows = rows.len(), "Exported report");
        Ok(ReportFile { file_name, bytes })
    }

    async fn fetch(&self, kind: ReportKind, params: &ReportParams) -> ServiceResult<(String, Vec<Value>)> {
        let (unit, rows) = futures::try_join!(self.unit_label(params), async {
            self.reports.rekap(kind, params).await.map_err(ServiceError::from)
        })?;
        Ok((unit, rows))
    }

    async fn unit_label(&self, params: &ReportParams) -> ServiceResult<String> {
        let Some(id_bidang) = params.id_bidang else {
            return Ok(ALL_UNITS.to_string());
        };
        let bidang = find_entity("bidang").ok_or_else(|| ServiceError::Internal("Registry tanpa bidang".to_string()))?;
        let row = self
            .master
            .find_by_id(bidang, id_bidang)
            .await?
            .ok_or_else(|| ServiceError::not_found("Bidang tidak ditemukan"))?;
        Ok(row.get("nama").and_then(Value::as_str).unwrap_or(ALL_UNITS).to_string())
    }
}
