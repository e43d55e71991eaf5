use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::database::DatabaseError;
use crate::report::{ReportKind, ReportParams};

#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Rows of a `fn_rpt_rekap_*` function, one JSON object per row
    async fn rekap(&self, kind: ReportKind, params: &ReportParams) -> Result<Vec<Value>, DatabaseError>;
}

fn rekap_sql(kind: ReportKind) -> String {
    format!("SELECT to_jsonb(t) AS row FROM {}($1::date, $2::date, $3::uuid) AS t", kind.function())
}

pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn rekap(&self, kind: ReportKind, params: &ReportParams) -> Result<Vec<Value>, DatabaseError> {
        let sql = rekap_sql(kind);
        let rows: Vec<Value> = sqlx::query_scalar(&sql)
            .bind(params.tgl_awal)
            .bind(params.tgl_akhir)
            .bind(params.id_bidang)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("{} failed: {}", kind.function(), e);
                e
            })?;
        Ok(rows)
    }
}
