use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::DatabaseError;

/// Aggregates computed by `fn_dashboard_bpd*`; their row shape belongs to the database
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    async fn summary(&self, tahun: i32, id_bidang: Option<Uuid>) -> Result<Option<Value>, DatabaseError>;

    async fn monthly(&self, tahun: i32, id_bidang: Option<Uuid>) -> Result<Vec<Value>, DatabaseError>;
}

const SUMMARY: &str = "SELECT to_jsonb(t) AS row FROM fn_dashboard_bpd($1::integer, $2::uuid) AS t";

const MONTHLY: &str = "SELECT to_jsonb(t) AS row FROM fn_dashboard_bpd_bulanan($1::integer, $2::uuid) AS t";

pub struct PgDashboardRepository {
    pool: PgPool,
}

impl PgDashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardRepository for PgDashboardRepository {
    async fn summary(&self, tahun: i32, id_bidang: Option<Uuid>) -> Result<Option<Value>, DatabaseError> {
        let row: Option<Value> = sqlx::query_scalar(SUMMARY)
            .bind(tahun)
            .bind(id_bidang)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("fn_dashboard_bpd failed: {}", e);
                e
            })?;
        Ok(row)
    }

    async fn monthly(&self, tahun: i32, id_bidang: Option<Uuid>) -> Result<Vec<Value>, DatabaseError> {
        let rows: Vec<Value> = sqlx::query_scalar(MONTHLY)
            .bind(tahun)
            .bind(id_bidang)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("fn_dashboard_bpd_bulanan failed: {}", e);
                e
            })?;
        Ok(rows)
    }
}
