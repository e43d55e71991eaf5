use std::sync::Arc;

use chrono::{Datelike, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::repository::DashboardRepository;

use super::error::ServiceResult;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub tahun: i32,
    pub id_bidang: Option<Uuid>,
    pub summary: Value,
    pub monthly: Vec<Value>,
}

#[derive(Clone)]
pub struct DashboardService {
    repo: Arc<dyn DashboardRepository>,
}

impl DashboardService {
    pub fn new(repo: Arc<dyn DashboardRepository>) -> Self {
        Self { repo }
    }

    /// Summary and monthly series for one year, fetched concurrently
    pub async fn dashboard(&self, tahun: Option<i32>, id_bidang: Option<Uuid>) -> ServiceResult<Dashboard> {
        let tahun = tahun.unwrap_or_else(|| Utc::now().year());
        let (summary, monthly) =
            futures::try_join!(self.repo.summary(tahun, id_bidang), self.repo.monthly(tahun, id_bidang))?;

        Ok(Dashboard { tahun, id_bidang, summary: summary.unwrap_or_else(|| Value::Object(Default::default())), monthly })
    }
}
