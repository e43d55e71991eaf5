use std::sync::Arc;

use serde_json::Map;

use crate::database::models::{LogSystem, LoginActivity, NewLogSystem, NewLoginActivity};
use crate::repository::AuditRepository;
use crate::types::{Actor, ListParams, Page};

use super::error::ServiceResult;

/// Writes and reads the append-only `log_system` and `login_activity` tables
#[derive(Clone)]
pub struct AuditService {
    repo: Arc<dyn AuditRepository>,
}

impl AuditService {
    pub fn new(repo: Arc<dyn AuditRepository>) -> Self {
        Self { repo }
    }

    /// Best effort: a failed write is logged and swallowed so the request still succeeds
    pub async fn record(&self, actor: &Actor, modul: &str, aksi: &str, keterangan: impl Into<String>) {
        let entry = NewLogSystem {
            id_user: Some(actor.id_user),
            username: Some(actor.username.clone()),
            modul: modul.to_string(),
            aksi: aksi.to_string(),
            keterangan: Some(keterangan.into()),
            ip: actor.ip.clone(),
            user_agent: actor.user_agent.clone(),
        };

        tracing::info!(user_id = %actor.id_user, username = %actor.username, modul, aksi, "Audit");
        if let Err(e) = self.repo.insert_log_system(entry).await {
            tracing::warn!(modul, aksi, "Failed to write log_system row: {}", e);
        }
    }

    /// One row per login attempt; unlike [`AuditService::record`] the error propagates
    pub async fn login_attempt(&self, entry: NewLoginActivity) -> ServiceResult<()> {
        tracing::info!(
            username = %entry.username,
            status = entry.status.as_str(),
            code = entry.message_code,
            "Login attempt"
        );
        self.repo.insert_login_activity(entry).await?;
        Ok(())
    }

    pub async fn list_log_system(&self, params: &ListParams) -> ServiceResult<Page<LogSystem>> {
        let filter = params.to_filter_data(LogSystem::SEARCH_COLUMNS, Map::new(), "created_at desc")?;
        Ok(self.repo.list_log_system(filter).await?)
    }

    pub async fn list_login_activity(&self, params: &ListParams) -> ServiceResult<Page<LoginActivity>> {
        let filter = params.to_filter_data(LoginActivity::SEARCH_COLUMNS, Map::new(), "created_at desc")?;
        Ok(self.repo.list_login_activity(filter).await?)
    }
}
