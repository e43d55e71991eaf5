use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{LogSystem, LoginActivity, NewLogSystem, NewLoginActivity};
use crate::database::query_builder::QueryBuilder;
use crate::database::DatabaseError;
use crate::filter::{FilterData, FilterSource};
use crate::types::Page;

/// Append-only audit tables
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn insert_log_system(&self, entry: NewLogSystem) -> Result<(), DatabaseError>;

    async fn insert_login_activity(&self, entry: NewLoginActivity) -> Result<(), DatabaseError>;

    async fn list_log_system(&self, filter: FilterData) -> Result<Page<LogSystem>, DatabaseError>;

    async fn list_login_activity(&self, filter: FilterData) -> Result<Page<LoginActivity>, DatabaseError>;
}

const INSERT_LOG_SYSTEM: &str = r#"
    INSERT INTO log_system (id, id_user, username, modul, aksi, keterangan, ip, user_agent, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
"#;

const INSERT_LOGIN_ACTIVITY: &str = r#"
    INSERT INTO login_activity (id, id_user, username, status, message_code, ip, user_agent, created_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, now())
"#;

pub struct PgAuditRepository {
    pool: PgPool,
}

impl PgAuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PgAuditRepository {
    async fn insert_log_system(&self, entry: NewLogSystem) -> Result<(), DatabaseError> {
        sqlx::query(INSERT_LOG_SYSTEM)
            .bind(Uuid::new_v4())
            .bind(entry.id_user)
            .bind(&entry.username)
            .bind(&entry.modul)
            .bind(&entry.aksi)
            .bind(&entry.keterangan)
            .bind(&entry.ip)
            .bind(&entry.user_agent)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_login_activity(&self, entry: NewLoginActivity) -> Result<(), DatabaseError> {
        sqlx::query(INSERT_LOGIN_ACTIVITY)
            .bind(Uuid::new_v4())
            .bind(entry.id_user)
            .bind(&entry.username)
            .bind(entry.status.as_str())
            .bind(entry.message_code)
            .bind(&entry.ip)
            .bind(&entry.user_agent)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to record login activity for {}: {}", entry.username, e);
                e
            })?;
        Ok(())
    }

    async fn list_log_system(&self, filter: FilterData) -> Result<Page<LogSystem>, DatabaseError> {
        QueryBuilder::<LogSystem>::new(FilterSource::Table("log_system"), LogSystem::COLUMNS)?
            .filter(filter)?
            .select_page(&self.pool)
            .await
    }

    async fn list_login_activity(&self, filter: FilterData) -> Result<Page<LoginActivity>, DatabaseError> {
        QueryBuilder::<LoginActivity>::new(FilterSource::Table("login_activity"), LoginActivity::COLUMNS)?
            .filter(filter)?
            .select_page(&self.pool)
            .await
    }
}
