use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{NewUser, User, UserChanges};
use crate::database::query_builder::QueryBuilder;
use crate::database::DatabaseError;
use crate::filter::{FilterData, FilterSource};
use crate::types::Page;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self, filter: FilterData) -> Result<Page<User>, DatabaseError>;

    /// Soft-deleted rows included
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn find_active_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    async fn username_taken(&self, username: &str, except: Option<Uuid>) -> Result<bool, DatabaseError>;

    async fn create(&self, user: NewUser, actor: Uuid) -> Result<User, DatabaseError>;

    async fn update(&self, id: Uuid, changes: UserChanges, actor: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn update_password(&self, id: Uuid, password_hash: &str, actor: Uuid) -> Result<bool, DatabaseError>;

    /// Flags the row deleted and inactive and renames it to `renamed_to`
    async fn soft_delete(&self, id: Uuid, renamed_to: &str, actor: Uuid) -> Result<bool, DatabaseError>;
}

const SELECT_BY_ID: &str = "SELECT * FROM users WHERE id = $1";

const SELECT_ACTIVE_BY_USERNAME: &str =
    "SELECT * FROM users WHERE username = $1 AND active = true AND is_deleted = false";

const USERNAME_TAKEN: &str =
    "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 AND ($2::uuid IS NULL OR id <> $2))";

const INSERT: &str = r#"
    INSERT INTO users (id, id_pegawai, id_role, id_bidang, id_cabang, username, password, nama, email,
                       active, is_deleted, created_at, created_by)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, false, now(), $11)
    RETURNING *
"#;

const UPDATE: &str = r#"
    UPDATE users
    SET id_pegawai = $2, id_role = $3, id_bidang = $4, id_cabang = $5, username = $6, nama = $7,
        email = $8, active = $9, updated_at = now(), updated_by = $10
    WHERE id = $1 AND is_deleted = false
    RETURNING *
"#;

const UPDATE_PASSWORD: &str =
    "UPDATE users SET password = $2, updated_at = now(), updated_by = $3 WHERE id = $1 AND is_deleted = false";

const SOFT_DELETE: &str = r#"
    UPDATE users
    SET is_deleted = true, active = false, username = $2, deleted_at = now(), deleted_by = $3
    WHERE id = $1 AND is_deleted = false
"#;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self, filter: FilterData) -> Result<Page<User>, DatabaseError> {
        QueryBuilder::<User>::new(FilterSource::Table("users"), User::COLUMNS)?
            .filter(filter)?
            .select_page(&self.pool)
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(SELECT_BY_ID).bind(id).fetch_optional(&self.pool).await?;
        Ok(user)
    }

    async fn find_active_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(SELECT_ACTIVE_BY_USERNAME)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn username_taken(&self, username: &str, except: Option<Uuid>) -> Result<bool, DatabaseError> {
        let taken: bool = sqlx::query_scalar(USERNAME_TAKEN)
            .bind(username)
            .bind(except)
            .fetch_one(&self.pool)
            .await?;
        Ok(taken)
    }

    async fn create(&self, user: NewUser, actor: Uuid) -> Result<User, DatabaseError> {
        let created = sqlx::query_as::<_, User>(INSERT)
            .bind(Uuid::new_v4())
            .bind(user.id_pegawai)
            .bind(user.id_role)
            .bind(user.id_bidang)
            .bind(user.id_cabang)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.nama)
            .bind(&user.email)
            .bind(user.active)
            .bind(actor)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert user {}: {}", user.username, e);
                e
            })?;
        Ok(created)
    }

    async fn update(&self, id: Uuid, changes: UserChanges, actor: Uuid) -> Result<Option<User>, DatabaseError> {
        let updated = sqlx::query_as::<_, User>(UPDATE)
            .bind(id)
            .bind(changes.id_pegawai)
            .bind(changes.id_role)
            .bind(changes.id_bidang)
            .bind(changes.id_cabang)
            .bind(&changes.username)
            .bind(&changes.nama)
            .bind(&changes.email)
            .bind(changes.active)
            .bind(actor)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update user {}: {}", id, e);
                e
            })?;
        Ok(updated)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str, actor: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query(UPDATE_PASSWORD)
            .bind(id)
            .bind(password_hash)
            .bind(actor)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn soft_delete(&self, id: Uuid, renamed_to: &str, actor: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query(SOFT_DELETE)
            .bind(id)
            .bind(renamed_to)
            .bind(actor)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to soft delete user {}: {}", id, e);
                e
            })?;
        Ok(result.rows_affected() == 1)
    }
}
