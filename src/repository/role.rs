use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder as SqlBuilder};
use uuid::Uuid;

use crate::database::models::{NewMenuUser, NewRole, Role, RoleMenu};
use crate::database::query_builder::QueryBuilder;
use crate::database::DatabaseError;
use crate::filter::{FilterData, FilterSource};
use crate::types::Page;

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn list(&self, filter: FilterData) -> Result<Page<Role>, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, DatabaseError>;

    async fn create(&self, role: NewRole, actor: Uuid) -> Result<Role, DatabaseError>;

    async fn update(&self, id: Uuid, role: NewRole, actor: Uuid) -> Result<Option<Role>, DatabaseError>;

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> Result<bool, DatabaseError>;

    async fn menus(&self, id_role: Uuid) -> Result<Vec<RoleMenu>, DatabaseError>;

    /// Upsert the role and replace all of its grants in one transaction
    async fn replace_menus(
        &self,
        id_role: Uuid,
        role: NewRole,
        grants: Vec<NewMenuUser>,
        actor: Uuid,
    ) -> Result<Role, DatabaseError>;
}

const SELECT_BY_ID: &str = "SELECT * FROM roles WHERE id = $1 AND is_deleted = false";

const INSERT: &str = r#"
    INSERT INTO roles (id, nama, keterangan, is_deleted, created_at, created_by)
    VALUES ($1, $2, $3, false, now(), $4)
    RETURNING *
"#;

const UPDATE: &str = r#"
    UPDATE roles SET nama = $2, keterangan = $3, updated_at = now(), updated_by = $4
    WHERE id = $1 AND is_deleted = false
    RETURNING *
"#;

const UPSERT: &str = r#"
    INSERT INTO roles (id, nama, keterangan, is_deleted, created_at, created_by)
    VALUES ($1, $2, $3, false, now(), $4)
    ON CONFLICT (id) DO UPDATE
    SET nama = EXCLUDED.nama, keterangan = EXCLUDED.keterangan, is_deleted = false,
        updated_at = now(), updated_by = EXCLUDED.created_by
    RETURNING *
"#;

const SOFT_DELETE: &str = r#"
    UPDATE roles SET is_deleted = true, deleted_at = now(), deleted_by = $2
    WHERE id = $1 AND is_deleted = false
"#;

pub(crate) const SELECT_ROLE_MENUS: &str = r#"
    SELECT mu.id, mu.id_role, mu.id_menu, m.nama, m.link, m.icon, mu.urutan, mu.level, mu.parent_id, mu.posisi
    FROM menu_user mu
    JOIN menus m ON m.id = mu.id_menu AND m.is_deleted = false
    WHERE mu.id_role = $1
    ORDER BY mu.posisi, mu.level, mu.urutan
"#;

const DELETE_GRANTS: &str = "DELETE FROM menu_user WHERE id_role = $1";

pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn list(&self, filter: FilterData) -> Result<Page<Role>, DatabaseError> {
        QueryBuilder::<Role>::new(FilterSource::Table("roles"), Role::COLUMNS)?
            .filter(filter)?
            .select_page(&self.pool)
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, DatabaseError> {
        let role = sqlx::query_as::<_, Role>(SELECT_BY_ID).bind(id).fetch_optional(&self.pool).await?;
        Ok(role)
    }

    async fn create(&self, role: NewRole, actor: Uuid) -> Result<Role, DatabaseError> {
        let created = sqlx::query_as::<_, Role>(INSERT)
            .bind(Uuid::new_v4())
            .bind(&role.nama)
            .bind(&role.keterangan)
            .bind(actor)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update(&self, id: Uuid, role: NewRole, actor: Uuid) -> Result<Option<Role>, DatabaseError> {
        let updated = sqlx::query_as::<_, Role>(UPDATE)
            .bind(id)
            .bind(&role.nama)
            .bind(&role.keterangan)
            .bind(actor)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query(SOFT_DELETE).bind(id).bind(actor).execute(&self.pool).await?;
        Ok(result.rows_affected() == 1)
    }

    async fn menus(&self, id_role: Uuid) -> Result<Vec<RoleMenu>, DatabaseError> {
        let rows = sqlx::query_as::<_, RoleMenu>(SELECT_ROLE_MENUS)
            .bind(id_role)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn replace_menus(
        &self,
        id_role: Uuid,
        role: NewRole,
        grants: Vec<NewMenuUser>,
        actor: Uuid,
    ) -> Result<Role, DatabaseError> {
        if grants.is_empty() {
            return Err(DatabaseError::QueryError("refusing to clear every grant of a role".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let saved = sqlx::query_as::<_, Role>(UPSERT)
            .bind(id_role)
            .bind(&role.nama)
            .bind(&role.keterangan)
            .bind(actor)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(DELETE_GRANTS).bind(id_role).execute(&mut *tx).await?;

        let mut insert: SqlBuilder<Postgres> = SqlBuilder::new(
            "INSERT INTO menu_user (id, id_role, id_menu, urutan, level, parent_id, posisi, created_at, created_by) ",
        );
        insert.push_values(grants.iter(), |mut row, grant| {
            row.push_bind(Uuid::new_v4())
                .push_bind(id_role)
                .push_bind(grant.id_menu)
                .push_bind(grant.urutan)
                .push_bind(grant.level)
                .push_bind(grant.parent_id)
                .push_bind(grant.posisi.clone())
                .push("now()")
                .push_bind(actor);
        });
        insert.build().execute(&mut *tx).await.map_err(|e| {
            tracing::error!("Failed to insert grants for role {}: {}", id_role, e);
            e
        })?;

        tx.commit().await?;
        tracing::info!(role_id = %id_role, grants = grants.len(), "Replaced role menus");
        Ok(saved)
    }
}
