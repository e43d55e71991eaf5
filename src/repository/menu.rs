use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::menu::neighbour;
use crate::database::models::{Menu, MenuUser, NewMenu, RoleMenu, SortDirection};
use crate::database::query_builder::QueryBuilder;
use crate::database::DatabaseError;
use crate::filter::{FilterData, FilterSource};
use crate::types::Page;

use super::role::SELECT_ROLE_MENUS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// Both rows as they are after the swap
    Swapped { target: MenuUser, neighbour: MenuUser },
    MissingRow,
    /// Already first (`Up`) or last (`Down`) in its group
    NoNeighbour,
}

#[async_trait]
pub trait MenuRepository: Send + Sync {
    async fn list(&self, filter: FilterData) -> Result<Page<Menu>, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Menu>, DatabaseError>;

    async fn create(&self, menu: NewMenu, actor: Uuid) -> Result<Menu, DatabaseError>;

    async fn update(&self, id: Uuid, menu: NewMenu, actor: Uuid) -> Result<Option<Menu>, DatabaseError>;

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> Result<bool, DatabaseError>;

    /// Exchange `urutan` of a `menu_user` row with its neighbour, atomically
    async fn swap_order(&self, id_menu_user: Uuid, direction: SortDirection) -> Result<SwapOutcome, DatabaseError>;

    async fn navigation(&self, id_role: Uuid) -> Result<Vec<RoleMenu>, DatabaseError>;
}

const SELECT_BY_ID: &str = "SELECT * FROM menus WHERE id = $1 AND is_deleted = false";

const INSERT: &str = r#"
    INSERT INTO menus (id, nama, link, icon, keterangan, is_deleted, created_at, created_by)
    VALUES ($1, $2, $3, $4, $5, false, now(), $6)
    RETURNING *
"#;

const UPDATE: &str = r#"
    UPDATE menus SET nama = $2, link = $3, icon = $4, keterangan = $5, updated_at = now(), updated_by = $6
    WHERE id = $1 AND is_deleted = false
    RETURNING *
"#;

const SOFT_DELETE: &str = r#"
    UPDATE menus SET is_deleted = true, deleted_at = now(), deleted_by = $2
    WHERE id = $1 AND is_deleted = false
"#;

const LOCK_MENU_USER: &str =
    "SELECT id, id_role, id_menu, urutan, level, parent_id, posisi FROM menu_user WHERE id = $1 FOR UPDATE";

const LOCK_GROUP: &str = r#"
    SELECT id, id_role, id_menu, urutan, level, parent_id, posisi
    FROM menu_user
    WHERE id_role = $1 AND posisi = $2 AND level = $3 AND parent_id IS NOT DISTINCT FROM $4
    ORDER BY urutan
    FOR UPDATE
"#;

const SET_URUTAN: &str = "UPDATE menu_user SET urutan = $2 WHERE id = $1";

pub struct PgMenuRepository {
    pool: PgPool,
}

impl PgMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuRepository for PgMenuRepository {
    async fn list(&self, filter: FilterData) -> Result<Page<Menu>, DatabaseError> {
        QueryBuilder::<Menu>::new(FilterSource::Table("menus"), Menu::COLUMNS)?
            .filter(filter)?
            .select_page(&self.pool)
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Menu>, DatabaseError> {
        let menu = sqlx::query_as::<_, Menu>(SELECT_BY_ID).bind(id).fetch_optional(&self.pool).await?;
        Ok(menu)
    }

    async fn create(&self, menu: NewMenu, actor: Uuid) -> Result<Menu, DatabaseError> {
        let created = sqlx::query_as::<_, Menu>(INSERT)
            .bind(Uuid::new_v4())
            .bind(&menu.nama)
            .bind(&menu.link)
            .bind(&menu.icon)
            .bind(&menu.keterangan)
            .bind(actor)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update(&self, id: Uuid, menu: NewMenu, actor: Uuid) -> Result<Option<Menu>, DatabaseError> {
        let updated = sqlx::query_as::<_, Menu>(UPDATE)
            .bind(id)
            .bind(&menu.nama)
            .bind(&menu.link)
            .bind(&menu.icon)
            .bind(&menu.keterangan)
            .bind(actor)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query(SOFT_DELETE).bind(id).bind(actor).execute(&self.pool).await?;
        Ok(result.rows_affected() == 1)
    }

    async fn swap_order(&self, id_menu_user: Uuid, direction: SortDirection) -> Result<SwapOutcome, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let Some(target) = sqlx::query_as::<_, MenuUser>(LOCK_MENU_USER)
            .bind(id_menu_user)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(SwapOutcome::MissingRow);
        };

        let group = sqlx::query_as::<_, MenuUser>(LOCK_GROUP)
            .bind(target.id_role)
            .bind(&target.posisi)
            .bind(target.level)
            .bind(target.parent_id)
            .fetch_all(&mut *tx)
            .await?;

        let Some(other) = neighbour(&target, &group, direction).cloned() else {
            return Ok(SwapOutcome::NoNeighbour);
        };

        sqlx::query(SET_URUTAN).bind(target.id).bind(other.urutan).execute(&mut *tx).await?;
        sqlx::query(SET_URUTAN).bind(other.id).bind(target.urutan).execute(&mut *tx).await?;
        tx.commit().await?;

        tracing::debug!(menu_user = %target.id, with = %other.id, "Swapped menu order");
        Ok(SwapOutcome::Swapped {
            target: MenuUser { urutan: other.urutan, ..target.clone() },
            neighbour: MenuUser { urutan: target.urutan, ..other },
        })
    }

    async fn navigation(&self, id_role: Uuid) -> Result<Vec<RoleMenu>, DatabaseError> {
        let rows = sqlx::query_as::<_, RoleMenu>(SELECT_ROLE_MENUS)
            .bind(id_role)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
