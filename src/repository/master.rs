use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::query_builder::{bind_param_query_as, JsonRow, QueryBuilder};
use crate::database::DatabaseError;
use crate::filter::{FilterData, FilterSource};
use crate::master::{MasterEntity, MasterPayload};
use crate::types::Page;

/// Generic CRUD over any registry entity; rows travel as JSON objects
#[async_trait]
pub trait MasterRepository: Send + Sync {
    async fn list(&self, entity: &'static MasterEntity, filter: FilterData) -> Result<Page<Value>, DatabaseError>;

    async fn find_by_id(&self, entity: &'static MasterEntity, id: Uuid) -> Result<Option<Value>, DatabaseError>;

    async fn insert(
        &self,
        entity: &'static MasterEntity,
        payload: MasterPayload,
        actor: Uuid,
    ) -> Result<Value, DatabaseError>;

    async fn update(
        &self,
        entity: &'static MasterEntity,
        id: Uuid,
        payload: MasterPayload,
        actor: Uuid,
    ) -> Result<Option<Value>, DatabaseError>;

    async fn soft_delete(&self, entity: &'static MasterEntity, id: Uuid, actor: Uuid) -> Result<bool, DatabaseError>;
}

// Table and column names below only ever come from the static registry.

fn select_by_id_sql(entity: &MasterEntity) -> String {
    format!(
        "SELECT to_jsonb(t) AS row FROM \"{}\" AS t WHERE id = $1 AND is_deleted = false",
        entity.table
    )
}

/// `$1` is the new id, then one cast placeholder per payload column, then the actor
fn insert_sql(entity: &MasterEntity, payload: &MasterPayload) -> String {
    let mut columns = vec!["id".to_string()];
    let mut values = vec!["$1".to_string()];
    for (i, (column, _)) in payload.values.iter().enumerate() {
        columns.push(format!("\"{}\"", column.name));
        values.push(format!("${}::{}", i + 2, column.kind.sql_cast()));
    }
    let actor = payload.values.len() + 2;
    format!(
        "INSERT INTO \"{}\" AS t ({}, is_deleted, created_at, created_by) VALUES ({}, false, now(), ${}) RETURNING to_jsonb(t) AS row",
        entity.table,
        columns.join(", "),
        values.join(", "),
        actor
    )
}

/// `$1` is the row id, then one cast placeholder per payload column, then the actor
fn update_sql(entity: &MasterEntity, payload: &MasterPayload) -> String {
    let assignments: Vec<String> = payload
        .values
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("\"{}\" = ${}::{}", column.name, i + 2, column.kind.sql_cast()))
        .collect();
    let actor = payload.values.len() + 2;
    format!(
        "UPDATE \"{}\" AS t SET {}, updated_at = now(), updated_by = ${} WHERE id = $1 AND is_deleted = false RETURNING to_jsonb(t) AS row",
        entity.table,
        assignments.join(", "),
        actor
    )
}

fn soft_delete_sql(entity: &MasterEntity) -> String {
    format!(
        "UPDATE \"{}\" SET is_deleted = true, deleted_at = now(), deleted_by = $2 WHERE id = $1 AND is_deleted = false",
        entity.table
    )
}

pub struct PgMasterRepository {
    pool: PgPool,
}

impl PgMasterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MasterRepository for PgMasterRepository {
    async fn list(&self, entity: &'static MasterEntity, filter: FilterData) -> Result<Page<Value>, DatabaseError> {
        let page = QueryBuilder::<JsonRow>::json(FilterSource::Table(entity.table), &entity.filter_columns())?
            .filter(filter)?
            .select_page(&self.pool)
            .await?;
        Ok(page.map(|r| r.row))
    }

    async fn find_by_id(&self, entity: &'static MasterEntity, id: Uuid) -> Result<Option<Value>, DatabaseError> {
        let sql = select_by_id_sql(entity);
        let row = sqlx::query_as::<_, JsonRow>(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(|r| r.row))
    }

    async fn insert(
        &self,
        entity: &'static MasterEntity,
        payload: MasterPayload,
        actor: Uuid,
    ) -> Result<Value, DatabaseError> {
        let sql = insert_sql(entity, &payload);
        let mut q = sqlx::query_as::<_, JsonRow>(&sql).bind(Uuid::new_v4());
        for (_, value) in payload.values.iter() {
            q = bind_param_query_as(q, value);
        }
        let row = q.bind(actor).fetch_one(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to insert into {}: {}", entity.table, e);
            e
        })?;
        Ok(row.row)
    }

    async fn update(
        &self,
        entity: &'static MasterEntity,
        id: Uuid,
        payload: MasterPayload,
        actor: Uuid,
    ) -> Result<Option<Value>, DatabaseError> {
        let sql = update_sql(entity, &payload);
        let mut q = sqlx::query_as::<_, JsonRow>(&sql).bind(id);
        for (_, value) in payload.values.iter() {
            q = bind_param_query_as(q, value);
        }
        let row = q.bind(actor).fetch_optional(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to update {} {}: {}", entity.table, id, e);
            e
        })?;
        Ok(row.map(|r| r.row))
    }

    async fn soft_delete(&self, entity: &'static MasterEntity, id: Uuid, actor: Uuid) -> Result<bool, DatabaseError> {
        let sql = soft_delete_sql(entity);
        let result = sqlx::query(&sql).bind(id).bind(actor).execute(&self.pool).await?;
        Ok(result.rows_affected() == 1)
    }
}
