use std::time::Instant;

use serde_json::Value;
use sqlx::{self, postgres::PgArguments, FromRow, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::filter::{ColumnSpec, Filter, FilterData, FilterSource};
use crate::types::Page;

/// A row selected as one jsonb document (see [`QueryBuilder::json`])
#[derive(Debug, Clone, FromRow)]
pub struct JsonRow {
    pub row: Value,
}

/// Runs filtered list queries against a table, sub-select or set-returning function
pub struct QueryBuilder<T> {
    filter: Filter,
    paging: FilterData,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub fn new(source: FilterSource, columns: &[ColumnSpec]) -> Result<Self, DatabaseError> {
        Ok(Self {
            filter: Filter::new(source, columns.to_vec())?,
            paging: FilterData::default(),
            _phantom: std::marker::PhantomData,
        })
    }

    pub fn filter(mut self, filter_data: FilterData) -> Result<Self, DatabaseError> {
        self.paging.limit = filter_data.limit;
        self.paging.offset = filter_data.offset;
        self.filter.assign(filter_data)?;
        Ok(self)
    }

    pub async fn select_all(&self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.filter.to_sql()?;
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }

        let started = Instant::now();
        let rows = q.fetch_all(pool).await.map_err(|e| {
            tracing::error!("List query failed: {} ({})", e, sql_result.query);
            e
        })?;
        log_if_slow(&sql_result.query, started);
        Ok(rows)
    }

    pub async fn count(&self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql_result = self.filter.to_count_sql()?;
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }

        let row = q.fetch_one(pool).await.map_err(|e| {
            tracing::error!("Count query failed: {} ({})", e, sql_result.query);
            e
        })?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    /// Items and total count of the current page, fetched concurrently
    pub async fn select_page(&self, pool: &PgPool) -> Result<Page<T>, DatabaseError> {
        let (items, total) = futures::try_join!(self.select_all(pool), self.count(pool))?;
        Ok(Page::new(items, total, &self.paging))
    }
}

impl QueryBuilder<JsonRow> {
    /// Selects `to_jsonb(t)` so callers get whole rows without a typed model
    pub fn json(source: FilterSource, columns: &[ColumnSpec]) -> Result<Self, DatabaseError> {
        let mut builder = Self::new(source, columns)?;
        builder.filter.select_json();
        Ok(builder)
    }
}

fn log_if_slow(query: &str, started: Instant) {
    let elapsed = started.elapsed().as_millis() as u64;
    let threshold = crate::config::config().database.slow_query_threshold_ms;
    if elapsed > threshold {
        tracing::warn!(elapsed_ms = elapsed, "Slow query: {}", query);
    }
}

pub(crate) fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        // Placeholders carry explicit casts, so composite values travel as jsonb
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}

pub(crate) fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}
