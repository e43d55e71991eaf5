use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{ColumnSpec, ColumnType, FilterData, FilterOrderInfo, FilterWhereOptions, SqlResult};

/// What a list query selects from
#[derive(Debug, Clone)]
pub enum FilterSource {
    /// A plain table or view
    Table(&'static str),
    /// A fixed sub-select, aliased as `t`
    Subquery(&'static str),
    /// A set-returning stored function; arguments are bound ahead of the filter parameters
    Function {
        name: &'static str,
        args: Vec<(Value, ColumnType)>,
    },
}

pub struct Filter {
    source: FilterSource,
    columns: Vec<ColumnSpec>,
    where_data: Option<Value>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<i64>,
    offset: Option<i64>,
    options: FilterWhereOptions,
    select_json: bool,
}

impl Filter {
    pub fn new(source: FilterSource, columns: Vec<ColumnSpec>) -> Result<Self, FilterError> {
        match &source {
            FilterSource::Table(name) | FilterSource::Function { name, .. } => Self::validate_identifier(name)?,
            FilterSource::Subquery(_) => {}
        }
        Ok(Self {
            source,
            columns,
            where_data: None,
            order_data: vec![],
            limit: None,
            offset: None,
            options: FilterWhereOptions::default(),
            select_json: false,
        })
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = data.where_clause { self.where_clause(where_clause)?; }
        if let Some(order) = data.order { self.order(order)?; }
        if let Some(limit) = data.limit { self.limit(limit, data.offset)?; }
        Ok(self)
    }

    /// Select each row as a single jsonb column named `row`
    pub fn select_json(&mut self) -> &mut Self {
        self.select_json = true;
        self
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        FilterWhere::validate(&conditions)?;
        self.where_data = Some(conditions);
        Ok(self)
    }

    pub fn order(&mut self, order_spec: Value) -> Result<&mut Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse(&order_spec, &self.columns)?;
        Ok(self)
    }

    pub fn limit(&mut self, limit: i64, offset: Option<i64>) -> Result<&mut Self, FilterError> {
        if limit < 0 { return Err(FilterError::InvalidLimit("Limit must be non-negative".to_string())); }
        if let Some(off) = offset { if off < 0 { return Err(FilterError::InvalidOffset("Offset must be non-negative".to_string())); } }

        let max_limit = crate::config::CONFIG.pagination.max_limit;
        let applied_limit = if limit > max_limit {
            tracing::debug!("Limit {} exceeds max {}, capping to max", limit, max_limit);
            max_limit
        } else {
            limit
        };

        self.limit = Some(applied_limit);
        self.offset = offset;
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (from_clause, mut params) = self.build_from_clause();
        let (where_clause, where_params) = self.build_where(params.len())?;
        params.extend(where_params);
        let order_clause = FilterOrder::generate(&self.order_data);
        let limit_clause = self.build_limit_clause();

        let query = [
            if self.select_json { "SELECT to_jsonb(t) AS row".to_string() } else { "SELECT *".to_string() },
            format!("FROM {}", from_clause),
            format!("WHERE {}", where_clause),
            order_clause,
            limit_clause,
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let (from_clause, mut params) = self.build_from_clause();
        let (where_clause, where_params) = self.build_where(params.len())?;
        params.extend(where_params);
        let query = format!("SELECT COUNT(*) AS count FROM {} WHERE {}", from_clause, where_clause);
        Ok(SqlResult { query, params })
    }

    fn build_where(&self, starting_param_index: usize) -> Result<(String, Vec<Value>), FilterError> {
        FilterWhere::generate(self.where_data.as_ref(), &self.columns, starting_param_index, &self.options)
    }

    fn build_from_clause(&self) -> (String, Vec<Value>) {
        match &self.source {
            FilterSource::Table(name) => (format!("\"{}\" AS t", name), vec![]),
            FilterSource::Subquery(sql) => (format!("({}) AS t", sql), vec![]),
            FilterSource::Function { name, args } => {
                let placeholders: Vec<String> = args
                    .iter()
                    .enumerate()
                    .map(|(i, (_, kind))| format!("${}::{}", i + 1, kind.sql_cast()))
                    .collect();
                let params = args.iter().map(|(v, _)| v.clone()).collect();
                (format!("{}({}) AS t", name, placeholders.join(", ")), params)
            }
        }
    }

    fn validate_identifier(name: &str) -> Result<(), FilterError> {
        let mut chars = name.chars();
        let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FilterError::InvalidSourceName(name.to_string()));
        }
        Ok(())
    }

    fn build_limit_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::new("nomor_sppd", ColumnType::Text),
            ColumnSpec::new("status", ColumnType::SmallInt),
            ColumnSpec::new("created_at", ColumnType::Timestamp),
        ]
    }

    #[test]
    fn function_arguments_are_bound_first() {
        let source = FilterSource::Function {
            name: "fn_list_sppd",
            args: vec![(Value::Null, ColumnType::Uuid), (json!(2024), ColumnType::Int)],
        };
        let mut filter = Filter::new(source, columns()).unwrap();
        filter
            .assign(FilterData {
                where_clause: Some(json!({ "status": 1 })),
                order: Some(json!("created_at desc")),
                limit: Some(10),
                offset: Some(20),
            })
            .unwrap();

        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT * FROM fn_list_sppd($1::uuid, $2::integer) AS t WHERE \"status\" = $3::smallint ORDER BY \"created_at\" DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(sql.params, vec![Value::Null, json!(2024), json!(1)]);

        let count = filter.to_count_sql().unwrap();
        assert_eq!(
            count.query,
            "SELECT COUNT(*) AS count FROM fn_list_sppd($1::uuid, $2::integer) AS t WHERE \"status\" = $3::smallint"
        );
    }

    #[test]
    fn json_selection_over_table() {
        let mut filter = Filter::new(FilterSource::Table("m_bank"), columns()).unwrap();
        filter.select_json();
        let sql = filter.to_sql().unwrap();
        assert_eq!(sql.query, "SELECT to_jsonb(t) AS row FROM \"m_bank\" AS t WHERE 1=1");
    }

    #[test]
    fn rejects_bad_source_names() {
        assert!(Filter::new(FilterSource::Table("users; drop table users"), columns()).is_err());
        assert!(Filter::new(FilterSource::Table("1users"), columns()).is_err());
        assert!(Filter::new(FilterSource::Table("m_pegawai"), columns()).is_ok());
    }

    #[test]
    fn rejects_negative_paging() {
        let mut filter = Filter::new(FilterSource::Table("roles"), columns()).unwrap();
        assert!(filter.limit(-1, None).is_err());
        assert!(filter.limit(5, Some(-1)).is_err());
    }
}
