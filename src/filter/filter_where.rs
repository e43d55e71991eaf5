use serde_json::Value;

use super::error::FilterError;
use super::types::{ColumnSpec, ColumnType, FilterOp, FilterWhereInfo, FilterWhereOptions};

/// Renders a JSON where-document into a parameterized SQL predicate.
///
/// Every column must appear in the whitelist handed in by the repository and every
/// value becomes a numbered placeholder cast to the column's postgres type, so
/// request input never reaches the SQL text.
pub struct FilterWhere<'a> {
    columns: &'a [ColumnSpec],
    param_values: Vec<Value>,
    param_index: usize,
}

impl<'a> FilterWhere<'a> {
    pub fn new(columns: &'a [ColumnSpec], starting_param_index: usize) -> Self {
        Self {
            columns,
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    pub fn generate(
        where_data: Option<&Value>,
        columns: &'a [ColumnSpec],
        starting_param_index: usize,
        options: &FilterWhereOptions,
    ) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new(columns, starting_param_index);
        filter_where.build(where_data, options)
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    fn build(
        &mut self,
        where_data: Option<&Value>,
        options: &FilterWhereOptions,
    ) -> Result<(String, Vec<Value>), FilterError> {
        let mut sql_conditions = vec![];
        if !options.include_deleted && self.columns.iter().any(|c| c.name == "is_deleted") {
            sql_conditions.push("\"is_deleted\" = false".to_string());
        }
        if let Some(data) = where_data {
            sql_conditions.extend(self.parse_where_data(data)?);
        }
        let where_clause = if sql_conditions.is_empty() { "1=1".to_string() } else { sql_conditions.join(" AND ") };
        Ok((where_clause, std::mem::take(&mut self.param_values)))
    }

    fn parse_where_data(&mut self, where_data: &Value) -> Result<Vec<String>, FilterError> {
        match where_data {
            Value::Null => Ok(vec![]),
            Value::Object(obj) => {
                let mut out = Vec::new();
                for (key, value) in obj {
                    if key.starts_with('$') {
                        out.push(self.parse_logical_operator(key, value)?);
                    } else {
                        for condition in Self::parse_field_condition(key, value)? {
                            out.push(self.build_sql_condition(&condition)?);
                        }
                    }
                }
                Ok(out)
            }
            _ => Err(FilterError::InvalidWhereClause("Unsupported WHERE format".to_string())),
        }
    }

    fn parse_logical_operator(&mut self, op: &str, value: &Value) -> Result<String, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                let mut sql_parts = Vec::new();
                for v in arr {
                    let parts = self.parse_where_data(v)?;
                    if !parts.is_empty() {
                        sql_parts.push(format!("({})", parts.join(" AND ")));
                    }
                }
                if sql_parts.is_empty() {
                    return Ok("1=1".to_string());
                }
                let joiner = if op == "$and" { " AND " } else { " OR " };
                Ok(format!("({})", sql_parts.join(joiner)))
            }
            "$not" => {
                let parts = self.parse_where_data(value)?;
                if parts.is_empty() {
                    return Ok("1=1".to_string());
                }
                Ok(format!("NOT ({})", parts.join(" AND ")))
            }
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn parse_field_condition(field: &str, value: &Value) -> Result<Vec<FilterWhereInfo>, FilterError> {
        let mut out = Vec::new();
        match value {
            Value::Object(obj) if obj.keys().all(|k| k.starts_with('$')) && !obj.is_empty() => {
                for (op_key, op_val) in obj {
                    let operator = Self::map_operator(op_key)?;
                    out.push(FilterWhereInfo { column: field.to_string(), operator, data: op_val.clone() });
                }
            }
            // Implicit equality: { field: value }
            _ => out.push(FilterWhereInfo { column: field.to_string(), operator: FilterOp::Eq, data: value.clone() }),
        }
        Ok(out)
    }

    fn map_operator(op_key: &str) -> Result<FilterOp, FilterError> {
        Ok(match op_key {
            "$eq" => FilterOp::Eq,
            "$ne" | "$neq" => FilterOp::Ne,
            "$gt" => FilterOp::Gt,
            "$gte" => FilterOp::Gte,
            "$lt" => FilterOp::Lt,
            "$lte" => FilterOp::Lte,
            "$like" => FilterOp::Like,
            "$ilike" => FilterOp::ILike,
            "$in" => FilterOp::In,
            "$between" => FilterOp::Between,
            "$null" => FilterOp::Null,
            other => return Err(FilterError::UnsupportedOperator(other.to_string())),
        })
    }

    fn column(&self, name: &str) -> Result<ColumnSpec, FilterError> {
        self.columns
            .iter()
            .copied()
            .find(|c| c.name == name)
            .ok_or_else(|| FilterError::InvalidColumn(name.to_string()))
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        let spec = self.column(&condition.column)?;
        let quoted_column = format!("\"{}\"", spec.name);
        let kind = spec.kind;
        let data = &condition.data;

        match condition.operator {
            FilterOp::Eq => {
                if data.is_null() { Ok(format!("{} IS NULL", quoted_column)) }
                else { Ok(format!("{} = {}", quoted_column, self.param(data.clone(), kind)?)) }
            }
            FilterOp::Ne => {
                if data.is_null() { Ok(format!("{} IS NOT NULL", quoted_column)) }
                else { Ok(format!("{} <> {}", quoted_column, self.param(data.clone(), kind)?)) }
            }
            FilterOp::Gt => Ok(format!("{} > {}", quoted_column, self.param(data.clone(), kind)?)),
            FilterOp::Gte => Ok(format!("{} >= {}", quoted_column, self.param(data.clone(), kind)?)),
            FilterOp::Lt => Ok(format!("{} < {}", quoted_column, self.param(data.clone(), kind)?)),
            FilterOp::Lte => Ok(format!("{} <= {}", quoted_column, self.param(data.clone(), kind)?)),
            FilterOp::Like | FilterOp::ILike => {
                let keyword = if condition.operator == FilterOp::Like { "LIKE" } else { "ILIKE" };
                let lhs = if kind.is_textual() { quoted_column } else { format!("{}::text", quoted_column) };
                Ok(format!("{} {} {}", lhs, keyword, self.param(data.clone(), ColumnType::Text)?))
            }
            FilterOp::In => {
                if let Value::Array(values) = data {
                    if values.is_empty() { return Ok("1=0".to_string()); }
                    let params = values
                        .iter()
                        .map(|v| self.param(v.clone(), kind))
                        .collect::<Result<Vec<String>, FilterError>>()?;
                    Ok(format!("{} IN ({})", quoted_column, params.join(", ")))
                } else {
                    Ok(format!("{} = {}", quoted_column, self.param(data.clone(), kind)?))
                }
            }
            FilterOp::Between => {
                match data {
                    Value::Array(values) if values.len() == 2 => Ok(format!(
                        "{} BETWEEN {} AND {}",
                        quoted_column,
                        self.param(values[0].clone(), kind)?,
                        self.param(values[1].clone(), kind)?
                    )),
                    _ => Err(FilterError::InvalidOperatorData("$between requires exactly 2 values".to_string())),
                }
            }
            FilterOp::Null => {
                let is_null = data.as_bool().ok_or_else(|| {
                    FilterError::InvalidOperatorData("$null requires a boolean".to_string())
                })?;
                Ok(format!("{} IS {}NULL", quoted_column, if is_null { "" } else { "NOT " }))
            }
        }
    }

    /// Bind one scalar; arrays and objects cannot be cast to a column type
    fn param(&mut self, value: Value, kind: ColumnType) -> Result<String, FilterError> {
        if value.is_array() || value.is_object() {
            return Err(FilterError::InvalidOperatorData(format!("expected a single value, got {}", value)));
        }
        self.param_values.push(value);
        self.param_index += 1;
        Ok(format!("${}::{}", self.param_index, kind.sql_cast()))
    }
}
