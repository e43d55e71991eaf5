use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "$eq")] Eq,
    #[serde(rename = "$ne")] Ne,
    #[serde(rename = "$gt")] Gt,
    #[serde(rename = "$gte")] Gte,
    #[serde(rename = "$lt")] Lt,
    #[serde(rename = "$lte")] Lte,

    #[serde(rename = "$like")] Like,
    #[serde(rename = "$ilike")] ILike,

    #[serde(rename = "$in")] In,
    #[serde(rename = "$between")] Between,

    #[serde(rename = "$null")] Null,
}

/// Postgres type of a filterable column, used for explicit placeholder casts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Text,
    SmallInt,
    Int,
    Decimal,
    Bool,
    Uuid,
    Date,
    Timestamp,
}

impl ColumnType {
    pub fn sql_cast(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::SmallInt => "smallint",
            ColumnType::Int => "integer",
            ColumnType::Decimal => "numeric",
            ColumnType::Bool => "boolean",
            ColumnType::Uuid => "uuid",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamptz",
        }
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, ColumnType::Text)
    }
}

/// A column the filter is allowed to reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnType,
}

impl ColumnSpec {
    pub const fn new(name: &'static str, kind: ColumnType) -> Self {
        Self { name, kind }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterData {
    pub where_clause: Option<Value>,
    pub order: Option<Value>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct FilterWhereInfo {
    pub column: String,
    pub operator: FilterOp,
    pub data: Value,
}

#[derive(Debug, Clone, Default)]
pub struct FilterWhereOptions {
    pub include_deleted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

/// A rendered statement and the values to bind, in placeholder order
#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}
