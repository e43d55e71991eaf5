use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::{ColumnSpec, ColumnType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: Uuid,
    pub nama: String,
    pub keterangan: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
}

impl Role {
    pub const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::new("id", ColumnType::Uuid),
        ColumnSpec::new("nama", ColumnType::Text),
        ColumnSpec::new("keterangan", ColumnType::Text),
        ColumnSpec::new("is_deleted", ColumnType::Bool),
        ColumnSpec::new("created_at", ColumnType::Timestamp),
        ColumnSpec::new("updated_at", ColumnType::Timestamp),
    ];

    pub const SEARCH_COLUMNS: &'static [&'static str] = &["nama", "keterangan"];
}

#[derive(Debug, Clone)]
pub struct NewRole {
    pub nama: String,
    pub keterangan: Option<String>,
}
