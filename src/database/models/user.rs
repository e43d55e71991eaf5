use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::{ColumnSpec, ColumnType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub id_pegawai: Option<Uuid>,
    pub id_role: Uuid,
    pub id_bidang: Option<Uuid>,
    pub id_cabang: Option<Uuid>,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub nama: String,
    pub email: Option<String>,
    pub active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<Uuid>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<Uuid>,
}

impl User {
    /// Columns list endpoints may filter and sort on; `password` is never among them
    pub const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::new("id", ColumnType::Uuid),
        ColumnSpec::new("id_pegawai", ColumnType::Uuid),
        ColumnSpec::new("id_role", ColumnType::Uuid),
        ColumnSpec::new("id_bidang", ColumnType::Uuid),
        ColumnSpec::new("id_cabang", ColumnType::Uuid),
        ColumnSpec::new("username", ColumnType::Text),
        ColumnSpec::new("nama", ColumnType::Text),
        ColumnSpec::new("email", ColumnType::Text),
        ColumnSpec::new("active", ColumnType::Bool),
        ColumnSpec::new("is_deleted", ColumnType::Bool),
        ColumnSpec::new("created_at", ColumnType::Timestamp),
        ColumnSpec::new("updated_at", ColumnType::Timestamp),
    ];

    pub const SEARCH_COLUMNS: &'static [&'static str] = &["username", "nama", "email"];
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id_pegawai: Option<Uuid>,
    pub id_role: Uuid,
    pub id_bidang: Option<Uuid>,
    pub id_cabang: Option<Uuid>,
    pub username: String,
    pub password_hash: String,
    pub nama: String,
    pub email: Option<String>,
    pub active: bool,
}

/// Full replacement of the editable user fields
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub id_pegawai: Option<Uuid>,
    pub id_role: Uuid,
    pub id_bidang: Option<Uuid>,
    pub id_cabang: Option<Uuid>,
    pub username: String,
    pub nama: String,
    pub email: Option<String>,
    pub active: bool,
}
