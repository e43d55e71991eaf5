use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::{ColumnSpec, ColumnType};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LogSystem {
    pub id: Uuid,
    pub id_user: Option<Uuid>,
    pub username: Option<String>,
    pub modul: String,
    pub aksi: String,
    pub keterangan: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LogSystem {
    pub const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::new("id_user", ColumnType::Uuid),
        ColumnSpec::new("username", ColumnType::Text),
        ColumnSpec::new("modul", ColumnType::Text),
        ColumnSpec::new("aksi", ColumnType::Text),
        ColumnSpec::new("keterangan", ColumnType::Text),
        ColumnSpec::new("ip", ColumnType::Text),
        ColumnSpec::new("created_at", ColumnType::Timestamp),
    ];

    pub const SEARCH_COLUMNS: &'static [&'static str] = &["username", "modul", "aksi", "keterangan"];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogSystem {
    pub id_user: Option<Uuid>,
    pub username: Option<String>,
    pub modul: String,
    pub aksi: String,
    pub keterangan: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoginActivity {
    pub id: Uuid,
    pub id_user: Option<Uuid>,
    pub username: String,
    pub status: String,
    pub message_code: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl LoginActivity {
    pub const COLUMNS: &'static [ColumnSpec] = &[
        ColumnSpec::new("id_user", ColumnType::Uuid),
        ColumnSpec::new("username", ColumnType::Text),
        ColumnSpec::new("status", ColumnType::Text),
        ColumnSpec::new("message_code", ColumnType::Text),
        ColumnSpec::new("ip", ColumnType::Text),
        ColumnSpec::new("created_at", ColumnType::Timestamp),
    ];

    pub const SEARCH_COLUMNS: &'static [&'static str] = &["username", "message_code", "ip"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStatus {
    Success,
    Failed,
}

impl LoginStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginStatus::Success => "success",
            LoginStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoginActivity {
    pub id_user: Option<Uuid>,
    pub username: String,
    pub status: LoginStatus,
    pub message_code: &'static str,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}
