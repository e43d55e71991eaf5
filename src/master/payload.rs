use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::registry::{MasterColumn, MasterEntity};
use crate::filter::ColumnType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadMode {
    /// Every required column must be present and non-null
    Create,
    /// Only the supplied columns change; at least one must be supplied
    Update,
}

/// Field-level problems with a master payload, keyed by column name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Data tidak valid")]
pub struct PayloadError {
    pub field_errors: HashMap<String, String>,
}

/// A checked payload: known columns only, values of the declared type, in registry order
#[derive(Debug, Clone, PartialEq)]
pub struct MasterPayload {
    pub values: Vec<(&'static MasterColumn, Value)>,
}

impl MasterPayload {
    pub fn parse(entity: &MasterEntity, body: &Value, mode: PayloadMode) -> Result<Self, PayloadError> {
        let mut field_errors = HashMap::new();

        let object = match body {
            Value::Object(object) => object,
            _ => {
                field_errors.insert("body".to_string(), "Harus berupa objek JSON".to_string());
                return Err(PayloadError { field_errors });
            }
        };

        for key in object.keys() {
            if entity.column(key).is_none() {
                field_errors.insert(key.clone(), "Kolom tidak dikenal".to_string());
            }
        }

        let mut values = Vec::new();
        for column in entity.columns {
            match object.get(column.name) {
                None if mode == PayloadMode::Create && column.required => {
                    field_errors.insert(column.name.to_string(), "Wajib diisi".to_string());
                }
                None => {}
                Some(Value::Null) if column.required => {
                    field_errors.insert(column.name.to_string(), "Wajib diisi".to_string());
                }
                Some(value) => match check_type(column.kind, value) {
                    Ok(()) => values.push((column, normalize(column.kind, value))),
                    Err(message) => {
                        field_errors.insert(column.name.to_string(), message);
                    }
                },
            }
        }

        if field_errors.is_empty() && values.is_empty() {
            field_errors.insert("body".to_string(), "Tidak ada kolom yang diubah".to_string());
        }
        if !field_errors.is_empty() {
            return Err(PayloadError { field_errors });
        }
        Ok(Self { values })
    }

    pub fn to_map(&self) -> Map<String, Value> {
        self.values.iter().map(|(c, v)| (c.name.to_string(), v.clone())).collect()
    }
}

fn check_type(kind: ColumnType, value: &Value) -> Result<(), String> {
    if value.is_null() {
        return Ok(());
    }
    let ok = match kind {
        ColumnType::Text => value.is_string(),
        ColumnType::SmallInt => value.as_i64().map_or(false, |n| i16::try_from(n).is_ok()),
        ColumnType::Int => value.as_i64().map_or(false, |n| i32::try_from(n).is_ok()),
        ColumnType::Decimal => match value {
            Value::Number(_) => true,
            Value::String(s) => Decimal::from_str(s.trim()).is_ok(),
            _ => false,
        },
        ColumnType::Bool => value.is_boolean(),
        ColumnType::Uuid => value.as_str().map_or(false, |s| Uuid::parse_str(s).is_ok()),
        ColumnType::Date => value.as_str().map_or(false, |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
        ColumnType::Timestamp => value.as_str().map_or(false, |s| DateTime::parse_from_rfc3339(s).is_ok()),
    };
    if ok {
        Ok(())
    } else {
        Err(format!("Harus bertipe {}", type_name(kind)))
    }
}

/// Decimal strings are trimmed so the `::numeric` cast never sees padding
fn normalize(kind: ColumnType, value: &Value) -> Value {
    match (kind, value) {
        (ColumnType::Decimal, Value::String(s)) => Value::String(s.trim().to_string()),
        _ => value.clone(),
    }
}

fn type_name(kind: ColumnType) -> &'static str {
    match kind {
        ColumnType::Text => "teks",
        ColumnType::SmallInt | ColumnType::Int => "bilangan bulat",
        ColumnType::Decimal => "angka",
        ColumnType::Bool => "boolean",
        ColumnType::Uuid => "UUID",
        ColumnType::Date => "tanggal (YYYY-MM-DD)",
        ColumnType::Timestamp => "timestamp RFC 3339",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::master::registry::find_entity;
    use serde_json::json;

    #[test]
    fn accepts_valid_create() {
        let entity = find_entity("tarif-uang-harian").unwrap();
        let body = json!({
            "id_provinsi": "6f1c1b8e-9d4c-4d8c-9a55-3f1f0e6c2a10",
            "nominal": " 530000.00 ",
            "tahun": 2024
        });
        let payload = MasterPayload::parse(entity, &body, PayloadMode::Create).unwrap();
        let names: Vec<_> = payload.values.iter().map(|(c, _)| c.name).collect();
        assert_eq!(names, vec!["id_provinsi", "nominal", "tahun"]);
        assert_eq!(payload.to_map()["nominal"], json!("530000.00"));
    }

    #[test]
    fn reports_every_problem() {
        let entity = find_entity("pegawai").unwrap();
        let body = json!({
            "nama": 12,
            "tanggal_lahir": "12/01/1990",
            "password": "x"
        });
        let err = MasterPayload::parse(entity, &body, PayloadMode::Create).unwrap_err();
        assert_eq!(err.field_errors["password"], "Kolom tidak dikenal");
        assert_eq!(err.field_errors["nip"], "Wajib diisi");
        assert_eq!(err.field_errors["id_bidang"], "Wajib diisi");
        assert!(err.field_errors["nama"].starts_with("Harus bertipe"));
        assert!(err.field_errors["tanggal_lahir"].starts_with("Harus bertipe"));
    }

    #[test]
    fn system_columns_are_not_writable() {
        let entity = find_entity("bank").unwrap();
        let body = json!({ "id": "6f1c1b8e-9d4c-4d8c-9a55-3f1f0e6c2a10", "nama": "Bank Jateng" });
        let err = MasterPayload::parse(entity, &body, PayloadMode::Update).unwrap_err();
        assert!(err.field_errors.contains_key("id"));
    }

    #[test]
    fn update_is_partial_but_not_empty() {
        let entity = find_entity("bank").unwrap();
        let payload = MasterPayload::parse(entity, &json!({ "nama": "Bank Jateng" }), PayloadMode::Update).unwrap();
        assert_eq!(payload.values.len(), 1);

        let err = MasterPayload::parse(entity, &json!({}), PayloadMode::Update).unwrap_err();
        assert!(err.field_errors.contains_key("body"));

        let err = MasterPayload::parse(entity, &json!({ "nama": null }), PayloadMode::Update).unwrap_err();
        assert_eq!(err.field_errors["nama"], "Wajib diisi");
    }

    #[test]
    fn integer_ranges_are_checked() {
        let entity = find_entity("kendaraan").unwrap();
        let body = json!({ "tahun": 1.5 });
        let err = MasterPayload::parse(entity, &body, PayloadMode::Update).unwrap_err();
        assert!(err.field_errors.contains_key("tahun"));
    }
}
