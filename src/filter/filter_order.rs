use serde_json::Value;

use super::error::FilterError;
use super::types::{ColumnSpec, FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    pub fn validate_and_parse(order: &Value, columns: &[ColumnSpec]) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let parsed = match order {
            Value::String(s) => Self::parse_order_string(s),
            Value::Array(arr) => {
                // Expect array of strings like ["created_at desc", "nama asc"]
                let mut out = Vec::new();
                for v in arr {
                    if let Value::String(s) = v { out.extend(Self::parse_order_string(s)); }
                }
                out
            }
            Value::Object(obj) => {
                // { "created_at": "desc", "nama": "asc" }
                obj.iter()
                    .map(|(k, v)| FilterOrderInfo {
                        column: k.clone(),
                        sort: Self::direction(v.as_str().unwrap_or("asc")),
                    })
                    .collect()
            }
            _ => vec![],
        };

        for info in &parsed {
            if !columns.iter().any(|c| c.name == info.column) {
                return Err(FilterError::InvalidColumn(info.column.clone()));
            }
        }
        Ok(parsed)
    }

    fn direction(raw: &str) -> SortDirection {
        if raw.eq_ignore_ascii_case("desc") { SortDirection::Desc } else { SortDirection::Asc }
    }

    fn parse_order_string(s: &str) -> Vec<FilterOrderInfo> {
        // split on commas, then each token into column and direction
        let mut out = Vec::new();
        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() { continue; }
            let mut it = trimmed.split_whitespace();
            if let Some(col) = it.next() {
                let sort = Self::direction(it.next().unwrap_or("asc"));
                out.push(FilterOrderInfo { column: col.to_string(), sort });
            }
        }
        out
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() { return String::new(); }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::ColumnType;
    use serde_json::json;

    const COLUMNS: &[ColumnSpec] = &[
        ColumnSpec::new("nama", ColumnType::Text),
        ColumnSpec::new("created_at", ColumnType::Timestamp),
    ];

    #[test]
    fn parses_comma_separated_string() {
        let infos = FilterOrder::validate_and_parse(&json!("created_at desc, nama"), COLUMNS).unwrap();
        assert_eq!(FilterOrder::generate(&infos), "ORDER BY \"created_at\" DESC, \"nama\" ASC");
    }

    #[test]
    fn rejects_columns_outside_whitelist() {
        let err = FilterOrder::validate_and_parse(&json!("password desc"), COLUMNS).unwrap_err();
        assert!(matches!(err, FilterError::InvalidColumn(c) if c == "password"));
    }
}
