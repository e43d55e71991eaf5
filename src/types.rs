/// Shared types used across the codebase

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use uuid::Uuid;

use crate::filter::FilterData;
use crate::services::{ServiceError, ServiceResult};

/// Who performs a request, as recorded in audit rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id_user: Uuid,
    pub username: String,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Common query-string parameters of every list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    /// 1-based page number
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// `column [asc|desc]`, comma separated
    pub sort: Option<String>,
}

impl ListParams {
    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    pub fn limit(&self) -> i64 {
        crate::config::config().page_limit(self.limit)
    }

    /// Build a filter document: `conditions` AND (any search column ILIKE %search%).
    pub fn to_filter_data(
        &self,
        search_columns: &[&str],
        conditions: Map<String, Value>,
        default_sort: &str,
    ) -> ServiceResult<FilterData> {
        let mut where_doc = conditions;

        if let Some(term) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", escape_like(term));
            let any: Vec<Value> = search_columns
                .iter()
                .map(|c| {
                    let mut condition = Map::new();
                    condition.insert(c.to_string(), json!({ "$ilike": pattern }));
                    Value::Object(condition)
                })
                .collect();
            if !any.is_empty() {
                where_doc.insert("$or".to_string(), Value::Array(any));
            }
        }

        let sort = self
            .sort
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(default_sort);

        let limit = self.limit();
        let offset = (self.page() - 1)
            .checked_mul(limit)
            .ok_or_else(|| ServiceError::invalid_field("page", "Nomor halaman terlalu besar"))?;
        Ok(FilterData {
            where_clause: Some(Value::Object(where_doc)),
            order: Some(Value::String(sort.to_string())),
            limit: Some(limit),
            offset: Some(offset),
        })
    }
}

/// Escape LIKE wildcards so a search term matches literally
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// One page of a list result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, filter: &FilterData) -> Self {
        let limit = filter.limit.unwrap_or(total.max(1));
        let offset = filter.offset.unwrap_or(0);
        let page = if limit > 0 { offset / limit + 1 } else { 1 };
        Self { items, total, page, limit }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_builds_or_group_over_columns() {
        let params = ListParams {
            search: Some(" budi ".to_string()),
            page: Some(3),
            limit: Some(20),
            sort: None,
        };
        let data = params.to_filter_data(&["nama", "nip"], Map::new(), "nama asc").unwrap();
        assert_eq!(
            data.where_clause.unwrap(),
            json!({ "$or": [ { "nama": { "$ilike": "%budi%" } }, { "nip": { "$ilike": "%budi%" } } ] })
        );
        assert_eq!(data.order, Some(json!("nama asc")));
        assert_eq!(data.limit, Some(20));
        assert_eq!(data.offset, Some(40));
    }

    #[test]
    fn blank_search_adds_nothing() {
        let params = ListParams { search: Some("   ".into()), ..Default::default() };
        let mut conditions = Map::new();
        conditions.insert("active".into(), json!(true));
        let data = params.to_filter_data(&["nama"], conditions, "nama").unwrap();
        assert_eq!(data.where_clause.unwrap(), json!({ "active": true }));
        assert_eq!(data.offset, Some(0));
    }

    #[test]
    fn huge_page_number_is_a_validation_error() {
        let params = ListParams { page: Some(i64::MAX), limit: Some(10), ..Default::default() };
        let err = params.to_filter_data(&["nama"], Map::new(), "nama").unwrap_err();
        match err {
            ServiceError::Validation { field_errors, .. } => assert!(field_errors.contains_key("page")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_a"), "50\\%\\_a");
    }

    #[test]
    fn page_number_derives_from_offset() {
        let data = FilterData { limit: Some(10), offset: Some(30), ..Default::default() };
        let page: Page<i32> = Page::new(vec![1, 2], 32, &data);
        assert_eq!(page.page, 4);
        assert_eq!(page.limit, 10);
    }
}
