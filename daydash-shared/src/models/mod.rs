/// Database models for daydash
///
/// This module contains all database models and their CRUD operations.
/// Every resource row is owned by exactly one user via `user_id`; deletes
/// are hard deletes.
///
/// # Models
///
/// - `user`: User accounts, roles, and authentication lookups
/// - `task`: To-do items with optional due dates
/// - `habit`: Habits with a completion timestamp coupled to `is_completed`
/// - `note`: Free-form notes
/// - `daily_goal`: Date-bound goals

pub mod daily_goal;
pub mod habit;
pub mod note;
pub mod task;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Bounds applied to every list query
pub const MAX_PAGE_SIZE: i64 = 100;
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Offset/limit pagination window
///
/// The limit is clamped to 1..=100 and the offset to >= 0, so callers can
/// pass client-supplied values straight through.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    limit: i64,
    offset: i64,
}

impl Page {
    /// Builds a page, clamping out-of-range values instead of rejecting them
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            offset: offset.unwrap_or(0).max(0),
        }
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Deserializes a doubly-optional field, distinguishing an absent key
/// (`None`) from an explicit `null` (`Some(None)`)
///
/// Used on partial-update structs for nullable columns: absent means "leave
/// untouched", `null` means "clear".
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_defaults() {
        let page = Page::default();
        assert_eq!(page.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_clamps_limit() {
        assert_eq!(Page::new(Some(0), None).limit(), 1);
        assert_eq!(Page::new(Some(-5), None).limit(), 1);
        assert_eq!(Page::new(Some(5000), None).limit(), MAX_PAGE_SIZE);
        assert_eq!(Page::new(Some(50), None).limit(), 50);
    }

    #[test]
    fn test_page_clamps_offset() {
        assert_eq!(Page::new(None, Some(-1)).offset(), 0);
        assert_eq!(Page::new(None, Some(40)).offset(), 40);
    }

    #[test]
    fn test_double_option_distinguishes_absent_from_null() {
        #[derive(serde::Deserialize)]
        struct Probe {
            #[serde(default, deserialize_with = "double_option")]
            field: Option<Option<String>>,
        }

        let absent: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.field, None);

        let null: Probe = serde_json::from_str(r#"{"field": null}"#).unwrap();
        assert_eq!(null.field, Some(None));

        let value: Probe = serde_json::from_str(r#"{"field": "x"}"#).unwrap();
        assert_eq!(value.field, Some(Some("x".to_string())));
    }
}
