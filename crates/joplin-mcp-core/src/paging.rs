//! Pagination request validation and result shaping.

use crate::error::ValidationError;
use crate::models::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Largest page size the backend accepts.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Largest page number that still has a representable successor.
pub const MAX_PAGE: u32 = u32::MAX - 1;

/// A validated `page`/`limit` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate a page request.
    ///
    /// # Errors
    ///
    /// `page` must lie in `1..=MAX_PAGE` and `limit` in `1..=MAX_PAGE_LIMIT`.
    pub fn new(page: u32, limit: u32) -> Result<Self, ValidationError> {
        if !(1..=MAX_PAGE).contains(&page) {
            return Err(ValidationError::InvalidPage {
                got: page,
                max: MAX_PAGE,
            });
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(ValidationError::InvalidLimit {
                got: limit,
                max: MAX_PAGE_LIMIT,
            });
        }
        Ok(Self { page, limit })
    }

    /// 1-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Items per page.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }
}

/// One page of raw backend records.
///
/// `next_page` is present if and only if `has_more` is true, and then equals
/// `page + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PagedResult {
    /// Records in backend order
    pub items: Vec<JsonObject>,
    /// Page that was requested
    pub page: u32,
    /// Page size that was requested
    pub limit: u32,
    /// Whether the backend has more records after this page
    pub has_more: bool,
    /// Page to request next, if any
    pub next_page: Option<u32>,
}

impl PagedResult {
    /// Shape a `{items, has_more}` backend response.
    ///
    /// Missing `items` reads as an empty page; anything other than `true` for
    /// `has_more` reads as `false`. Non-object entries are dropped.
    #[must_use]
    pub fn from_response(mut raw: JsonObject, request: PageRequest) -> Self {
        let items = match raw.remove("items") {
            Some(serde_json::Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    serde_json::Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        let has_more = raw
            .get("has_more")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);

        Self::new(items, request, has_more)
    }

    /// Build a page, deriving `next_page` from `has_more`.
    #[must_use]
    pub fn new(items: Vec<JsonObject>, request: PageRequest, has_more: bool) -> Self {
        Self {
            items,
            page: request.page,
            limit: request.limit,
            has_more,
            next_page: has_more.then_some(request.page + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn object(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn page_request_bounds() {
        assert!(PageRequest::new(1, 1).is_ok());
        assert!(PageRequest::new(7, 100).is_ok());
        assert_eq!(
            PageRequest::new(0, 20),
            Err(ValidationError::InvalidPage { got: 0, max: MAX_PAGE })
        );
        assert!(PageRequest::new(MAX_PAGE, 20).is_ok());
        assert_eq!(
            PageRequest::new(u32::MAX, 20),
            Err(ValidationError::InvalidPage {
                got: u32::MAX,
                max: MAX_PAGE
            })
        );
        assert_eq!(
            PageRequest::new(1, 0),
            Err(ValidationError::InvalidLimit { got: 0, max: 100 })
        );
        assert_eq!(
            PageRequest::new(1, 101),
            Err(ValidationError::InvalidLimit { got: 101, max: 100 })
        );
    }

    #[test]
    fn has_more_yields_next_page() {
        let raw = object(json!({
            "items": [{"id": "a"}, {"id": "b"}],
            "has_more": true,
        }));
        let result = PagedResult::from_response(raw, PageRequest::new(2, 2).unwrap());

        assert_eq!(result.items.len(), 2);
        assert_eq!(result.page, 2);
        assert_eq!(result.limit, 2);
        assert!(result.has_more);
        assert_eq!(result.next_page, Some(3));
    }

    #[test]
    fn last_page_has_no_next_page() {
        let raw = object(json!({"items": [{"id": "a"}], "has_more": false}));
        let result = PagedResult::from_response(raw, PageRequest::new(1, 20).unwrap());
        assert!(!result.has_more);
        assert_eq!(result.next_page, None);
    }

    #[test]
    fn missing_items_and_flag_read_as_empty_last_page() {
        let result = PagedResult::from_response(JsonObject::new(), PageRequest::new(1, 20).unwrap());
        assert!(result.items.is_empty());
        assert!(!result.has_more);
        assert_eq!(result.next_page, None);
    }

    #[test]
    fn non_object_items_are_dropped() {
        let raw = object(json!({"items": [{"id": "a"}, 3, "x", null], "has_more": false}));
        let result = PagedResult::from_response(raw, PageRequest::new(1, 20).unwrap());
        assert_eq!(result.items.len(), 1);
    }

    #[test]
    fn last_representable_page_still_has_successor() {
        let request = PageRequest::new(MAX_PAGE, 10).unwrap();
        let result = PagedResult::new(Vec::new(), request, true);
        assert_eq!(result.next_page, Some(u32::MAX));
    }

    proptest! {
        #[test]
        fn next_page_present_iff_has_more(page in 1u32..=MAX_PAGE, limit in 1u32..=100, has_more in any::<bool>()) {
            let request = PageRequest::new(page, limit).unwrap();
            let result = PagedResult::new(Vec::new(), request, has_more);

            prop_assert_eq!(result.next_page.is_some(), result.has_more);
            if let Some(next) = result.next_page {
                prop_assert_eq!(next, page + 1);
            }
        }
    }
}
