use serde::{Deserialize, Serialize};

use crate::engine::Params;
use crate::ValidationError;

/// Cursor pagination options accepted by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: Option<i64>,
    pub after: Option<String>,
}

impl PageRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Query parameters for this page. An empty cursor is omitted.
    pub fn to_params(&self) -> Result<Params, ValidationError> {
        let mut params = Params::new();
        if let Some(limit) = self.limit {
            if limit <= 0 {
                return Err(ValidationError::NonPositiveLimit { value: limit });
            }
            params.insert("limit", limit);
        }
        if let Some(after) = self.after.as_deref().filter(|after| !after.is_empty()) {
            params.insert("after", after);
        }
        Ok(params)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursors {
    pub after: Option<String>,
    pub before: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub cursors: Option<Cursors>,
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl<T> Page<T> {
    /// Cursor for the next page, if the server returned one.
    pub fn after(&self) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|paging| paging.cursors.as_ref())
            .and_then(|cursors| cursors.after.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_params_include_limit_and_cursor() {
        let params = PageRequest::new().limit(10).after("cursor").to_params().expect("valid");

        assert_eq!(params.get("limit"), Some("10"));
        assert_eq!(params.get("after"), Some("cursor"));
    }

    #[test]
    fn empty_cursor_is_omitted_and_limit_must_be_positive() {
        let params = PageRequest::new().after("").to_params().expect("valid");
        assert!(params.is_empty());

        let err = PageRequest::new().limit(0).to_params().expect_err("must fail");
        assert_eq!(err, ValidationError::NonPositiveLimit { value: 0 });
    }

    #[test]
    fn page_exposes_after_cursor() {
        let page: Page<String> = serde_json::from_str(
            r#"{"items":["a"],"paging":{"cursors":{"after":"next"}}}"#,
        )
        .expect("valid page");
        assert_eq!(page.after(), Some("next"));

        let bare: Page<String> = serde_json::from_str(r#"{"items":[]}"#).expect("valid page");
        assert_eq!(bare.after(), None);
    }
}
