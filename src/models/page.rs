//! One page of a cursor-paginated listing.

use serde_json::Value;

use crate::error::ZenklyError;

/// A single page of a list response.
///
/// `count` is the server-reported total across all pages, not the page size.
/// `next_page` is absent exactly on the last page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Objects on this page, in server order.
    pub items: Vec<Value>,

    /// Total number of objects across all pages, when reported.
    pub count: Option<u64>,

    /// URL of the next page.
    pub next_page: Option<String>,
}

impl Page {
    /// Extracts a page from a list response whose collection lives under `key`.
    ///
    /// # Errors
    ///
    /// Returns `ZenklyError::ResponseFormat` if `key` is missing or not an array,
    /// or if `next_page` is neither a string nor null.
    pub fn from_response(mut body: Value, key: &str) -> Result<Self, ZenklyError> {
        let taken = body.get_mut(key).map(Value::take);
        let items = match taken {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ZenklyError::response_format(
                    format!("`{key}` is not a list"),
                    &body.to_string(),
                ))
            }
            None => {
                return Err(ZenklyError::response_format(
                    format!("missing `{key}` in list response"),
                    &body.to_string(),
                ))
            }
        };

        let count = body.get("count").and_then(Value::as_u64);

        let next_page = match body.get("next_page") {
            None | Some(Value::Null) => None,
            Some(Value::String(url)) if url.is_empty() => None,
            Some(Value::String(url)) => Some(url.clone()),
            Some(other) => {
                return Err(ZenklyError::response_format(
                    "`next_page` is not a URL",
                    &other.to_string(),
                ))
            }
        };

        Ok(Self {
            items,
            count,
            next_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_response_middle_page() {
        let body = json!({
            "macros": [{"id": 1}, {"id": 2}],
            "count": 5,
            "next_page": "https://acme.zendesk.com/api/v2/macros.json?page=2",
            "previous_page": null
        });
        let page = Page::from_response(body, "macros").unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.count, Some(5));
        assert!(page.next_page.is_some());
    }

    #[test]
    fn test_from_response_last_page() {
        let body = json!({"macros": [], "count": 0, "next_page": null});
        let page = Page::from_response(body, "macros").unwrap();
        assert_eq!(page.next_page, None);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_from_response_missing_key() {
        let body = json!({"triggers": []});
        let err = Page::from_response(body, "macros").unwrap_err();
        assert!(matches!(err, ZenklyError::ResponseFormat { .. }));
    }

    #[test]
    fn test_from_response_wrong_type() {
        let body = json!({"macros": {"id": 1}});
        assert!(Page::from_response(body, "macros").is_err());
    }

    #[test]
    fn test_from_response_without_count() {
        let body = json!({"articles": [{"id": 1}]});
        let page = Page::from_response(body, "articles").unwrap();
        assert_eq!(page.count, None);
        assert_eq!(page.next_page, None);
    }
}
