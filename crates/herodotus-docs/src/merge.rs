//! Merging observed responses into response entries.
//!
//! Headers are unioned by name. Bodies are grouped by content type; the
//! first body is stored as a singular `example`, the second converts the
//! entry to an `examples` map, and every later body adds one more id.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, DATE};
use http::HeaderMap;
use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::document::{ContentEntry, Example, ResponseEntry};

/// Content type used when a response carries none.
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Shape of a content entry after a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleForm {
    /// `{example: ...}`
    Singular,
    /// `{examples: {...}}`
    Plural,
}

impl ExampleForm {
    /// Metric label value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Singular => "singular",
            Self::Plural => "plural",
        }
    }
}

impl ContentEntry {
    /// Creates a singular entry.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self::Single {
            example: Example::new(value),
        }
    }

    /// Adds one body, converting a singular entry to plural.
    pub fn push(&mut self, value: Value) -> ExampleForm {
        match self {
            Self::Multiple { examples } => {
                insert_fresh(examples, value);
            }
            Self::Single { example } => {
                let first = std::mem::take(example);
                let mut examples = IndexMap::with_capacity(2);
                insert_fresh(&mut examples, first.value);
                insert_fresh(&mut examples, value);
                *self = Self::Multiple { examples };
            }
        }
        ExampleForm::Plural
    }
}

fn insert_fresh(examples: &mut IndexMap<String, Example>, value: Value) {
    let id = loop {
        let candidate = Uuid::now_v7().urn().to_string();
        if !examples.contains_key(&candidate) {
            break candidate;
        }
    };
    examples.insert(id, Example::new(value));
}

/// Copies response headers into `entry`, skipping `date` and `content-type`.
///
/// A name seen again gets the value list of the latest response. Names are
/// never removed.
pub fn merge_headers(entry: &mut ResponseEntry, headers: &HeaderMap) {
    for name in headers.keys() {
        if name == DATE || name == CONTENT_TYPE {
            continue;
        }
        let values = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        entry.headers.insert(name.as_str().to_string(), values);
    }
}

/// Records `body` under its content type and returns the resulting form.
///
/// Responses without a content type, empty bodies included, are stored under
/// [`FALLBACK_CONTENT_TYPE`].
pub fn merge_content(
    entry: &mut ResponseEntry,
    content_type: Option<&str>,
    body: &Bytes,
) -> ExampleForm {
    let key = content_type.unwrap_or(FALLBACK_CONTENT_TYPE);
    let value = body_value(content_type, body);
    match entry.content.get_mut(key) {
        Some(existing) => existing.push(value),
        None => {
            entry.content.insert(key.to_string(), ContentEntry::new(value));
            ExampleForm::Singular
        }
    }
}

/// Returns true for `application/json` and any `+json` media type.
#[must_use]
pub fn is_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Converts a body to its document representation.
///
/// JSON bodies that parse become JSON values; everything else is stored as
/// a lossy UTF-8 string.
#[must_use]
pub fn body_value(content_type: Option<&str>, body: &[u8]) -> Value {
    if content_type.is_some_and(is_json) {
        if let Ok(value) = serde_json::from_slice(body) {
            return value;
        }
    }
    Value::String(String::from_utf8_lossy(body).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use serde_json::json;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_first_body_is_singular() {
        let mut entry = ResponseEntry::default();
        let form = merge_content(
            &mut entry,
            Some("application/json"),
            &Bytes::from_static(br#"{"id":1}"#),
        );

        assert_eq!(form, ExampleForm::Singular);
        assert_eq!(
            entry.content["application/json"],
            ContentEntry::new(json!({"id": 1}))
        );
    }

    #[test]
    fn test_second_body_turns_plural() {
        let mut entry = ResponseEntry::default();
        merge_content(&mut entry, Some("application/json"), &Bytes::from_static(b"1"));
        let form = merge_content(&mut entry, Some("application/json"), &Bytes::from_static(b"2"));

        assert_eq!(form, ExampleForm::Plural);
        let content = &entry.content["application/json"];
        let ContentEntry::Multiple { examples } = content else {
            panic!("expected plural form, got {content:?}");
        };
        assert_eq!(examples.len(), 2);
        assert_eq!(content.values(), vec![&json!(1), &json!(2)]);
        assert!(examples.keys().all(|id| id.starts_with("urn:uuid:")));

        let json = serde_json::to_value(content).unwrap();
        assert!(json.get("example").is_none());
    }

    #[test]
    fn test_plural_keeps_existing_ids() {
        let mut entry = ContentEntry::new(json!("a"));
        entry.push(json!("b"));
        let ContentEntry::Multiple { examples } = &entry else {
            panic!("expected plural");
        };
        let before: Vec<String> = examples.keys().cloned().collect();

        entry.push(json!("c"));
        let ContentEntry::Multiple { examples } = &entry else {
            panic!("expected plural");
        };
        let after: Vec<String> = examples.keys().cloned().collect();
        assert_eq!(&after[..2], &before[..]);
        assert_eq!(after.len(), 3);
    }

    #[test]
    fn test_content_types_kept_apart() {
        let mut entry = ResponseEntry::default();
        merge_content(&mut entry, Some("application/json"), &Bytes::from_static(b"{}"));
        merge_content(&mut entry, Some("text/html; charset=UTF-8"), &Bytes::from_static(b"<p>"));

        assert_eq!(entry.content.len(), 2);
        assert_eq!(
            entry.content["text/html; charset=UTF-8"],
            ContentEntry::new(json!("<p>"))
        );
    }

    #[test]
    fn test_missing_content_type() {
        let mut entry = ResponseEntry::default();
        assert_eq!(
            merge_content(&mut entry, None, &Bytes::from_static(b"raw")),
            ExampleForm::Singular
        );
        assert_eq!(
            entry.content[FALLBACK_CONTENT_TYPE],
            ContentEntry::new(json!("raw"))
        );
    }

    #[test]
    fn test_empty_body_without_content_type_is_recorded() {
        let mut entry = ResponseEntry::default();
        assert_eq!(
            merge_content(&mut entry, None, &Bytes::new()),
            ExampleForm::Singular
        );
        assert_eq!(
            entry.content[FALLBACK_CONTENT_TYPE],
            ContentEntry::new(json!(""))
        );

        assert_eq!(
            merge_content(&mut entry, None, &Bytes::new()),
            ExampleForm::Plural
        );
        assert_eq!(entry.content.len(), 1);
    }

    #[test]
    fn test_invalid_json_kept_as_string() {
        assert_eq!(
            body_value(Some("application/json"), b"{not json"),
            json!("{not json")
        );
    }

    #[test]
    fn test_is_json() {
        assert!(is_json("application/json"));
        assert!(is_json("application/json; charset=utf-8"));
        assert!(is_json("application/problem+json"));
        assert!(is_json("Application/JSON"));
        assert!(!is_json("text/plain"));
        assert!(!is_json("application/jsonp"));
    }

    #[test]
    fn test_headers_exclude_date_and_content_type() {
        let mut entry = ResponseEntry::default();
        merge_headers(
            &mut entry,
            &headers(&[
                ("date", "Tue, 01 Oct 2024 10:00:00 GMT"),
                ("content-type", "application/json"),
                ("x-ratelimit-limit", "60"),
                ("cache-control", "no-cache"),
            ]),
        );

        assert!(!entry.headers.contains_key("date"));
        assert!(!entry.headers.contains_key("content-type"));
        assert_eq!(entry.headers["x-ratelimit-limit"], vec!["60"]);
        assert_eq!(entry.headers.len(), 2);
    }

    #[test]
    fn test_headers_union_and_overwrite() {
        let mut entry = ResponseEntry::default();
        merge_headers(
            &mut entry,
            &headers(&[("x-ratelimit-remaining", "59"), ("set-cookie", "a=1")]),
        );
        merge_headers(
            &mut entry,
            &headers(&[
                ("x-ratelimit-remaining", "58"),
                ("vary", "Accept"),
                ("vary", "Origin"),
            ]),
        );

        assert_eq!(entry.headers["x-ratelimit-remaining"], vec!["58"]);
        assert_eq!(entry.headers["set-cookie"], vec!["a=1"]);
        assert_eq!(entry.headers["vary"], vec!["Accept", "Origin"]);
    }
}
