//! Query-string decoding for search routes.
//!
//! Keys use bracket nesting, so `constant[$sort][dueDate]=1&date[key]=dueDate`
//! decodes to `{"constant": {"$sort": {"dueDate": "1"}}, "date": {"key": "dueDate"}}`.
//! Every leaf value stays a string; the search pipeline coerces it.

use serde_json::{Map, Value};

use crate::forms::FormError;
use crate::search::RawQuery;

/// Splits `constant[$sort][dueDate]` into `["constant", "$sort", "dueDate"]`.
fn key_segments(key: &str) -> Result<Vec<&str>, FormError> {
    let invalid = || FormError::InvalidQuery(key.to_string());

    let (head, mut rest) = match key.find('[') {
        Some(open) => (&key[..open], &key[open..]),
        None => (key, ""),
    };
    if head.is_empty() {
        return Err(invalid());
    }

    let mut segments = vec![head];
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[').ok_or_else(invalid)?;
        let close = inner.find(']').ok_or_else(invalid)?;
        let segment = &inner[..close];
        if segment.is_empty() {
            return Err(invalid());
        }
        segments.push(segment);
        rest = &inner[close + 1..];
    }

    Ok(segments)
}

fn insert_nested(
    target: &mut Map<String, Value>,
    key: &str,
    segments: &[&str],
    value: String,
) -> Result<(), FormError> {
    match segments {
        [] => Ok(()),
        [last] => {
            if target.get(*last).is_some_and(Value::is_object) {
                return Err(FormError::InvalidQuery(key.to_string()));
            }
            target.insert((*last).to_string(), Value::String(value));
            Ok(())
        }
        [first, rest @ ..] => {
            let child = target
                .entry((*first).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match child {
                Value::Object(map) => insert_nested(map, key, rest, value),
                _ => Err(FormError::InvalidQuery(key.to_string())),
            }
        }
    }
}

/// Decodes a raw query string into a nested search query. A repeated key
/// keeps its last value.
pub fn parse_search_query(query_string: &str) -> Result<RawQuery, FormError> {
    let pairs: Vec<(String, String)> = serde_html_form::from_str(query_string)
        .map_err(|err| FormError::InvalidQuery(err.to_string()))?;

    let mut raw = RawQuery::new();
    for (key, value) in pairs {
        let segments = key_segments(&key)?;
        insert_nested(&mut raw, &key, &segments, value)?;
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn flat_pairs_stay_flat() {
        let raw = parse_search_query("name=hello%20world&size=2&pageNo=1").unwrap();

        assert_eq!(
            Value::Object(raw),
            json!({"name": "hello world", "size": "2", "pageNo": "1"})
        );
    }

    #[test]
    fn brackets_build_nested_objects() {
        let raw = parse_search_query(
            "constant[status]=PENDING&constant[$sort][dueDate]=1&date[key]=dueDate&beginDateSearch=2024-01-01",
        )
        .unwrap();

        assert_eq!(
            Value::Object(raw),
            json!({
                "constant": {"status": "PENDING", "$sort": {"dueDate": "1"}},
                "date": {"key": "dueDate"},
                "beginDateSearch": "2024-01-01"
            })
        );
    }

    #[test]
    fn encoded_brackets_are_understood() {
        let raw = parse_search_query("constant%5Bstatus%5D=PENDING").unwrap();

        assert_eq!(Value::Object(raw), json!({"constant": {"status": "PENDING"}}));
    }

    #[test]
    fn malformed_keys_are_rejected() {
        for query in ["a[=1", "[x]=1", "a[]=1", "a[b]c=1"] {
            assert!(
                matches!(parse_search_query(query), Err(FormError::InvalidQuery(_))),
                "{query} should be rejected"
            );
        }
    }

    #[test]
    fn scalar_and_object_conflicts_are_rejected() {
        assert!(parse_search_query("constant=1&constant[status]=x").is_err());
        assert!(parse_search_query("constant[status]=x&constant=1").is_err());
    }

    #[test]
    fn empty_query_string_is_empty_query() {
        assert!(parse_search_query("").unwrap().is_empty());
    }
}
