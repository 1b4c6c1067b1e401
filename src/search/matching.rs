//! Soft filtering: punctuation- and case-insensitive substring matching on
//! arbitrary document paths.

use std::borrow::Cow;

use serde_json::Value;

/// Deepest dotted path the accessor will walk.
const MAX_PATH_DEPTH: usize = 32;

/// Outcome of resolving a dotted path inside a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field<'a> {
    Found(&'a Value),
    Missing,
}

/// Resolves `path` (e.g. `category.name`) against `document`.
///
/// Object keys are matched by name; numeric segments index into arrays.
pub fn lookup<'a>(document: &'a Value, path: &str) -> Field<'a> {
    if path.is_empty() {
        return Field::Missing;
    }

    let mut current = document;
    for (depth, segment) in path.split('.').enumerate() {
        if depth >= MAX_PATH_DEPTH {
            return Field::Missing;
        }
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return Field::Missing,
        }
    }

    Field::Found(current)
}

/// String form used for matching: strings verbatim, `null` as empty, and
/// everything else as compact JSON.
pub fn text_of(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text.as_str()),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

/// Keeps ASCII letters and digits only, lower-cased.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A single fuzzy condition over one document path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftFilter {
    pub path: String,
    /// Already normalized search text.
    pub pattern: String,
}

impl SoftFilter {
    pub fn new(path: impl Into<String>, raw_pattern: &str) -> Self {
        Self {
            path: path.into(),
            pattern: normalize(raw_pattern),
        }
    }

    /// A missing field reads as empty text. An empty pattern only matches
    /// fields whose normalized text is empty too.
    pub fn matches(&self, document: &Value) -> bool {
        let haystack = match lookup(document, &self.path) {
            Field::Found(value) => normalize(&text_of(value)),
            Field::Missing => String::new(),
        };

        if self.pattern.is_empty() {
            haystack.is_empty()
        } else {
            haystack.contains(self.pattern.as_str())
        }
    }
}

/// Keeps the documents satisfying every filter, preserving their order.
pub fn apply_filters(mut documents: Vec<Value>, filters: &[SoftFilter]) -> Vec<Value> {
    for filter in filters {
        documents.retain(|document| filter.matches(document));
    }
    documents
}
