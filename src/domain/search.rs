//! Query shapes exchanged between the search pipeline and the document store.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Field every collection can be sorted by when no explicit order is given.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Records returned per page when the caller does not specify `size`.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Persistent collection targeted by a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Categories,
    Tasks,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Categories => "categories",
            Collection::Tasks => "tasks",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Inclusive bounds of a range condition.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeBounds {
    Date {
        lower: DateTime<Utc>,
        upper: DateTime<Utc>,
    },
    Number {
        lower: f64,
        upper: f64,
    },
}

/// Inclusive range condition over a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeCondition {
    pub field: String,
    pub bounds: RangeBounds,
}

impl RangeCondition {
    pub fn date(field: impl Into<String>, lower: DateTime<Utc>, upper: DateTime<Utc>) -> Self {
        Self {
            field: field.into(),
            bounds: RangeBounds::Date { lower, upper },
        }
    }

    pub fn number(field: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            field: field.into(),
            bounds: RangeBounds::Number { lower, upper },
        }
    }
}

/// Conditions the document store evaluates natively.
///
/// An empty `sort` means natural store order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HardQuery {
    pub equals: Vec<(String, Value)>,
    pub ranges: Vec<RangeCondition>,
    pub sort: Vec<SortKey>,
}

impl HardQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(mut self, field: impl Into<String>, value: Value) -> Self {
        self.equals.push((field.into(), value));
        self
    }

    pub fn range(mut self, condition: RangeCondition) -> Self {
        self.ranges.push(condition);
        self
    }

    pub fn sort_by(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }
}

/// Page size and one-based page number; both are at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub size: usize,
    pub page_no: usize,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAGE_SIZE,
            page_no: 1,
        }
    }
}
