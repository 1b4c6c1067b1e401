//! Translation helpers shared by the per-collection document queries.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::domain::search::{Collection, HardQuery};
use crate::domain::types::{
    clamp_to_storable, datetime_from_millis, is_storable, parse_datetime,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, DocumentStore};

impl DocumentStore for DieselRepository {
    fn find_documents(
        &self,
        collection: Collection,
        query: &HardQuery,
    ) -> RepositoryResult<Vec<Value>> {
        let mut conn = self.conn()?;

        let documents = match collection {
            Collection::Users => super::user::find_user_documents(&mut conn, query)?,
            Collection::Categories => {
                super::category::find_category_documents(&mut conn, query)?
            }
            Collection::Tasks => super::task::find_task_documents(&mut conn, query)?,
        };

        log::debug!(
            "Store returned {} {collection} documents for {} equality and {} range conditions",
            documents.len(),
            query.equals.len(),
            query.ranges.len()
        );

        Ok(documents)
    }
}

pub(crate) fn unknown_field(collection: Collection, field: &str) -> RepositoryError {
    RepositoryError::ValidationError(format!("Unknown {collection} field `{field}`"))
}

pub(crate) fn unsupported_range(collection: Collection, field: &str) -> RepositoryError {
    RepositoryError::ValidationError(format!(
        "Range condition is not supported on {collection} field `{field}`"
    ))
}

fn mismatched_value(field: &str, value: &Value) -> RepositoryError {
    RepositoryError::ValidationError(format!("Cannot match field `{field}` against {value}"))
}

/// Coerces a scalar into text for comparison with a text column.
pub(crate) fn text_value(field: &str, value: &Value) -> RepositoryResult<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(mismatched_value(field, value)),
    }
}

/// Coerces a JSON number or numeric string into an integer column value.
pub(crate) fn integer_value(field: &str, value: &Value) -> RepositoryResult<i32> {
    let parsed = match value {
        Value::Number(number) => number.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(text) => text.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| mismatched_value(field, value))
}

/// Coerces a date string or epoch milliseconds into a timestamp column value.
pub(crate) fn timestamp_value(field: &str, value: &Value) -> RepositoryResult<NaiveDateTime> {
    let parsed = match value {
        Value::String(text) => parse_datetime(text).ok(),
        Value::Number(number) => number.as_i64().map(datetime_from_millis),
        _ => None,
    };
    parsed
        .filter(is_storable)
        .map(|instant| instant.naive_utc())
        .ok_or_else(|| mismatched_value(field, value))
}

/// Narrows real-valued bounds to the integers they enclose.
pub(crate) fn integer_bounds(lower: f64, upper: f64) -> (i32, i32) {
    let narrow = |bound: f64| bound.clamp(i32::MIN as f64, i32::MAX as f64) as i32;
    (narrow(lower.ceil()), narrow(upper.floor()))
}

/// Clamps date bounds to the range the text column orders correctly.
pub(crate) fn timestamp_bounds(
    lower: &DateTime<Utc>,
    upper: &DateTime<Utc>,
) -> (NaiveDateTime, NaiveDateTime) {
    (
        clamp_to_storable(*lower).naive_utc(),
        clamp_to_storable(*upper).naive_utc(),
    )
}
