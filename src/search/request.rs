//! Splits a raw search query into pagination, hard conditions, range
//! conditions and soft filters.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::search::{
    CREATED_AT_FIELD, HardQuery, PageOptions, RangeCondition, SortDirection, SortKey,
};
use crate::domain::types::{datetime_from_millis, parse_datetime};
use crate::search::matching::SoftFilter;
use crate::search::{SearchError, SearchResult};

/// Untyped query as received from the caller, either a JSON object or a
/// bracket-nested query string.
pub type RawQuery = Map<String, Value>;

const SIZE_KEY: &str = "size";
const PAGE_NO_KEY: &str = "pageNo";
const CONSTANT_KEY: &str = "constant";
const SORT_KEY: &str = "$sort";
const NO_SORTING_KEY: &str = "noSorting";
const BEGIN_DATE_KEY: &str = "beginDateSearch";
const END_DATE_KEY: &str = "endDateSearch";
const DATE_KEY: &str = "date";
const RANGE_LOWER_KEY: &str = "rangeLowerBound";
const RANGE_UPPER_KEY: &str = "rangeUpperBound";
const RANGE_KEY: &str = "range";

pub const INVALID_PAGE_OPTION: &str = "Invalid Option parameter value";

/// Exact-match conditions and ordering directives evaluated by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantQuery {
    pub equals: Vec<(String, Value)>,
    /// Explicit `$sort`, if one was given.
    pub sort: Option<Vec<SortKey>>,
    pub no_sorting: bool,
}

impl ConstantQuery {
    pub fn from_value(value: Value) -> SearchResult<Self> {
        let map = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::default()),
            other => {
                return Err(SearchError::Validation(format!(
                    "`{CONSTANT_KEY}` must be an object, got {other}"
                )));
            }
        };

        let mut constant = Self::default();
        for (field, value) in map {
            match field.as_str() {
                SORT_KEY => constant.sort = Some(parse_sort(&value)?),
                NO_SORTING_KEY => constant.no_sorting = parse_flag(NO_SORTING_KEY, &value)?,
                _ => constant.equals.push((field, value)),
            }
        }
        Ok(constant)
    }

    /// Sets an exact-match condition, replacing any existing one on `field`.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        self.equals.retain(|(existing, _)| *existing != field);
        self.equals.push((field, value));
    }

    /// Order handed to the store: none when sorting is disabled, the explicit
    /// `$sort` when given, newest first otherwise.
    pub fn effective_sort(&self) -> Vec<SortKey> {
        if self.no_sorting {
            return Vec::new();
        }
        match &self.sort {
            Some(keys) => keys.clone(),
            None => vec![SortKey::descending(CREATED_AT_FIELD)],
        }
    }
}

/// A fully parsed search, ready to execute against a store.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub page: PageOptions,
    pub constant: ConstantQuery,
    pub ranges: Vec<RangeCondition>,
    pub filters: Vec<SoftFilter>,
}

impl SearchRequest {
    pub fn from_raw(raw: RawQuery) -> SearchResult<Self> {
        Self::from_raw_at(raw, Utc::now())
    }

    /// Parses `raw`, using `now` as the upper bound of open-ended date ranges.
    pub fn from_raw_at(mut raw: RawQuery, now: DateTime<Utc>) -> SearchResult<Self> {
        let page = take_page_options(&mut raw)?;
        let constant = match raw.remove(CONSTANT_KEY) {
            Some(value) => ConstantQuery::from_value(value)?,
            None => ConstantQuery::default(),
        };
        let mut ranges = Vec::new();
        ranges.extend(take_date_range(&mut raw, now)?);
        ranges.extend(take_numeric_range(&mut raw)?);
        let filters = soft_filters(raw)?;

        Ok(Self {
            page,
            constant,
            ranges,
            filters,
        })
    }

    /// Forces an exact-match condition, overriding whatever the caller sent.
    pub fn scoped_to(mut self, field: impl Into<String>, value: Value) -> Self {
        self.constant.insert(field, value);
        self
    }

    pub fn hard_query(&self) -> HardQuery {
        HardQuery {
            equals: self.constant.equals.clone(),
            ranges: self.ranges.clone(),
            sort: self.constant.effective_sort(),
        }
    }
}

fn take_page_options(raw: &mut RawQuery) -> SearchResult<PageOptions> {
    let defaults = PageOptions::default();
    let size = take_count(raw, SIZE_KEY)?.unwrap_or(defaults.size);
    let page_no = take_count(raw, PAGE_NO_KEY)?.unwrap_or(defaults.page_no);

    if size == 0 || page_no == 0 {
        return Err(SearchError::Validation(INVALID_PAGE_OPTION.to_string()));
    }

    Ok(PageOptions { size, page_no })
}

fn take_count(raw: &mut RawQuery, key: &str) -> SearchResult<Option<usize>> {
    let parsed = match raw.remove(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) if text.trim().is_empty() => return Ok(None),
        Some(Value::String(text)) => text.trim().parse::<u64>().ok(),
        Some(_) => None,
    };

    parsed
        .and_then(|count| usize::try_from(count).ok())
        .map(Some)
        .ok_or_else(|| SearchError::Validation(INVALID_PAGE_OPTION.to_string()))
}

/// Removes `key` and its dotted `key.key` alias, returning the field name.
fn take_range_field(raw: &mut RawQuery, key: &str) -> Option<String> {
    let nested = raw.remove(key).and_then(|value| match value {
        Value::Object(mut map) => map.remove("key"),
        _ => None,
    });
    let dotted = raw.remove(&format!("{key}.key"));

    nested
        .or(dotted)
        .and_then(|value| value.as_str().map(str::trim).map(str::to_string))
        .filter(|field| !field.is_empty())
}

/// Absent, `null` and empty-string bounds all fall back to the default.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn take_date_range(raw: &mut RawQuery, now: DateTime<Utc>) -> SearchResult<Option<RangeCondition>> {
    let begin = raw.remove(BEGIN_DATE_KEY);
    let end = raw.remove(END_DATE_KEY);
    let field = take_range_field(raw, DATE_KEY);

    if begin.is_none() && end.is_none() {
        return Ok(None);
    }
    let field = field.ok_or_else(|| SearchError::Validation("Must specify date key".to_string()))?;

    let lower = match begin.filter(|value| !is_blank(value)) {
        Some(value) => parse_date(BEGIN_DATE_KEY, &value)?,
        None => DateTime::<Utc>::MIN_UTC,
    };
    let upper = match end.filter(|value| !is_blank(value)) {
        Some(value) => parse_date(END_DATE_KEY, &value)?,
        None => now,
    };

    Ok(Some(RangeCondition::date(field, lower, upper)))
}

fn take_numeric_range(raw: &mut RawQuery) -> SearchResult<Option<RangeCondition>> {
    let lower = raw.remove(RANGE_LOWER_KEY);
    let upper = raw.remove(RANGE_UPPER_KEY);
    let field = take_range_field(raw, RANGE_KEY);

    if lower.is_none() && upper.is_none() {
        return Ok(None);
    }
    let field =
        field.ok_or_else(|| SearchError::Validation("Must specify range key".to_string()))?;

    let lower = match lower.filter(|value| !is_blank(value)) {
        Some(value) => parse_number(RANGE_LOWER_KEY, &value)?,
        None => f64::NEG_INFINITY,
    };
    let upper = match upper.filter(|value| !is_blank(value)) {
        Some(value) => parse_number(RANGE_UPPER_KEY, &value)?,
        None => f64::INFINITY,
    };

    Ok(Some(RangeCondition::number(field, lower, upper)))
}

fn parse_date(key: &str, value: &Value) -> SearchResult<DateTime<Utc>> {
    let parsed = match value {
        Value::String(text) => parse_datetime(text).ok(),
        Value::Number(number) => number.as_i64().map(datetime_from_millis),
        _ => None,
    };
    parsed.ok_or_else(|| SearchError::Validation(format!("Invalid date for `{key}`: {value}")))
}

fn parse_number(key: &str, value: &Value) -> SearchResult<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|number| !number.is_nan())
        .ok_or_else(|| SearchError::Validation(format!("Invalid number for `{key}`: {value}")))
}

fn parse_flag(key: &str, value: &Value) -> SearchResult<bool> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Null => Ok(false),
        Value::Number(number) => Ok(number.as_f64().is_some_and(|n| n != 0.0)),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" | "" => Ok(false),
            _ => Err(SearchError::Validation(format!("Invalid flag for `{key}`: {value}"))),
        },
        _ => Err(SearchError::Validation(format!("Invalid flag for `{key}`: {value}"))),
    }
}

fn parse_direction(field: &str, value: &Value) -> SearchResult<SortDirection> {
    let invalid = || SearchError::Validation(format!("Invalid sort direction for `{field}`"));
    match value {
        Value::Number(number) => match number.as_i64() {
            Some(1) => Ok(SortDirection::Ascending),
            Some(-1) => Ok(SortDirection::Descending),
            _ => Err(invalid()),
        },
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "1" | "asc" | "ascending" => Ok(SortDirection::Ascending),
            "-1" | "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}

/// Accepts `{field: direction, ...}` or a space-separated list such as
/// `"-dueDate name"`.
fn parse_sort(value: &Value) -> SearchResult<Vec<SortKey>> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(field, direction)| -> SearchResult<SortKey> {
                Ok(SortKey {
                    field: field.clone(),
                    direction: parse_direction(field, direction)?,
                })
            })
            .collect(),
        Value::String(text) => Ok(text
            .split_whitespace()
            .map(|term| match term.strip_prefix('-') {
                Some(field) => SortKey::descending(field),
                None => SortKey::ascending(term.trim_start_matches('+')),
            })
            .collect()),
        other => Err(SearchError::Validation(format!(
            "`{SORT_KEY}` must be an object or a string, got {other}"
        ))),
    }
}

/// Every key left over becomes a soft filter; nested objects address
/// nested fields.
fn soft_filters(raw: RawQuery) -> SearchResult<Vec<SoftFilter>> {
    let mut filters = Vec::new();
    for (key, value) in raw {
        collect_filters(key, value, &mut filters)?;
    }
    Ok(filters)
}

fn collect_filters(path: String, value: Value, filters: &mut Vec<SoftFilter>) -> SearchResult<()> {
    if path.is_empty() {
        return Ok(());
    }
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                if key.is_empty() {
                    continue;
                }
                collect_filters(format!("{path}.{key}"), nested, filters)?;
            }
        }
        Value::Array(_) => {
            return Err(SearchError::Validation(format!(
                "Filter `{path}` must be a single value"
            )));
        }
        Value::String(text) => filters.push(SoftFilter::new(path, &text)),
        Value::Null => filters.push(SoftFilter::new(path, "")),
        other => filters.push(SoftFilter::new(path, &other.to_string())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::domain::search::RangeBounds;

    fn raw(value: Value) -> RawQuery {
        match value {
            Value::Object(map) => map,
            _ => panic!("test query must be an object"),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn defaults_to_first_page_of_five_newest_first() {
        let request = SearchRequest::from_raw_at(RawQuery::new(), now()).unwrap();

        assert_eq!(request.page, PageOptions { size: 5, page_no: 1 });
        assert_eq!(
            request.hard_query().sort,
            vec![SortKey::descending("createdAt")]
        );
        assert!(request.ranges.is_empty());
        assert!(request.filters.is_empty());
    }

    #[test]
    fn zero_size_or_page_is_rejected() {
        for query in [json!({"size": 0}), json!({"pageNo": "0"}), json!({"size": -2})] {
            let err = SearchRequest::from_raw_at(raw(query), now()).unwrap_err();
            assert!(matches!(err, SearchError::Validation(msg) if msg == INVALID_PAGE_OPTION));
        }
    }

    #[test]
    fn string_page_options_are_parsed() {
        let request =
            SearchRequest::from_raw_at(raw(json!({"size": "2", "pageNo": "3"})), now()).unwrap();

        assert_eq!(request.page, PageOptions { size: 2, page_no: 3 });
    }

    #[test]
    fn constant_is_split_into_equals_and_sort() {
        let request = SearchRequest::from_raw_at(
            raw(json!({"constant": {"status": "PENDING", "$sort": {"dueDate": 1, "name": "desc"}}})),
            now(),
        )
        .unwrap();
        let hard = request.hard_query();

        assert_eq!(hard.equals, vec![("status".to_string(), json!("PENDING"))]);
        assert_eq!(
            hard.sort,
            vec![SortKey::ascending("dueDate"), SortKey::descending("name")]
        );
    }

    #[test]
    fn no_sorting_wins_over_explicit_sort() {
        let request = SearchRequest::from_raw_at(
            raw(json!({"constant": {"$sort": {"name": 1}, "noSorting": "true"}})),
            now(),
        )
        .unwrap();

        assert!(request.hard_query().sort.is_empty());
        assert!(request.constant.equals.is_empty());
    }

    #[test]
    fn string_sort_accepts_minus_prefix() {
        let request =
            SearchRequest::from_raw_at(raw(json!({"constant": {"$sort": "-dueDate name"}})), now())
                .unwrap();

        assert_eq!(
            request.hard_query().sort,
            vec![SortKey::descending("dueDate"), SortKey::ascending("name")]
        );
    }

    #[test]
    fn invalid_sort_direction_is_rejected() {
        let result =
            SearchRequest::from_raw_at(raw(json!({"constant": {"$sort": {"name": 2}}})), now());

        assert!(matches!(result, Err(SearchError::Validation(_))));
    }

    #[test]
    fn non_object_constant_is_rejected() {
        let result = SearchRequest::from_raw_at(raw(json!({"constant": "status"})), now());

        assert!(matches!(result, Err(SearchError::Validation(_))));
    }

    #[test]
    fn date_range_defaults_to_min_and_now() {
        let request = SearchRequest::from_raw_at(
            raw(json!({"beginDateSearch": "", "date": {"key": "dueDate"}})),
            now(),
        )
        .unwrap();

        assert_eq!(
            request.ranges,
            vec![RangeCondition::date("dueDate", DateTime::<Utc>::MIN_UTC, now())]
        );
        assert!(request.filters.is_empty());
    }

    #[test]
    fn date_range_accepts_dotted_key_and_bounds() {
        let request = SearchRequest::from_raw_at(
            raw(json!({
                "beginDateSearch": "2024-01-01",
                "endDateSearch": "2024-01-31T23:59:59Z",
                "date.key": "createdAt"
            })),
            now(),
        )
        .unwrap();

        let expected = RangeCondition::date(
            "createdAt",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap(),
        );
        assert_eq!(request.ranges, vec![expected]);
    }

    #[test]
    fn date_range_without_key_is_rejected() {
        let err =
            SearchRequest::from_raw_at(raw(json!({"endDateSearch": "2024-01-01"})), now())
                .unwrap_err();

        assert!(matches!(err, SearchError::Validation(msg) if msg == "Must specify date key"));
    }

    #[test]
    fn unparseable_date_is_rejected() {
        let result = SearchRequest::from_raw_at(
            raw(json!({"beginDateSearch": "soon", "date": {"key": "dueDate"}})),
            now(),
        );

        assert!(matches!(result, Err(SearchError::Validation(_))));
    }

    #[test]
    fn extreme_epoch_millis_saturate() {
        let request = SearchRequest::from_raw_at(
            raw(json!({
                "beginDateSearch": -8_640_000_000_000_000_i64,
                "endDateSearch": "8640000000000000",
                "date": {"key": "dueDate"}
            })),
            now(),
        )
        .unwrap();

        assert_eq!(
            request.ranges,
            vec![RangeCondition::date(
                "dueDate",
                DateTime::<Utc>::MIN_UTC,
                DateTime::<Utc>::MAX_UTC
            )]
        );
    }

    #[test]
    fn numeric_range_defaults_to_infinities() {
        let request = SearchRequest::from_raw_at(
            raw(json!({"rangeLowerBound": "2", "range": {"key": "priority"}})),
            now(),
        )
        .unwrap();

        assert_eq!(request.ranges.len(), 1);
        assert_eq!(request.ranges[0].field, "priority");
        assert_eq!(
            request.ranges[0].bounds,
            RangeBounds::Number {
                lower: 2.0,
                upper: f64::INFINITY
            }
        );
    }

    #[test]
    fn numeric_range_without_key_is_rejected() {
        let err = SearchRequest::from_raw_at(raw(json!({"rangeUpperBound": 3})), now())
            .unwrap_err();

        assert!(matches!(err, SearchError::Validation(msg) if msg == "Must specify range key"));
    }

    #[test]
    fn lone_range_key_is_consumed_silently() {
        let request =
            SearchRequest::from_raw_at(raw(json!({"date": {"key": "dueDate"}, "range.key": "x"})), now())
                .unwrap();

        assert!(request.ranges.is_empty());
        assert!(request.filters.is_empty());
    }

    #[test]
    fn leftover_keys_become_soft_filters() {
        let request = SearchRequest::from_raw_at(
            raw(json!({"name": "Hello, World", "category": {"name": "Work"}, "priority": 3})),
            now(),
        )
        .unwrap();

        assert_eq!(
            request.filters,
            vec![
                SoftFilter::new("name", "helloworld"),
                SoftFilter::new("category.name", "work"),
                SoftFilter::new("priority", "3"),
            ]
        );
    }

    #[test]
    fn array_filter_is_rejected() {
        let result = SearchRequest::from_raw_at(raw(json!({"name": ["a", "b"]})), now());

        assert!(matches!(result, Err(SearchError::Validation(_))));
    }

    #[test]
    fn scoping_overrides_caller_condition() {
        let request = SearchRequest::from_raw_at(raw(json!({"constant": {"user": 99}})), now())
            .unwrap()
            .scoped_to("user", json!(1));

        assert_eq!(request.constant.equals, vec![("user".to_string(), json!(1))]);
    }
}
