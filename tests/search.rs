use serde_json::{Map, Value, json};
use todo_list_api::domain::search::Collection;
use todo_list_api::domain::types::TaskStatus;
use todo_list_api::repository::errors::RepositoryError;
use todo_list_api::search::{PageResult, RawQuery, SearchError, search};

mod common;

fn raw(value: Value) -> RawQuery {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn names(result: &PageResult) -> Vec<&str> {
    result
        .data
        .iter()
        .map(|doc| doc["name"].as_str().unwrap_or_default())
        .collect()
}

/// Seeds one user with a category and the given task names, due on
/// consecutive days starting June 1st.
fn seeded(db_name: &str, task_names: &[&str]) -> (common::TestDb, i32) {
    let test_db = common::TestDb::new(db_name);
    let repo = test_db.repo();
    let user = common::create_user(&repo, "jane@example.com");
    let category = common::create_category(&repo, &user, "Errands");
    for (day, name) in task_names.iter().enumerate() {
        common::create_task(&repo, &category, name, day as u32 + 1, 5, TaskStatus::Pending);
    }
    (test_db, user.id.get())
}

#[test]
fn test_soft_match_ignores_case_and_punctuation() {
    let (test_db, _) = seeded(
        "test_soft_match.db",
        &["Buy Milk", "buy milk chocolate", "Sell Car"],
    );

    let result = search(
        &test_db.repo(),
        Collection::Tasks,
        raw(json!({"name": "buy milk"})),
    )
    .unwrap();

    assert_eq!(result.page_data.total_items, 2);
    assert_eq!(result.page_data.total_pages, 1);
    assert_eq!(result.data.len(), 2);
}

#[test]
fn test_soft_match_on_populated_category() {
    let (test_db, _) = seeded("test_soft_match_category.db", &["One", "Two"]);

    let matching = search(
        &test_db.repo(),
        Collection::Tasks,
        raw(json!({"category.name": "errands"})),
    )
    .unwrap();
    let missing = search(
        &test_db.repo(),
        Collection::Tasks,
        raw(json!({"category.name": "work"})),
    )
    .unwrap();

    assert_eq!(matching.page_data.total_items, 2);
    assert!(missing.data.is_empty());
}

#[test]
fn test_pages_follow_sort_order() {
    let (test_db, _) = seeded("test_pages_follow_sort.db", &["first", "second", "third"]);

    let result = search(
        &test_db.repo(),
        Collection::Tasks,
        raw(json!({"size": 1, "pageNo": 2, "constant": {"$sort": {"dueDate": 1}}})),
    )
    .unwrap();

    assert_eq!(names(&result), vec!["second"]);
    assert_eq!(result.page_data.total_pages, 3);
}

#[test]
fn test_default_order_is_newest_first() {
    let (test_db, _) = seeded("test_default_order.db", &["first", "second", "third"]);

    let result = search(&test_db.repo(), Collection::Tasks, RawQuery::new()).unwrap();

    assert_eq!(names(&result), vec!["third", "second", "first"]);
}

#[test]
fn test_page_past_the_end_is_empty() {
    let (test_db, _) = seeded("test_page_past_end.db", &["a", "b", "c"]);

    let result = search(
        &test_db.repo(),
        Collection::Tasks,
        raw(json!({"pageNo": 10, "size": 5})),
    )
    .unwrap();

    assert!(result.data.is_empty());
    assert_eq!(result.page_data.total_items, 3);
}

#[test]
fn test_date_range_with_open_lower_bound() {
    let (test_db, _) = seeded("test_date_range.db", &["June 1", "June 2", "June 3"]);

    let result = search(
        &test_db.repo(),
        Collection::Tasks,
        raw(json!({
            "date": {"key": "dueDate"},
            "endDateSearch": "2024-06-02T12:00:00Z",
            "constant": {"$sort": {"dueDate": "asc"}}
        })),
    )
    .unwrap();

    assert_eq!(names(&result), vec!["June 1", "June 2"]);
}

#[test]
fn test_date_range_includes_lower_bound() {
    let (test_db, _) = seeded("test_date_lower_bound.db", &["June 1", "June 2", "June 3"]);

    let result = search(
        &test_db.repo(),
        Collection::Tasks,
        raw(json!({
            "date": {"key": "dueDate"},
            "beginDateSearch": "2024-06-02T12:00:00Z",
            "endDateSearch": "2024-06-30",
            "constant": {"$sort": {"dueDate": 1}}
        })),
    )
    .unwrap();

    assert_eq!(names(&result), vec!["June 2", "June 3"]);
}

#[test]
fn test_date_range_beyond_year_9999_keeps_every_record() {
    let (test_db, _) = seeded("test_date_far_future.db", &["June 1", "June 2", "June 3"]);

    for end in [json!(253_402_300_800_000_i64), json!("253402300800000")] {
        let result = search(
            &test_db.repo(),
            Collection::Tasks,
            raw(json!({"date": {"key": "dueDate"}, "endDateSearch": end})),
        )
        .unwrap();

        assert_eq!(result.page_data.total_items, 3);
    }
}

#[test]
fn test_date_range_accepts_extreme_epoch_millis() {
    let (test_db, _) = seeded("test_date_extremes.db", &["June 1", "June 2"]);

    let result = search(
        &test_db.repo(),
        Collection::Tasks,
        raw(json!({
            "date": {"key": "dueDate"},
            "beginDateSearch": -8_640_000_000_000_000_i64,
            "endDateSearch": 8_640_000_000_000_000_i64
        })),
    )
    .unwrap();

    assert_eq!(result.page_data.total_items, 2);
}

#[test]
fn test_numeric_range_and_constant_together() {
    let (test_db, user_id) = seeded("test_numeric_range.db", &["a", "b", "c", "d"]);

    let result = search(
        &test_db.repo(),
        Collection::Tasks,
        raw(json!({
            "range": {"key": "id"},
            "rangeLowerBound": 2,
            "rangeUpperBound": 3,
            "constant": {"user": user_id, "$sort": {"id": 1}}
        })),
    )
    .unwrap();

    assert_eq!(names(&result), vec!["b", "c"]);
}

#[test]
fn test_missing_range_key_is_rejected() {
    let (test_db, _) = seeded("test_missing_range_key.db", &["a"]);

    let result = search(
        &test_db.repo(),
        Collection::Tasks,
        raw(json!({"rangeLowerBound": 1})),
    );

    assert!(matches!(result, Err(SearchError::Validation(msg)) if msg == "Must specify range key"));
}

#[test]
fn test_unknown_constant_field_is_rejected_by_store() {
    let (test_db, _) = seeded("test_unknown_constant.db", &["a"]);

    let result = search(
        &test_db.repo(),
        Collection::Tasks,
        raw(json!({"constant": {"colour": "red"}})),
    );

    assert!(matches!(
        result,
        Err(SearchError::Store(RepositoryError::ValidationError(_)))
    ));
}

#[test]
fn test_repeated_search_is_idempotent() {
    let (test_db, _) = seeded("test_idempotent.db", &["a", "b", "c", "d", "e", "f"]);
    let query = json!({"size": 4, "pageNo": 2});

    let first = search(&test_db.repo(), Collection::Tasks, raw(query.clone())).unwrap();
    let second = search(&test_db.repo(), Collection::Tasks, raw(query)).unwrap();

    assert_eq!(first.data, second.data);
    assert_eq!(first.page_data, second.page_data);
}

#[test]
fn test_categories_and_users_are_searchable() {
    let (test_db, user_id) = seeded("test_other_collections.db", &[]);

    let categories = search(
        &test_db.repo(),
        Collection::Categories,
        raw(json!({"constant": {"user": user_id}})),
    )
    .unwrap();
    let users = search(
        &test_db.repo(),
        Collection::Users,
        raw(json!({"email": "jane example"})),
    )
    .unwrap();

    assert_eq!(categories.data[0]["name"], json!("Errands"));
    assert_eq!(users.data[0]["firstName"], json!("Jane"));
}
