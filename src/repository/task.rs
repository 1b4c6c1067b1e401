use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use serde_json::Value;

use crate::domain::search::{Collection, HardQuery, RangeBounds};
use crate::domain::task::{NewTask, Task, UpdateTask};
use crate::domain::types::{TaskId, UserId};
use crate::models::category::Category as DbCategory;
use crate::models::task::{NewTask as DbNewTask, Task as DbTask, UpdateTask as DbUpdateTask};
use crate::repository::document::{
    integer_bounds, integer_value, text_value, timestamp_bounds, timestamp_value, unknown_field,
    unsupported_range,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, TaskReader, TaskWriter};
use crate::schema::{categories, tasks};

/// Loads one task joined with its category.
fn load_task(
    conn: &mut SqliteConnection,
    id: i32,
    user_id: i32,
) -> RepositoryResult<Option<Task>> {
    let row = tasks::table
        .inner_join(categories::table)
        .filter(tasks::id.eq(id))
        .filter(tasks::user_id.eq(user_id))
        .select((DbTask::as_select(), DbCategory::as_select()))
        .first::<(DbTask, DbCategory)>(conn)
        .optional()?;

    Ok(row.map(Task::try_from).transpose()?)
}

impl TaskReader for DieselRepository {
    fn get_task_by_id(&self, id: TaskId, user_id: UserId) -> RepositoryResult<Option<Task>> {
        let mut conn = self.conn()?;
        load_task(&mut conn, id.get(), user_id.get())
    }
}

impl TaskWriter for DieselRepository {
    fn create_task(&self, new_task: &NewTask) -> RepositoryResult<Task> {
        let mut conn = self.conn()?;

        let insertable = DbNewTask::from_domain(new_task, Utc::now().naive_utc());

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let task_id = diesel::insert_into(tasks::table)
                .values(&insertable)
                .returning(tasks::id)
                .get_result::<i32>(conn)?;

            load_task(conn, task_id, new_task.user.get())?.ok_or(RepositoryError::NotFound)
        })
    }

    fn update_task(
        &self,
        id: TaskId,
        user_id: UserId,
        updates: &UpdateTask,
    ) -> RepositoryResult<Task> {
        let mut conn = self.conn()?;

        let changeset = DbUpdateTask::from_domain(updates, Utc::now().naive_utc());

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(id.get()))
                    .filter(tasks::user_id.eq(user_id.get())),
            )
            .set(&changeset)
            .execute(conn)?;

            if affected == 0 {
                return Err(RepositoryError::NotFound);
            }

            load_task(conn, id.get(), user_id.get())?.ok_or(RepositoryError::NotFound)
        })
    }

    fn delete_task(&self, id: TaskId, user_id: UserId) -> RepositoryResult<Task> {
        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let task = load_task(conn, id.get(), user_id.get())?.ok_or(RepositoryError::NotFound)?;

            diesel::delete(
                tasks::table
                    .filter(tasks::id.eq(id.get()))
                    .filter(tasks::user_id.eq(user_id.get())),
            )
            .execute(conn)?;

            Ok(task)
        })
    }
}

/// Loads task documents, each with its category embedded, matching the hard
/// conditions.
pub(crate) fn find_task_documents(
    conn: &mut SqliteConnection,
    query: &HardQuery,
) -> RepositoryResult<Vec<Value>> {
    let mut items = tasks::table
        .inner_join(categories::table)
        .select((DbTask::as_select(), DbCategory::as_select()))
        .into_boxed::<Sqlite>();

    for (field, value) in &query.equals {
        items = match field.as_str() {
            "id" => items.filter(tasks::id.eq(integer_value(field, value)?)),
            "name" => items.filter(tasks::name.eq(text_value(field, value)?)),
            "user" => items.filter(tasks::user_id.eq(integer_value(field, value)?)),
            "description" => items.filter(tasks::description.eq(text_value(field, value)?)),
            "category" => items.filter(tasks::category_id.eq(integer_value(field, value)?)),
            "dueDate" => items.filter(tasks::due_date.eq(timestamp_value(field, value)?)),
            "status" => items.filter(tasks::status.eq(text_value(field, value)?)),
            "priority" => items.filter(tasks::priority.eq(integer_value(field, value)?)),
            "frequency" => items.filter(tasks::frequency.eq(text_value(field, value)?)),
            "createdAt" => items.filter(tasks::created_at.eq(timestamp_value(field, value)?)),
            "updatedAt" => items.filter(tasks::updated_at.eq(timestamp_value(field, value)?)),
            _ => return Err(unknown_field(Collection::Tasks, field)),
        };
    }

    for range in &query.ranges {
        items = match (range.field.as_str(), &range.bounds) {
            ("dueDate", RangeBounds::Date { lower, upper }) => {
                let (lower, upper) = timestamp_bounds(lower, upper);
                items.filter(tasks::due_date.between(lower, upper))
            }
            ("createdAt", RangeBounds::Date { lower, upper }) => {
                let (lower, upper) = timestamp_bounds(lower, upper);
                items.filter(tasks::created_at.between(lower, upper))
            }
            ("updatedAt", RangeBounds::Date { lower, upper }) => {
                let (lower, upper) = timestamp_bounds(lower, upper);
                items.filter(tasks::updated_at.between(lower, upper))
            }
            ("priority", RangeBounds::Number { lower, upper }) => {
                let (lower, upper) = integer_bounds(*lower, *upper);
                items.filter(tasks::priority.between(lower, upper))
            }
            ("id", RangeBounds::Number { lower, upper }) => {
                let (lower, upper) = integer_bounds(*lower, *upper);
                items.filter(tasks::id.between(lower, upper))
            }
            (field, _) => return Err(unsupported_range(Collection::Tasks, field)),
        };
    }

    for key in &query.sort {
        items = match key.field.as_str() {
            "id" => then_order!(items, tasks::id, key.direction),
            "name" => then_order!(items, tasks::name, key.direction),
            "category" => then_order!(items, tasks::category_id, key.direction),
            "dueDate" => then_order!(items, tasks::due_date, key.direction),
            "status" => then_order!(items, tasks::status, key.direction),
            "priority" => then_order!(items, tasks::priority, key.direction),
            "frequency" => then_order!(items, tasks::frequency, key.direction),
            "createdAt" => then_order!(items, tasks::created_at, key.direction),
            "updatedAt" => then_order!(items, tasks::updated_at, key.direction),
            field => return Err(unknown_field(Collection::Tasks, field)),
        };
    }
    if let Some(first) = query.sort.first() {
        items = then_order!(items, tasks::id, first.direction);
    }

    items
        .load::<(DbTask, DbCategory)>(conn)?
        .into_iter()
        .map(|row| -> RepositoryResult<Value> { Ok(serde_json::to_value(Task::try_from(row)?)?) })
        .collect()
}
