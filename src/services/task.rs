//! Task workflows. Every operation is scoped to the caller.

use serde_json::json;

use crate::domain::search::Collection;
use crate::domain::task::{Task, UpdateTask};
use crate::domain::types::{CategoryId, TaskId, UserId};
use crate::forms::task::{AddTaskForm, AddTaskPayload, EditTaskForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{CategoryReader, DocumentStore, TaskReader, TaskWriter};
use crate::search::{self, PageResult, RawQuery, SearchRequest};
use crate::services::{ServiceError, ServiceResult, current_user_id};

/// A task may only reference a category of the same owner.
fn ensure_category<R>(repo: &R, category_id: CategoryId, owner: UserId) -> ServiceResult<()>
where
    R: CategoryReader + ?Sized,
{
    match repo.get_category_by_id(category_id, owner)? {
        Some(_) => Ok(()),
        None => Err(ServiceError::Validation(format!(
            "Category {category_id} does not exist"
        ))),
    }
}

/// Validates the form, checks the category and stores a task owned by `user`.
pub fn create_task<R>(repo: &R, user: &AuthenticatedUser, form: AddTaskForm) -> ServiceResult<Task>
where
    R: CategoryReader + TaskWriter + ?Sized,
{
    let owner = current_user_id(user)?;
    let payload = AddTaskPayload::try_from(form)?;

    ensure_category(repo, payload.category, owner)?;

    let task = repo
        .create_task(&payload.into_domain(owner))
        .map_err(|err| {
            log::error!("Failed to create task: {err}");
            err
        })?;

    Ok(task)
}

pub fn get_task<R>(repo: &R, user: &AuthenticatedUser, task_id: i32) -> ServiceResult<Task>
where
    R: TaskReader + ?Sized,
{
    let owner = current_user_id(user)?;

    repo.get_task_by_id(TaskId::new(task_id)?, owner)?
        .ok_or(ServiceError::NotFound)
}

/// Applies a partial update. Moving a task to another category requires that
/// category to belong to the caller too.
pub fn update_task<R>(
    repo: &R,
    user: &AuthenticatedUser,
    task_id: i32,
    form: EditTaskForm,
) -> ServiceResult<Task>
where
    R: CategoryReader + TaskWriter + ?Sized,
{
    let owner = current_user_id(user)?;
    let task_id = TaskId::new(task_id)?;
    let updates = UpdateTask::try_from(form)?;

    if let Some(category_id) = updates.category {
        ensure_category(repo, category_id, owner)?;
    }

    let task = repo.update_task(task_id, owner, &updates).map_err(|err| {
        log::error!("Failed to update task {task_id}: {err}");
        err
    })?;

    Ok(task)
}

/// Deletes the task and returns it as it was before deletion.
pub fn delete_task<R>(repo: &R, user: &AuthenticatedUser, task_id: i32) -> ServiceResult<Task>
where
    R: TaskWriter + ?Sized,
{
    let owner = current_user_id(user)?;

    Ok(repo.delete_task(TaskId::new(task_id)?, owner)?)
}

/// Runs a search over the caller's tasks. Documents carry their populated
/// category.
pub fn search_tasks<R>(repo: &R, user: &AuthenticatedUser, raw: RawQuery) -> ServiceResult<PageResult>
where
    R: DocumentStore + ?Sized,
{
    let owner = current_user_id(user)?;
    let request = SearchRequest::from_raw(raw)?.scoped_to("user", json!(owner.get()));

    Ok(search::execute(repo, Collection::Tasks, &request)?)
}
