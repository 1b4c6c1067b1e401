use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, delete, get, patch, post, web};

use crate::forms::search::parse_search_query;
use crate::forms::task::{AddTaskForm, EditTaskForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{error_response, respond};
use crate::services::task as task_service;

#[post("/tasks")]
pub async fn add_task(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddTaskForm>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    respond(
        "Failed to create task",
        StatusCode::CREATED,
        Some("Task created successfully!"),
        move || task_service::create_task(&repo, &user, form),
    )
    .await
}

/// Query string follows the search convention, e.g.
/// `?constant[status]=PENDING&date[key]=dueDate&endDateSearch=2024-06-01&name=milk`.
#[get("/tasks")]
pub async fn search_tasks(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let raw = match parse_search_query(req.query_string()) {
        Ok(raw) => raw,
        Err(err) => return error_response("Failed to search tasks", err.into()),
    };
    let repo = repo.get_ref().clone();
    respond("Failed to search tasks", StatusCode::OK, None, move || {
        task_service::search_tasks(&repo, &user, raw)
    })
    .await
}

#[get("/tasks/{task_id}")]
pub async fn show_task(
    task_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let task_id = task_id.into_inner();
    respond("Failed to load task", StatusCode::OK, None, move || {
        task_service::get_task(&repo, &user, task_id)
    })
    .await
}

#[patch("/tasks/{task_id}")]
pub async fn edit_task(
    task_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<EditTaskForm>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let task_id = task_id.into_inner();
    respond(
        "Failed to update task",
        StatusCode::OK,
        Some("Task updated successfully!"),
        move || task_service::update_task(&repo, &user, task_id, form),
    )
    .await
}

#[delete("/tasks/{task_id}")]
pub async fn delete_task(
    task_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let task_id = task_id.into_inner();
    respond(
        "Failed to delete task",
        StatusCode::OK,
        Some("Task deleted successfully!"),
        move || task_service::delete_task(&repo, &user, task_id),
    )
    .await
}
