use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, delete, get, patch, post, web};

use crate::forms::category::{AddCategoryForm, EditCategoryForm};
use crate::forms::search::parse_search_query;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{error_response, respond};
use crate::services::category as category_service;

#[post("/categories")]
pub async fn add_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<AddCategoryForm>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    respond(
        "Failed to create category",
        StatusCode::CREATED,
        Some("Category created successfully!"),
        move || category_service::create_category(&repo, &user, form),
    )
    .await
}

#[get("/categories")]
pub async fn search_categories(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let raw = match parse_search_query(req.query_string()) {
        Ok(raw) => raw,
        Err(err) => return error_response("Failed to search categories", err.into()),
    };
    let repo = repo.get_ref().clone();
    respond("Failed to search categories", StatusCode::OK, None, move || {
        category_service::search_categories(&repo, &user, raw)
    })
    .await
}

#[get("/categories/{category_id}")]
pub async fn show_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let category_id = category_id.into_inner();
    respond("Failed to load category", StatusCode::OK, None, move || {
        category_service::get_category(&repo, &user, category_id)
    })
    .await
}

#[patch("/categories/{category_id}")]
pub async fn edit_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<EditCategoryForm>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let category_id = category_id.into_inner();
    respond(
        "Failed to update category",
        StatusCode::OK,
        Some("Category updated successfully!"),
        move || category_service::update_category(&repo, &user, category_id, form),
    )
    .await
}

#[delete("/categories/{category_id}")]
pub async fn delete_category(
    category_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let category_id = category_id.into_inner();
    respond(
        "Failed to delete category",
        StatusCode::OK,
        Some("Category deleted successfully!"),
        move || category_service::delete_category(&repo, &user, category_id),
    )
    .await
}
