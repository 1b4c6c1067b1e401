//! JSON handlers mounted under `/api/v1`.

use actix_web::error::{InternalError, JsonPayloadError, PathError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

use crate::dto::api::ApiResponse;
use crate::services::{ServiceError, ServiceResult};

pub mod categories;
pub mod tasks;
pub mod users;

pub const API_PREFIX: &str = "/api/v1";

const NOT_FOUND: &str = "Not found";
const UNAUTHORIZED: &str = "Unauthorized";
const SERVER_ERROR: &str = "Unexpected server error";

/// Registers every API route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .service(users::signup)
            .service(users::login)
            .service(users::profile)
            .service(users::search_users)
            .service(categories::add_category)
            .service(categories::search_categories)
            .service(categories::show_category)
            .service(categories::edit_category)
            .service(categories::delete_category)
            .service(tasks::add_task)
            .service(tasks::search_tasks)
            .service(tasks::show_task)
            .service(tasks::edit_task)
            .service(tasks::delete_task),
    );
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        let response = bad_request(err.to_string());
        InternalError::from_response(err, response).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        let response = bad_request(err.to_string());
        InternalError::from_response(err, response).into()
    })
}

/// Fallback for every unmatched route.
pub async fn not_found() -> HttpResponse {
    not_found_response()
}

pub fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<()>::message(StatusCode::BAD_REQUEST, message))
}

/// Maps a failed workflow to its JSON response. Internal failures are logged
/// with `context` and never leak their details.
pub fn error_response(context: &str, err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Validation(message) | ServiceError::Conflict(message) => {
            bad_request(message)
        }
        ServiceError::Unauthorized => HttpResponse::Unauthorized().json(
            ApiResponse::<()>::message(StatusCode::UNAUTHORIZED, UNAUTHORIZED),
        ),
        ServiceError::NotFound => not_found_response(),
        ServiceError::Internal(message) => {
            log::error!("{context}: {message}");
            HttpResponse::InternalServerError().json(ApiResponse::<()>::message(
                StatusCode::INTERNAL_SERVER_ERROR,
                SERVER_ERROR,
            ))
        }
    }
}

fn not_found_response() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::message(StatusCode::NOT_FOUND, NOT_FOUND))
}

/// Runs `work` on the blocking thread pool and wraps its outcome in the
/// response envelope. `message` is attached to successful responses only.
pub async fn respond<T, F>(
    context: &'static str,
    status: StatusCode,
    message: Option<&'static str>,
    work: F,
) -> HttpResponse
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Serialize + Send + 'static,
{
    match web::block(work).await {
        Ok(Ok(data)) => {
            let body = match message {
                Some(message) => ApiResponse::with_message(status, message, data),
                None => ApiResponse::data(status, data),
            };
            HttpResponse::build(status).json(body)
        }
        Ok(Err(err)) => error_response(context, err),
        Err(err) => error_response(context, ServiceError::Internal(err.to_string())),
    }
}
