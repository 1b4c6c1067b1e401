use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, get, post, web};

use crate::forms::search::parse_search_query;
use crate::forms::user::{LoginForm, SignupForm};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{error_response, respond};
use crate::services::user as user_service;

#[post("/signup")]
pub async fn signup(
    repo: web::Data<DieselRepository>,
    web::Json(form): web::Json<SignupForm>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    respond(
        "Failed to sign up",
        StatusCode::CREATED,
        Some("User created successfully!"),
        move || user_service::signup(&repo, form),
    )
    .await
}

#[post("/login")]
pub async fn login(
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<LoginForm>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let server_config = server_config.into_inner();
    respond("Failed to log in", StatusCode::OK, None, move || {
        user_service::login(
            &repo,
            form,
            &server_config.secret,
            server_config.token_ttl_secs,
        )
    })
    .await
}

#[get("/users/profile")]
pub async fn profile(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> impl Responder {
    let repo = repo.get_ref().clone();
    respond("Failed to load profile", StatusCode::OK, None, move || {
        user_service::profile(&repo, &user)
    })
    .await
}

#[get("/users")]
pub async fn search_users(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let raw = match parse_search_query(req.query_string()) {
        Ok(raw) => raw,
        Err(err) => return error_response("Failed to search users", err.into()),
    };
    let repo = repo.get_ref().clone();
    respond("Failed to search users", StatusCode::OK, None, move || {
        user_service::search_users(&repo, &user, raw)
    })
    .await
}
