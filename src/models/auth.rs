//! Bearer-token authentication.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::types::UserId;
use crate::domain::user::User;
use crate::dto::api::ApiResponse;
use crate::models::config::ServerConfig;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token subject is not a user id")]
    InvalidSubject,
    #[error("server configuration is not available")]
    MissingConfig,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingConfig | AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status == StatusCode::UNAUTHORIZED {
            "Unauthorized"
        } else {
            log::error!("Authentication failed: {self}");
            "Unexpected server error"
        };
        HttpResponse::build(status).json(ApiResponse::<()>::message(status, message))
    }
}

/// Claims carried by an access token and extracted from every guarded request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User id.
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Claims for `user` expiring `ttl_secs` from now.
    pub fn new(user: &User, ttl_secs: i64) -> Result<Self, AuthError> {
        let expires_at = Duration::try_seconds(ttl_secs)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                AuthError::Signing(format!("token lifetime {ttl_secs}s is out of range"))
            })?;
        Ok(Self {
            sub: user.id.to_string(),
            email: user.email.as_str().to_string(),
            exp: expires_at.timestamp().max(0) as usize,
        })
    }

    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub
            .parse::<i32>()
            .ok()
            .and_then(|id| UserId::new(id).ok())
            .ok_or(AuthError::InvalidSubject)
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, AuthError> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|err| AuthError::Signing(err.to_string()))
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, AuthError> {
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|err| AuthError::InvalidToken(err.to_string()))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AuthError> {
    let config = req
        .app_data::<web::Data<ServerConfig>>()
        .ok_or(AuthError::MissingConfig)?;

    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let user = AuthenticatedUser::from_jwt(token, &config.secret)?;
    user.user_id()?;
    Ok(user)
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).inspect_err(|err| log::debug!("Rejected request: {err}")))
    }
}
