//! Signup, login and profile workflows.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::domain::search::Collection;
use crate::domain::types::UserStatus;
use crate::domain::user::{NewUser, User};
use crate::dto::user::LoginResponse;
use crate::forms::user::{LoginForm, LoginPayload, SignupForm, SignupPayload};
use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryError;
use crate::repository::{DocumentStore, UserReader, UserWriter};
use crate::search::{self, PageResult, RawQuery};
use crate::services::{ServiceError, ServiceResult, current_user_id};

pub const DUPLICATE_EMAIL: &str = "A user with this email already exist";
pub const INVALID_CREDENTIALS: &str = "Incorrect email or password";
pub const INACTIVE_ACCOUNT: &str = "Account inactive, please activate";

/// Hashes `password` into a PHC string with a random salt.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ServiceError::Internal(format!("argon2: {err}")))
}

/// `false` for a wrong password and for a hash that cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            log::error!("Stored password hash is malformed: {err}");
            false
        }
    }
}

/// Registers a new account. New accounts are active straight away.
pub fn signup<R>(repo: &R, form: SignupForm) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    let payload = SignupPayload::try_from(form)?;

    if repo.get_user_by_email(&payload.email)?.is_some() {
        return Err(ServiceError::Conflict(DUPLICATE_EMAIL.to_string()));
    }

    let new_user = NewUser::new(
        payload.first_name,
        payload.last_name,
        payload.email,
        hash_password(&payload.password)?,
        UserStatus::Active,
    );

    repo.create_user(&new_user).map_err(|err| match err {
        RepositoryError::ConstraintViolation(_) => {
            ServiceError::Conflict(DUPLICATE_EMAIL.to_string())
        }
        other => {
            log::error!("Failed to create user: {other}");
            ServiceError::from(other)
        }
    })
}

/// Checks the credentials and issues an access token valid for `ttl_secs`.
pub fn login<R>(repo: &R, form: LoginForm, secret: &str, ttl_secs: i64) -> ServiceResult<LoginResponse>
where
    R: UserReader + ?Sized,
{
    let payload = LoginPayload::try_from(form)
        .map_err(|_| ServiceError::Validation(INVALID_CREDENTIALS.to_string()))?;

    let user = repo
        .get_user_by_email(&payload.email)?
        .ok_or_else(|| ServiceError::Validation(INVALID_CREDENTIALS.to_string()))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ServiceError::Validation(INVALID_CREDENTIALS.to_string()));
    }

    if user.status == UserStatus::Inactive {
        return Err(ServiceError::Validation(INACTIVE_ACCOUNT.to_string()));
    }

    let auth_token = AuthenticatedUser::new(&user, ttl_secs)?.to_jwt(secret)?;
    log::info!("User {} logged in", user.id);

    Ok(LoginResponse { user, auth_token })
}

pub fn profile<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    repo.get_user_by_id(current_user_id(user)?)?
        .ok_or(ServiceError::NotFound)
}

/// Searches every account. Only available to signed-in callers.
pub fn search_users<R>(repo: &R, user: &AuthenticatedUser, raw: RawQuery) -> ServiceResult<PageResult>
where
    R: DocumentStore + ?Sized,
{
    current_user_id(user)?;

    Ok(search::search(repo, Collection::Users, raw)?)
}
