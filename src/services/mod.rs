//! Business workflows invoked by the HTTP handlers.

use thiserror::Error;

use crate::domain::types::{TypeConstraintError, UserId};
use crate::forms::FormError;
use crate::models::auth::{AuthError, AuthenticatedUser};
use crate::repository::errors::RepositoryError;
use crate::search::SearchError;

pub mod category;
pub mod task;
pub mod user;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    /// The request was understood but is not acceptable. The message is
    /// returned to the client.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ValidationError(message) => ServiceError::Validation(message),
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<SearchError> for ServiceError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Validation(message) => ServiceError::Validation(message),
            SearchError::Store(err) => ServiceError::from(err),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Signing(message) => ServiceError::Internal(message),
            AuthError::MissingConfig => ServiceError::Internal(err.to_string()),
            _ => ServiceError::Unauthorized,
        }
    }
}

/// Resolves the owner id carried by the token.
pub fn current_user_id(user: &AuthenticatedUser) -> ServiceResult<UserId> {
    Ok(user.user_id()?)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::domain::category::Category;
    use crate::domain::types::{CategoryColor, CategoryId, CategoryName, UserId};
    use crate::models::auth::AuthenticatedUser;

    pub fn token_user(id: i32) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: id.to_string(),
            email: "jane@example.com".to_string(),
            exp: 0,
        }
    }

    pub fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    pub fn category(id: i32, owner: i32) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new("Work").unwrap(),
            color: CategoryColor::new("#ff0000").unwrap(),
            user: UserId::new(owner).unwrap(),
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_errors_map_to_service_errors() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::ValidationError("bad".into())),
            ServiceError::Validation(message) if message == "bad"
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::ConstraintViolation("dup".into())),
            ServiceError::Conflict(_)
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::ConnectionError("down".into())),
            ServiceError::Internal(_)
        ));
    }

    #[test]
    fn search_validation_stays_a_validation_error() {
        let err = ServiceError::from(SearchError::Validation("Must specify date key".into()));

        assert_eq!(err.to_string(), "Must specify date key");
    }

    #[test]
    fn token_subject_must_be_a_user_id() {
        let mut user = test_support::token_user(3);
        assert_eq!(current_user_id(&user).unwrap().get(), 3);

        user.sub = "nope".to_string();
        assert!(matches!(
            current_user_id(&user),
            Err(ServiceError::Unauthorized)
        ));
    }
}
