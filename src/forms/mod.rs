//! Request payloads accepted by the JSON routes.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod category;
pub mod search;
pub mod task;
pub mod user;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error(
        "password must be at least 8 characters long and contain an upper case letter, a lower \
         case letter, a digit and one of #?!@$%^&*-"
    )]
    WeakPassword,

    #[error("invalid category id")]
    InvalidCategoryId,

    #[error("invalid due date")]
    InvalidDueDate,

    #[error("invalid status")]
    InvalidStatus,

    #[error("invalid priority")]
    InvalidPriority,

    #[error("invalid frequency")]
    InvalidFrequency,

    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    #[error("{0}")]
    TypeConstraint(#[from] TypeConstraintError),
}
