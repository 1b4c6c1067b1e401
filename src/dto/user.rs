use serde::Serialize;

use crate::domain::user::User;

/// Body returned by a successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    pub auth_token: String,
}
