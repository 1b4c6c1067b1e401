use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{PersonName, UserEmail, UserId, UserStatus};

/// Base URL of the generated initials avatar assigned at signup.
pub const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/?background=164B26&color=fff&name=";

/// Registered account. The password hash never leaves the process.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: UserEmail,
    #[serde(skip)]
    pub password_hash: String,
    pub avatar: String,
    pub status: UserStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: UserEmail,
    pub password_hash: String,
    pub avatar: String,
    pub status: UserStatus,
}

impl NewUser {
    /// Builds an account with the default initials avatar.
    #[must_use]
    pub fn new(
        first_name: PersonName,
        last_name: PersonName,
        email: UserEmail,
        password_hash: String,
        status: UserStatus,
    ) -> Self {
        let avatar = default_avatar(&first_name, &last_name);
        Self {
            first_name,
            last_name,
            email,
            password_hash,
            avatar,
            status,
        }
    }
}

/// Initials avatar URL for the given names.
pub fn default_avatar(first_name: &PersonName, last_name: &PersonName) -> String {
    let name = format!("{first_name} {last_name}").replace(' ', "%20");
    format!("{AVATAR_BASE_URL}{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_gets_initials_avatar() {
        let user = NewUser::new(
            PersonName::new("jane").unwrap(),
            PersonName::new("DOE").unwrap(),
            UserEmail::new("jane@example.com").unwrap(),
            "hash".to_string(),
            UserStatus::Active,
        );

        assert_eq!(
            user.avatar,
            "https://ui-avatars.com/api/?background=164B26&color=fff&name=Jane%20Doe"
        );
    }
}
