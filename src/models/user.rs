use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::types::{PersonName, TypeConstraintError, UserEmail, UserId, UserStatus};
use crate::domain::user::{NewUser as DomainNewUser, User as DomainUser};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
/// Diesel model for [`crate::domain::user::User`].
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
/// Insertable form of [`User`].
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub avatar: &'a str,
    pub status: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(user.id)?,
            first_name: PersonName::new(user.first_name)?,
            last_name: PersonName::new(user.last_name)?,
            email: UserEmail::new(user.email)?,
            password_hash: user.password_hash,
            avatar: user.avatar,
            status: user.status.parse()?,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}

impl<'a> NewUser<'a> {
    /// Borrows the domain value, stamping both timestamps with `now`.
    pub fn from_domain(user: &'a DomainNewUser, now: NaiveDateTime) -> Self {
        Self {
            first_name: user.first_name.as_str(),
            last_name: user.last_name.as_str(),
            email: user.email.as_str(),
            password_hash: user.password_hash.as_str(),
            avatar: user.avatar.as_str(),
            status: user.status.as_str(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn db_user_converts_to_domain() {
        let now = Utc::now().naive_utc();
        let db = User {
            id: 4,
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            password_hash: "$argon2id$stub".into(),
            avatar: "https://example.com/a.png".into(),
            status: "ACTIVE".into(),
            created_at: now,
            updated_at: now,
        };

        let user = DomainUser::try_from(db).unwrap();

        assert_eq!(user.id.get(), 4);
        assert_eq!(user.status, UserStatus::Active);
        assert_eq!(user.password_hash, "$argon2id$stub");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let now = Utc::now().naive_utc();
        let db = User {
            id: 1,
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            password_hash: String::new(),
            avatar: String::new(),
            status: "BANNED".into(),
            created_at: now,
            updated_at: now,
        };

        assert!(DomainUser::try_from(db).is_err());
    }
}
