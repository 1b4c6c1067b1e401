use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use serde_json::Value;

use crate::domain::search::{Collection, HardQuery, RangeBounds};
use crate::domain::types::{UserEmail, UserId};
use crate::domain::user::{NewUser, User};
use crate::models::user::{NewUser as DbNewUser, User as DbUser};
use crate::repository::document::{
    integer_bounds, integer_value, text_value, timestamp_bounds, timestamp_value, unknown_field,
    unsupported_range,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, UserReader, UserWriter};
use crate::schema::users;

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let mut conn = self.conn()?;

        let user = users::table
            .find(id.get())
            .select(DbUser::as_select())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(User::try_from).transpose()?)
    }

    fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>> {
        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::email.eq(email.as_str()))
            .select(DbUser::as_select())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(User::try_from).transpose()?)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        let mut conn = self.conn()?;

        let insertable = DbNewUser::from_domain(new_user, Utc::now().naive_utc());

        let user = diesel::insert_into(users::table)
            .values(&insertable)
            .returning(DbUser::as_returning())
            .get_result::<DbUser>(&mut conn)?;

        Ok(User::try_from(user)?)
    }
}

/// Loads user documents matching the hard conditions. Password hashes are not
/// queryable and never appear in the documents.
pub(crate) fn find_user_documents(
    conn: &mut SqliteConnection,
    query: &HardQuery,
) -> RepositoryResult<Vec<Value>> {
    let mut items = users::table
        .select(DbUser::as_select())
        .into_boxed::<Sqlite>();

    for (field, value) in &query.equals {
        items = match field.as_str() {
            "id" => items.filter(users::id.eq(integer_value(field, value)?)),
            "firstName" => items.filter(users::first_name.eq(text_value(field, value)?)),
            "lastName" => items.filter(users::last_name.eq(text_value(field, value)?)),
            "email" => items.filter(users::email.eq(text_value(field, value)?)),
            "avatar" => items.filter(users::avatar.eq(text_value(field, value)?)),
            "status" => items.filter(users::status.eq(text_value(field, value)?)),
            "createdAt" => items.filter(users::created_at.eq(timestamp_value(field, value)?)),
            "updatedAt" => items.filter(users::updated_at.eq(timestamp_value(field, value)?)),
            _ => return Err(unknown_field(Collection::Users, field)),
        };
    }

    for range in &query.ranges {
        items = match (range.field.as_str(), &range.bounds) {
            ("createdAt", RangeBounds::Date { lower, upper }) => {
                let (lower, upper) = timestamp_bounds(lower, upper);
                items.filter(users::created_at.between(lower, upper))
            }
            ("updatedAt", RangeBounds::Date { lower, upper }) => {
                let (lower, upper) = timestamp_bounds(lower, upper);
                items.filter(users::updated_at.between(lower, upper))
            }
            ("id", RangeBounds::Number { lower, upper }) => {
                let (lower, upper) = integer_bounds(*lower, *upper);
                items.filter(users::id.between(lower, upper))
            }
            (field, _) => return Err(unsupported_range(Collection::Users, field)),
        };
    }

    for key in &query.sort {
        items = match key.field.as_str() {
            "id" => then_order!(items, users::id, key.direction),
            "firstName" => then_order!(items, users::first_name, key.direction),
            "lastName" => then_order!(items, users::last_name, key.direction),
            "email" => then_order!(items, users::email, key.direction),
            "status" => then_order!(items, users::status, key.direction),
            "createdAt" => then_order!(items, users::created_at, key.direction),
            "updatedAt" => then_order!(items, users::updated_at, key.direction),
            field => return Err(unknown_field(Collection::Users, field)),
        };
    }
    if let Some(first) = query.sort.first() {
        items = then_order!(items, users::id, first.direction);
    }

    items
        .load::<DbUser>(conn)?
        .into_iter()
        .map(|row| -> RepositoryResult<Value> {
            Ok(serde_json::to_value(User::try_from(row)?)?)
        })
        .collect()
}
