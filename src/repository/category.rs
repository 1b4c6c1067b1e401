use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use serde_json::Value;

use crate::domain::category::{Category, NewCategory, UpdateCategory};
use crate::domain::search::{Collection, HardQuery, RangeBounds};
use crate::domain::types::{CategoryId, UserId};
use crate::models::category::{
    Category as DbCategory, NewCategory as DbNewCategory, UpdateCategory as DbUpdateCategory,
};
use crate::repository::document::{
    integer_bounds, integer_value, text_value, timestamp_bounds, timestamp_value, unknown_field,
    unsupported_range,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{CategoryReader, CategoryWriter, DieselRepository};
use crate::schema::categories;

impl CategoryReader for DieselRepository {
    fn get_category_by_id(
        &self,
        id: CategoryId,
        user_id: UserId,
    ) -> RepositoryResult<Option<Category>> {
        let mut conn = self.conn()?;

        let category = categories::table
            .filter(categories::id.eq(id.get()))
            .filter(categories::user_id.eq(user_id.get()))
            .select(DbCategory::as_select())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        Ok(category.map(Category::try_from).transpose()?)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category> {
        let mut conn = self.conn()?;

        let insertable = DbNewCategory::from_domain(new_category, Utc::now().naive_utc());

        let category = diesel::insert_into(categories::table)
            .values(&insertable)
            .returning(DbCategory::as_returning())
            .get_result::<DbCategory>(&mut conn)?;

        Ok(Category::try_from(category)?)
    }

    fn update_category(
        &self,
        id: CategoryId,
        user_id: UserId,
        updates: &UpdateCategory,
    ) -> RepositoryResult<Category> {
        let mut conn = self.conn()?;

        let changeset = DbUpdateCategory::from_domain(updates, Utc::now().naive_utc());

        let category = diesel::update(
            categories::table
                .filter(categories::id.eq(id.get()))
                .filter(categories::user_id.eq(user_id.get())),
        )
        .set(&changeset)
        .returning(DbCategory::as_returning())
        .get_result::<DbCategory>(&mut conn)?;

        Ok(Category::try_from(category)?)
    }

    fn delete_category(&self, id: CategoryId, user_id: UserId) -> RepositoryResult<Category> {
        let mut conn = self.conn()?;

        let category = diesel::delete(
            categories::table
                .filter(categories::id.eq(id.get()))
                .filter(categories::user_id.eq(user_id.get())),
        )
        .returning(DbCategory::as_returning())
        .get_result::<DbCategory>(&mut conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)?;

        Ok(Category::try_from(category)?)
    }
}

pub(crate) fn find_category_documents(
    conn: &mut SqliteConnection,
    query: &HardQuery,
) -> RepositoryResult<Vec<Value>> {
    let mut items = categories::table
        .select(DbCategory::as_select())
        .into_boxed::<Sqlite>();

    for (field, value) in &query.equals {
        items = match field.as_str() {
            "id" => items.filter(categories::id.eq(integer_value(field, value)?)),
            "name" => items.filter(categories::name.eq(text_value(field, value)?)),
            "color" => items.filter(categories::color.eq(text_value(field, value)?)),
            "user" => items.filter(categories::user_id.eq(integer_value(field, value)?)),
            "createdAt" => {
                items.filter(categories::created_at.eq(timestamp_value(field, value)?))
            }
            "updatedAt" => {
                items.filter(categories::updated_at.eq(timestamp_value(field, value)?))
            }
            _ => return Err(unknown_field(Collection::Categories, field)),
        };
    }

    for range in &query.ranges {
        items = match (range.field.as_str(), &range.bounds) {
            ("createdAt", RangeBounds::Date { lower, upper }) => {
                let (lower, upper) = timestamp_bounds(lower, upper);
                items.filter(categories::created_at.between(lower, upper))
            }
            ("updatedAt", RangeBounds::Date { lower, upper }) => {
                let (lower, upper) = timestamp_bounds(lower, upper);
                items.filter(categories::updated_at.between(lower, upper))
            }
            ("id", RangeBounds::Number { lower, upper }) => {
                let (lower, upper) = integer_bounds(*lower, *upper);
                items.filter(categories::id.between(lower, upper))
            }
            (field, _) => return Err(unsupported_range(Collection::Categories, field)),
        };
    }

    for key in &query.sort {
        items = match key.field.as_str() {
            "id" => then_order!(items, categories::id, key.direction),
            "name" => then_order!(items, categories::name, key.direction),
            "color" => then_order!(items, categories::color, key.direction),
            "user" => then_order!(items, categories::user_id, key.direction),
            "createdAt" => then_order!(items, categories::created_at, key.direction),
            "updatedAt" => then_order!(items, categories::updated_at, key.direction),
            field => return Err(unknown_field(Collection::Categories, field)),
        };
    }
    if let Some(first) = query.sort.first() {
        items = then_order!(items, categories::id, first.direction);
    }

    items
        .load::<DbCategory>(conn)?
        .into_iter()
        .map(|row| -> RepositoryResult<Value> {
            Ok(serde_json::to_value(Category::try_from(row)?)?)
        })
        .collect()
}
