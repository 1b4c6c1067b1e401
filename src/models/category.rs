use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{
    Category as DomainCategory, NewCategory as DomainNewCategory,
    UpdateCategory as DomainUpdateCategory,
};
use crate::domain::types::{CategoryColor, CategoryId, CategoryName, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::categories)]
/// Diesel model for [`crate::domain::category::Category`].
pub struct Category {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::categories)]
/// Insertable form of [`Category`].
pub struct NewCategory<'a> {
    pub name: &'a str,
    pub color: &'a str,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::categories)]
/// Data used when updating a [`Category`] record.
pub struct UpdateCategory<'a> {
    pub name: Option<&'a str>,
    pub color: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::new(category.id)?,
            name: CategoryName::new(category.name)?,
            color: CategoryColor::new(category.color)?,
            user: UserId::new(category.user_id)?,
            created_at: category.created_at,
            updated_at: category.updated_at,
        })
    }
}

impl<'a> NewCategory<'a> {
    pub fn from_domain(category: &'a DomainNewCategory, now: NaiveDateTime) -> Self {
        Self {
            name: category.name.as_str(),
            color: category.color.as_str(),
            user_id: category.user.get(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateCategory<'a> {
    pub fn from_domain(updates: &'a DomainUpdateCategory, now: NaiveDateTime) -> Self {
        Self {
            name: updates.name.as_ref().map(CategoryName::as_str),
            color: updates.color.as_ref().map(CategoryColor::as_str),
            updated_at: now,
        }
    }
}
