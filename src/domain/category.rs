use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryColor, CategoryId, CategoryName, UserId};

/// Grouping label owned by a single user.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub color: CategoryColor,
    /// Owner of the category.
    pub user: UserId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCategory {
    pub name: CategoryName,
    pub color: CategoryColor,
    pub user: UserId,
}

impl NewCategory {
    #[must_use]
    pub fn new(name: CategoryName, color: CategoryColor, user: UserId) -> Self {
        Self { name, color, user }
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateCategory {
    pub name: Option<CategoryName>,
    pub color: Option<CategoryColor>,
}
