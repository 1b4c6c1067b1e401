//! Category create and update payloads.

use serde::Deserialize;
use validator::Validate;

use crate::domain::category::{NewCategory, UpdateCategory};
use crate::domain::types::{CategoryColor, CategoryName, UserId};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
pub struct AddCategoryForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub color: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditCategoryForm {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub color: Option<String>,
}

pub struct AddCategoryPayload {
    pub name: CategoryName,
    pub color: CategoryColor,
}

impl TryFrom<AddCategoryForm> for AddCategoryPayload {
    type Error = FormError;

    fn try_from(form: AddCategoryForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            name: CategoryName::new(form.name)?,
            color: CategoryColor::new(form.color)?,
        })
    }
}

impl AddCategoryPayload {
    pub fn into_domain(self, user: UserId) -> NewCategory {
        NewCategory::new(self.name, self.color, user)
    }
}

impl TryFrom<EditCategoryForm> for UpdateCategory {
    type Error = FormError;

    fn try_from(form: EditCategoryForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            name: form.name.map(CategoryName::new).transpose()?,
            color: form.color.map(CategoryColor::new).transpose()?,
        })
    }
}
