//! Task create and update payloads.

use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::task::{NewTask, UpdateTask};
use crate::domain::types::{
    CategoryId, TaskDescription, TaskFrequency, TaskName, TaskPriority, TaskStatus, UserId,
    is_storable, parse_datetime,
};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddTaskForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub category: i32,
    #[validate(length(min = 1))]
    pub due_date: String,
    pub status: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub priority: Option<i32>,
    pub frequency: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EditTaskForm {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub category: Option<i32>,
    pub due_date: Option<String>,
    pub status: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub priority: Option<i32>,
    pub frequency: Option<String>,
}

pub struct AddTaskPayload {
    pub name: TaskName,
    pub description: TaskDescription,
    pub category: CategoryId,
    pub due_date: NaiveDateTime,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub frequency: TaskFrequency,
}

fn due_date(value: &str) -> Result<NaiveDateTime, FormError> {
    parse_datetime(value)
        .ok()
        .filter(is_storable)
        .map(|instant| instant.naive_utc())
        .ok_or(FormError::InvalidDueDate)
}

fn status(value: &str) -> Result<TaskStatus, FormError> {
    value.parse().map_err(|_| FormError::InvalidStatus)
}

fn priority(value: i32) -> Result<TaskPriority, FormError> {
    TaskPriority::new(value).map_err(|_| FormError::InvalidPriority)
}

fn frequency(value: &str) -> Result<TaskFrequency, FormError> {
    value.parse().map_err(|_| FormError::InvalidFrequency)
}

fn category(value: i32) -> Result<CategoryId, FormError> {
    CategoryId::new(value).map_err(|_| FormError::InvalidCategoryId)
}

impl TryFrom<AddTaskForm> for AddTaskPayload {
    type Error = FormError;

    fn try_from(form: AddTaskForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            name: TaskName::new(form.name)?,
            description: TaskDescription::new(form.description)?,
            category: category(form.category)?,
            due_date: due_date(&form.due_date)?,
            status: form.status.as_deref().map(status).transpose()?.unwrap_or_default(),
            priority: form.priority.map(priority).transpose()?.unwrap_or_default(),
            frequency: form
                .frequency
                .as_deref()
                .map(frequency)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

impl AddTaskPayload {
    pub fn into_domain(self, user: UserId) -> NewTask {
        NewTask {
            name: self.name,
            user,
            description: self.description,
            category: self.category,
            due_date: self.due_date,
            status: self.status,
            priority: self.priority,
            frequency: self.frequency,
        }
    }
}

impl TryFrom<EditTaskForm> for UpdateTask {
    type Error = FormError;

    fn try_from(form: EditTaskForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            name: form.name.map(TaskName::new).transpose()?,
            description: form.description.map(TaskDescription::new).transpose()?,
            category: form.category.map(category).transpose()?,
            due_date: form.due_date.as_deref().map(due_date).transpose()?,
            status: form.status.as_deref().map(status).transpose()?,
            priority: form.priority.map(priority).transpose()?,
            frequency: form.frequency.as_deref().map(frequency).transpose()?,
        })
    }
}
