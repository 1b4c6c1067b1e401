use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::Category as DomainCategory;
use crate::domain::task::{
    NewTask as DomainNewTask, Task as DomainTask, UpdateTask as DomainUpdateTask,
};
use crate::domain::types::{
    CategoryId, TaskDescription, TaskId, TaskName, TaskPriority, TypeConstraintError, UserId,
};
use crate::models::category::Category;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::tasks)]
#[diesel(belongs_to(Category, foreign_key = category_id))]
/// Diesel model for [`crate::domain::task::Task`].
pub struct Task {
    pub id: i32,
    pub name: String,
    pub user_id: i32,
    pub description: String,
    pub category_id: i32,
    pub due_date: NaiveDateTime,
    pub status: String,
    pub priority: i32,
    pub frequency: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::tasks)]
/// Insertable form of [`Task`].
pub struct NewTask<'a> {
    pub name: &'a str,
    pub user_id: i32,
    pub description: &'a str,
    pub category_id: i32,
    pub due_date: NaiveDateTime,
    pub status: &'a str,
    pub priority: i32,
    pub frequency: &'a str,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::tasks)]
/// Data used when updating a [`Task`] record.
pub struct UpdateTask<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub category_id: Option<i32>,
    pub due_date: Option<NaiveDateTime>,
    pub status: Option<&'a str>,
    pub priority: Option<i32>,
    pub frequency: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<(Task, Category)> for DomainTask {
    type Error = TypeConstraintError;

    fn try_from((task, category): (Task, Category)) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TaskId::new(task.id)?,
            name: TaskName::new(task.name)?,
            user: UserId::new(task.user_id)?,
            description: TaskDescription::new(task.description)?,
            category: DomainCategory::try_from(category)?,
            due_date: task.due_date,
            status: task.status.parse()?,
            priority: TaskPriority::new(task.priority)?,
            frequency: task.frequency.parse()?,
            created_at: task.created_at,
            updated_at: task.updated_at,
        })
    }
}

impl<'a> NewTask<'a> {
    pub fn from_domain(task: &'a DomainNewTask, now: NaiveDateTime) -> Self {
        Self {
            name: task.name.as_str(),
            user_id: task.user.get(),
            description: task.description.as_str(),
            category_id: task.category.get(),
            due_date: task.due_date,
            status: task.status.as_str(),
            priority: task.priority.get(),
            frequency: task.frequency.as_str(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl<'a> UpdateTask<'a> {
    pub fn from_domain(updates: &'a DomainUpdateTask, now: NaiveDateTime) -> Self {
        Self {
            name: updates.name.as_ref().map(TaskName::as_str),
            description: updates.description.as_ref().map(TaskDescription::as_str),
            category_id: updates.category.map(CategoryId::get),
            due_date: updates.due_date,
            status: updates.status.map(|status| status.as_str()),
            priority: updates.priority.map(TaskPriority::get),
            frequency: updates.frequency.map(|frequency| frequency.as_str()),
            updated_at: now,
        }
    }
}
