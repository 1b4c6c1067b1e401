use serde_json::Value;

use crate::{
    db::{DbConnection, DbPool, get_connection},
    domain::{
        category::{Category, NewCategory, UpdateCategory},
        search::{Collection, HardQuery},
        task::{NewTask, Task, UpdateTask},
        types::{CategoryId, TaskId, UserEmail, UserId},
        user::{NewUser, User},
    },
    repository::errors::RepositoryResult,
};

/// Appends an ordering term to a boxed query in the requested direction.
macro_rules! then_order {
    ($query:expr, $column:expr, $direction:expr) => {
        match $direction {
            $crate::domain::search::SortDirection::Ascending => {
                $query.then_order_by($column.asc())
            }
            $crate::domain::search::SortDirection::Descending => {
                $query.then_order_by($column.desc())
            }
        }
    };
}

pub mod category;
pub mod document;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod task;
pub mod user;

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}

/// Category lookups are always scoped to the owning user.
pub trait CategoryReader {
    fn get_category_by_id(
        &self,
        id: CategoryId,
        user_id: UserId,
    ) -> RepositoryResult<Option<Category>>;
}

pub trait CategoryWriter {
    fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
    fn update_category(
        &self,
        id: CategoryId,
        user_id: UserId,
        updates: &UpdateCategory,
    ) -> RepositoryResult<Category>;
    fn delete_category(&self, id: CategoryId, user_id: UserId) -> RepositoryResult<Category>;
}

/// Task lookups are always scoped to the owning user.
pub trait TaskReader {
    fn get_task_by_id(&self, id: TaskId, user_id: UserId) -> RepositoryResult<Option<Task>>;
}

pub trait TaskWriter {
    fn create_task(&self, new_task: &NewTask) -> RepositoryResult<Task>;
    fn update_task(&self, id: TaskId, user_id: UserId, updates: &UpdateTask)
    -> RepositoryResult<Task>;
    fn delete_task(&self, id: TaskId, user_id: UserId) -> RepositoryResult<Task>;
}

/// Evaluates hard conditions natively and returns every matching record as a
/// JSON document, in the order requested by the query.
pub trait DocumentStore {
    fn find_documents(
        &self,
        collection: Collection,
        query: &HardQuery,
    ) -> RepositoryResult<Vec<Value>>;
}
