//! Mock repository implementations for isolating services in tests.

use mockall::mock;
use serde_json::Value;

use crate::domain::category::{Category, NewCategory, UpdateCategory};
use crate::domain::search::{Collection, HardQuery};
use crate::domain::task::{NewTask, Task, UpdateTask};
use crate::domain::types::{CategoryId, TaskId, UserEmail, UserId};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CategoryReader, CategoryWriter, DocumentStore, TaskReader, TaskWriter, UserReader, UserWriter,
};

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    }

    impl CategoryReader for Repository {
        fn get_category_by_id(
            &self,
            id: CategoryId,
            user_id: UserId,
        ) -> RepositoryResult<Option<Category>>;
    }

    impl CategoryWriter for Repository {
        fn create_category(&self, new_category: &NewCategory) -> RepositoryResult<Category>;
        fn update_category(
            &self,
            id: CategoryId,
            user_id: UserId,
            updates: &UpdateCategory,
        ) -> RepositoryResult<Category>;
        fn delete_category(&self, id: CategoryId, user_id: UserId) -> RepositoryResult<Category>;
    }

    impl TaskReader for Repository {
        fn get_task_by_id(&self, id: TaskId, user_id: UserId) -> RepositoryResult<Option<Task>>;
    }

    impl TaskWriter for Repository {
        fn create_task(&self, new_task: &NewTask) -> RepositoryResult<Task>;
        fn update_task(
            &self,
            id: TaskId,
            user_id: UserId,
            updates: &UpdateTask,
        ) -> RepositoryResult<Task>;
        fn delete_task(&self, id: TaskId, user_id: UserId) -> RepositoryResult<Task>;
    }

    impl DocumentStore for Repository {
        fn find_documents(
            &self,
            collection: Collection,
            query: &HardQuery,
        ) -> RepositoryResult<Vec<Value>>;
    }
}
