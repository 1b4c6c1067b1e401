#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use tempfile::TempDir;
use todo_list_api::db::{DbPool, establish_connection_pool, run_migrations};
use todo_list_api::domain::category::{Category, NewCategory};
use todo_list_api::domain::task::{NewTask, Task};
use todo_list_api::domain::types::{
    CategoryColor, CategoryName, PersonName, TaskDescription, TaskFrequency, TaskName,
    TaskPriority, TaskStatus, UserEmail, UserStatus,
};
use todo_list_api::domain::user::{NewUser, User};
use todo_list_api::repository::{CategoryWriter, DieselRepository, TaskWriter, UserWriter};

/// Migrated SQLite database living in a temporary directory that is removed
/// on drop.
pub struct TestDb {
    _dir: TempDir,
    path: PathBuf,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("create pool");
        run_migrations(&pool).expect("run migrations");

        Self {
            _dir: dir,
            path,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn create_user(repo: &DieselRepository, email: &str) -> User {
    let new_user = NewUser::new(
        PersonName::new("Jane").unwrap(),
        PersonName::new("Doe").unwrap(),
        UserEmail::new(email).unwrap(),
        "not-a-real-hash".to_string(),
        UserStatus::Active,
    );
    repo.create_user(&new_user).unwrap()
}

pub fn create_category(repo: &DieselRepository, user: &User, name: &str) -> Category {
    let new_category = NewCategory::new(
        CategoryName::new(name).unwrap(),
        CategoryColor::new("#00ff00").unwrap(),
        user.id,
    );
    repo.create_category(&new_category).unwrap()
}

/// Creates a task due on `2024-06-{day}` at noon.
pub fn create_task(
    repo: &DieselRepository,
    category: &Category,
    name: &str,
    day: u32,
    priority: i32,
    status: TaskStatus,
) -> Task {
    let new_task = NewTask {
        name: TaskName::new(name).unwrap(),
        user: category.user,
        description: TaskDescription::new(format!("About {name}")).unwrap(),
        category: category.id,
        due_date: NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
        status,
        priority: TaskPriority::new(priority).unwrap(),
        frequency: TaskFrequency::Never,
    };
    repo.create_task(&new_task).unwrap()
}
