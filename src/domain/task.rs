use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::types::{
    CategoryId, TaskDescription, TaskFrequency, TaskId, TaskName, TaskPriority, TaskStatus, UserId,
};

/// A task with its category embedded, the shape returned by every read.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: TaskName,
    /// Owner of the task.
    pub user: UserId,
    pub description: TaskDescription,
    pub category: Category,
    pub due_date: NaiveDateTime,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub frequency: TaskFrequency,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewTask {
    pub name: TaskName,
    pub user: UserId,
    pub description: TaskDescription,
    pub category: CategoryId,
    pub due_date: NaiveDateTime,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub frequency: TaskFrequency,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateTask {
    pub name: Option<TaskName>,
    pub description: Option<TaskDescription>,
    pub category: Option<CategoryId>,
    pub due_date: Option<NaiveDateTime>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub frequency: Option<TaskFrequency>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::domain::types::{CategoryColor, CategoryName};

    #[test]
    fn task_serializes_with_embedded_category() {
        let stamp = NaiveDate::from_ymd_opt(2021, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let task = Task {
            id: TaskId::new(3).unwrap(),
            name: TaskName::new("Write report").unwrap(),
            user: UserId::new(1).unwrap(),
            description: TaskDescription::new("quarterly").unwrap(),
            category: Category {
                id: CategoryId::new(2).unwrap(),
                name: CategoryName::new("Work").unwrap(),
                color: CategoryColor::new("#fff").unwrap(),
                user: UserId::new(1).unwrap(),
                created_at: stamp,
                updated_at: stamp,
            },
            due_date: stamp,
            status: TaskStatus::InProgress,
            priority: TaskPriority::new(2).unwrap(),
            frequency: TaskFrequency::Weekly,
            created_at: stamp,
            updated_at: stamp,
        };

        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["category"]["name"], json!("Work"));
        assert_eq!(value["dueDate"], json!("2021-01-02T03:04:05"));
        assert_eq!(value["status"], json!("IN_PROGRESS"));
        assert_eq!(value["priority"], json!(2));
        assert_eq!(value["user"], json!(1));
    }
}
