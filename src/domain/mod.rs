//! Domain aggregates exposed by the task service layer.

pub mod category;
pub mod search;
pub mod task;
pub mod types;
pub mod user;
