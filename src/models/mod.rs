//! Database models and process-level configuration.

#[cfg(feature = "server")]
pub mod auth;
pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod task;
pub mod user;
