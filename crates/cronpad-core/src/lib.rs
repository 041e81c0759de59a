//! `cronpad-core`: configuration and the shared error type for cronpad.

pub mod config;
pub mod error;

pub use config::CronpadConfig;
pub use error::{CronpadError, Result};
