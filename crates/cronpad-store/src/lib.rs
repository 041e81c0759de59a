//! `cronpad-store`: reading and replacing the backing job table.
//!
//! The table is owned by an external collaborator that offers exactly two
//! operations: list the current table, and atomically replace it from a file.
//! [`backend::BackingStore`] abstracts those two operations;
//! [`cli::CrontabCli`] drives the real `crontab` binary and
//! [`memory::MemoryStore`] keeps the table in memory for tests.
//!
//! [`manager::TableManager`] ties the store to the table model: it fetches
//! and parses, reconciles submitted entries against a fresh read, installs
//! the result, and re-reads the table to confirm what was actually stored.

pub mod backend;
pub mod cli;
pub mod error;
pub mod manager;
pub mod memory;

pub use backend::BackingStore;
pub use cli::CrontabCli;
pub use error::{Result, StoreError};
pub use manager::TableManager;
pub use memory::MemoryStore;
