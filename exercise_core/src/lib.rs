#![forbid(unsafe_code)]

//! Core domain model and record keeping for the exercise tracker.
//!
//! This crate provides:
//! - Domain types (users, exercise entries, projections)
//! - User persistence (in-memory and JSON file stores)
//! - Log appends with sorted, counted logs
//! - Date-range and limit queries over a log

pub mod types;
pub mod error;
pub mod dates;
pub mod config;
pub mod logging;
pub mod store;
pub mod log;
pub mod query;

// Re-export commonly used types
pub use error::{Error, FieldError, Result};
pub use types::*;
pub use config::{Config, StorageBackend};
pub use store::{JsonFileStore, MemoryStore, UserStore};
pub use log::{append_entry, AppendOutcome, DurationInput, NewEntry};
pub use query::{query_log, LogQuery};
