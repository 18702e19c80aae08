//! Core domain types for the exercise tracker.
//!
//! This module defines:
//! - Users and their exercise logs
//! - Projections returned to frontends (summaries, log views)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::display_date;

// ============================================================================
// Stored Records
// ============================================================================

/// A single exercise performed by a user
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseEntry {
    pub description: String,
    /// Minutes
    pub duration: i64,
    pub date: DateTime<Utc>,
}

/// A user and their full exercise log
///
/// `count` mirrors `log.len()` and `log` is kept ascending by date. Both are
/// maintained by [`crate::log::append_entry`]; nothing else mutates the log.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub count: usize,
    pub log: Vec<ExerciseEntry>,
}

impl User {
    /// A freshly created user with an empty log
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            count: 0,
            log: Vec::new(),
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

// ============================================================================
// Projections
// ============================================================================

/// A user projected to id and username
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
}

/// An exercise entry with its date rendered for display
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryView {
    pub description: String,
    pub duration: i64,
    pub date: String,
}

impl From<&ExerciseEntry> for EntryView {
    fn from(entry: &ExerciseEntry) -> Self {
        EntryView {
            description: entry.description.clone(),
            duration: entry.duration,
            date: display_date(entry.date),
        }
    }
}

/// Result of a log query
///
/// `count` is the stored total, not the number of entries in `log`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogView {
    pub id: Uuid,
    pub username: String,
    pub count: usize,
    pub log: Vec<EntryView>,
}

/// Response shape for a newly added exercise
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseAdded {
    pub id: Uuid,
    pub username: String,
    pub date: String,
    pub duration: i64,
    pub description: String,
}

impl ExerciseAdded {
    pub fn new(user: &User, entry: &ExerciseEntry) -> Self {
        ExerciseAdded {
            id: user.id,
            username: user.username.clone(),
            date: display_date(entry.date),
            duration: entry.duration,
            description: entry.description.clone(),
        }
    }
}
