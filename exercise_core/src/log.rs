//! Appending exercises to a user's log.

use crate::dates::{parse_date, parse_duration};
use crate::store::UserStore;
use crate::{Error, ExerciseEntry, FieldError, Result, User};
use chrono::{DateTime, Utc};

/// Duration as supplied by a caller
///
/// Request bodies carry numbers or strings depending on how they were posted.
#[derive(Clone, Debug, PartialEq)]
pub enum DurationInput {
    Minutes(i64),
    Fractional(f64),
    Text(String),
}

impl DurationInput {
    /// Whole minutes, or `None` if the value has no integer reading
    pub fn minutes(&self) -> Option<i64> {
        match self {
            DurationInput::Minutes(m) => Some(*m),
            DurationInput::Fractional(f) if f.is_finite() => Some(f.trunc() as i64),
            DurationInput::Fractional(_) => None,
            DurationInput::Text(s) => parse_duration(s),
        }
    }
}

impl From<i64> for DurationInput {
    fn from(minutes: i64) -> Self {
        DurationInput::Minutes(minutes)
    }
}

impl From<i32> for DurationInput {
    fn from(minutes: i32) -> Self {
        DurationInput::Minutes(i64::from(minutes))
    }
}

impl From<&str> for DurationInput {
    fn from(text: &str) -> Self {
        DurationInput::Text(text.to_string())
    }
}

/// Unvalidated fields of an exercise to append
#[derive(Clone, Debug, Default)]
pub struct NewEntry {
    pub description: Option<String>,
    pub duration: Option<DurationInput>,
    pub date: Option<String>,
}

impl NewEntry {
    pub fn new(description: impl Into<String>, duration: impl Into<DurationInput>) -> Self {
        Self {
            description: Some(description.into()),
            duration: Some(duration.into()),
            date: None,
        }
    }

    pub fn on(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Validate into an entry, stamping `now` when the date is absent or
    /// unparsable
    pub fn into_entry(self, now: DateTime<Utc>) -> Result<ExerciseEntry> {
        let mut errors = Vec::new();

        let description = match self.description {
            Some(d) if !d.trim().is_empty() => Some(d),
            _ => {
                errors.push(FieldError::required("description"));
                None
            }
        };

        let duration = match self.duration {
            None => {
                errors.push(FieldError::required("duration"));
                None
            }
            Some(DurationInput::Text(ref s)) if s.trim().is_empty() => {
                errors.push(FieldError::required("duration"));
                None
            }
            Some(input) => {
                let minutes = input.minutes();
                if minutes.is_none() {
                    errors.push(FieldError::new(
                        "duration",
                        format!(
                            "Path `duration` must be a number of minutes, got {:?}.",
                            input_text(&input)
                        ),
                    ));
                }
                minutes
            }
        };

        let date = self
            .date
            .as_deref()
            .and_then(parse_date)
            .unwrap_or(now);

        match (description, duration) {
            (Some(description), Some(duration)) if errors.is_empty() => Ok(ExerciseEntry {
                description,
                duration,
                date,
            }),
            _ => Err(Error::Validation(errors)),
        }
    }
}

fn input_text(input: &DurationInput) -> String {
    match input {
        DurationInput::Minutes(m) => m.to_string(),
        DurationInput::Fractional(f) => f.to_string(),
        DurationInput::Text(s) => s.clone(),
    }
}

/// The user after an append, and the entry that was added
#[derive(Clone, Debug)]
pub struct AppendOutcome {
    pub user: User,
    pub entry: ExerciseEntry,
}

/// Append an exercise to a user's log and persist it
///
/// The log is re-sorted by date with a stable sort, so entries sharing a
/// timestamp keep insertion order, and `count` is recomputed before saving.
pub fn append_entry(
    store: &dyn UserStore,
    user: User,
    new_entry: NewEntry,
) -> Result<AppendOutcome> {
    append_entry_at(store, user, new_entry, Utc::now())
}

/// [`append_entry`] with an explicit clock
pub fn append_entry_at(
    store: &dyn UserStore,
    mut user: User,
    new_entry: NewEntry,
    now: DateTime<Utc>,
) -> Result<AppendOutcome> {
    let entry = new_entry.into_entry(now)?;

    user.log.push(entry.clone());
    user.log.sort_by_key(|e| e.date);
    user.count = user.log.len();

    let user = store.save(&user)?;
    tracing::debug!(
        "Appended {:?} ({} min) to user {}; {} entries",
        entry.description,
        entry.duration,
        user.id,
        user.count
    );

    Ok(AppendOutcome { user, entry })
}
