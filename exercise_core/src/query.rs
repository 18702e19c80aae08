//! Read-time filtering of a user's log.

use crate::dates::parse_date;
use crate::{EntryView, LogView, User};
use chrono::{DateTime, Utc};

/// Filters applied when reading a log
///
/// Bounds are exclusive. `limit` applies after the date filters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl LogQuery {
    /// Build a query from raw parameters
    ///
    /// Empty or malformed values are ignored rather than rejected.
    pub fn parse(from: Option<&str>, to: Option<&str>, limit: Option<&str>) -> Self {
        LogQuery {
            from: from.and_then(parse_date),
            to: to.and_then(parse_date),
            limit: limit.and_then(|l| l.trim().parse().ok()),
        }
    }

    fn accepts(&self, date: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| date > from) && self.to.map_or(true, |to| date < to)
    }
}

/// Apply a query to a user's log
///
/// The user is not modified; `count` in the result is the stored total.
pub fn query_log(user: &User, query: &LogQuery) -> LogView {
    let log: Vec<EntryView> = user
        .log
        .iter()
        .filter(|entry| query.accepts(entry.date))
        .take(query.limit.unwrap_or(usize::MAX))
        .map(EntryView::from)
        .collect();

    tracing::debug!(
        "Queried log of user {}: {} of {} entries",
        user.id,
        log.len(),
        user.count
    );

    LogView {
        id: user.id,
        username: user.username.clone(),
        count: user.count,
        log,
    }
}
