//! Session state - ownership records and the append-only interaction log.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Timestamp;

/// Default display name for a fresh session.
pub const DEFAULT_DISPLAY_NAME: &str = "Valued Customer";

/// A single course ownership record.
///
/// At most one record per course id exists in a state's owned courses at
/// any time; the operation layer enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Catalog id of the purchased course.
    pub course_id: String,
    /// When the purchase happened. Anchors the refund window.
    pub purchased_at: Timestamp,
}

/// Audited state transition kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    Purchase,
    Refund,
}

impl fmt::Display for LogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogAction::Purchase => write!(f, "purchase"),
            LogAction::Refund => write!(f, "refund"),
        }
    }
}

/// One entry in the append-only interaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub action: LogAction,
    pub course_id: String,
    pub timestamp: Timestamp,
}

/// Mutable per-user state shared by all agents.
///
/// Owned exclusively by its `Session`. Insertion order of `owned_courses`
/// is purchase order; `interaction_log` is append-only and chronological.
/// Mutators are crate-internal: only operation execution (behind the
/// application boundary) may change state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    display_name: String,
    owned_courses: Vec<PurchaseRecord>,
    interaction_log: Vec<LogEntry>,
}

impl SessionState {
    /// Creates the deterministic initial state for a new session.
    pub fn initial() -> Self {
        Self::with_display_name(DEFAULT_DISPLAY_NAME)
    }

    /// Creates an initial state with a custom display name.
    pub fn with_display_name(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            owned_courses: Vec::new(),
            interaction_log: Vec::new(),
        }
    }

    /// Returns the user's display name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns ownership records in purchase order.
    pub fn owned_courses(&self) -> &[PurchaseRecord] {
        &self.owned_courses
    }

    /// Returns the interaction log in chronological order.
    pub fn interaction_log(&self) -> &[LogEntry] {
        &self.interaction_log
    }

    /// Returns true if a record for the course id exists.
    pub fn owns(&self, course_id: &str) -> bool {
        self.find_purchase(course_id).is_some()
    }

    /// Finds the ownership record for a course id, if any.
    pub fn find_purchase(&self, course_id: &str) -> Option<&PurchaseRecord> {
        self.owned_courses
            .iter()
            .find(|record| record.course_id == course_id)
    }

    /// Appends an ownership record.
    ///
    /// Callers must have checked `owns` first; this does not deduplicate.
    pub(crate) fn record_purchase(&mut self, course_id: impl Into<String>, at: Timestamp) {
        self.owned_courses.push(PurchaseRecord {
            course_id: course_id.into(),
            purchased_at: at,
        });
    }

    /// Removes every ownership record matching the course id.
    ///
    /// Returns the number of records removed.
    pub(crate) fn remove_owned(&mut self, course_id: &str) -> usize {
        let before = self.owned_courses.len();
        self.owned_courses.retain(|record| record.course_id != course_id);
        before - self.owned_courses.len()
    }

    /// Appends an entry to the interaction log.
    pub(crate) fn append_log(
        &mut self,
        action: LogAction,
        course_id: impl Into<String>,
        at: Timestamp,
    ) {
        self.interaction_log.push(LogEntry {
            action,
            course_id: course_id.into(),
            timestamp: at,
        });
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}
