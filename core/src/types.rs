//! Domain types for the task service.
//!
//! # Design
//! `TaskStatus` is a closed enumeration: the wire and storage representations
//! are the variant names, matched case-sensitively. There is no transition
//! graph, so any status may follow any other. `TaskId` wraps the integer key
//! assigned by storage and owns the rules for parsing one out of a URL path.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier assigned by storage when a task is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a string could not be read as a [`TaskId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskIdError {
    #[error("task id is empty")]
    Empty,

    #[error("task id must be a non-negative integer, got {0:?}")]
    NotAnInteger(String),

    #[error("task id {0} is too large")]
    TooLarge(String),

    /// A well-formed unsigned id that storage can never assign.
    #[error("task id {0} is beyond the storage key range")]
    Unassignable(u64),
}

impl FromStr for TaskId {
    type Err = TaskIdError;

    /// Accepts unsigned decimal digits only. `"+1"`, `"-1"`, `" 1"` and
    /// `"1.0"` are all rejected. Anything up to `u64::MAX` is well formed;
    /// values above `i64::MAX` are reported as [`TaskIdError::Unassignable`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TaskIdError::Empty);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TaskIdError::NotAnInteger(s.to_string()));
        }
        let value = s
            .parse::<u64>()
            .map_err(|_| TaskIdError::TooLarge(s.to_string()))?;
        i64::try_from(value)
            .map(TaskId)
            .map_err(|_| TaskIdError::Unassignable(value))
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    ToDo,
    InProgress,
    Done,
}

/// Returned when a string names none of the [`TaskStatus`] variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown task status {0:?}, expected one of ToDo, InProgress, Done")]
pub struct UnknownStatus(pub String);

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::ToDo => "ToDo",
            TaskStatus::InProgress => "InProgress",
            TaskStatus::Done => "Done",
        }
    }

    /// True iff `value` is exactly one of the variant names.
    pub fn is_valid(value: &str) -> bool {
        value.parse::<TaskStatus>().is_ok()
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted task as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
