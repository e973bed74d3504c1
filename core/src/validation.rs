//! Incoming task payloads and the checks applied before anything is stored.
//!
//! # Design
//! `TaskPayload` is deliberately loose (missing strings decode as empty,
//! `status` stays a raw string) so that every rejection is reported by
//! [`TaskPayload::validate`] with the offending field, rather than as an opaque
//! decode failure. Only caller-controlled fields exist here: an `id`,
//! `createdAt` or `updatedAt` in the body is dropped by serde and can never
//! reach storage.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::types::TaskStatus;

/// Request body for create and update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A payload that passed validation.
///
/// `status` is `None` when the caller left it out or sent an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}

impl TaskDraft {
    /// Fill in `ToDo` when no status was supplied.
    pub fn with_default_status(mut self) -> Self {
        self.status.get_or_insert_with(TaskStatus::default);
        self
    }
}

/// The first field of a payload that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl TaskPayload {
    /// Check `title`, `description` and `status`, in that order.
    pub fn validate(self) -> Result<TaskDraft, ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::new("title", "is required"));
        }
        if self.description.is_empty() {
            return Err(ValidationError::new("description", "is required"));
        }
        let status = match self.status.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<TaskStatus>()
                    .map_err(|e| ValidationError::new("status", e.to_string()))?,
            ),
        };
        Ok(TaskDraft {
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            status,
        })
    }
}
