//! Domain model for the task service.
//!
//! # Overview
//! Defines the `Task` record, its `TaskStatus` lifecycle enumeration, the
//! `TaskId` key and the validation applied to incoming payloads. No I/O and no
//! async: the server crate owns storage and transport.
//!
//! # Design
//! - `TaskPayload` is what a client sends; `TaskDraft` is what validation
//!   hands to storage. The two are separate so an unvalidated payload can
//!   never be persisted.
//! - Server-owned fields (`id`, `createdAt`, `updatedAt`) exist only on
//!   `Task`.

pub mod types;
pub mod validation;

pub use types::{Task, TaskId, TaskIdError, TaskStatus, UnknownStatus};
pub use validation::{TaskDraft, TaskPayload, ValidationError};
