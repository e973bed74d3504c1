//! HTTP handlers for the five task operations.
//!
//! Each handler is a straight pipeline that stops at the first failure, so a
//! rejected request never reaches the repository. Path ids arrive as raw
//! strings and bodies as raw bytes: parsing happens here, so every rejection
//! carries the structured error body and Update can check existence before it
//! looks at the body (a bad body on a missing id is a 404, not a 400).

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use task_core::{Task, TaskDraft, TaskId, TaskIdError, TaskPayload};

use crate::error::ApiError;
use crate::repository::TaskRepository;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn TaskRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }
}

/// The `{id}` segment as extracted by the router, before it is parsed.
type RawId = Result<Path<String>, PathRejection>;

/// A well-formed id too large for storage cannot name a task, so it is a 404
/// rather than a 400.
fn parse_id(raw: RawId) -> Result<TaskId, ApiError> {
    let Path(raw) = raw.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "rejected task path");
        ApiError::invalid_path(rejection)
    })?;
    raw.parse::<TaskId>().map_err(|e| {
        tracing::debug!(raw, error = %e, "rejected task id");
        match e {
            TaskIdError::Unassignable(_) => ApiError::TaskNotFound,
            other => ApiError::invalid_id(other),
        }
    })
}

fn decode_and_validate(body: &[u8]) -> Result<TaskDraft, ApiError> {
    let payload: TaskPayload = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "rejected task body");
        ApiError::invalid_body(e)
    })?;
    payload.validate().map_err(|e| {
        tracing::debug!(field = e.field, reason = %e.reason, "task failed validation");
        ApiError::from(e)
    })
}

pub async fn create_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let draft = decode_and_validate(&body)?.with_default_status();
    let task = state.repository.create(&draft).await?;
    tracing::info!(id = %task.id, status = %task.status, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state.repository.find_all().await?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    raw_id: RawId,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(raw_id)?;
    let task = state.repository.find_by_id(id).await?;
    Ok(Json(task))
}

/// Full replace of the caller-controlled fields. The id and creation time
/// always come from the stored record, whatever the body says; a body
/// without a status resets it to `ToDo`.
pub async fn update_task(
    State(state): State<AppState>,
    raw_id: RawId,
    body: Bytes,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(raw_id)?;
    let existing = state.repository.find_by_id(id).await?;
    let draft = decode_and_validate(&body)?;

    let replacement = Task {
        id: existing.id,
        title: draft.title,
        description: draft.description,
        due_date: draft.due_date,
        status: draft.status.unwrap_or_default(),
        created_at: existing.created_at,
        updated_at: existing.updated_at,
    };
    let task = state.repository.update(&replacement).await?;
    tracing::info!(id = %task.id, status = %task.status, "task updated");
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    raw_id: RawId,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(raw_id)?;
    state.repository.find_by_id(id).await?;
    state.repository.delete(id).await?;
    tracing::info!(%id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `/tasks/` with nothing after the slash: an empty id.
pub async fn missing_id() -> ApiError {
    tracing::debug!("rejected empty task id");
    ApiError::invalid_id(TaskIdError::Empty)
}
