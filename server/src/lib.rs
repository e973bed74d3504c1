//! HTTP service for task records.
//!
//! # Overview
//! `app` wires the five task routes onto an [`AppState`] holding the
//! repository. The storage pool is created by the caller and passed in through
//! the repository, so tests can run the same router over an in-memory
//! database or a stub.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod repository;

use std::any::Any;
use std::future::Future;

use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub use error::{ApiError, ErrorBody, ErrorDetail};
pub use handlers::AppState;
pub use repository::{RepositoryError, SqliteTaskRepository, TaskRepository};
pub use task_core::{Task, TaskId, TaskStatus};

pub fn app(state: AppState) -> Router {
    let routes = Router::new()
        .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/tasks/",
            get(handlers::missing_id)
                .put(handlers::missing_id)
                .delete(handlers::missing_id),
        )
        .route(
            "/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        );
    with_layers(routes).with_state(state)
}

/// Panics become a structured 500 inside the trace span.
fn with_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    run_until(listener, state, std::future::pending()).await
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn run_until<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown)
        .await
}
