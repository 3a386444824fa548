//! Task API
//!
//! - `GET    /api/tasks`      → grouped task list
//! - `POST   /api/tasks`      → create a batch of tasks under one date
//! - `PUT    /api/tasks/:id`  → partial update of `done` and/or `content`
//! - `DELETE /api/tasks/:id`  → remove a task

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::info;

use crate::db;
use crate::models::{CreateTasksRequest, Task, TaskGroup, TaskPatch};
use crate::{ApiError, ApiResult, AppState};

/// GET /api/tasks
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskGroup>>> {
    let groups = db::tasks::list_task_groups(&state.db).await?;
    Ok(Json(groups))
}

/// POST /api/tasks
///
/// **Request:** `{"date": "2025-06-01", "tasks": ["buy milk", "call mom"]}`
/// **Response:** 201 `{"date": "2025-06-01", "tasks": [Task, ...]}`
///
/// Missing `date`/`tasks`, blank contents, or a non-JSON body → 400.
pub async fn create_tasks(
    State(state): State<AppState>,
    payload: Result<Json<CreateTasksRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TaskGroup>)> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let new_tasks = request.validate()?;

    let tasks = db::tasks::create_tasks(&state.db, &new_tasks).await?;
    info!(date = %new_tasks.date, count = tasks.len(), "Tasks added");

    Ok((
        StatusCode::CREATED,
        Json(TaskGroup {
            date: new_tasks.date,
            tasks,
        }),
    ))
}

/// PUT /api/tasks/:id
///
/// **Request:** `{"done": true}`, `{"content": "..."}`, or both.
/// Unknown id → 404.
pub async fn update_task(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let Json(patch) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let patch = patch.validate()?;

    let task = db::tasks::update_task(&state.db, id, &patch).await?;
    if !patch.is_empty() {
        info!(id, done = ?patch.done, content_changed = patch.content.is_some(), "Task updated");
    }

    Ok(Json(task))
}

/// DELETE /api/tasks/:id
pub async fn delete_task(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<String> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    db::tasks::delete_task(&state.db, id).await?;
    info!(id, "Task deleted");

    Ok(format!("Task {} deleted", id))
}

/// Build task routes
pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_tasks))
        .route("/api/tasks/:id", put(update_task).delete(delete_task))
}
