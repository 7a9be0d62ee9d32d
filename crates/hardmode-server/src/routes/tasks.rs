//! Standalone task registry routes.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use hardmode_core::{NewTask, Task, TaskUpdate};

use super::{json_body, parse_id};
use crate::error::AppResult;
use crate::state::AppState;

async fn list_tasks(State(state): State<AppState>) -> AppResult<Json<Vec<Task>>> {
    let tasks = state.with_store(|store| store.tasks().list()).await?;
    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let input = json_body(payload)?;
    let task = state
        .with_store(move |store| store.tasks().create(&input))
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskUpdate>, JsonRejection>,
) -> AppResult<Json<Task>> {
    let id = parse_id(&id, "task")?;
    let update = json_body(payload)?;
    let task = state
        .with_store(move |store| store.tasks().update(id, &update))
        .await?;
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, "task")?;
    state.with_store(move |store| store.tasks().delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/{id}", put(update_task).delete(delete_task))
}
