//! Routes for tasks planned on a day.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use hardmode_core::{DailyTask, DailyTaskUpdate, NewDailyTask};

use super::{json_body, parse_id};
use crate::error::AppResult;
use crate::state::AppState;

async fn list_daily_tasks(
    State(state): State<AppState>,
    Path(day_id): Path<String>,
) -> AppResult<Json<Vec<DailyTask>>> {
    let day_id = parse_id(&day_id, "day")?;
    let tasks = state
        .with_store(move |store| store.daily_tasks().list(day_id))
        .await?;
    Ok(Json(tasks))
}

async fn create_daily_task(
    State(state): State<AppState>,
    Path(day_id): Path<String>,
    payload: Result<Json<NewDailyTask>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DailyTask>)> {
    let day_id = parse_id(&day_id, "day")?;
    let input = json_body(payload)?;
    let task = state
        .with_store(move |store| store.daily_tasks().create(day_id, &input))
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn get_daily_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DailyTask>> {
    let id = parse_id(&id, "task")?;
    let task = state
        .with_store(move |store| store.daily_tasks().get(id))
        .await?;
    Ok(Json(task))
}

async fn update_daily_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<DailyTaskUpdate>, JsonRejection>,
) -> AppResult<Json<DailyTask>> {
    let id = parse_id(&id, "task")?;
    let update = json_body(payload)?;
    let task = state
        .with_store(move |store| store.daily_tasks().update(id, &update))
        .await?;
    Ok(Json(task))
}

async fn delete_daily_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, "task")?;
    state
        .with_store(move |store| store.daily_tasks().delete(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/days/{day}/tasks",
            get(list_daily_tasks).post(create_daily_task),
        )
        .route(
            "/api/daily-tasks/{id}",
            get(get_daily_task)
                .put(update_daily_task)
                .delete(delete_daily_task),
        )
}
