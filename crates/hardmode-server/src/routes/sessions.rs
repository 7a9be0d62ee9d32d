//! Legacy session routes.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use hardmode_core::{NewSession, PomodoroSession};
use serde::Deserialize;

use super::{json_body, parse_optional_id};
use crate::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct SessionsQuery {
    task_id: Option<String>,
}

async fn list_sessions(
    State(state): State<AppState>,
    Query(query): Query<SessionsQuery>,
) -> AppResult<Json<Vec<PomodoroSession>>> {
    let task_id = parse_optional_id(query.task_id.as_deref(), "task")?;
    let sessions = state
        .with_store(move |store| store.sessions().list(task_id))
        .await?;
    Ok(Json(sessions))
}

async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<NewSession>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PomodoroSession>)> {
    let input = json_body(payload)?;
    let session = state
        .with_store(move |store| store.sessions().create(&input))
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sessions", get(list_sessions).post(create_session))
}
