//! Pomodoro ledger routes.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use hardmode_core::{LedgerFilter, NewPomodoro, PomodoroDetail};
use serde::Deserialize;

use super::{json_body, parse_id, parse_optional_id};
use crate::error::AppResult;
use crate::state::AppState;

/// Raw query string; blank values are treated as absent filters.
#[derive(Debug, Deserialize)]
struct PomodoroQuery {
    day_id: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl PomodoroQuery {
    fn into_filter(self) -> AppResult<LedgerFilter> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Ok(LedgerFilter {
            day_id: parse_optional_id(self.day_id.as_deref(), "day")?,
            start_date: non_blank(self.start_date),
            end_date: non_blank(self.end_date),
        })
    }
}

async fn list_pomodoros(
    State(state): State<AppState>,
    Query(query): Query<PomodoroQuery>,
) -> AppResult<Json<Vec<PomodoroDetail>>> {
    let filter = query.into_filter()?;
    let entries = state
        .with_store(move |store| store.ledger().query(&filter))
        .await?;
    Ok(Json(entries))
}

async fn create_pomodoro(
    State(state): State<AppState>,
    payload: Result<Json<NewPomodoro>, JsonRejection>,
) -> AppResult<(StatusCode, Json<PomodoroDetail>)> {
    let input = json_body(payload)?;
    let entry = state
        .with_store(move |store| store.ledger().append(&input))
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn get_pomodoro(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PomodoroDetail>> {
    let id = parse_id(&id, "pomodoro")?;
    let entry = state.with_store(move |store| store.ledger().get(id)).await?;
    Ok(Json(entry))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pomodoros", get(list_pomodoros).post(create_pomodoro))
        .route("/api/pomodoros/{id}", get(get_pomodoro))
}
