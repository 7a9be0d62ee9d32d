//! Day planner routes.
//!
//! `{day}` is a `YYYY-MM-DD` date for lookups and a numeric id everywhere
//! else, so every route under `/api/days/` shares one parameter name.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use hardmode_core::{Day, DaySummary, DayUpsert, Reflection};
use serde_json::{json, Value};

use super::{json_body, parse_id};
use crate::error::AppResult;
use crate::state::AppState;

async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<Day>> {
    let day = state.with_store(move |store| store.days().get(&date)).await?;
    Ok(Json(day))
}

async fn upsert_day(
    State(state): State<AppState>,
    payload: Result<Json<DayUpsert>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Day>)> {
    let input = json_body(payload)?;
    let outcome = state
        .with_store(move |store| store.days().upsert(&input))
        .await?;
    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(outcome.day)))
}

async fn update_reflection(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Reflection>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id, "day")?;
    let reflection = json_body(payload)?;
    state
        .with_store(move |store| store.days().update_reflection(id, &reflection))
        .await?;
    Ok(Json(json!({ "status": "ok" })))
}

async fn delete_day(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id, "day")?;
    state.with_store(move |store| store.days().delete(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn day_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DaySummary>> {
    let id = parse_id(&id, "day")?;
    let summary = state
        .with_store(move |store| store.stats().day_summary(id))
        .await?;
    Ok(Json(summary))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/days", post(upsert_day))
        .route("/api/days/{day}", get(get_day).delete(delete_day))
        .route("/api/days/{day}/reflection", put(update_reflection))
        .route("/api/days/{day}/summary", get(day_summary))
}
