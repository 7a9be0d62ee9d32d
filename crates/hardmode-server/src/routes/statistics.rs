use axum::{extract::State, routing::get, Json, Router};
use hardmode_core::Statistics;

use crate::error::AppResult;
use crate::state::AppState;

async fn get_statistics(State(state): State<AppState>) -> AppResult<Json<Statistics>> {
    let stats = state.with_store(|store| store.stats().compute()).await?;
    Ok(Json(stats))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/statistics", get(get_statistics))
}
