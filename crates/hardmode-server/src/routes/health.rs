use axum::{routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    time: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
