//! HTTP transport for hardmode.
//!
//! Every handler parses its request, runs one core operation through
//! [`AppState::with_store`] and serializes the result.

pub mod error;
pub mod routes;
pub mod state;

use axum::http::{HeaderValue, Method};
use axum::Router;
use hardmode_core::ServerConfig;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{AppError, AppResult};
pub use state::AppState;

/// Build the full application router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::tasks::router())
        .merge(routes::sessions::router())
        .merge(routes::statistics::router())
        .merge(routes::days::router())
        .merge(routes::daily_tasks::router())
        .merge(routes::pomodoros::router())
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}
