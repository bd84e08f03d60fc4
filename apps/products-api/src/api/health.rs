//! Health check endpoints

use axum::{Router, extract::State, response::Response, routing::get};
use axum_helpers::{HealthCheckFuture, health_router, run_health_checks};
use database::mongodb::check_health;

use crate::state::AppState;

/// 200 once MongoDB answers a ping, else 503
async fn ready(State(state): State<AppState>) -> Response {
    let mongodb: HealthCheckFuture<'_> = Box::pin(async {
        check_health(&state.mongo_client)
            .await
            .map_err(|e| e.to_string())
    });

    run_health_checks(vec![("mongodb", mongodb)]).await
}

pub fn router(state: AppState) -> Router {
    let app = state.config.app;

    Router::new()
        .route("/ready", get(ready))
        .with_state(state)
        .merge(health_router(app))
}
