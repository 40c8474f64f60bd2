//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use serde_json::Value;

use crate::state::AppState;

/// `GET /api/ready`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// Readiness check - pings MongoDB when it is the backend
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let mut checks: Vec<(&str, HealthCheckFuture<'_>)> = Vec::new();

    if let Some(mongo) = &state.mongo {
        checks.push((
            "mongodb",
            Box::pin(async move {
                let status = database::mongodb::check_health_detailed(&mongo.client).await;
                if status.healthy {
                    Ok(())
                } else {
                    Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
                }
            }),
        ));
    }

    run_health_checks(checks).await
}
