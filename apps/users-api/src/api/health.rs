//! Readiness check backed by a real database round trip.

use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use database::postgres::check_health_detailed;

/// `503` until the connection pool answers `SELECT 1`
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            let status = check_health_detailed(&state.db).await;
            tracing::debug!(
                response_time_ms = status.response_time_ms,
                healthy = status.healthy,
                "Database health check"
            );

            match status.message {
                Some(message) if !status.healthy => Err(message),
                _ => Ok(()),
            }
        }),
    )];

    run_health_checks(checks).await.into_response()
}
