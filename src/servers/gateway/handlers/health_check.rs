use axum::Json;

use crate::servers::gateway::resources::{Report, Status};

/// Endpoint for container health check.
#[allow(clippy::unused_async)]
pub async fn health_check_handler() -> Json<Report> {
    Json(Report { status: Status::Ok })
}
