//! Handler for the `GET /metrics` endpoint.
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use htorrent_primitives::metrics::TorrentMetrics;

use super::GatewayState;
use crate::core::services::metrics::get_metrics;

#[allow(clippy::unused_async)]
pub async fn handle(State(state): State<Arc<GatewayState>>) -> Json<Vec<TorrentMetrics>> {
    Json(get_metrics(state.client.as_ref()))
}
