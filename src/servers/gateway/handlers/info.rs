//! Handler for the `GET /info?magnet=<magnet link>` endpoint.
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use htorrent_primitives::info::Info;

use super::{GatewayState, MagnetQuery};
use crate::core::error::Error;
use crate::core::services::info::get_info;

/// It responds with the [`Info`] of the torrent as JSON.
///
/// # Errors
///
/// See [`responses`](crate::servers::gateway::responses) for the status codes.
pub async fn handle(State(state): State<Arc<GatewayState>>, Query(query): Query<MagnetQuery>) -> Result<Json<Info>, Error> {
    let info = get_info(state.client.as_ref(), &query.magnet, state.metadata_timeout).await?;

    Ok(Json(info))
}
