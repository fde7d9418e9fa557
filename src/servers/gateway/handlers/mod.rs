//! Axum [`handlers`](axum#handlers) for the gateway endpoints.
//!
//! Handlers extract the query parameters, call the
//! [`services`](crate::core::services) and convert the result into a
//! response. Errors are converted by the
//! [`responses`](crate::servers::gateway::responses) module.
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::core::progress::Reporters;
use crate::core::swarm::Client;

pub mod health_check;
pub mod info;
pub mod metrics;
pub mod stream;

/// State shared by the handlers.
pub struct GatewayState {
    pub client: Arc<dyn Client>,
    pub reporters: Arc<Reporters>,
    /// Deadline for the metadata of a swarm. No deadline when `None`.
    pub metadata_timeout: Option<Duration>,
}

/// Query of the `/info` endpoint.
#[derive(Deserialize, Debug, Default)]
pub struct MagnetQuery {
    #[serde(default)]
    pub magnet: String,
}

/// Query of the `/stream` endpoint.
#[derive(Deserialize, Debug, Default)]
pub struct StreamQuery {
    #[serde(default)]
    pub magnet: String,
    #[serde(default)]
    pub path: String,
}
