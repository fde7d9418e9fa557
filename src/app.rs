//! Gateway application.
//!
//! The application has a single job: the HTTP gateway. The caller keeps the
//! running gateway to close it and to wait for it.
use std::sync::Arc;

use htorrent_configuration::Configuration;

use crate::bootstrap::jobs::gateway;
use crate::core::progress::ProgressSink;
use crate::core::swarm::Engine;
use crate::servers::gateway::server::{Error, RunningGateway};

/// It starts the gateway with the swarm engine.
///
/// # Errors
///
/// Will return an error if the gateway cannot be opened.
pub async fn start(config: &Configuration, engine: Arc<dyn Engine>, sink: Arc<dyn ProgressSink>) -> Result<RunningGateway, Error> {
    gateway::start_job(config, engine, sink).await
}
