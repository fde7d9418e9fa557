//! Gateway job starter.
//!
//! The [`gateway::start_job`](crate::bootstrap::jobs::gateway::start_job)
//! function opens the gateway with the swarm engine and returns its
//! controller, which the caller uses to close it and wait for it.
use std::sync::Arc;

use htorrent_configuration::Configuration;
use tracing::info;

use crate::core::progress::ProgressSink;
use crate::core::swarm::Engine;
use crate::servers::gateway::server::{Error, Gateway, Launcher, RunningGateway};

/// It opens the gateway.
///
/// # Errors
///
/// Will return an error if the download directory cannot be created or the
/// swarm engine cannot be started.
pub async fn start_job(config: &Configuration, engine: Arc<dyn Engine>, sink: Arc<dyn ProgressSink>) -> Result<RunningGateway, Error> {
    let launcher = Launcher::from(config);

    info!(target: "GATEWAY", "Starting on: http://{}", launcher.bind_to);

    Gateway::new(launcher, engine, sink).open().await
}
