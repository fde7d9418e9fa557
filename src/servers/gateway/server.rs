//! Module to handle the gateway server instances.
//!
//! The [`Gateway`] is a state machine:
//!
//! ```text
//! Gateway<Stopped> --open()--> Gateway<Running> --close()
//!                                              --wait()
//! ```
//!
//! - `open` starts the swarm client and the HTTP server. It only fails if the
//!   download directory cannot be created or the engine cannot be started.
//!   The server is started in a background task: errors binding the socket
//!   are returned by `wait`.
//! - `close` stops the HTTP server, letting the in-flight requests finish
//!   during the grace period, then cancels the progress reporters and
//!   finally closes the swarm client.
//! - `wait` resolves when the HTTP server stops.
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use derive_more::{Constructor, Display};
use futures::FutureExt as _;
use htorrent_configuration::Configuration;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info};

use super::handlers::GatewayState;
use super::routes::router;
use crate::core::progress::{ProgressSink, Reporters};
use crate::core::swarm::{self, Client, Engine, Options};
use crate::servers::logging::STARTED_ON;

/// Errors starting, running or stopping the gateway.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("unable to create the download directory {path}: {source}")]
    UnableToCreateDownloadDirectory { path: Utf8PathBuf, source: Arc<std::io::Error> },

    #[error("unable to start the swarm engine: {source}")]
    UnableToStartEngine { source: swarm::Error },

    #[error("unable to serve on {addr}: {source}")]
    UnableToServe { addr: SocketAddr, source: Arc<std::io::Error> },

    #[error("the server task finished without reporting its status")]
    UnableToJoinServerTask,

    #[error("unable to close the swarm client: {source}")]
    Engine { source: swarm::Error },
}

/// The settings used every time the gateway is opened.
#[derive(Constructor, Clone, Debug, Display)]
#[display("bind_to: {bind_to}, grace period: {grace_period:?}, metadata timeout: {metadata_timeout:?}")]
pub struct Launcher {
    pub bind_to: SocketAddr,
    pub options: Options,
    pub grace_period: Duration,
    pub metadata_timeout: Option<Duration>,
    pub progress_interval: Duration,
}

impl From<&Configuration> for Launcher {
    fn from(config: &Configuration) -> Self {
        Self {
            bind_to: config.gateway.bind_address,
            options: Options::from(&config.swarm),
            grace_period: config.gateway.shutdown_grace_period(),
            metadata_timeout: config.gateway.metadata_timeout(),
            progress_interval: config.progress.interval(),
        }
    }
}

/// A stopped gateway.
pub type StoppedGateway = Gateway<Stopped>;

/// A running gateway.
pub type RunningGateway = Gateway<Running>;

/// The gateway controller.
pub struct Gateway<S> {
    pub state: S,
}

/// A stopped gateway state.
pub struct Stopped {
    launcher: Launcher,
    engine: Arc<dyn Engine>,
    sink: Arc<dyn ProgressSink>,
}

/// A running gateway state.
pub struct Running {
    handle: axum_server::Handle<SocketAddr>,
    status: watch::Receiver<Option<Result<(), Error>>>,
    client: Arc<dyn Client>,
    reporters: Arc<Reporters>,
    grace_period: Duration,
    /// The result of the first close.
    closed: Mutex<Option<Result<(), Error>>>,
}

impl Gateway<Stopped> {
    #[must_use]
    pub fn new(launcher: Launcher, engine: Arc<dyn Engine>, sink: Arc<dyn ProgressSink>) -> Self {
        Self {
            state: Stopped { launcher, engine, sink },
        }
    }

    /// It starts the swarm client and the HTTP server.
    ///
    /// # Errors
    ///
    /// Will return an error if the download directory cannot be created or if
    /// the swarm engine cannot be started.
    pub async fn open(self) -> Result<Gateway<Running>, Error> {
        let Stopped { launcher, engine, sink } = self.state;

        info!(target: "GATEWAY", %launcher, "Opening");

        let download_dir = launcher.options.download_dir.clone();

        tokio::fs::create_dir_all(&download_dir)
            .await
            .map_err(|err| Error::UnableToCreateDownloadDirectory {
                path: download_dir,
                source: Arc::new(err),
            })?;

        let client = engine
            .start(launcher.options.clone())
            .await
            .map_err(|source| Error::UnableToStartEngine { source })?;

        let reporters = Arc::new(Reporters::new(sink, launcher.progress_interval));

        let state = Arc::new(GatewayState {
            client: client.clone(),
            reporters: reporters.clone(),
            metadata_timeout: launcher.metadata_timeout,
        });

        let handle = axum_server::Handle::new();
        let (tx_status, rx_status) = watch::channel(None);

        let addr = launcher.bind_to;
        let server = axum_server::bind(addr)
            .handle(handle.clone())
            .serve(router(state).into_make_service());

        tokio::spawn(async move {
            let result = server.await.map_err(|err| Error::UnableToServe {
                addr,
                source: Arc::new(err),
            });

            match &result {
                Ok(()) => info!(target: "GATEWAY", "Stopped"),
                Err(err) => error!(target: "GATEWAY", %err, "Server failed"),
            }

            tx_status.send_replace(Some(result));
        });

        let listening = handle.clone();
        let mut started = rx_status.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                addr = listening.listening() => {
                    if let Some(addr) = addr {
                        info!(target: "GATEWAY", "{STARTED_ON}: http://{addr}");
                    }
                }
                _ = started.changed() => {}
            }
        });

        Ok(Gateway {
            state: Running {
                handle,
                status: rx_status,
                client,
                reporters,
                grace_period: launcher.grace_period,
                closed: Mutex::new(None),
            },
        })
    }
}

impl Gateway<Running> {
    /// The address the server is listening on, once it's bound. `None` if
    /// the server stopped before.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        let mut status = self.state.status.clone();

        tokio::select! {
            biased;
            addr = self.state.handle.listening() => addr,
            _ = status.wait_for(Option::is_some) => self.state.handle.listening().now_or_never().flatten(),
        }
    }

    /// The swarm client of the gateway.
    #[must_use]
    pub fn client(&self) -> Arc<dyn Client> {
        self.state.client.clone()
    }

    /// Number of progress reporters still running.
    #[must_use]
    pub fn active_reporters(&self) -> usize {
        self.state.reporters.active()
    }

    /// It stops the HTTP server, the progress reporters and the swarm client,
    /// in that order. Closing a closed gateway only returns the result of the
    /// first close, waiting for it if it's still ongoing.
    ///
    /// # Errors
    ///
    /// Will return the first error closing the swarm client that is not
    /// caused by the cancellation of its operations.
    pub async fn close(&self) -> Result<(), Error> {
        let mut closed = self.state.closed.lock().await;

        if let Some(result) = closed.as_ref() {
            return result.clone();
        }

        let result = self.shutdown().await;

        *closed = Some(result.clone());

        result
    }

    async fn shutdown(&self) -> Result<(), Error> {
        info!(target: "GATEWAY", grace_period = ?self.state.grace_period, "Closing");

        self.state.handle.graceful_shutdown(Some(self.state.grace_period));

        if let Err(err) = self.wait().await {
            debug!(target: "GATEWAY", %err, "The server had already failed");
        }

        self.state.reporters.shutdown().await;

        let first_error = self
            .state
            .client
            .close()
            .await
            .into_iter()
            .find(|err| !err.is_cancellation())
            .map(|source| Error::Engine { source });

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// It waits until the HTTP server stops.
    ///
    /// # Errors
    ///
    /// Will return the error that stopped the server, like being unable to
    /// bind the socket.
    pub async fn wait(&self) -> Result<(), Error> {
        let mut status = self.state.status.clone();

        let result = status
            .wait_for(Option::is_some)
            .await
            .map_err(|_| Error::UnableToJoinServerTask)?
            .clone();

        result.unwrap_or(Err(Error::UnableToJoinServerTask))
    }
}
