//! Download progress of the streamed files.
//!
//! Every time a file is streamed, a reporter task samples how many bytes of
//! the file have been downloaded. When the completion changed since the last
//! sample, it sends a progress event to the [`ProgressSink`]. The task ends
//! when the file is fully downloaded.
//!
//! Reporters are not bound to the HTTP request: they keep running when the
//! client disconnects. They are owned by [`Reporters`], which cancels all of
//! them when the gateway closes.
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use htorrent_primitives::metrics::{FileMetrics, TorrentMetrics};
#[cfg(test)]
use mockall::automock;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::swarm::{File, Swarm};

/// Receives the progress events.
///
/// It's called from the reporter tasks, concurrently.
#[cfg_attr(test, automock)]
pub trait ProgressSink: Send + Sync {
    /// `torrent` contains the magnet link as requested and the current number
    /// of peers, without files.
    fn progress(&self, torrent: TorrentMetrics, file: FileMetrics);
}

/// Logs the progress events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn progress(&self, torrent: TorrentMetrics, file: FileMetrics) {
        debug!(
            magnet = torrent.magnet,
            peers = torrent.peers,
            path = file.path,
            length = file.length,
            completed = file.completed,
            "Streaming"
        );
    }
}

/// The progress reporters of the running gateway.
pub struct Reporters {
    sink: Arc<dyn ProgressSink>,
    interval: Duration,
    tasks: Mutex<JoinSet<()>>,
    shutdown: CancellationToken,
}

impl Reporters {
    #[must_use]
    pub fn new(sink: Arc<dyn ProgressSink>, interval: Duration) -> Self {
        Self {
            sink,
            interval,
            tasks: Mutex::default(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Starts reporting the progress of a file.
    ///
    /// It does nothing after the reporters have been shut down.
    pub fn spawn(&self, magnet: String, swarm: Arc<dyn Swarm>, file: Arc<dyn File>) {
        let reporter = Reporter {
            magnet,
            swarm,
            file,
            sink: self.sink.clone(),
            interval: self.interval,
        };

        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);

        if self.shutdown.is_cancelled() {
            return;
        }

        while tasks.try_join_next().is_some() {}

        tasks.spawn(reporter.run(self.shutdown.clone()));
    }

    /// Number of reporters still running.
    #[must_use]
    pub fn active(&self) -> usize {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);

        while tasks.try_join_next().is_some() {}

        tasks.len()
    }

    /// Cancels all the reporters and waits for them to finish.
    pub async fn shutdown(&self) {
        let mut tasks = {
            let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            self.shutdown.cancel();
            std::mem::take(&mut *tasks)
        };

        while let Some(result) = tasks.join_next().await {
            if let Err(err) = result {
                warn!(%err, "Progress reporter failed");
            }
        }
    }
}

struct Reporter {
    magnet: String,
    swarm: Arc<dyn Swarm>,
    file: Arc<dyn File>,
    sink: Arc<dyn ProgressSink>,
    interval: Duration,
}

impl Reporter {
    async fn run(self, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);

        // The first tick completes immediately.
        interval.tick().await;

        let mut last_completed = 0;

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    debug!(path = self.file.path(), "Progress reporter cancelled");
                    return;
                }
                _ = interval.tick() => {}
            }

            let length = self.file.length();
            let completed = self.file.bytes_completed().min(length);
            let metrics = FileMetrics::new(self.file.path().to_owned(), length, completed);

            if metrics.is_complete() {
                debug!(path = self.file.path(), "File downloaded");
                return;
            }

            if completed != last_completed {
                self.sink.progress(
                    TorrentMetrics {
                        magnet: self.magnet.clone(),
                        info_hash: self.swarm.info_hash(),
                        peers: self.swarm.peers(),
                        files: Vec::new(),
                    },
                    metrics,
                );
            }

            last_completed = completed;
        }
    }
}
