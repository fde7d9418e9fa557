use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use htorrent::core::progress::ProgressSink;
use htorrent::core::swarm::memory::MemoryEngine;
use htorrent::servers::gateway::server::{Error, Gateway, Launcher, Running, Stopped};
use htorrent_configuration::Configuration;
use htorrent_primitives::metrics::{FileMetrics, TorrentMetrics};

/// Keeps the progress events sent by the gateway.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(TorrentMetrics, FileMetrics)>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<(TorrentMetrics, FileMetrics)> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ProgressSink for RecordingSink {
    fn progress(&self, torrent: TorrentMetrics, file: FileMetrics) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push((torrent, file));
    }
}

pub struct Environment<S> {
    pub engine: MemoryEngine,
    pub sink: Arc<RecordingSink>,
    pub gateway: Gateway<S>,
}

impl Environment<Stopped> {
    pub fn new(configuration: &Arc<Configuration>) -> Self {
        let engine = MemoryEngine::default();
        let sink = Arc::new(RecordingSink::default());

        let gateway = Gateway::new(Launcher::from(configuration.as_ref()), Arc::new(engine.clone()), sink.clone());

        Self {
            engine,
            sink,
            gateway,
        }
    }

    pub async fn start(self) -> Environment<Running> {
        Environment {
            engine: self.engine,
            sink: self.sink,
            gateway: self.gateway.open().await.unwrap(),
        }
    }
}

impl Environment<Running> {
    pub async fn new(configuration: &Arc<Configuration>) -> Self {
        Environment::<Stopped>::new(configuration).start().await
    }

    pub async fn stop(self) -> Result<(), Error> {
        self.gateway.close().await
    }

    pub async fn bind_address(&self) -> SocketAddr {
        self.gateway.local_addr().await.expect("the gateway should be listening")
    }
}
