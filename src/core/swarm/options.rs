//! Options to start a swarm client.
use camino::Utf8PathBuf;
use htorrent_configuration::Swarm;
use tracing::{info, warn};

/// Options every engine receives when it's started.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Directory for the engine state.
    pub storage: Utf8PathBuf,
    /// Directory for the downloaded files. It's the storage directory when
    /// no other directory was configured.
    pub download_dir: Utf8PathBuf,
    /// Maximum number of peers per torrent. `None` keeps the engine default.
    pub max_peers: Option<u32>,
    pub dht: bool,
    pub upnp: bool,
    pub protocols: Protocols,
    pub debug: bool,
}

impl From<&Swarm> for Options {
    fn from(config: &Swarm) -> Self {
        let max_peers = (config.max_peers > 0).then_some(config.max_peers);

        if let Some(max_peers) = max_peers {
            info!(max_peers, "Maximum peers configured");
        }

        info!(dht = config.dht, upnp = config.upnp, "Peer discovery configured");

        Self {
            storage: config.storage.clone(),
            download_dir: config.download_dir().clone(),
            max_peers,
            dht: config.dht,
            upnp: config.upnp,
            protocols: Protocols::parse(&config.protocols),
            debug: config.debug,
        }
    }
}

/// Peer protocols enabled for the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Protocols {
    pub tcp: bool,
    pub utp: bool,
}

impl Default for Protocols {
    fn default() -> Self {
        Self { tcp: true, utp: true }
    }
}

impl Protocols {
    /// Builds the protocol set from an allow-list.
    ///
    /// An empty list keeps both protocols. Unknown entries are skipped, and
    /// when no entry is valid both protocols are enabled, so the client is
    /// never left without a transport.
    pub fn parse<S: AsRef<str>>(list: &[S]) -> Self {
        if list.is_empty() {
            return Self::default();
        }

        let mut protocols = Self { tcp: false, utp: false };

        for protocol in list {
            match protocol.as_ref().trim() {
                "tcp" => {
                    protocols.tcp = true;
                    info!("TCP protocol enabled");
                }
                "utp" => {
                    protocols.utp = true;
                    info!("uTP protocol enabled");
                }
                unknown => warn!(protocol = unknown, "Unknown protocol, skipping"),
            }
        }

        if !protocols.tcp && !protocols.utp {
            warn!("No valid protocols specified, enabling both TCP and uTP");

            return Self::default();
        }

        protocols
    }
}
