use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Configuration for the swarm engine.
#[allow(clippy::struct_excessive_bools)]
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Swarm {
    /// Directory the engine keeps its own state in.
    #[serde(default = "Swarm::default_storage")]
    pub storage: Utf8PathBuf,

    /// Directory downloaded files are written to. Falls back to `storage`
    /// when it is not set. It is created if it does not exist.
    #[serde(default = "Swarm::default_download_dir")]
    pub download_dir: Option<Utf8PathBuf>,

    /// Maximum number of peers per torrent. `0` keeps the engine default.
    #[serde(default = "Swarm::default_max_peers")]
    pub max_peers: u32,

    /// Enables peer discovery with the DHT.
    #[serde(default = "Swarm::default_dht")]
    pub dht: bool,

    /// Enables port forwarding with UPnP.
    #[serde(default = "Swarm::default_upnp")]
    pub upnp: bool,

    /// Peer protocols to use. Possible values are `tcp` and `utp`. Unknown
    /// values are ignored, and when no valid value is left both protocols
    /// are enabled.
    #[serde(default = "Swarm::default_protocols")]
    pub protocols: Vec<String>,

    /// Enables verbose engine logs.
    #[serde(default = "Swarm::default_debug")]
    pub debug: bool,
}

impl Default for Swarm {
    fn default() -> Self {
        Self {
            storage: Self::default_storage(),
            download_dir: Self::default_download_dir(),
            max_peers: Self::default_max_peers(),
            dht: Self::default_dht(),
            upnp: Self::default_upnp(),
            protocols: Self::default_protocols(),
            debug: Self::default_debug(),
        }
    }
}

impl Swarm {
    fn default_storage() -> Utf8PathBuf {
        Utf8PathBuf::from("./storage/htorrent/lib/data")
    }

    #[allow(clippy::unnecessary_wraps)]
    fn default_download_dir() -> Option<Utf8PathBuf> {
        None
    }

    fn default_max_peers() -> u32 {
        0
    }

    fn default_dht() -> bool {
        true
    }

    fn default_upnp() -> bool {
        true
    }

    fn default_protocols() -> Vec<String> {
        vec!["tcp".to_owned(), "utp".to_owned()]
    }

    fn default_debug() -> bool {
        false
    }

    /// The directory downloaded files end up in.
    #[must_use]
    pub fn download_dir(&self) -> &Utf8PathBuf {
        self.download_dir.as_ref().unwrap_or(&self.storage)
    }
}
