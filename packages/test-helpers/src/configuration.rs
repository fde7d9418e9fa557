use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use camino::Utf8PathBuf;
use htorrent_configuration::{Configuration, Threshold};

use crate::random;

/// This configuration is used for testing. It generates random config values so they do not collide
/// if you run more than one gateway at the same time.
///
/// # Panics
///
/// Will panic if the temp directory path is not valid UTF-8.
#[must_use]
pub fn ephemeral() -> Configuration {
    let mut config = Configuration::default();

    config.logging.threshold = Threshold::Off; // Change to `debug` for tests debugging

    // Ephemeral socket address for the gateway
    config.gateway.bind_address = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0);
    config.gateway.shutdown_grace_period = 1;

    // Ephemeral storage directory
    let temp_directory = Utf8PathBuf::from_path_buf(env::temp_dir()).expect("the temp directory should be valid UTF-8");
    config.swarm.storage = temp_directory.join(format!("htorrent_{}", random::string(16)));

    // Tests never reach real peers
    config.swarm.dht = false;
    config.swarm.upnp = false;

    config.progress.interval_ms = 10;

    config
}

/// Ephemeral configuration with a separate download directory.
#[must_use]
pub fn ephemeral_with_download_dir() -> Configuration {
    let mut config = ephemeral();

    config.swarm.download_dir = Some(config.swarm.storage.join("downloads"));

    config
}
