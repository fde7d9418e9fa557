//! Initialize configuration from file or env var.
//!
//! All environment variables are prefixed with `HTORRENT_`.
use htorrent_configuration::{Configuration, Info};

// Default values
pub const DEFAULT_PATH_CONFIG: &str = "./share/default/config/gateway.toml";

/// It loads the application configuration from the environment.
///
/// There are three methods to inject the configuration:
///
/// 1. By using a config file: `gateway.toml`.
/// 2. Environment variable: `HTORRENT_CONFIG_TOML`. The variable contains the
///    same contents as the `gateway.toml` file.
/// 3. One environment variable per option, like `HTORRENT_SWARM__MAX_PEERS`.
///
/// The later methods have priority over the former. The `PORT` environment
/// variable overrides the port of the gateway bind address.
///
/// Refer to the [configuration documentation](https://docs.rs/htorrent-configuration)
/// for the configuration options.
///
/// # Panics
///
/// Will panic if it can't load the configuration from either
/// `./share/default/config/gateway.toml` file or the env var
/// `HTORRENT_CONFIG_TOML`.
#[must_use]
pub fn initialize_configuration() -> Configuration {
    let info = Info::new(DEFAULT_PATH_CONFIG.to_string()).expect("it should load the configuration info");

    Configuration::load(&info).expect("it should load the configuration")
}
