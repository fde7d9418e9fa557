//! Configuration data structures for the [htorrent gateway](https://docs.rs/htorrent).
//!
//! The gateway turns magnet links into HTTP resources. This crate contains
//! the settings for the HTTP listener, the swarm engine it drives and the
//! progress reporting of active streams.
//!
//! The current version for configuration is [`v1`].
pub mod v1;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Default timeout to let in-flight requests finish when the gateway is
/// closed.
pub const DEFAULT_SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(90);

// Environment variables

/// The whole `gateway.toml` file content. It has priority over the config file.
/// Even if the file is not on the default path.
const ENV_VAR_CONFIG_TOML: &str = "HTORRENT_CONFIG_TOML";

/// The `gateway.toml` file location.
pub const ENV_VAR_CONFIG_TOML_PATH: &str = "HTORRENT_CONFIG_TOML_PATH";

/// Prefix for the environment variables that override single options, for
/// example `HTORRENT_SWARM__MAX_PEERS=80`.
pub const ENV_VAR_PREFIX: &str = "HTORRENT_";

/// Port override used by container platforms.
pub const ENV_VAR_PORT: &str = "PORT";

pub type Configuration = v1::Configuration;
pub type Logging = v1::logging::Logging;
pub type Threshold = v1::logging::Threshold;
pub type Gateway = v1::gateway::Gateway;
pub type Swarm = v1::swarm::Swarm;
pub type Progress = v1::progress::Progress;

pub type DynError = Arc<dyn std::error::Error + Send + Sync>;

/// Information required for loading config
#[derive(Debug, Default, Clone)]
pub struct Info {
    config_toml: Option<String>,
    config_toml_path: String,
    port: Option<String>,
}

impl Info {
    /// Build Configuration Info
    ///
    /// # Errors
    ///
    /// Will return `Err` if unable to obtain a configuration.
    ///
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(default_config_toml_path: String) -> Result<Self, Error> {
        let config_toml = if let Ok(config_toml) = env::var(ENV_VAR_CONFIG_TOML) {
            println!("Loading extra configuration from environment variable:\n {config_toml}");
            Some(config_toml)
        } else {
            None
        };

        let config_toml_path = if let Ok(config_toml_path) = env::var(ENV_VAR_CONFIG_TOML_PATH) {
            println!("Loading extra configuration from file: `{config_toml_path}` ...");
            config_toml_path
        } else {
            println!("Loading extra configuration from default configuration file: `{default_config_toml_path}` ...");
            default_config_toml_path
        };

        let port = env::var(ENV_VAR_PORT).ok().filter(|port| !port.is_empty());

        Ok(Self {
            config_toml,
            config_toml_path,
            port,
        })
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Unable to load the configuration from the configuration sources.
    #[error("Failed processing the configuration: {source}")]
    ConfigError { source: DynError },

    /// The `PORT` environment variable does not contain a port number.
    #[error("Invalid port in the `PORT` environment variable: {port}")]
    InvalidPortOverride { port: String },
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigError { source: Arc::new(err) }
    }
}
