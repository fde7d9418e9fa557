//! Version `1` for the gateway configuration.
//!
//! The configuration is loaded from these sources, from lowest to highest
//! priority:
//!
//! 1. The default values.
//! 2. A TOML file. The path is taken from the `HTORRENT_CONFIG_TOML_PATH`
//!    environment variable, or the default path.
//! 3. The TOML content of the `HTORRENT_CONFIG_TOML` environment variable.
//! 4. Single options from environment variables with the `HTORRENT_` prefix.
//!    Sections are separated with a double underscore, for example:
//!    `HTORRENT_GATEWAY__BIND_ADDRESS=127.0.0.1:8080`.
//!
//! Finally, the `PORT` environment variable, when set, replaces the port of
//! the gateway bind address.
//!
//! # Sections
//!
//! - [`logging`]: the log threshold.
//! - [`gateway`]: the HTTP listener.
//! - [`swarm`]: the swarm engine (storage, peers, DHT, UPnP, protocols).
//! - [`progress`]: the progress reporting of active streams.
//!
//! # Default configuration
//!
//! ```toml
//! [logging]
//! threshold = "info"
//!
//! [gateway]
//! bind_address = "0.0.0.0:1337"
//! shutdown_grace_period = 90
//!
//! [swarm]
//! storage = "./storage/htorrent/lib/data"
//! max_peers = 0
//! dht = true
//! upnp = true
//! protocols = ["tcp", "utp"]
//! debug = false
//!
//! [progress]
//! interval_ms = 100
//! ```
pub mod gateway;
pub mod logging;
pub mod progress;
pub mod swarm;

use std::fs;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use self::gateway::Gateway;
use self::logging::Logging;
use self::progress::Progress;
use self::swarm::Swarm;
use crate::{Error, Info, ENV_VAR_PREFIX};

/// Core configuration for the gateway.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Default, Clone)]
pub struct Configuration {
    /// Logging configuration
    #[serde(default)]
    pub logging: Logging,

    /// The HTTP listener configuration.
    #[serde(default)]
    pub gateway: Gateway,

    /// The swarm engine configuration.
    #[serde(default)]
    pub swarm: Swarm,

    /// The progress reporting configuration.
    #[serde(default)]
    pub progress: Progress,
}

impl Configuration {
    /// Loads the configuration from the `Info` struct.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the environment variable does not exist or has a bad configuration.
    pub fn load(info: &Info) -> Result<Configuration, Error> {
        let figment = if let Some(config_toml) = &info.config_toml {
            Figment::from(Serialized::defaults(Configuration::default()))
                .merge(Toml::file(&info.config_toml_path))
                .merge(Toml::string(config_toml))
        } else {
            Figment::from(Serialized::defaults(Configuration::default())).merge(Toml::file(&info.config_toml_path))
        };

        let mut config: Configuration = figment.merge(Env::prefixed(ENV_VAR_PREFIX).split("__")).extract()?;

        if let Some(port) = &info.port {
            config.override_port(port)?;
        }

        Ok(config)
    }

    /// Loads the configuration from the configuration file only, ignoring
    /// the environment.
    ///
    /// # Errors
    ///
    /// Will return `Err` if `path` has a bad configuration.
    pub fn load_from_file(path: &str) -> Result<Configuration, Error> {
        let figment = Figment::from(Serialized::defaults(Configuration::default())).merge(Toml::file(path));

        let config: Configuration = figment.extract()?;

        Ok(config)
    }

    /// Replaces the port of the gateway bind address.
    ///
    /// # Errors
    ///
    /// Will return `Err` if `port` is not a valid port number.
    pub fn override_port(&mut self, port: &str) -> Result<(), Error> {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| Error::InvalidPortOverride { port: port.to_owned() })?;

        self.gateway.bind_address.set_port(port);

        Ok(())
    }

    /// Saves the configuration to the configuration file.
    ///
    /// # Errors
    ///
    /// Will return `Err` if `filename` does not exist or the user does not have
    /// permission to read it.
    pub fn save_to_file(&self, path: &str) -> Result<(), Error> {
        fs::write(path, self.to_toml()).map_err(|err| Error::ConfigError {
            source: std::sync::Arc::new(err),
        })
    }

    /// Encodes the configuration to TOML.
    ///
    /// # Panics
    ///
    /// Will panic if the configuration cannot be encoded to TOML.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string(self).expect("Could not encode TOML value")
    }
}
