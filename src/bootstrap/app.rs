//! Setup for the main gateway application.
//!
//! The [`setup`] function loads the configuration and initializes the
//! logging. The gateway itself is started by [`app::start`](crate::app::start).
use htorrent_configuration::Configuration;

use super::config::initialize_configuration;
use crate::bootstrap;

/// It loads the configuration from the environment and initializes the
/// logging.
///
/// # Panics
///
/// Setup can fail if the configuration is invalid.
#[must_use]
pub fn setup() -> Configuration {
    let configuration = initialize_configuration();

    initialize_logging(&configuration);

    configuration
}

/// It initializes the global logger.
pub fn initialize_logging(config: &Configuration) {
    bootstrap::logging::setup(config);
}
