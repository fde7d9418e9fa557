//! Application jobs launchers.
//!
//! The main application setup has only two main stages:
//!
//! 1. Setup the configuration and the logging.
//! 2. Launch the gateway job.
pub mod gateway;
