//! Servers. Services that can be started and stopped.
pub mod gateway;
pub mod logging;
pub mod signals;
