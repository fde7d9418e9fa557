use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_SHUTDOWN_GRACE_PERIOD;

/// Configuration for the HTTP gateway.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Gateway {
    /// The address the gateway will bind to.
    /// The format is `ip:port`, for example `0.0.0.0:1337`. If you want the
    /// operating system to choose a random port, use port `0`.
    #[serde(default = "Gateway::default_bind_address")]
    pub bind_address: SocketAddr,

    /// Seconds in-flight requests are given to finish when the gateway is
    /// closed. Connections still open afterwards are dropped.
    #[serde(default = "Gateway::default_shutdown_grace_period")]
    pub shutdown_grace_period: u64,

    /// Seconds a request waits for the torrent metadata before it fails with
    /// `504 Gateway Timeout`. When it is not set, requests wait until the
    /// client disconnects.
    #[serde(default = "Gateway::default_metadata_timeout")]
    pub metadata_timeout: Option<u64>,
}

impl Default for Gateway {
    fn default() -> Self {
        Self {
            bind_address: Self::default_bind_address(),
            shutdown_grace_period: Self::default_shutdown_grace_period(),
            metadata_timeout: Self::default_metadata_timeout(),
        }
    }
}

impl Gateway {
    fn default_bind_address() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 1337)
    }

    fn default_shutdown_grace_period() -> u64 {
        DEFAULT_SHUTDOWN_GRACE_PERIOD.as_secs()
    }

    #[allow(clippy::unnecessary_wraps)]
    fn default_metadata_timeout() -> Option<u64> {
        None
    }

    #[must_use]
    pub fn shutdown_grace_period(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_period)
    }

    #[must_use]
    pub fn metadata_timeout(&self) -> Option<Duration> {
        self.metadata_timeout.map(Duration::from_secs)
    }
}
