use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the progress reporting of active streams.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Progress {
    /// Milliseconds between two progress samples of a streamed file.
    #[serde(default = "Progress::default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            interval_ms: Self::default_interval_ms(),
        }
    }
}

impl Progress {
    fn default_interval_ms() -> u64 {
        100
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}
