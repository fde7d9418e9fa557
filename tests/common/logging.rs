//! Logging for the integration tests.
//!
//! The gateway logs go through the test writer, so they are only shown for
//! failing tests or with `--nocapture`. The level is taken from the
//! `HTORRENT_TEST_LOG` environment variable and defaults to `error`:
//!
//! ```text
//! HTORRENT_TEST_LOG=debug cargo test --test integration -- --nocapture
//! ```
use std::sync::Once;

use tracing::level_filters::LevelFilter;

const ENV_VAR_TEST_LOG: &str = "HTORRENT_TEST_LOG";

static INIT: Once = Once::new();

pub fn init() {
    INIT.call_once(|| {
        let filter = std::env::var(ENV_VAR_TEST_LOG)
            .ok()
            .and_then(|level| level.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::ERROR);

        tracing_subscriber::fmt()
            .with_max_level(filter)
            .with_test_writer()
            .pretty()
            .with_file(true)
            .init();

        tracing::info!(%filter, "Logging initialized");
    });
}
