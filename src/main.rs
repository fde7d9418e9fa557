use std::process::ExitCode;
use std::sync::Arc;

use htorrent::core::progress::TracingProgressSink;
use htorrent::core::swarm::rqbit::RqbitEngine;
use htorrent::servers::signals::global_shutdown_signal;
use htorrent::{app, bootstrap};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let config = bootstrap::app::setup();

    let gateway = match app::start(&config, Arc::new(RqbitEngine), Arc::new(TracingProgressSink)).await {
        Ok(gateway) => Arc::new(gateway),
        Err(err) => {
            error!(%err, "Unable to open the gateway");
            return ExitCode::FAILURE;
        }
    };

    // handle the signals
    let closing = gateway.clone();
    tokio::spawn(async move {
        global_shutdown_signal().await;

        info!("Gracefully shutting down, send the signal again to force it");

        tokio::spawn(async {
            global_shutdown_signal().await;

            info!("Forcing shutdown");

            std::process::exit(1);
        });

        // The result is reported by the close below.
        let _ = closing.close().await;
    });

    let waited = gateway.wait().await;

    // It returns the result of the close started by the signal, or closes the
    // gateway if the server failed.
    let closed = gateway.close().await;

    match waited.and(closed) {
        Ok(()) => {
            info!("htorrent successfully shutdown.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "The gateway failed");
            ExitCode::FAILURE
        }
    }
}
