//! Gateway domain services.
//!
//! There is one service per HTTP endpoint:
//!
//! - [`info::get_info`]: the files and description of a torrent.
//! - [`metrics::get_metrics`]: the transfer metrics of all the joined swarms.
//! - [`stream::get_file`]: the file to stream from a torrent.
//!
//! The services that receive a magnet link join its swarm, reusing it if it
//! was already joined, and wait for the metadata before answering.
pub mod info;
pub mod metrics;
pub mod stream;

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::core::error::Error;
use crate::core::swarm::{Client, Metadata, Swarm};

/// Joins the swarm and waits for the metadata, for at most `deadline` if
/// there is one.
async fn join(client: &dyn Client, magnet: &str, deadline: Option<Duration>) -> Result<(Arc<dyn Swarm>, Metadata), Error> {
    let swarm = client.join(magnet).await?;

    debug!(magnet, info_hash = %swarm.info_hash(), "Waiting for metadata");

    let metadata = match deadline {
        Some(timeout) => tokio::time::timeout(timeout, swarm.wait_for_metadata())
            .await
            .map_err(|_| Error::MetadataTimeout {
                info_hash: swarm.info_hash(),
                timeout,
            })??,
        None => swarm.wait_for_metadata().await?,
    };

    Ok((swarm, metadata))
}
