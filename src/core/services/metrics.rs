//! The `metrics` service.
use htorrent_primitives::metrics::{FileMetrics, TorrentMetrics};
use tracing::{debug, error};

use crate::core::metainfo::Metainfo;
use crate::core::swarm::{Client, Swarm};

/// It returns the [`TorrentMetrics`] of every joined swarm, ordered by info
/// hash.
///
/// The magnet link is rebuilt from the metainfo of the swarm. Swarms without
/// metadata, or with a metainfo that cannot be decoded, are skipped.
#[must_use]
pub fn get_metrics(client: &dyn Client) -> Vec<TorrentMetrics> {
    debug!("Getting metrics");

    client.swarms().iter().filter_map(|swarm| torrent_metrics(swarm.as_ref())).collect()
}

fn torrent_metrics(swarm: &dyn Swarm) -> Option<TorrentMetrics> {
    let info_hash = swarm.info_hash();

    let Some(bytes) = swarm.metainfo() else {
        debug!(%info_hash, "Skipping swarm without metadata");
        return None;
    };

    let metainfo = match Metainfo::from_bytes(&bytes) {
        Ok(metainfo) => metainfo,
        Err(err) => {
            error!(%info_hash, %err, "Could not decode the metainfo");
            return None;
        }
    };

    let files = swarm
        .files()
        .iter()
        .map(|file| FileMetrics::new(file.path().to_owned(), file.length(), file.bytes_completed().min(file.length())))
        .collect();

    Some(TorrentMetrics {
        magnet: metainfo.magnet(info_hash).to_uri(),
        info_hash,
        peers: swarm.peers(),
        files,
    })
}
