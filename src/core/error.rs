//! Errors returned by the gateway services.
//!
//! Error | Context | Description
//! ---|---|---
//! `EmptyMagnetLink` | Validation | The request did not include a magnet link.
//! `EmptyPath` | Validation | The stream request did not include the path of the file.
//! `PathNotFound` | Lookup | The torrent does not have a file with the requested path.
//! `MetadataTimeout` | Swarm | The metadata was not received before the configured deadline.
//! `Swarm` | Swarm | The swarm client failed.
//!
use std::panic::Location;
use std::time::Duration;

use htorrent_primitives::info_hash::InfoHash;

use crate::core::swarm;

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("missing the magnet link, {location}")]
    EmptyMagnetLink { location: &'static Location<'static> },

    #[error("missing the path of the file, {location}")]
    EmptyPath { location: &'static Location<'static> },

    #[error("the torrent {info_hash} does not have a file with path {path:?}")]
    PathNotFound { path: String, info_hash: InfoHash },

    #[error("the metadata of the torrent {info_hash} was not received in {timeout:?}")]
    MetadataTimeout { info_hash: InfoHash, timeout: Duration },

    #[error(transparent)]
    Swarm {
        #[from]
        source: swarm::Error,
    },
}
