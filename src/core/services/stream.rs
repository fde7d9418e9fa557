//! The `stream` service.
//!
//! It finds the file to stream. Serving its content, and reporting the
//! download progress while it's served, is up to the caller.
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::core::error::Error;
use crate::core::swarm::{Client, File, Metadata, Swarm};

/// A file found in a swarm, ready to be streamed.
#[derive(Debug, Clone)]
pub struct Stream {
    pub swarm: Arc<dyn Swarm>,
    pub file: Arc<dyn File>,
    /// Seconds since the Unix Epoch. `0` when the torrent does not have one.
    pub creation_date: i64,
}

/// It returns the file of the torrent with the exact `path`.
///
/// # Errors
///
/// Will return an error if the magnet link or the path are empty, if the
/// swarm cannot be joined or if the metadata is not received before the
/// `deadline`. It returns [`Error::PathNotFound`] if the torrent does not
/// have the file, which is only known once the metadata is received.
pub async fn get_file(client: &dyn Client, magnet: &str, path: &str, deadline: Option<Duration>) -> Result<Stream, Error> {
    if magnet.is_empty() {
        return Err(Error::EmptyMagnetLink {
            location: Location::caller(),
        });
    }

    if path.is_empty() {
        return Err(Error::EmptyPath {
            location: Location::caller(),
        });
    }

    debug!(magnet, path, "Getting stream");

    let (swarm, Metadata { creation_date, files, .. }) = super::join(client, magnet, deadline).await?;

    let file = files
        .into_iter()
        .find(|file| file.path() == path)
        .ok_or_else(|| Error::PathNotFound {
            path: path.to_owned(),
            info_hash: swarm.info_hash(),
        })?;

    debug!(magnet, path, "Got stream");

    Ok(Stream {
        swarm,
        file,
        creation_date,
    })
}
