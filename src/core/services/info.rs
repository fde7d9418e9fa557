//! The `info` service.
//!
//! It returns the name, creation date and files of a torrent. The content of
//! the first `.txt` file, usually a readme shipped with the torrent, is
//! returned as its description.
use std::panic::Location;
use std::time::Duration;

use camino::Utf8Path;
use htorrent_primitives::info::{File, Info};
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::core::error::Error;
use crate::core::swarm::{self, Client};

const DESCRIPTION_SUFFIX: &str = ".txt";

/// It returns the [`Info`] of the torrent with the magnet link.
///
/// It downloads the whole description file if there is one.
///
/// # Errors
///
/// Will return an error if the magnet link is empty, if the swarm cannot be
/// joined, if the metadata is not received before the `deadline` or if the
/// description cannot be read.
pub async fn get_info(client: &dyn Client, magnet: &str, deadline: Option<Duration>) -> Result<Info, Error> {
    if magnet.is_empty() {
        return Err(Error::EmptyMagnetLink {
            location: Location::caller(),
        });
    }

    debug!(magnet, "Getting info");

    let (swarm, metadata) = super::join(client, magnet, deadline).await?;

    let description = match metadata.files.iter().find(|file| is_description(file.path())) {
        Some(file) => read_description(file.as_ref()).await?,
        None => String::new(),
    };

    let files = metadata
        .files
        .iter()
        .map(|file| File::new(file.path().to_owned(), file.length()))
        .collect();

    Ok(Info {
        name: metadata.name,
        info_hash: swarm.info_hash(),
        creation_date: metadata.creation_date,
        description,
        files,
    })
}

/// A file named just `.txt` is a description too.
fn is_description(path: &str) -> bool {
    Utf8Path::new(path)
        .file_name()
        .is_some_and(|name| name.ends_with(DESCRIPTION_SUFFIX))
}

async fn read_description(file: &dyn swarm::File) -> Result<String, Error> {
    let mut content = Vec::new();

    file.reader()?
        .read_to_end(&mut content)
        .await
        .map_err(swarm::Error::from)?;

    Ok(String::from_utf8_lossy(&content).into_owned())
}
