//! Torrent metainfo, the bencoded content of a `.torrent` file.
//!
//! Swarms expose their metainfo once the metadata has been received. The
//! gateway decodes it to rebuild a complete magnet link for the swarm, with
//! the torrent name and its trackers.
use std::sync::Arc;

use htorrent_primitives::info_hash::InfoHash;
use serde::{Deserialize, Serialize};

use crate::core::magnet::Magnet;

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("unable to decode the metainfo: {source}")]
    Decode { source: Arc<serde_bencode::Error> },

    #[error("unable to encode the metainfo: {source}")]
    Encode { source: Arc<serde_bencode::Error> },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Metainfo {
    pub info: Info,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announce: Option<String>,

    #[serde(default, rename = "announce-list", skip_serializing_if = "Option::is_none")]
    pub announce_list: Option<Vec<Vec<String>>>,

    /// Seconds since the Unix Epoch.
    #[serde(default, rename = "creation date", skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, rename = "created by", skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// The `info` dictionary. Its hash is the torrent info hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Info {
    pub name: String,

    #[serde(rename = "piece length")]
    pub piece_length: u64,

    /// Concatenated SHA-1 hashes of all the pieces.
    #[serde(with = "serde_bytes")]
    pub pieces: Vec<u8>,

    /// Length of the file, for single-file torrents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,

    /// Files, for multi-file torrents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<u8>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub length: u64,
    /// Path components relative to the torrent root.
    pub path: Vec<String>,
}

impl Metainfo {
    /// # Errors
    ///
    /// Will return an error if the bytes are not a bencoded metainfo.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        serde_bencode::from_bytes(bytes).map_err(|err| Error::Decode { source: Arc::new(err) })
    }

    /// # Errors
    ///
    /// Will return an error if the metainfo cannot be bencoded.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        serde_bencode::to_bytes(self).map_err(|err| Error::Encode { source: Arc::new(err) })
    }

    /// All the distinct trackers, in tier order. The `announce` tracker is
    /// only used when there is no `announce-list`.
    #[must_use]
    pub fn trackers(&self) -> Vec<String> {
        let mut trackers: Vec<String> = Vec::new();

        let tiers = match &self.announce_list {
            Some(tiers) if !tiers.is_empty() => tiers.iter().flatten().collect::<Vec<_>>(),
            _ => self.announce.iter().collect(),
        };

        for tracker in tiers {
            if !trackers.contains(tracker) {
                trackers.push(tracker.clone());
            }
        }

        trackers
    }

    /// Builds a magnet link for the torrent.
    ///
    /// The info hash is not computed from the `info` dictionary, the swarm
    /// already knows it.
    #[must_use]
    pub fn magnet(&self, info_hash: InfoHash) -> Magnet {
        self.trackers().into_iter().fold(
            Magnet::new(info_hash).with_display_name(self.info.name.clone()),
            |magnet, tracker| magnet.with_tracker(tracker),
        )
    }
}

/// A file of the torrent, as the gateway exposes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentFile {
    /// Path requested by the clients. It starts with the torrent name in
    /// multi-file torrents.
    pub path: String,
    /// Path relative to the torrent root.
    pub display_path: String,
    pub length: u64,
}

impl Info {
    /// The files of the torrent, in the order of the `info` dictionary.
    /// Engines index the files in the same order.
    ///
    /// A single-file torrent has one file named as the torrent.
    #[must_use]
    pub fn torrent_files(&self) -> Vec<TorrentFile> {
        match &self.files {
            Some(files) => files
                .iter()
                .map(|file| {
                    let display_path = file.path.join("/");

                    TorrentFile {
                        path: format!("{}/{display_path}", self.name),
                        display_path,
                        length: file.length,
                    }
                })
                .collect(),
            None => vec![TorrentFile {
                path: self.name.clone(),
                display_path: self.name.clone(),
                length: self.length.unwrap_or_default(),
            }],
        }
    }

    /// Total length of the torrent content in bytes.
    #[must_use]
    pub fn total_length(&self) -> u64 {
        match &self.files {
            Some(files) => files.iter().map(|file| file.length).sum(),
            None => self.length.unwrap_or_default(),
        }
    }
}
