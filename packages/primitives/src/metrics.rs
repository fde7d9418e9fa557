//! The `/metrics` resources, also used for progress events.
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

use crate::info_hash::InfoHash;

/// Transfer snapshot of a swarm.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TorrentMetrics {
    pub magnet: String,
    pub info_hash: InfoHash,
    /// Number of connected peers.
    pub peers: usize,
    pub files: Vec<FileMetrics>,
}

/// Point-in-time sample of a file download.
///
/// `completed` never exceeds `length`.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Constructor)]
pub struct FileMetrics {
    pub path: String,
    pub length: u64,
    pub completed: u64,
}

impl FileMetrics {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed >= self.length
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{FileMetrics, TorrentMetrics};
    use crate::info_hash::InfoHash;

    #[test]
    fn torrent_metrics_should_be_serialized_with_camel_case_fields() {
        let metrics = TorrentMetrics {
            magnet: "magnet:?xt=urn:btih:0000000000000000000000000000000000000000".to_owned(),
            info_hash: InfoHash([0u8; 20]),
            peers: 3,
            files: vec![FileMetrics::new("b.bin".to_owned(), 500, 250)],
        };

        assert_eq!(
            serde_json::to_value(&metrics).unwrap(),
            json!({
                "magnet": "magnet:?xt=urn:btih:0000000000000000000000000000000000000000",
                "infoHash": "0000000000000000000000000000000000000000",
                "peers": 3,
                "files": [{ "path": "b.bin", "length": 500, "completed": 250 }]
            })
        );
    }

    #[test]
    fn a_file_should_be_complete_when_all_bytes_are_downloaded() {
        assert!(!FileMetrics::new("b.bin".to_owned(), 500, 499).is_complete());
        assert!(FileMetrics::new("b.bin".to_owned(), 500, 500).is_complete());
    }
}
