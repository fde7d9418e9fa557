//! The `/info` resource.
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

use crate::info_hash::InfoHash;

/// Torrent description returned by the `/info` endpoint.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    /// The best name for the torrent: the name in the metadata, or the
    /// display name of the magnet link.
    pub name: String,
    pub info_hash: InfoHash,
    /// Seconds since the Unix Epoch. `0` when the torrent does not have one.
    pub creation_date: i64,
    /// Content of the first `.txt` file in the torrent, or an empty string.
    pub description: String,
    pub files: Vec<File>,
}

/// A file inside a torrent.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Constructor)]
pub struct File {
    /// Path of the file with `/` as separator. It starts with the torrent
    /// name in multi-file torrents.
    pub path: String,
    /// Length in bytes.
    pub length: u64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{File, Info};
    use crate::info_hash::InfoHash;

    #[test]
    fn it_should_be_serialized_with_camel_case_fields() {
        let info = Info {
            name: "Big Buck Bunny".to_owned(),
            info_hash: InfoHash([0u8; 20]),
            creation_date: 1_490_916_601,
            description: "hello".to_owned(),
            files: vec![File::new("a.txt".to_owned(), 100)],
        };

        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({
                "name": "Big Buck Bunny",
                "infoHash": "0000000000000000000000000000000000000000",
                "creationDate": 1_490_916_601,
                "description": "hello",
                "files": [{ "path": "a.txt", "length": 100 }]
            })
        );
    }
}
