//! Resources returned by the gateway that are not part of the torrent
//! resources in `htorrent-primitives`.
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    Ok,
    Error,
}

/// The health check response.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Report {
    pub status: Status,
}
