//! The HTTP gateway.
//!
//! It streams the content of torrents over HTTP while they are downloaded.
//! The torrents are identified by their magnet links.
//!
//! # Endpoints
//!
//! Method | Path | Query | Response
//! ---|---|---|---
//! `GET` | `/info` | `magnet` | The torrent [`Info`](htorrent_primitives::info::Info).
//! `GET` | `/metrics` | | The [`TorrentMetrics`](htorrent_primitives::metrics::TorrentMetrics) of every joined swarm.
//! `GET` | `/stream` | `magnet`, `path` | The content of the file, with range requests.
//! `GET` | `/health_check` | | `{"status":"Ok"}`
//!
//! # Info
//!
//! ```text
//! curl "http://127.0.0.1:1337/info?magnet=magnet%3A%3Fxt%3Durn%3Abtih%3A08ada5a7a6183aae1e09d831df6748d566095a10%26dn%3DSintel"
//! ```
//!
//! ```json
//! {
//!   "name": "Sintel",
//!   "infoHash": "08ada5a7a6183aae1e09d831df6748d566095a10",
//!   "creationDate": 1490916601,
//!   "description": "Sintel, the Durian Open Movie Project",
//!   "files": [
//!     { "path": "Sintel/Sintel.de.srt", "length": 1652 },
//!     { "path": "Sintel/Sintel.mp4", "length": 129241752 }
//!   ]
//! }
//! ```
//!
//! The description is the content of the first `.txt` file of the torrent.
//!
//! # Metrics
//!
//! ```text
//! curl "http://127.0.0.1:1337/metrics"
//! ```
//!
//! ```json
//! [
//!   {
//!     "magnet": "magnet:?xt=urn:btih:08ada5a7a6183aae1e09d831df6748d566095a10&dn=Sintel&tr=udp%3A%2F%2Fexplodie.org%3A6969",
//!     "infoHash": "08ada5a7a6183aae1e09d831df6748d566095a10",
//!     "peers": 12,
//!     "files": [
//!       { "path": "Sintel/Sintel.mp4", "length": 129241752, "completed": 1048576 }
//!     ]
//!   }
//! ]
//! ```
//!
//! # Stream
//!
//! ```text
//! curl -H "Range: bytes=0-1023" "http://127.0.0.1:1337/stream?magnet=...&path=Sintel%2FSintel.mp4"
//! ```
//!
//! The path is the exact path listed by `/info`. While the file is streamed,
//! the download progress is sent to the
//! [`ProgressSink`](crate::core::progress::ProgressSink).
//!
//! # Errors
//!
//! See [`responses`] for the status codes.
pub mod handlers;
pub mod range;
pub mod resources;
pub mod responses;
pub mod routes;
pub mod server;
