//! The swarm client the gateway drives.
//!
//! The gateway does not speak the `BitTorrent` protocol itself. It delegates
//! peer discovery, piece download and storage to an engine, and only consumes
//! the small surface described by the traits in this module:
//!
//! - [`Engine`]: builds a [`Client`] from the [`Options`].
//! - [`Client`]: joins swarms by magnet link, lists them and closes them all.
//! - [`Swarm`]: a joined torrent. Its files are only known once the metadata
//!   has been received from the peers.
//! - [`File`]: a file inside a swarm, with its completion counter and a
//!   reader that blocks until the requested bytes have been downloaded.
//!
//! There are two engines:
//!
//! - [`memory::MemoryEngine`]: an in-process engine serving seeded torrents.
//!   It's used to embed the gateway and in tests.
//! - `rqbit::RqbitEngine`: an adapter to the [`librqbit`](https://docs.rs/librqbit)
//!   engine. It's only available with the `rqbit` feature.
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use htorrent_primitives::info_hash::InfoHash;
use tokio::io::{AsyncRead, AsyncSeek};

use crate::core::magnet;

pub mod memory;
pub mod options;
#[cfg(feature = "rqbit")]
pub mod rqbit;

pub use options::{Options, Protocols};

pub type DynError = Arc<dyn std::error::Error + Send + Sync>;

/// Errors returned by the swarm engines.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("invalid magnet link {magnet:?}: {source}")]
    InvalidMagnet { magnet: String, source: magnet::Error },

    #[error("the swarm client is closed")]
    Closed,

    /// The operation was interrupted because the client was closing.
    #[error("the swarm operation was cancelled")]
    Cancelled,

    #[error("swarm i/o error: {source}")]
    Io { source: Arc<std::io::Error> },

    #[error("swarm engine error: {source}")]
    Engine { source: DynError },
}

impl Error {
    /// Errors caused by the client being closed.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Closed | Self::Cancelled)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io { source: Arc::new(err) }
    }
}

/// Builds swarm clients.
pub trait Engine: Send + Sync {
    /// Starts a new client.
    ///
    /// # Errors
    ///
    /// Will return an error if the engine cannot be initialized with the
    /// given options.
    fn start(&self, options: Options) -> BoxFuture<'static, Result<Arc<dyn Client>, Error>>;
}

/// The set of swarms the gateway has joined.
pub trait Client: fmt::Debug + Send + Sync {
    /// Joins the swarm for the magnet link. Joining a swarm twice returns the
    /// swarm that was already joined.
    fn join<'a>(&'a self, magnet: &'a str) -> BoxFuture<'a, Result<Arc<dyn Swarm>, Error>>;

    /// The swarms joined so far, ordered by info hash.
    fn swarms(&self) -> Vec<Arc<dyn Swarm>>;

    /// Leaves all the swarms and releases their resources. Pending metadata
    /// waits and blocked reads fail afterwards.
    fn close(&self) -> BoxFuture<'_, Vec<Error>>;
}

/// A joined swarm.
pub trait Swarm: fmt::Debug + Send + Sync {
    fn info_hash(&self) -> InfoHash;

    /// Resolves once the torrent metadata is available.
    fn wait_for_metadata(&self) -> BoxFuture<'_, Result<Metadata, Error>>;

    /// The files of the torrent. It's empty until the metadata is available.
    fn files(&self) -> Vec<Arc<dyn File>>;

    /// Number of connected peers.
    fn peers(&self) -> usize;

    /// The bencoded torrent metainfo, if the metadata is available.
    fn metainfo(&self) -> Option<Vec<u8>>;
}

/// A file inside a swarm.
pub trait File: fmt::Debug + Send + Sync {
    /// Path including the torrent name for multi-file torrents, with `/` as
    /// separator. It's the path clients request files with.
    fn path(&self) -> &str;

    /// Path relative to the torrent root.
    fn display_path(&self) -> &str;

    /// Length in bytes.
    fn length(&self) -> u64;

    /// Bytes downloaded so far. It never decreases and never exceeds the
    /// length.
    fn bytes_completed(&self) -> u64;

    /// A new reader for the file content. Reads block until the bytes have
    /// been downloaded.
    ///
    /// # Errors
    ///
    /// Will return an error if the engine cannot open the file.
    fn reader(&self) -> Result<Box<dyn FileReader>, Error>;
}

pub trait FileReader: AsyncRead + AsyncSeek + Send + Unpin {}

impl<T: AsyncRead + AsyncSeek + Send + Unpin + ?Sized> FileReader for T {}

/// The torrent metadata the gateway needs to answer requests.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub name: String,
    /// Seconds since the Unix Epoch. `0` when the torrent does not have one.
    pub creation_date: i64,
    pub files: Vec<Arc<dyn File>>,
}

impl Metadata {
    /// Finds a file by its exact path.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<Arc<dyn File>> {
        self.files.iter().find(|file| file.path() == path).cloned()
    }
}
