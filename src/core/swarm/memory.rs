//! In-memory swarm engine.
//!
//! It serves torrents seeded into the engine instead of downloading them from
//! peers. The metadata of a seeded torrent is only available after it's
//! released, and the content of each file becomes readable as it's marked as
//! downloaded, so it behaves like a swarm still being downloaded:
//!
//! ```rust,no_run
//! use htorrent::core::swarm::memory::{MemoryEngine, Torrent};
//! use htorrent_primitives::info_hash::InfoHash;
//!
//! let engine = MemoryEngine::default();
//!
//! let seed = engine.seed(
//!     Torrent::new(InfoHash([1u8; 20]), "Sintel")
//!         .with_file("Sintel/Sintel.txt", "Sintel, the Durian Open Movie Project")
//!         .with_file("Sintel/Sintel.mp4", vec![0u8; 1024]),
//! );
//!
//! seed.release_metadata();
//! seed.download("Sintel/Sintel.mp4", 512);
//! ```
//!
//! Magnet links for info hashes that were not seeded can be joined, but their
//! metadata never arrives.
use std::collections::BTreeMap;
use std::io::{self, SeekFrom};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::FutureExt as _;
use htorrent_primitives::info_hash::InfoHash;
use tokio::io::{AsyncRead, AsyncSeek, ReadBuf};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{Client, Engine, Error, File, FileReader, Metadata, Options, Swarm};
use crate::core::magnet::Magnet;
use crate::core::metainfo::{self, FileEntry, Metainfo};

const PIECE_LENGTH: u64 = 16 * 1024;

type Seeds = Arc<RwLock<BTreeMap<InfoHash, Arc<Seed>>>>;

/// A torrent to seed into the [`MemoryEngine`].
#[derive(Debug, Clone)]
pub struct Torrent {
    info_hash: InfoHash,
    name: String,
    creation_date: i64,
    trackers: Vec<String>,
    files: Vec<(String, Vec<u8>)>,
    corrupted_metainfo: bool,
}

impl Torrent {
    #[must_use]
    pub fn new(info_hash: InfoHash, name: impl Into<String>) -> Self {
        Self {
            info_hash,
            name: name.into(),
            creation_date: 0,
            trackers: Vec::new(),
            files: Vec::new(),
            corrupted_metainfo: false,
        }
    }

    /// Adds a file. Paths starting with the torrent name and a `/` are
    /// relative to the torrent root after that prefix. The files of
    /// multi-file torrents are exposed with the torrent name as prefix.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    #[must_use]
    pub fn with_creation_date(mut self, creation_date: i64) -> Self {
        self.creation_date = creation_date;
        self
    }

    #[must_use]
    pub fn with_tracker(mut self, tracker: impl Into<String>) -> Self {
        self.trackers.push(tracker.into());
        self
    }

    /// The swarm will expose a metainfo that cannot be decoded.
    #[must_use]
    pub fn with_corrupted_metainfo(mut self) -> Self {
        self.corrupted_metainfo = true;
        self
    }
}

#[derive(Debug)]
struct Seed {
    info_hash: InfoHash,
    name: String,
    creation_date: i64,
    trackers: Vec<String>,
    info: metainfo::Info,
    files: Vec<Arc<SeedFile>>,
    metadata: watch::Sender<bool>,
    peers: AtomicUsize,
    corrupted_metainfo: bool,
}

#[derive(Debug)]
struct SeedFile {
    path: String,
    display_path: String,
    content: Vec<u8>,
    completed: watch::Sender<u64>,
}

impl SeedFile {
    fn length(&self) -> u64 {
        self.content.len() as u64
    }
}

impl Seed {
    fn new(torrent: Torrent) -> Self {
        let info = Self::info(&torrent);

        let files = info
            .torrent_files()
            .into_iter()
            .zip(torrent.files)
            .map(|(file, (_, content))| {
                let (completed, _) = watch::channel(0);

                Arc::new(SeedFile {
                    path: file.path,
                    display_path: file.display_path,
                    content,
                    completed,
                })
            })
            .collect();

        let (metadata, _) = watch::channel(false);

        Self {
            info_hash: torrent.info_hash,
            name: torrent.name,
            creation_date: torrent.creation_date,
            trackers: torrent.trackers,
            info,
            files,
            metadata,
            peers: AtomicUsize::new(0),
            corrupted_metainfo: torrent.corrupted_metainfo,
        }
    }

    /// The `info` dictionary of the seeded torrent. It's single-file when
    /// the only file is named as the torrent.
    fn info(torrent: &Torrent) -> metainfo::Info {
        let prefix = format!("{}/", torrent.name);
        let length: u64 = torrent.files.iter().map(|(_, content)| content.len() as u64).sum();
        let pieces = usize::try_from(length.div_ceil(PIECE_LENGTH)).unwrap_or_default();

        let single_file = matches!(torrent.files.as_slice(), [(path, _)] if *path == torrent.name);

        metainfo::Info {
            name: torrent.name.clone(),
            piece_length: PIECE_LENGTH,
            pieces: vec![0u8; 20 * pieces],
            length: single_file.then_some(length),
            files: (!single_file).then(|| {
                torrent
                    .files
                    .iter()
                    .map(|(path, content)| FileEntry {
                        length: content.len() as u64,
                        path: path
                            .strip_prefix(&prefix)
                            .unwrap_or(path)
                            .split('/')
                            .map(ToOwned::to_owned)
                            .collect(),
                    })
                    .collect()
            }),
            private: None,
        }
    }

    fn has_metadata(&self) -> bool {
        *self.metadata.borrow()
    }

    fn metainfo(&self) -> Result<Vec<u8>, metainfo::Error> {
        Metainfo {
            info: self.info.clone(),
            announce: self.trackers.first().cloned(),
            announce_list: (!self.trackers.is_empty()).then(|| self.trackers.iter().map(|tracker| vec![tracker.clone()]).collect()),
            creation_date: (self.creation_date > 0).then_some(self.creation_date),
            comment: None,
            created_by: None,
        }
        .to_bytes()
    }
}

/// Controls a torrent seeded into the [`MemoryEngine`].
#[derive(Debug, Clone)]
pub struct SeedHandle(Arc<Seed>);

impl SeedHandle {
    #[must_use]
    pub fn info_hash(&self) -> InfoHash {
        self.0.info_hash
    }

    /// A magnet link for the torrent, with its name.
    #[must_use]
    pub fn magnet(&self) -> String {
        Magnet::new(self.0.info_hash).with_display_name(self.0.name.clone()).to_uri()
    }

    /// Makes the metadata available to the swarms waiting for it.
    pub fn release_metadata(&self) {
        self.0.metadata.send_replace(true);
    }

    /// Marks the first `bytes` of the file as downloaded. The completion of a
    /// file never decreases and is capped to the file length.
    ///
    /// Returns `false` if the torrent does not have a file with that path.
    pub fn download(&self, path: &str, bytes: u64) -> bool {
        let Some(file) = self.0.files.iter().find(|file| file.path == path) else {
            return false;
        };

        let length = file.length();

        file.completed.send_if_modified(|completed| {
            let next = bytes.min(length).max(*completed);
            let modified = next != *completed;
            *completed = next;
            modified
        });

        true
    }

    /// Marks all the files as downloaded.
    pub fn download_all(&self) {
        for file in &self.0.files {
            file.completed.send_replace(file.length());
        }
    }

    pub fn set_peers(&self, peers: usize) {
        self.0.peers.store(peers, Ordering::Relaxed);
    }
}

/// Engine serving the seeded torrents.
#[derive(Debug, Default, Clone)]
pub struct MemoryEngine {
    seeds: Seeds,
    joins: Arc<AtomicUsize>,
    started_with: Arc<Mutex<Option<Options>>>,
}

impl MemoryEngine {
    /// Seeds a torrent. Seeding a torrent again replaces it for the swarms
    /// joined afterwards.
    pub fn seed(&self, torrent: Torrent) -> SeedHandle {
        let seed = Arc::new(Seed::new(torrent));

        self.seeds
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(seed.info_hash, seed.clone());

        SeedHandle(seed)
    }

    /// Number of join requests received by the clients of this engine.
    #[must_use]
    pub fn joins(&self) -> usize {
        self.joins.load(Ordering::SeqCst)
    }

    /// The options the last client was started with.
    #[must_use]
    pub fn started_with(&self) -> Option<Options> {
        self.started_with.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Engine for MemoryEngine {
    fn start(&self, options: Options) -> BoxFuture<'static, Result<Arc<dyn Client>, Error>> {
        debug!(?options, "Starting in-memory swarm client");

        if options.debug {
            warn!("The in-memory swarm client does not have debug output");
        }

        *self.started_with.lock().unwrap_or_else(PoisonError::into_inner) = Some(options);

        let client: Arc<dyn Client> = Arc::new(MemoryClient {
            seeds: self.seeds.clone(),
            joins: self.joins.clone(),
            swarms: RwLock::default(),
            shutdown: CancellationToken::new(),
        });

        futures::future::ready(Ok(client)).boxed()
    }
}

#[derive(Debug)]
struct MemoryClient {
    seeds: Seeds,
    joins: Arc<AtomicUsize>,
    swarms: RwLock<BTreeMap<InfoHash, Arc<MemorySwarm>>>,
    shutdown: CancellationToken,
}

impl Client for MemoryClient {
    fn join<'a>(&'a self, magnet: &'a str) -> BoxFuture<'a, Result<Arc<dyn Swarm>, Error>> {
        async move {
            if self.shutdown.is_cancelled() {
                return Err(Error::Closed);
            }

            self.joins.fetch_add(1, Ordering::SeqCst);

            let info_hash = magnet
                .parse::<Magnet>()
                .map_err(|source| Error::InvalidMagnet {
                    magnet: magnet.to_owned(),
                    source,
                })?
                .info_hash;

            let seed = self
                .seeds
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(&info_hash)
                .cloned();

            let swarm = self
                .swarms
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(info_hash)
                .or_insert_with(|| {
                    debug!(%info_hash, seeded = seed.is_some(), "Joined swarm");

                    Arc::new(MemorySwarm {
                        info_hash,
                        seed,
                        shutdown: self.shutdown.clone(),
                    })
                })
                .clone();

            Ok(swarm as Arc<dyn Swarm>)
        }
        .boxed()
    }

    fn swarms(&self) -> Vec<Arc<dyn Swarm>> {
        self.swarms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|swarm| swarm.clone() as Arc<dyn Swarm>)
            .collect()
    }

    fn close(&self) -> BoxFuture<'_, Vec<Error>> {
        async move {
            if !self.shutdown.is_cancelled() {
                self.shutdown.cancel();
                self.swarms.write().unwrap_or_else(PoisonError::into_inner).clear();

                debug!("In-memory swarm client closed");
            }

            Vec::new()
        }
        .boxed()
    }
}

#[derive(Debug)]
struct MemorySwarm {
    info_hash: InfoHash,
    seed: Option<Arc<Seed>>,
    shutdown: CancellationToken,
}

impl MemorySwarm {
    fn metadata(&self, seed: &Seed) -> Metadata {
        Metadata {
            name: seed.name.clone(),
            creation_date: seed.creation_date,
            files: self.seed_files(seed),
        }
    }

    fn seed_files(&self, seed: &Seed) -> Vec<Arc<dyn File>> {
        seed.files
            .iter()
            .map(|file| {
                Arc::new(MemoryFile {
                    file: file.clone(),
                    shutdown: self.shutdown.clone(),
                }) as Arc<dyn File>
            })
            .collect()
    }
}

impl Swarm for MemorySwarm {
    fn info_hash(&self) -> InfoHash {
        self.info_hash
    }

    fn wait_for_metadata(&self) -> BoxFuture<'_, Result<Metadata, Error>> {
        async move {
            let Some(seed) = &self.seed else {
                self.shutdown.cancelled().await;
                return Err(Error::Cancelled);
            };

            let mut released = seed.metadata.subscribe();

            loop {
                let ready = *released.borrow_and_update();

                if ready {
                    return Ok(self.metadata(seed));
                }

                tokio::select! {
                    () = self.shutdown.cancelled() => return Err(Error::Cancelled),
                    changed = released.changed() => changed.map_err(|_| Error::Closed)?,
                }
            }
        }
        .boxed()
    }

    fn files(&self) -> Vec<Arc<dyn File>> {
        match &self.seed {
            Some(seed) if seed.has_metadata() => self.seed_files(seed),
            _ => Vec::new(),
        }
    }

    fn peers(&self) -> usize {
        self.seed.as_ref().map_or(0, |seed| seed.peers.load(Ordering::Relaxed))
    }

    fn metainfo(&self) -> Option<Vec<u8>> {
        let seed = self.seed.as_ref().filter(|seed| seed.has_metadata())?;

        if seed.corrupted_metainfo {
            return Some(b"d4:infoi42ee".to_vec());
        }

        match seed.metainfo() {
            Ok(metainfo) => Some(metainfo),
            Err(err) => {
                warn!(info_hash = %self.info_hash, %err, "Unable to encode the metainfo");
                None
            }
        }
    }
}

#[derive(Debug)]
struct MemoryFile {
    file: Arc<SeedFile>,
    shutdown: CancellationToken,
}

impl File for MemoryFile {
    fn path(&self) -> &str {
        &self.file.path
    }

    fn display_path(&self) -> &str {
        &self.file.display_path
    }

    fn length(&self) -> u64 {
        self.file.length()
    }

    fn bytes_completed(&self) -> u64 {
        *self.file.completed.borrow()
    }

    fn reader(&self) -> Result<Box<dyn FileReader>, Error> {
        if self.shutdown.is_cancelled() {
            return Err(Error::Closed);
        }

        Ok(Box::new(MemoryReader {
            file: self.file.clone(),
            position: 0,
            completed: self.file.completed.subscribe(),
            shutdown: self.shutdown.clone(),
            pending: None,
        }))
    }
}

/// Reads a seeded file, waiting for the bytes that are not downloaded yet.
struct MemoryReader {
    file: Arc<SeedFile>,
    position: u64,
    completed: watch::Receiver<u64>,
    shutdown: CancellationToken,
    pending: Option<BoxFuture<'static, Result<(), Error>>>,
}

impl AsyncRead for MemoryReader {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        loop {
            if this.position >= this.file.length() || buf.remaining() == 0 {
                return Poll::Ready(Ok(()));
            }

            let available = *this.completed.borrow_and_update();

            if this.position < available {
                let start = to_index(this.position)?;
                let end = to_index(available)?.min(start + buf.remaining());

                buf.put_slice(&this.file.content[start..end]);
                this.position = end as u64;

                return Poll::Ready(Ok(()));
            }

            let pending = this.pending.get_or_insert_with(|| {
                let mut completed = this.completed.clone();
                let shutdown = this.shutdown.clone();

                async move {
                    tokio::select! {
                        () = shutdown.cancelled() => Err(Error::Cancelled),
                        changed = completed.changed() => changed.map_err(|_| Error::Closed),
                    }
                }
                .boxed()
            });

            match pending.as_mut().poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(result) => {
                    this.pending = None;
                    result.map_err(io::Error::other)?;
                }
            }
        }
    }
}

impl AsyncSeek for MemoryReader {
    fn start_seek(self: Pin<&mut Self>, position: SeekFrom) -> io::Result<()> {
        let this = self.get_mut();

        let target = match position {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(offset) => this.file.length().checked_add_signed(offset),
            SeekFrom::Current(offset) => this.position.checked_add_signed(offset),
        };

        this.position = target.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "invalid seek position"))?;
        this.pending = None;

        Ok(())
    }

    fn poll_complete(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
        Poll::Ready(Ok(self.position))
    }
}

fn to_index(position: u64) -> io::Result<usize> {
    usize::try_from(position).map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "position out of range"))
}
