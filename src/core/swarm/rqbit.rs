//! Swarm engine backed by [`librqbit`](https://docs.rs/librqbit).
//!
//! Only available with the `rqbit` feature.
//!
//! The files and their paths are taken from the `info` dictionary received
//! from the peers, so they follow the same rules as the in-memory engine:
//! paths start with the torrent name in multi-file torrents. File content is
//! read with the librqbit file streams, which prioritize the pieces being
//! read and wait until they are downloaded.
//!
//! Torrents are added with no file selected. A file is selected for download
//! the first time a reader is opened on it, so only the streamed files are
//! fetched.
//!
//! Not all the options map to librqbit settings:
//!
//! - `max_peers` must be `None`, librqbit does not limit the peers per
//!   torrent. Starting the engine with a limit fails.
//! - `protocols` must enable both TCP and uTP, librqbit chooses the
//!   transports. Starting the engine with only one of them fails.
//! - `storage` is only used as the download directory fallback.
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};

use futures::future::BoxFuture;
use futures::FutureExt as _;
use htorrent_primitives::info_hash::InfoHash;
use librqbit::{AddTorrent, AddTorrentOptions, ManagedTorrentHandle, Session, SessionOptions};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{Client, Engine, Error, File, FileReader, Metadata, Options, Protocols, Swarm};
use crate::core::magnet::Magnet;
use crate::core::metainfo::{self, Metainfo};

fn engine_error(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error::Engine {
        source: Arc::from(err.into()),
    }
}

/// Fails with the options librqbit cannot honor.
fn check_supported(options: &Options) -> Result<(), Error> {
    if let Some(max_peers) = options.max_peers {
        return Err(engine_error(format!(
            "the librqbit engine does not limit the peers per torrent, max_peers must be 0 (it is {max_peers})"
        )));
    }

    if options.protocols != Protocols::default() {
        return Err(engine_error(format!(
            "the librqbit engine always enables TCP and uTP, got {:?}",
            options.protocols
        )));
    }

    Ok(())
}

/// Adds `index` to the selected files.
///
/// Returns the new selection, or `None` when the file was already selected.
fn select(selected: &mut HashSet<usize>, index: usize) -> Option<HashSet<usize>> {
    selected.insert(index).then(|| selected.clone())
}

/// Engine starting a librqbit session.
#[derive(Debug, Default, Clone, Copy)]
pub struct RqbitEngine;

impl Engine for RqbitEngine {
    fn start(&self, options: Options) -> BoxFuture<'static, Result<Arc<dyn Client>, Error>> {
        async move {
            check_supported(&options)?;

            let session_options = SessionOptions {
                disable_dht: !options.dht,
                enable_upnp_port_forwarding: options.upnp,
                ..Default::default()
            };

            let session = Session::new_with_opts(options.download_dir.clone().into_std_path_buf(), session_options)
                .await
                .map_err(engine_error)?;

            info!(download_dir = %options.download_dir, "librqbit session started");

            let client: Arc<dyn Client> = Arc::new(RqbitClient {
                session,
                swarms: RwLock::default(),
                shutdown: CancellationToken::new(),
            });

            Ok(client)
        }
        .boxed()
    }
}

struct RqbitClient {
    session: Arc<Session>,
    swarms: RwLock<BTreeMap<InfoHash, Arc<RqbitSwarm>>>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for RqbitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RqbitClient")
            .field("swarms", &self.swarms)
            .field("shutdown", &self.shutdown)
            .finish_non_exhaustive()
    }
}

impl RqbitClient {
    fn swarm(&self, info_hash: &InfoHash) -> Option<Arc<RqbitSwarm>> {
        self.swarms.read().unwrap_or_else(PoisonError::into_inner).get(info_hash).cloned()
    }
}

impl Client for RqbitClient {
    fn join<'a>(&'a self, magnet: &'a str) -> BoxFuture<'a, Result<Arc<dyn Swarm>, Error>> {
        async move {
            if self.shutdown.is_cancelled() {
                return Err(Error::Closed);
            }

            let parsed = magnet.parse::<Magnet>().map_err(|source| Error::InvalidMagnet {
                magnet: magnet.to_owned(),
                source,
            })?;

            if let Some(swarm) = self.swarm(&parsed.info_hash) {
                return Ok(swarm as Arc<dyn Swarm>);
            }

            let add_options = AddTorrentOptions {
                overwrite: true,
                only_files: Some(Vec::new()),
                ..Default::default()
            };

            let response = tokio::select! {
                () = self.shutdown.cancelled() => return Err(Error::Cancelled),
                response = self.session.add_torrent(AddTorrent::from_url(magnet), Some(add_options)) => response.map_err(engine_error)?,
            };

            let handle = response
                .into_handle()
                .ok_or_else(|| engine_error(format!("librqbit did not return a handle for {magnet}")))?;

            debug!(info_hash = %parsed.info_hash, "Joined swarm");

            let swarm = self
                .swarms
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(parsed.info_hash)
                .or_insert_with(|| {
                    Arc::new(RqbitSwarm {
                        info_hash: parsed.info_hash,
                        trackers: parsed.trackers,
                        selection: Arc::new(Selection {
                            session: self.session.clone(),
                            handle: handle.clone(),
                            files: Mutex::default(),
                        }),
                        handle,
                        metadata: OnceLock::new(),
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
            if self.shutdown.is_cancelled() {
                return Vec::new();
            }

            self.shutdown.cancel();
            self.swarms.write().unwrap_or_else(PoisonError::into_inner).clear();
            self.session.stop().await;

            info!("librqbit session stopped");

            Vec::new()
        }
        .boxed()
    }
}

/// What the swarm knows once the `info` dictionary is received.
struct Received {
    metainfo: Metainfo,
    files: Vec<Arc<dyn File>>,
}

/// The files of a torrent being downloaded.
struct Selection {
    session: Arc<Session>,
    handle: ManagedTorrentHandle,
    files: Mutex<HashSet<usize>>,
}

impl Selection {
    /// Starts downloading the file at `index`, unless it's already selected.
    ///
    /// It must be called within a tokio runtime.
    fn add(&self, index: usize) {
        let Some(files) = select(&mut self.files.lock().unwrap_or_else(PoisonError::into_inner), index) else {
            return;
        };

        let session = self.session.clone();
        let handle = self.handle.clone();

        tokio::spawn(async move {
            match session.update_only_files(&handle, &files).await {
                Ok(()) => debug!(index, "File selected for download"),
                Err(err) => warn!(index, %err, "Unable to select the file for download"),
            }
        });
    }
}

struct RqbitSwarm {
    info_hash: InfoHash,
    trackers: Vec<String>,
    selection: Arc<Selection>,
    handle: ManagedTorrentHandle,
    metadata: OnceLock<Received>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for RqbitSwarm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RqbitSwarm")
            .field("info_hash", &self.info_hash)
            .field("metadata", &self.metadata.get().is_some())
            .finish_non_exhaustive()
    }
}

impl RqbitSwarm {
    fn receive(&self) -> Result<&Received, Error> {
        if let Some(received) = self.metadata.get() {
            return Ok(received);
        }

        let info_bytes = self
            .handle
            .with_metadata(|metadata| metadata.info_bytes.clone())
            .map_err(engine_error)?;

        let info: metainfo::Info = serde_bencode::from_bytes(&info_bytes).map_err(engine_error)?;

        let metainfo = Metainfo {
            announce: self.trackers.first().cloned(),
            announce_list: (!self.trackers.is_empty()).then(|| self.trackers.iter().map(|tracker| vec![tracker.clone()]).collect()),
            creation_date: None,
            comment: None,
            created_by: None,
            info,
        };

        let files = self.files_of(&metainfo.info);

        Ok(self.metadata.get_or_init(|| Received { metainfo, files }))
    }

    fn files_of(&self, info: &metainfo::Info) -> Vec<Arc<dyn File>> {
        info.torrent_files()
            .into_iter()
            .enumerate()
            .map(|(index, file)| {
                Arc::new(RqbitFile {
                    handle: self.handle.clone(),
                    selection: self.selection.clone(),
                    index,
                    path: file.path,
                    display_path: file.display_path,
                    length: file.length,
                    shutdown: self.shutdown.clone(),
                }) as Arc<dyn File>
            })
            .collect()
    }
}

impl Swarm for RqbitSwarm {
    fn info_hash(&self) -> InfoHash {
        self.info_hash
    }

    fn wait_for_metadata(&self) -> BoxFuture<'_, Result<Metadata, Error>> {
        async move {
            tokio::select! {
                () = self.shutdown.cancelled() => return Err(Error::Cancelled),
                initialized = self.handle.wait_until_initialized() => initialized.map_err(engine_error)?,
            }

            let received = self.receive()?;

            Ok(Metadata {
                name: received.metainfo.info.name.clone(),
                creation_date: received.metainfo.creation_date.unwrap_or_default(),
                files: received.files.clone(),
            })
        }
        .boxed()
    }

    fn files(&self) -> Vec<Arc<dyn File>> {
        self.metadata.get().map(|received| received.files.clone()).unwrap_or_default()
    }

    fn peers(&self) -> usize {
        self.handle
            .stats()
            .live
            .map_or(0, |live| live.snapshot.peer_stats.live)
    }

    fn metainfo(&self) -> Option<Vec<u8>> {
        let received = self.metadata.get()?;

        match received.metainfo.to_bytes() {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                warn!(info_hash = %self.info_hash, %err, "Unable to encode the metainfo");
                None
            }
        }
    }
}

struct RqbitFile {
    handle: ManagedTorrentHandle,
    selection: Arc<Selection>,
    index: usize,
    path: String,
    display_path: String,
    length: u64,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for RqbitFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RqbitFile")
            .field("index", &self.index)
            .field("path", &self.path)
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

impl File for RqbitFile {
    fn path(&self) -> &str {
        &self.path
    }

    fn display_path(&self) -> &str {
        &self.display_path
    }

    fn length(&self) -> u64 {
        self.length
    }

    fn bytes_completed(&self) -> u64 {
        self.handle
            .stats()
            .file_progress
            .get(self.index)
            .copied()
            .unwrap_or_default()
            .min(self.length)
    }

    fn reader(&self) -> Result<Box<dyn FileReader>, Error> {
        if self.shutdown.is_cancelled() {
            return Err(Error::Closed);
        }

        self.selection.add(self.index);

        let stream = self.handle.clone().stream(self.index).map_err(engine_error)?;

        Ok(Box::new(stream))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use camino::Utf8PathBuf;

    use super::{check_supported, select};
    use crate::core::swarm::{Options, Protocols};

    fn options() -> Options {
        Options {
            storage: Utf8PathBuf::from("./storage"),
            download_dir: Utf8PathBuf::from("./storage"),
            max_peers: None,
            dht: true,
            upnp: false,
            protocols: Protocols::default(),
            debug: false,
        }
    }

    #[test]
    fn it_should_accept_the_engine_default_peer_limit_and_both_protocols() {
        assert!(check_supported(&options()).is_ok());
    }

    #[test]
    fn it_should_refuse_a_peer_limit() {
        let options = Options {
            max_peers: Some(50),
            ..options()
        };

        let err = check_supported(&options).unwrap_err();

        assert!(err.to_string().contains("max_peers"));
    }

    #[test]
    fn it_should_refuse_disabling_a_protocol() {
        for protocols in [Protocols { tcp: true, utp: false }, Protocols { tcp: false, utp: true }] {
            let options = Options { protocols, ..options() };

            assert!(check_supported(&options).is_err());
        }
    }

    #[test]
    fn it_should_select_a_file_once() {
        let mut selected = HashSet::new();

        assert_eq!(select(&mut selected, 1), Some(HashSet::from([1])));
        assert_eq!(select(&mut selected, 1), None);
    }

    #[test]
    fn it_should_keep_the_files_already_selected() {
        let mut selected = HashSet::from([0]);

        assert_eq!(select(&mut selected, 2), Some(HashSet::from([0, 2])));
    }
}
