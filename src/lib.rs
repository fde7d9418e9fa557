//! **htorrent** is a gateway that streams the content of torrents over HTTP.
//!
//! Give it a magnet link and it joins the swarm, waits for the torrent
//! metadata and serves the files while they are downloaded from the peers.
//! HTTP range requests are supported, so media players can seek inside
//! videos that are only partially downloaded.
//!
//! # Table of contents
//!
//! - [Features](#features)
//! - [Services](#services)
//! - [Installation](#installation)
//! - [Configuration](#configuration)
//! - [Usage](#usage)
//! - [Components](#components)
//! - [Implementation details](#implementation-details)
//!
//! # Features
//!
//! - Torrent metadata and file listing by magnet link.
//! - File streaming with HTTP range requests while the file downloads.
//! - Transfer metrics of all the joined swarms.
//! - Download progress reporting of the streamed files.
//! - Graceful shutdown.
//!
//! # Services
//!
//! The gateway exposes four endpoints:
//!
//! - `GET /info?magnet=`: the files of the torrent.
//! - `GET /metrics`: peers and completion of all the joined swarms.
//! - `GET /stream?magnet=&path=`: the content of a file.
//! - `GET /health_check`: a health check for containers.
//!
//! Refer to the [`gateway`](crate::servers::gateway) module for the details.
//!
//! # Installation
//!
//! The binary needs the `rqbit` feature, which adds the
//! [`librqbit`](https://docs.rs/librqbit) `BitTorrent` engine:
//!
//! ```text
//! cargo build --release --features rqbit
//! ./target/release/htorrent-gateway
//! ```
//!
//! # Configuration
//!
//! The default configuration is loaded from
//! `./share/default/config/gateway.toml`:
//!
//! ```toml
//! [logging]
//! threshold = "info"
//!
//! [gateway]
//! bind_address = "0.0.0.0:1337"
//! shutdown_grace_period = 90
//!
//! [swarm]
//! storage = "./storage/htorrent/lib/data"
//! max_peers = 0
//! dht = true
//! upnp = true
//! protocols = ["tcp", "utp"]
//! debug = false
//!
//! [progress]
//! interval_ms = 100
//! ```
//!
//! Any option can be overridden with environment variables:
//!
//! - `HTORRENT_CONFIG_TOML_PATH`: path of the configuration file.
//! - `HTORRENT_CONFIG_TOML`: the whole configuration, as TOML.
//! - `HTORRENT_<SECTION>__<OPTION>`: a single option, for example
//!   `HTORRENT_SWARM__MAX_PEERS=80`.
//! - `PORT`: the port the gateway listens on.
//!
//! Refer to the [`htorrent-configuration`](htorrent_configuration) crate for
//! all the options.
//!
//! # Usage
//!
//! ```text
//! curl "http://127.0.0.1:1337/info?magnet=magnet%3A%3Fxt%3Durn%3Abtih%3A08ada5a7a6183aae1e09d831df6748d566095a10%26dn%3DSintel"
//! mpv "http://127.0.0.1:1337/stream?magnet=magnet%3A%3Fxt%3Durn%3Abtih%3A08ada5a7a6183aae1e09d831df6748d566095a10%26dn%3DSintel&path=Sintel%2FSintel.mp4"
//! ```
//!
//! The gateway can also be embedded. With the in-memory engine:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use htorrent::core::progress::TracingProgressSink;
//! use htorrent::core::swarm::memory::MemoryEngine;
//! use htorrent::servers::gateway::server::{Gateway, Launcher};
//! use htorrent_configuration::Configuration;
//!
//! # async fn run() -> Result<(), htorrent::servers::gateway::server::Error> {
//! let config = Configuration::default();
//!
//! let gateway = Gateway::new(
//!     Launcher::from(&config),
//!     Arc::new(MemoryEngine::default()),
//!     Arc::new(TracingProgressSink),
//! )
//! .open()
//! .await?;
//!
//! gateway.close().await?;
//! gateway.wait().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Components
//!
//! ```text
//!                     Delivery layer     Domain layer
//!
//! HTTP client  --->  HTTP gateway   |>  services  --->  swarm client (engine)
//!                                   |   progress  --->  progress sink
//! ```
//!
//! - [`servers::gateway`]: the HTTP server, handlers and responses.
//! - [`core`]: the services, the progress reporters and the swarm client
//!   traits and engines.
//! - [`bootstrap`]: configuration and logging initialization, and the jobs.
//!
//! # Implementation details
//!
//! The gateway does not implement the `BitTorrent` protocol. It drives an
//! engine through the [`core::swarm`] traits. The engines are:
//!
//! - [`core::swarm::memory::MemoryEngine`]: serves torrents seeded in
//!   memory. It's used for embedding and testing.
//! - `core::swarm::rqbit::RqbitEngine`: a real engine, with the `rqbit`
//!   feature.
pub mod app;
pub mod bootstrap;
pub mod core;
pub mod servers;
