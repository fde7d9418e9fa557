//! The gateway domain layer.
//!
//! It contains the logic to answer the gateway requests, independent of HTTP:
//!
//! ```text
//! Delivery layer       Domain layer
//!
//!                  | services  -> swarm client (engine)
//!  HTTP gateway    |> progress  -> progress sink
//!                  | magnet, metainfo
//! ```
//!
//! - [`swarm`]: the traits the gateway uses to drive a `BitTorrent` engine,
//!   and the engines.
//! - [`services`]: one service per endpoint. They validate the request, join
//!   the swarm and wait for the metadata.
//! - [`progress`]: the reporters sending the download progress of the
//!   streamed files to a [`progress::ProgressSink`].
//! - [`magnet`] and [`metainfo`]: the `BitTorrent` formats the gateway reads.
//! - [`error`]: the errors returned by the services.
pub mod error;
pub mod magnet;
pub mod metainfo;
pub mod progress;
pub mod services;
pub mod swarm;
