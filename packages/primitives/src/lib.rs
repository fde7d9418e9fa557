//! Primitive types for the [htorrent gateway](https://docs.rs/htorrent).
//!
//! This module contains the basic data structures shared by the gateway and
//! its clients: the swarm identifier ([`InfoHash`](info_hash::InfoHash)) and
//! the JSON resources the gateway responds with.
pub mod info;
pub mod info_hash;
pub mod metrics;
