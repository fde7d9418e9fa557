//! Testing helpers for the [htorrent gateway](https://docs.rs/htorrent).
pub mod configuration;
pub mod random;
