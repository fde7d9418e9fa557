//! Gateway application bootstrapping.
//!
//! This module includes all the functions to build the application, its
//! dependencies, and run the jobs.
//!
//! The gateway has a single job: the HTTP gateway server, which owns the
//! swarm client.
pub mod app;
pub mod config;
pub mod jobs;
pub mod logging;
