pub mod asserts;
pub mod client;
pub mod contract;
pub mod environment;

use htorrent::servers::gateway::server;

pub type Started = environment::Environment<server::Running>;
