pub mod config;
pub mod logging;

pub mod client;
pub mod transport;
