//! HTTP server: configuration, accept loop and per-connection routing

pub mod config;
pub mod connection;
pub mod files;
pub mod listener;

pub use config::ServerConfig;
pub use connection::{Connection, PROCESSED_IMAGE_PATH, STREAM_PATH};
pub use listener::StreamingServer;
