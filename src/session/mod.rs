//! Per-client streaming sessions

pub mod stream;

pub use stream::{SessionPhase, StreamSession, BOUNDARY};
