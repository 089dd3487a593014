//! Single-slot frame buffer for producer → sessions fan-out
//!
//! The buffer holds at most one frame, tagged with a monotonically increasing
//! version, and wakes every waiting session when a new frame lands.
//!
//! ```text
//!    [producer]                      [sessions]
//!    publish(jpeg) ──► Frame{data, version} ──► wait_for_next(last_seen)
//!                      (last write wins)        wait_for_next(last_seen)
//! ```
//!
//! # Freshness model
//!
//! There is no history: if several frames are published while a session is
//! busy writing, the session observes only the newest one on its next wait.
//! This keeps the producer fully decoupled from consumer speed.

pub mod frame;
pub mod slot;

pub use frame::Frame;
pub use slot::FrameBuffer;
