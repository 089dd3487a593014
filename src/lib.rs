//! MJPEG streaming server library
//!
//! A single frame producer publishes JPEG frames into a single-slot
//! [`FrameBuffer`]; every connected HTTP client runs its own
//! [`StreamSession`](session::StreamSession) that waits for the next frame
//! version and writes it out as one `multipart/x-mixed-replace` part.
//!
//! # Architecture
//!
//! ```text
//!   [Capture child process]
//!     stdout (MJPEG bytes)
//!          │
//!          ▼
//!    CommandSource ──► FrameBuffer (latest frame + version)
//!                           │
//!          ┌────────────────┼────────────────┐
//!          ▼                ▼                ▼
//!    StreamSession    StreamSession    StreamSession
//!    wait_for_next()  wait_for_next()  wait_for_next()
//!          │                │                │
//!          └──► one multipart part per new version ──► TCP
//! ```
//!
//! The buffer is last-write-wins: a frame nobody read before the next publish
//! is silently superseded. Slow sessions skip versions instead of queueing
//! them, so the producer never blocks on a consumer.
//!
//! `bytes::Bytes` frame payloads are reference counted, so every session
//! shares the same allocation for a given frame.

pub mod buffer;
pub mod capture;
pub mod error;
pub mod http;
pub mod matte;
pub mod server;
pub mod session;
pub mod stats;

pub use buffer::{Frame, FrameBuffer};
pub use capture::{CaptureConfig, CommandSource};
pub use error::{Error, Result};
pub use matte::{MatteConfig, MatteProcessor};
pub use server::{ServerConfig, StreamingServer};
pub use session::StreamSession;
