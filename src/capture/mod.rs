//! Frame producer boundary
//!
//! The camera and its JPEG encoder live in an external process that writes a
//! raw MJPEG byte stream to stdout (`rpicam-vid --codec mjpeg -o -` by
//! default). [`CommandSource`] owns that child process, splits its output
//! into frames and publishes each one into the shared
//! [`FrameBuffer`](crate::buffer::FrameBuffer).
//!
//! The producer never depends on consumers: publishing is non-blocking and a
//! frame nobody read is simply superseded. If the child exits or its stream
//! ends, the source returns an error; frame production stopping is fatal to
//! the process.

pub mod source;
pub mod split;

pub use source::{CaptureConfig, CommandSource};
pub use split::JpegSplitter;
