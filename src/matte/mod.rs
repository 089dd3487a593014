//! Background removal for the on-demand processed image endpoint
//!
//! Thin wrapper around an external matting command plus an image
//! post-process: blur the cut-out's alpha channel to soften its edges, then
//! composite it onto an opaque black background. Runs synchronously within
//! the requesting connection; a failed matting step is a hard failure and no
//! bytes are served.

pub mod compose;
pub mod processor;

pub use processor::{MatteConfig, MatteProcessor};
