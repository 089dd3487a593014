//! Crate-wide error types

use std::process::ExitStatus;

/// Convenience result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for server, capture and matting operations
#[derive(Debug)]
pub enum Error {
    /// Underlying I/O failure (socket, file system, subprocess spawn)
    Io(std::io::Error),
    /// Malformed or oversized HTTP request
    Request(&'static str),
    /// Background removal command failed
    Matte(String),
    /// Image decode/encode failure in the matting post-process
    Image(image::ImageError),
    /// The frame producer process exited; the server cannot continue
    CaptureExited(ExitStatus),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Request(reason) => write!(f, "Bad request: {}", reason),
            Error::Matte(reason) => write!(f, "Background removal failed: {}", reason),
            Error::Image(e) => write!(f, "Image processing failed: {}", e),
            Error::CaptureExited(status) => write!(f, "Frame producer exited: {}", status),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e)
    }
}
