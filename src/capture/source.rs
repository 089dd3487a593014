//! External encoder process as the frame source

use std::io;
use std::process::Stdio;
use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::buffer::FrameBuffer;
use crate::capture::split::JpegSplitter;
use crate::error::{Error, Result};

const READ_CHUNK: usize = 64 * 1024;

/// Configuration for the capture subprocess
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Encoder program emitting MJPEG on stdout
    pub program: String,
    /// Arguments passed to the program
    pub args: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            program: "rpicam-vid".to_string(),
            args: [
                "--codec", "mjpeg", "--width", "640", "--height", "480", "--timeout", "0",
                "--nopreview", "--output", "-",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl CaptureConfig {
    /// Create a config for a custom encoder invocation
    pub fn command(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Frame producer backed by an external encoder process
///
/// Spawns the encoder, splits its stdout into JPEG frames and publishes each
/// one into the buffer. The child is killed when the source is dropped, so
/// the capture device is released on every exit path, including task abort.
pub struct CommandSource {
    config: CaptureConfig,
}

impl CommandSource {
    pub fn new(config: CaptureConfig) -> Self {
        Self { config }
    }

    /// Produce frames until the encoder exits
    ///
    /// Never returns `Ok`: a healthy encoder streams forever, so reaching the
    /// end of its output is an error. The caller decides what to do about it;
    /// the server binary treats it as fatal.
    pub async fn run(&self, buffer: Arc<FrameBuffer>) -> Result<()> {
        tracing::info!(
            program = %self.config.program,
            args = ?self.config.args,
            "Starting frame producer"
        );

        let mut child = Command::new(&self.config.program)
            .args(&self.config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Io(io::Error::other("capture stdout was not piped")))?;

        let mut splitter = JpegSplitter::new();
        let mut chunk = BytesMut::with_capacity(READ_CHUNK);

        loop {
            chunk.clear();
            let n = stdout.read_buf(&mut chunk).await?;
            if n == 0 {
                break;
            }

            splitter.push(&chunk);
            while let Some(frame) = splitter.next_frame() {
                let version = buffer.publish(frame);
                tracing::trace!(version = version, "Published frame");
            }
        }

        let status = child.wait().await?;
        tracing::error!(status = %status, "Frame producer stream ended");
        Err(Error::CaptureExited(status))
    }
}
