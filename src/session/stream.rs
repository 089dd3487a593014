//! MJPEG streaming session
//!
//! One session per connected stream client. The session sends the
//! `multipart/x-mixed-replace` response head once, then loops: wait for a
//! frame newer than the last one delivered, write it as one part, repeat.
//! The loop only ends when the client goes away or a write fails.

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::buffer::{Frame, FrameBuffer};
use crate::error::Result;
use crate::http::{self, Status};
use crate::stats::SessionStats;

/// Multipart boundary token used in the stream response
pub const BOUNDARY: &str = "FRAME";

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Connection accepted, response head not sent yet
    Connected,
    /// Response head sent, delivering parts
    Streaming,
    /// Client disconnected; normal teardown
    Closed,
    /// Write failed for a reason other than disconnect
    Failed,
}

/// Per-client streaming state machine
///
/// Generic over the writer so tests can drive it with an in-memory duplex
/// instead of a TCP socket.
pub struct StreamSession<W> {
    id: u64,
    writer: W,
    buffer: Arc<FrameBuffer>,
    phase: SessionPhase,
    last_version: u64,
    stats: SessionStats,
}

impl<W: AsyncWrite + Unpin> StreamSession<W> {
    pub fn new(id: u64, writer: W, buffer: Arc<FrameBuffer>) -> Self {
        Self {
            id,
            writer,
            buffer,
            phase: SessionPhase::Connected,
            last_version: 0,
            stats: SessionStats::new(),
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Delivery statistics so far
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Version of the last frame delivered to this client (0 if none)
    pub fn last_version(&self) -> u64 {
        self.last_version
    }

    /// Stream frames to the client until it disconnects
    ///
    /// A disconnect-shaped write error (broken pipe, reset, aborted) is the
    /// normal way out and returns `Ok`; any other write error is propagated.
    /// Either way the session is finished and the connection is released.
    pub async fn run(&mut self) -> Result<()> {
        let result = self.stream().await;

        match result {
            Ok(()) => Ok(()),
            Err(e) if is_disconnect(&e) => {
                self.phase = SessionPhase::Closed;
                tracing::debug!(
                    session_id = self.id,
                    frames_sent = self.stats.frames_sent,
                    frames_skipped = self.stats.frames_skipped,
                    fps = format!("{:.1}", self.stats.delivered_framerate()),
                    error = %e,
                    "Removed streaming client"
                );
                Ok(())
            }
            Err(e) => {
                self.phase = SessionPhase::Failed;
                tracing::warn!(
                    session_id = self.id,
                    frames_sent = self.stats.frames_sent,
                    error = %e,
                    "Streaming session failed"
                );
                Err(e.into())
            }
        }
    }

    async fn stream(&mut self) -> io::Result<()> {
        self.send_head().await?;
        self.phase = SessionPhase::Streaming;
        self.stats = SessionStats::new();

        loop {
            let frame = self.buffer.wait_for_next(self.last_version).await;
            self.write_part(&frame).await?;

            self.stats.frames_sent += 1;
            self.stats.frames_skipped += frame.version - self.last_version - 1;
            self.last_version = frame.version;
        }
    }

    async fn send_head(&mut self) -> io::Result<()> {
        let content_type = format!("multipart/x-mixed-replace; boundary={}", BOUNDARY);
        http::write_head(
            &mut self.writer,
            Status::Ok,
            &[
                ("Age", "0"),
                ("Cache-Control", "no-cache, private"),
                ("Pragma", "no-cache"),
                ("Content-Type", content_type.as_str()),
            ],
        )
        .await?;
        self.writer.flush().await
    }

    async fn write_part(&mut self, frame: &Frame) -> io::Result<()> {
        let head = format!(
            "--{}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
            BOUNDARY,
            frame.len()
        );

        self.writer.write_all(head.as_bytes()).await?;
        self.writer.write_all(&frame.data).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;

        self.stats.bytes_sent += (head.len() + frame.len() + 2) as u64;
        Ok(())
    }
}

fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::WriteZero
    )
}
