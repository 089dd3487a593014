//! Per-connection request handling
//!
//! Each accepted connection serves exactly one request: a redirect, a static
//! file, the processed image, or (for the stream endpoint) an MJPEG session
//! that occupies the connection until the client goes away.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::buffer::FrameBuffer;
use crate::error::{Error, Result};
use crate::http::{self, Method, Status};
use crate::matte::MatteProcessor;
use crate::server::config::ServerConfig;
use crate::server::files;
use crate::session::StreamSession;

/// Exact path of the MJPEG stream endpoint
pub const STREAM_PATH: &str = "/stream.mjpg";

/// Exact path of the on-demand background removal endpoint
pub const PROCESSED_IMAGE_PATH: &str = "/get_child_img";

/// One accepted client connection
///
/// Generic over the transport so tests can drive it with an in-memory duplex.
pub struct Connection<S> {
    session_id: u64,
    stream: S,
    peer_addr: SocketAddr,
    config: ServerConfig,
    buffer: Arc<FrameBuffer>,
    matte: Arc<MatteProcessor>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    pub fn new(
        session_id: u64,
        stream: S,
        peer_addr: SocketAddr,
        config: ServerConfig,
        buffer: Arc<FrameBuffer>,
        matte: Arc<MatteProcessor>,
    ) -> Self {
        Self {
            session_id,
            stream,
            peer_addr,
            config,
            buffer,
            matte,
        }
    }

    /// Read the request and dispatch it
    pub async fn run(mut self) -> Result<()> {
        let request = match http::read_request(&mut self.stream).await {
            Ok(request) => request,
            Err(Error::Request(reason)) => {
                tracing::debug!(
                    session_id = self.session_id,
                    peer = %self.peer_addr,
                    reason,
                    "Rejecting malformed request"
                );
                http::write_head(
                    &mut self.stream,
                    Status::BadRequest,
                    &[("Content-Length", "0")],
                )
                .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if request.method != Method::Get {
            tracing::debug!(
                session_id = self.session_id,
                peer = %self.peer_addr,
                method = request.method.as_str(),
                "Method not allowed"
            );
            http::write_head(
                &mut self.stream,
                Status::MethodNotAllowed,
                &[("Allow", "GET"), ("Content-Length", "0")],
            )
            .await?;
            return Ok(());
        }

        tracing::debug!(
            session_id = self.session_id,
            peer = %self.peer_addr,
            path = %request.path,
            "Request"
        );

        match request.path.as_str() {
            "/" => self.redirect_to_index().await,
            STREAM_PATH => self.stream_mjpeg().await,
            PROCESSED_IMAGE_PATH => self.serve_processed_image().await,
            path => self.serve_static(path).await,
        }
    }

    async fn redirect_to_index(mut self) -> Result<()> {
        let target = self.config.index_redirect.clone();
        http::write_head(
            &mut self.stream,
            Status::MovedPermanently,
            &[("Location", target.as_str()), ("Content-Length", "0")],
        )
        .await?;
        Ok(())
    }

    async fn stream_mjpeg(self) -> Result<()> {
        let mut session = StreamSession::new(self.session_id, self.stream, self.buffer);
        session.run().await
    }

    async fn serve_processed_image(mut self) -> Result<()> {
        match self.matte.process().await {
            Ok(bytes) => {
                let length = bytes.len().to_string();
                http::write_head(
                    &mut self.stream,
                    Status::Ok,
                    &[
                        ("Content-Type", "image/jpeg"),
                        ("Content-Length", length.as_str()),
                    ],
                )
                .await?;
                self.stream.write_all(&bytes).await?;
                self.stream.flush().await?;
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    session_id = self.session_id,
                    error = %e,
                    "Background removal failed"
                );
                http::write_head(
                    &mut self.stream,
                    Status::InternalServerError,
                    &[("Content-Length", "0")],
                )
                .await?;
                Ok(())
            }
        }
    }

    async fn serve_static(mut self, request_path: &str) -> Result<()> {
        let resolved = match files::sanitize(&self.config.doc_root, request_path) {
            Some(path) => path,
            None => return self.not_found().await,
        };

        match tokio::fs::metadata(&resolved).await {
            Ok(meta) if meta.is_file() => {}
            _ => return self.not_found().await,
        }

        let body = match tokio::fs::read(&resolved).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(
                    session_id = self.session_id,
                    path = %resolved.display(),
                    error = %e,
                    "Failed to read static file"
                );
                http::write_head(
                    &mut self.stream,
                    Status::InternalServerError,
                    &[("Content-Length", "0")],
                )
                .await?;
                return Ok(());
            }
        };

        let length = body.len().to_string();
        http::write_head(
            &mut self.stream,
            Status::Ok,
            &[
                ("Content-Type", http::content_type_for(request_path)),
                ("Content-Length", length.as_str()),
            ],
        )
        .await?;
        self.stream.write_all(&body).await?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn not_found(mut self) -> Result<()> {
        http::write_head(&mut self.stream, Status::NotFound, &[("Content-Length", "0")]).await?;
        Ok(())
    }
}
