//! HTTP request reading and parsing

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};

/// Upper bound on request head size; anything larger is rejected
const MAX_REQUEST_HEAD: usize = 8 * 1024;

/// Request method
///
/// Only `GET` is routable; everything else is kept verbatim for the 405
/// response log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Other(String),
}

impl Method {
    fn parse(token: &str) -> Self {
        match token {
            "GET" => Method::Get,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Other(s) => s.as_str(),
        }
    }
}

/// A parsed request line
///
/// Headers are read off the wire to delimit the request but not retained;
/// nothing in the routing table depends on them.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
}

/// Read one request head from `reader` and parse its request line
///
/// Accumulates until the `\r\n\r\n` terminator, bounded at 8 KiB.
pub async fn read_request<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Request> {
    let mut buf = BytesMut::with_capacity(1024);

    while !head_complete(&buf) {
        if buf.len() >= MAX_REQUEST_HEAD {
            return Err(Error::Request("request head too large"));
        }
        let n = reader.read_buf(&mut buf).await?;
        if n == 0 {
            return Err(Error::Request("connection closed before request head"));
        }
    }

    parse_request_line(&buf)
}

fn head_complete(buf: &[u8]) -> bool {
    buf.windows(4).any(|w| w == b"\r\n\r\n")
}

fn parse_request_line(buf: &[u8]) -> Result<Request> {
    let line_end = buf
        .windows(2)
        .position(|w| w == b"\r\n")
        .ok_or(Error::Request("missing request line"))?;
    let line = std::str::from_utf8(&buf[..line_end])
        .map_err(|_| Error::Request("request line is not valid UTF-8"))?;

    let mut parts = line.split_whitespace();
    let method = parts.next().ok_or(Error::Request("missing method"))?;
    let target = parts.next().ok_or(Error::Request("missing request target"))?;
    let version = parts.next().ok_or(Error::Request("missing HTTP version"))?;

    if !version.starts_with("HTTP/") {
        return Err(Error::Request("malformed HTTP version"));
    }
    if !target.starts_with('/') {
        return Err(Error::Request("request target must be absolute"));
    }

    Ok(Request {
        method: Method::parse(method),
        path: target.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn read_str(raw: &str) -> Result<Request> {
        let mut reader = std::io::Cursor::new(raw.as_bytes().to_vec());
        read_request(&mut reader).await
    }

    #[tokio::test]
    async fn test_parse_get() {
        let request = read_str("GET /stream.mjpg HTTP/1.1\r\nHost: cam\r\n\r\n")
            .await
            .unwrap();

        assert_eq!(request.method, Method::Get);
        assert_eq!(request.path, "/stream.mjpg");
    }

    #[tokio::test]
    async fn test_parse_other_method() {
        let request = read_str("POST /stream.mjpg HTTP/1.1\r\n\r\n").await.unwrap();

        assert_eq!(request.method, Method::Other("POST".to_string()));
        assert_eq!(request.method.as_str(), "POST");
    }

    #[tokio::test]
    async fn test_headers_split_across_reads() {
        // Cursor yields everything at once, so exercise the accumulation path
        // with a reader that trickles one byte at a time.
        struct Trickle(Vec<u8>, usize);
        impl AsyncRead for Trickle {
            fn poll_read(
                mut self: std::pin::Pin<&mut Self>,
                _cx: &mut std::task::Context<'_>,
                buf: &mut tokio::io::ReadBuf<'_>,
            ) -> std::task::Poll<std::io::Result<()>> {
                if self.1 < self.0.len() {
                    let byte = self.0[self.1];
                    self.1 += 1;
                    buf.put_slice(&[byte]);
                }
                std::task::Poll::Ready(Ok(()))
            }
        }

        let raw = b"GET / HTTP/1.1\r\nHost: cam\r\n\r\n".to_vec();
        let mut reader = Trickle(raw, 0);
        let request = read_request(&mut reader).await.unwrap();
        assert_eq!(request.path, "/");
    }

    #[tokio::test]
    async fn test_truncated_request_rejected() {
        let result = read_str("GET / HTTP/1.1\r\nHost: cam").await;
        assert!(matches!(result, Err(Error::Request(_))));
    }

    #[tokio::test]
    async fn test_garbage_request_line_rejected() {
        assert!(read_str("nonsense\r\n\r\n").await.is_err());
        assert!(read_str("GET\r\n\r\n").await.is_err());
        assert!(read_str("GET /x FTP/1.0\r\n\r\n").await.is_err());
        assert!(read_str("GET relative HTTP/1.1\r\n\r\n").await.is_err());
    }

    #[tokio::test]
    async fn test_oversized_head_rejected() {
        let raw = format!("GET / HTTP/1.1\r\nX-Pad: {}\r\n\r\n", "a".repeat(16 * 1024));
        let result = read_str(&raw).await;
        assert!(matches!(
            result,
            Err(Error::Request("request head too large"))
        ));
    }
}
