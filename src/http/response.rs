//! HTTP response writing

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Response status codes used by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    MovedPermanently,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    InternalServerError,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::MovedPermanently => 301,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::MethodNotAllowed => 405,
            Status::InternalServerError => 500,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::MovedPermanently => "Moved Permanently",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::MethodNotAllowed => "Method Not Allowed",
            Status::InternalServerError => "Internal Server Error",
        }
    }
}

/// Write a status line plus headers, terminated by the blank line
///
/// Every response closes the connection after the body, so `Connection: close`
/// is appended unconditionally.
pub async fn write_head<W: AsyncWrite + Unpin>(
    writer: &mut W,
    status: Status,
    headers: &[(&str, &str)],
) -> std::io::Result<()> {
    let mut head = format!("HTTP/1.1 {} {}\r\n", status.code(), status.reason());
    for (name, value) in headers {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }
    head.push_str("Connection: close\r\n\r\n");

    writer.write_all(head.as_bytes()).await
}

/// Content type derived from the request path's extension
///
/// Anything outside the known set is served as an opaque octet stream.
pub fn content_type_for(path: &str) -> &'static str {
    if path.ends_with(".html") {
        "text/html"
    } else if path.ends_with(".js") {
        "application/javascript"
    } else if path.ends_with(".css") {
        "text/css"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_head_format() {
        let mut out = Vec::new();
        write_head(&mut out, Status::Ok, &[("Content-Length", "4")])
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 4\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[tokio::test]
    async fn test_write_head_redirect() {
        let mut out = Vec::new();
        write_head(
            &mut out,
            Status::MovedPermanently,
            &[("Location", "/index.html")],
        )
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("HTTP/1.1 301 Moved Permanently\r\n"));
        assert!(text.contains("Location: /index.html\r\n"));
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("/index.html"), "text/html");
        assert_eq!(content_type_for("/app.js"), "application/javascript");
        assert_eq!(content_type_for("/style.css"), "text/css");
        assert_eq!(content_type_for("/photo.jpg"), "application/octet-stream");
        assert_eq!(content_type_for("/README"), "application/octet-stream");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::NotFound.code(), 404);
        assert_eq!(Status::NotFound.reason(), "Not Found");
        assert_eq!(Status::MethodNotAllowed.code(), 405);
        assert_eq!(Status::InternalServerError.code(), 500);
    }
}
