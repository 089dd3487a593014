//! MJPEG camera streaming server daemon
//!
//! Run with: mjpegd [BIND_ADDR]
//!
//! Examples:
//!   mjpegd                    # binds to 0.0.0.0:8000
//!   mjpegd localhost          # binds to 127.0.0.1:8000
//!   mjpegd 127.0.0.1:9000     # binds to 127.0.0.1:9000
//!
//! Open http://<host>:8000/ in a browser for the viewer page; the live
//! stream itself is at /stream.mjpg.

use std::net::SocketAddr;
use std::sync::Arc;

use mjpeg_rs::{CaptureConfig, CommandSource, FrameBuffer, ServerConfig, StreamingServer};

/// Parse bind address from command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:8000
/// - "127.0.0.1" -> 127.0.0.1:8000
/// - "127.0.0.1:9000" -> 127.0.0.1:9000
fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    const DEFAULT_PORT: u16 = 8000;

    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_PORT));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn print_usage() {
    eprintln!("Usage: mjpegd [BIND_ADDR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  BIND_ADDR    Address to bind to (default: 0.0.0.0:8000)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RUST_LOG     Log filter, e.g. RUST_LOG=mjpeg_rs=debug");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let bind_addr = match args.get(1) {
        Some(addr_str) => match parse_bind_addr(addr_str) {
            Ok(addr) => addr,
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        },
        None => "0.0.0.0:8000".parse().unwrap(),
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mjpeg_rs=info".parse()?)
                .add_directive("mjpegd=info".parse()?),
        )
        .init();

    // Process-scoped state: the single frame slot shared by the producer and
    // every client session.
    let buffer = Arc::new(FrameBuffer::new());

    let capture = CommandSource::new(CaptureConfig::default());
    let mut capture_task = tokio::spawn({
        let buffer = Arc::clone(&buffer);
        async move { capture.run(buffer).await }
    });

    let config = ServerConfig::default().bind(bind_addr);
    let server = StreamingServer::new(config, Arc::clone(&buffer));

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Server error");
            }
        }
        result = &mut capture_task => {
            // Frame production stopping is fatal: stop serving rather than
            // hand out a frozen stream.
            match result {
                Ok(Err(e)) => tracing::error!(error = %e, "Frame producer stopped"),
                Ok(Ok(())) => {}
                Err(e) => tracing::error!(error = %e, "Frame producer task failed"),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    // Aborting the capture task drops the encoder child, which is configured
    // to be killed on drop; the camera is released on every exit path.
    capture_task.abort();

    Ok(())
}
