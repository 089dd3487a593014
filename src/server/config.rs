//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::matte::MatteConfig;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Maximum concurrent connections (0 = unlimited)
    pub max_connections: usize,

    /// Enable TCP_NODELAY (disable Nagle's algorithm)
    pub tcp_nodelay: bool,

    /// Directory static file paths are resolved under
    pub doc_root: PathBuf,

    /// Redirect target for requests to `/`
    pub index_redirect: String,

    /// Background removal pipeline settings
    pub matte: MatteConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".parse().unwrap(),
            max_connections: 0, // Unlimited
            tcp_nodelay: true,  // Important for low latency streaming
            doc_root: PathBuf::from("."),
            index_redirect: "/index.html".to_string(),
            matte: MatteConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set maximum connections
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the static file document root
    pub fn doc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.doc_root = root.into();
        self
    }

    /// Set the redirect target for `/`
    pub fn index_redirect(mut self, target: impl Into<String>) -> Self {
        self.index_redirect = target.into();
        self
    }

    /// Set TCP_NODELAY
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.tcp_nodelay = enabled;
        self
    }

    /// Set the background removal configuration
    pub fn matte(mut self, matte: MatteConfig) -> Self {
        self.matte = matte;
        self
    }
}
