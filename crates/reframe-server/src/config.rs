//! Command-line and environment configuration.

use std::net::SocketAddr;

use clap::Parser;

use crate::{ServerError, ServerResult};

/// Default cap on a request body: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "reframe-server", version, about = "Geometric image transform service")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "REFRAME_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "REFRAME_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Largest accepted request body in bytes
    #[arg(long, env = "REFRAME_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Allowed CORS origins, comma separated; "*" allows any
    #[arg(
        long = "cors-origin",
        env = "REFRAME_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "*"
    )]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl ServerConfig {
    /// Socket address built from `host` and `port`.
    pub fn addr(&self) -> ServerResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ServerError::Internal(format!("Invalid server address: {}", e)))
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}
