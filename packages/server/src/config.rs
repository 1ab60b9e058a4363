//! Server configuration.
//!
//! Values come from CLI arguments, falling back to environment variables and
//! then to compiled defaults.

use clap::Parser;

/// Default upper bound for a single WebSocket message (64 MiB).
///
/// Must stay above the client's 50 MiB file ceiling plus the metadata header,
/// since a file is relayed as one frame.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// CLI arguments for the relay server
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Crossdrop relay server")]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "CROSSDROP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "CROSSDROP_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Maximum WebSocket message and frame size in bytes
    #[arg(long, env = "CROSSDROP_MAX_MESSAGE_SIZE", default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    pub max_message_size: usize,

    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(long, env = "CROSSDROP_LOG", default_value = "info")]
    pub log_level: String,
}

/// Resolved server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_message_size: usize,
}

impl ServerConfig {
    /// Address string passed to the TCP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl From<&ServerArgs> for ServerConfig {
    fn from(args: &ServerArgs) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            max_message_size: args.max_message_size,
        }
    }
}
