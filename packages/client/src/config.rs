//! Client configuration.
//!
//! CLI arguments with environment fallbacks, resolved together with the
//! persisted state into the values a session needs.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crossdrop_shared::{RoomToken, RoomTokenFactory};

use crate::domain::{DisplayName, ValueObjectError};
use crate::store::PersistedState;

/// Upper bound for a single WebSocket message; matches the relay default.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// CLI arguments for the interactive client
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Crossdrop terminal client")]
pub struct ClientArgs {
    /// Relay WebSocket URL
    #[arg(long, env = "CROSSDROP_URL", default_value = "ws://127.0.0.1:8080/ws")]
    pub url: String,

    /// Room token to join
    #[arg(short, long, conflicts_with = "new")]
    pub room: Option<String>,

    /// Start a fresh room instead of reusing the last one
    #[arg(long)]
    pub new: bool,

    /// Display name attached to outgoing messages
    #[arg(short, long)]
    pub name: Option<String>,

    /// Where the display name and last room are stored
    #[arg(long, env = "CROSSDROP_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// Directory used by `/save`
    #[arg(long, default_value = ".")]
    pub download_dir: PathBuf,

    /// First reconnect delay in milliseconds
    #[arg(long, default_value_t = 500)]
    pub reconnect_initial_ms: u64,

    /// Reconnect delay ceiling in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub reconnect_max_ms: u64,

    /// Maximum WebSocket message and frame size in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    pub max_message_size: usize,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "CROSSDROP_LOG", default_value = "warn")]
    pub log_level: String,
}

/// Connection settings for a [`crate::SessionClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub url: String,
    pub reconnect_initial: Duration,
    pub reconnect_max: Duration,
    pub max_message_size: usize,
    /// How long to wait for the welcome event after the socket opens
    pub handshake_timeout: Duration,
}

impl SessionConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            url: "ws://127.0.0.1:8080/ws".to_string(),
            reconnect_initial: Duration::from_millis(500),
            reconnect_max: Duration::from_millis(10_000),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            handshake_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&ClientArgs> for SessionConfig {
    fn from(args: &ClientArgs) -> Self {
        Self {
            url: args.url.clone(),
            reconnect_initial: Duration::from_millis(args.reconnect_initial_ms),
            reconnect_max: Duration::from_millis(args.reconnect_max_ms),
            max_message_size: args.max_message_size,
            ..Self::default()
        }
    }
}

/// Pick the room: explicit token, then `--new`, then the last room, then a fresh one.
pub fn resolve_room(args: &ClientArgs, persisted: &PersistedState) -> RoomToken {
    if let Some(room) = args.room.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        return RoomToken::new(room);
    }
    if args.new {
        return RoomTokenFactory::generate();
    }
    match &persisted.current_room {
        Some(room) if !room.trim().is_empty() => RoomToken::new(room.trim()),
        _ => RoomTokenFactory::generate(),
    }
}

/// Pick the display name: `--name`, then the stored one, then `User-<n>`.
pub fn resolve_display_name(
    args: &ClientArgs,
    persisted: &PersistedState,
) -> Result<DisplayName, ValueObjectError> {
    if let Some(name) = &args.name {
        return DisplayName::new(name.as_str());
    }
    Ok(persisted
        .display_name
        .as_deref()
        .and_then(|name| DisplayName::new(name).ok())
        .unwrap_or_else(DisplayName::random))
}
