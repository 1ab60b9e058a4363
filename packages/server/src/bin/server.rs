//! Crossdrop relay server.
//!
//! Relays chat and file events to every other connection joined to the same room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin crossdrop-server -- --port 8080
//! ```

use clap::Parser;
use crossdrop_server::{ServerArgs, ServerConfig};
use crossdrop_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ServerArgs::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    // Run the server
    if let Err(e) = crossdrop_server::run(ServerConfig::from(&args)).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
