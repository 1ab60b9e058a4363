//! Interactive Crossdrop client.

use clap::Parser;

use crossdrop_client::ClientArgs;
use crossdrop_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let args = ClientArgs::parse();
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Err(e) = crossdrop_client::cli::run(args).await {
        tracing::error!("{}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
