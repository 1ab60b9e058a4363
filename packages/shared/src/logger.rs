//! Tracing subscriber setup shared by the server and client binaries.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Otherwise the binary and the Crossdrop crates log
/// at `default_level`, and everything else stays at `warn`.
/// Output goes to stderr so an interactive prompt on stdout stays readable.
/// Calling this more than once is harmless; later calls are ignored.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(true).with_writer(std::io::stderr))
        .try_init();
}

fn default_directives(bin_name: &str, level: &str) -> String {
    let bin_target = bin_name.replace('-', "_");
    format!(
        "warn,{bin_target}={level},crossdrop_shared={level},crossdrop_server={level},crossdrop_client={level},tower_http={level}"
    )
}
