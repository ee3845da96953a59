pub mod config;
pub mod models;
pub mod db;
pub mod pipeline;
pub mod scheduling;
pub mod trends;

pub use pipeline::extraction::extract_vitals;

use tracing_subscriber::EnvFilter;

/// Initialize tracing from `RUST_LOG`, falling back to the default filter.
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
