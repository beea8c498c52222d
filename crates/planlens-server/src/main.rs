//! planlens - EXPLAIN plan viewer and advisor
//!
//! This is the main entry point for the planlens server.

use clap::Parser;
use planlens_server::{Args, ServerConfig, logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::load(args.config.as_deref())?;
    config.apply_args(&args);

    if let Err(e) = logging::init(&config.logging) {
        // Can't use tracing here since logging isn't initialized yet
        eprintln!("FATAL: Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        build_mode = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
        "Starting planlens"
    );

    server::run(config).await
}
