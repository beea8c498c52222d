//! Command-line arguments
//!
//! Every flag is optional and, when given, overrides the config file.

use crate::logging::LogFormat;
use clap::Parser;
use std::path::PathBuf;

/// EXPLAIN plan viewer and advisor
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "planlens")]
#[command(version, about = "Serve the planlens EXPLAIN plan viewer")]
pub struct Args {
    /// Path to a TOML config file (default: <config dir>/planlens/config.toml)
    #[arg(short, long, env = "PLANLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long, env = "PLANLENS_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Largest accepted request body, in bytes
    #[arg(long, env = "PLANLENS_MAX_BODY_BYTES")]
    pub max_body_bytes: Option<usize>,

    /// Deepest plan level that is analyzed
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Maximum number of plan nodes analyzed per request
    #[arg(long)]
    pub max_nodes: Option<usize>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}
