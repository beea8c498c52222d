//! Server configuration
//!
//! Built-in defaults, then an optional TOML file, then command-line flags and
//! environment variables.
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8080
//! max_body_bytes = 1048576
//!
//! [limits]
//! max_depth = 128
//! max_nodes = 50000
//!
//! [logging]
//! format = "json"
//! ```

use crate::cli::Args;
use crate::logging::LoggingConfig;
use anyhow::{Context, Result};
use planlens_analyzer::PlanLimits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default request body ceiling (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Configuration for the HTTP server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Largest accepted request body, in bytes
    pub max_body_bytes: usize,
    /// Plan normalization limits
    pub limits: PlanLimits,
    /// Logging setup
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            limits: PlanLimits::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Location of the per-user config file, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("planlens").join("config.toml"))
    }

    /// Parses a TOML document; missing keys keep their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse config")
    }

    /// Reads and parses a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Loads the config from `explicit`, else from [`ServerConfig::default_path`]
    /// when that file exists, else falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Applies command-line / environment overrides
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = &args.host {
            self.host = host.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(max_body_bytes) = args.max_body_bytes {
            self.max_body_bytes = max_body_bytes;
        }
        if let Some(max_depth) = args.max_depth {
            self.limits = self.limits.with_max_depth(max_depth);
        }
        if let Some(max_nodes) = args.max_nodes {
            self.limits = self.limits.with_max_nodes(max_nodes);
        }
        if let Some(format) = args.log_format {
            self.logging.format = format;
        }
    }

    /// `host:port` string to bind the listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
