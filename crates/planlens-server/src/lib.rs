//! planlens server - HTTP boundary around the plan analyzer
//!
//! Serves the static plan viewer page and a JSON endpoint that returns advice
//! and the rendered plan tree for a pasted EXPLAIN plan.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod server;

pub use cli::Args;
pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
