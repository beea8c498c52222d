//! planlens Analyzer - EXPLAIN plan advice and tree rendering
//!
//! This crate provides functionality for:
//! - Normalizing loosely-shaped EXPLAIN JSON into a typed plan tree
//! - Heuristic optimization advice for plan nodes
//! - Rendering the plan as a nested, collapsible HTML tree

pub mod analysis;
pub mod explain;
pub mod render;
pub mod suggestions;

pub use analysis::*;
pub use explain::*;
pub use render::*;
pub use suggestions::*;
