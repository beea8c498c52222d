//! Plan Advice Module
//!
//! This module walks a normalized plan tree and emits human-readable advice.
//! Each rule looks at one node at a time; rules are independent, so a single
//! node can trigger several of them.

mod analyzer;

pub use analyzer::*;
