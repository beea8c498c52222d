//! EXPLAIN Plan Module
//!
//! This module turns EXPLAIN JSON into a typed plan tree:
//! - Field resolution across naming conventions (`"Node Type"` / `"nodeType"`)
//! - Bounded normalization into [`PlanNode`] / [`PlanTree`]
//! - Extraction of the plan root from request payloads
//!
//! # Example
//!
//! ```
//! use planlens_analyzer::explain::{PlanLimits, PlanTree, extract_plan_root};
//! use serde_json::json;
//!
//! let payload = json!({"Plan": {"Node Type": "Seq Scan", "Relation Name": "users"}});
//! let tree = PlanTree::from_value(extract_plan_root(&payload), PlanLimits::default());
//! let root = tree.root().unwrap();
//! assert_eq!(root.node_type.as_deref(), Some("Seq Scan"));
//! assert_eq!(root.relation.as_deref(), Some("users"));
//! ```

pub mod fields;
pub mod payload;
pub mod plan;

pub use fields::{PlanField, display_text, is_present};
pub use payload::{
    PlanError, extract_plan_root, parse_payload, parse_payload_bytes,
    parse_payload_bytes_with_limits, parse_payload_with_limits,
};
pub use plan::{PlanLimits, PlanNode, PlanNodeIterator, PlanStats, PlanTree};
