//! Combined plan analysis
//!
//! Normalizes a payload once and runs both the advisor and the renderer on the
//! same tree, which is what the HTTP boundary returns to the browser.

use crate::explain::{
    PlanLimits, PlanStats, PlanTree, extract_plan_root, parse_payload_with_limits,
};
use crate::explain::payload::Result;
use crate::render::TreeRenderer;
use crate::suggestions::Advisor;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of analyzing one plan
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlanAnalysis {
    /// Deduplicated advice, in first-occurrence order
    pub advice: Vec<String>,
    /// Collapsible HTML tree
    pub html: String,
    /// Size of the normalized plan
    pub stats: PlanStats,
}

/// Analyzes a request payload.
///
/// The plan root is taken from `payload` as described in
/// [`extract_plan_root`], normalized under `limits`, then advised and rendered.
pub fn analyze(payload: &Value, limits: PlanLimits) -> PlanAnalysis {
    let tree = PlanTree::from_value(extract_plan_root(payload), limits);
    let advice = Advisor::new().with_limits(limits).advise_tree(&tree);
    let html = TreeRenderer::new().with_limits(limits).render_tree(&tree);
    let stats = tree.stats();

    tracing::debug!(
        node_count = stats.node_count,
        depth = stats.depth,
        truncated = stats.truncated,
        advice_count = advice.len(),
        "Plan analyzed"
    );

    PlanAnalysis {
        advice,
        html,
        stats,
    }
}

/// Parses `text` as JSON and analyzes it
pub fn analyze_str(text: &str, limits: PlanLimits) -> Result<PlanAnalysis> {
    let payload = parse_payload_with_limits(text, limits)?;
    Ok(analyze(&payload, limits))
}
