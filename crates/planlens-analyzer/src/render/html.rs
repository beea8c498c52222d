//! HTML tree renderer
//!
//! Output shape:
//!
//! ```text
//! <ul class="plan-tree">
//!   <li class="plan-node"><details open>
//!     <summary>Seq Scan (cost: 1200)</summary>
//!     <div class="plan-meta">
//!       <div class="plan-field"><span class="plan-field-name">Relation Name</span>: orders</div>
//!     </div>
//!     <ul class="plan-children"> ... </ul>
//!   </details></li>
//! </ul>
//! ```
//!
//! (whitespace added for readability; the real output has none)

use crate::explain::{PlanLimits, PlanNode, PlanTree, extract_plan_root};
use serde_json::Value;

/// Label used for nodes without a type
pub const DEFAULT_NODE_LABEL: &str = "Node";

/// Escapes `& < > " '` for safe embedding in HTML text and attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Builds the summary label: node type plus cost, when known
pub fn node_label(node: &PlanNode) -> String {
    let node_type = node.node_type.as_deref().unwrap_or(DEFAULT_NODE_LABEL);
    match node.cost_text() {
        Some(cost) => format!("{} (cost: {})", node_type, cost),
        None => node_type.to_string(),
    }
}

/// Renders plan trees as nested collapsible HTML
#[derive(Debug, Clone, Default)]
pub struct TreeRenderer {
    limits: PlanLimits,
}

impl TreeRenderer {
    /// Creates a renderer with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the normalization limits used by [`TreeRenderer::render`]
    pub fn with_limits(mut self, limits: PlanLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Normalizes `root` and renders it
    pub fn render(&self, root: &Value) -> String {
        self.render_tree(&PlanTree::from_value(root, self.limits))
    }

    /// Renders an already normalized tree
    pub fn render_tree(&self, tree: &PlanTree) -> String {
        let mut out = String::from("<ul class=\"plan-tree\">");
        if let Some(root) = tree.root() {
            render_node(root, &mut out);
        }
        out.push_str("</ul>");
        out
    }
}

fn render_node(node: &PlanNode, out: &mut String) {
    out.push_str("<li class=\"plan-node\"><details open><summary>");
    out.push_str(&escape_html(&node_label(node)));
    out.push_str("</summary>");

    out.push_str("<div class=\"plan-meta\">");
    for (name, value) in node.metadata() {
        out.push_str("<div class=\"plan-field\"><span class=\"plan-field-name\">");
        out.push_str(&escape_html(name));
        out.push_str("</span>: ");
        out.push_str(&escape_html(&value));
        out.push_str("</div>");
    }
    out.push_str("</div>");

    if !node.children.is_empty() || node.truncated {
        out.push_str("<ul class=\"plan-children\">");
        for child in &node.children {
            render_node(child, out);
        }
        if node.truncated {
            out.push_str(
                "<li class=\"plan-truncated\">\u{2026} further nodes omitted (analysis limit reached)</li>",
            );
        }
        out.push_str("</ul>");
    }

    out.push_str("</details></li>");
}

/// Renders a plan root with default limits
pub fn render(root: &Value) -> String {
    TreeRenderer::new().render(root)
}

/// Renders a request payload (see [`extract_plan_root`])
pub fn render_payload(payload: &Value) -> String {
    render(extract_plan_root(payload))
}

#[cfg(test)]
mod tests;
