//! Plan Advisor - Heuristic advice for plan nodes
//!
//! The advisor visits every node depth-first in pre-order, runs every rule on
//! it in order and collects the messages. Identical messages coming from
//! different nodes are reported once, at their first position.

use crate::explain::{PlanLimits, PlanNode, PlanTree, extract_plan_root};
use indexmap::IndexSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, LazyLock};

static SEQ_SCAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)seq scan").expect("valid regex"));
static INDEX_SCAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)index (only )?scan").expect("valid regex"));
static HASH_JOIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)hash join").expect("valid regex"));

/// Advice emitted for hash joins
pub const HASH_JOIN_ADVICE: &str = "Hash Join detected: check that work_mem is large enough for the hash table to avoid spilling batches to disk.";

/// Kind of advice a rule produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceKind {
    /// Sequential scan that an index could serve
    SeqScan,
    /// Index-driven access, usually fine
    IndexScan,
    /// Explicit sort that an ordered index could avoid
    Sort,
    /// Hash join whose memory sizing is worth checking
    HashJoin,
}

impl AdviceKind {
    /// Returns the kind as a display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SeqScan => "seq_scan",
            Self::IndexScan => "index_scan",
            Self::Sort => "sort",
            Self::HashJoin => "hash_join",
        }
    }
}

/// A single advice rule applied to each plan node
pub trait AdviceRule: fmt::Debug + Send + Sync {
    /// Kind of advice this rule emits
    fn kind(&self) -> AdviceKind;

    /// Returns advice for the node, or `None` when the rule does not apply
    fn check(&self, node: &PlanNode) -> Option<String>;
}

/// Flags sequential scans and points at the filter that an index could serve
#[derive(Debug, Clone, Copy, Default)]
pub struct SeqScanRule;

impl AdviceRule for SeqScanRule {
    fn kind(&self) -> AdviceKind {
        AdviceKind::SeqScan
    }

    fn check(&self, node: &PlanNode) -> Option<String> {
        if !SEQ_SCAN.is_match(node.type_name()) {
            return None;
        }
        let relation = node.relation.as_deref().unwrap_or("table");
        let filter = node.filter.as_deref().unwrap_or("<unknown>");
        Some(format!(
            "Seq Scan on {}: consider adding an index to support the filter {}.",
            relation, filter
        ))
    }
}

/// Notes index and index-only scans
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexScanRule;

impl AdviceRule for IndexScanRule {
    fn kind(&self) -> AdviceKind {
        AdviceKind::IndexScan
    }

    fn check(&self, node: &PlanNode) -> Option<String> {
        if !INDEX_SCAN.is_match(node.type_name()) {
            return None;
        }
        let relation = node.relation.as_deref().unwrap_or("<table>");
        let index = node.index_name.as_deref().unwrap_or("<index>");
        Some(format!(
            "Index Scan on {} using {}: index access is generally efficient.",
            relation, index
        ))
    }
}

/// Suggests index-assisted ordering when a node sorts
#[derive(Debug, Clone, Copy, Default)]
pub struct SortRule;

impl AdviceRule for SortRule {
    fn kind(&self) -> AdviceKind {
        AdviceKind::Sort
    }

    fn check(&self, node: &PlanNode) -> Option<String> {
        let keys = node.sort_keys.as_ref()?;
        Some(format!(
            "Sort on {}: consider an index that already provides this ordering to avoid an explicit sort.",
            keys
        ))
    }
}

/// Reminds to check hash table sizing for hash joins
#[derive(Debug, Clone, Copy, Default)]
pub struct HashJoinRule;

impl AdviceRule for HashJoinRule {
    fn kind(&self) -> AdviceKind {
        AdviceKind::HashJoin
    }

    fn check(&self, node: &PlanNode) -> Option<String> {
        if node.hash_join || HASH_JOIN.is_match(node.type_name()) {
            Some(HASH_JOIN_ADVICE.to_string())
        } else {
            None
        }
    }
}

/// The built-in rules, in evaluation order
pub fn default_rules() -> Vec<Arc<dyn AdviceRule>> {
    vec![
        Arc::new(SeqScanRule),
        Arc::new(IndexScanRule),
        Arc::new(SortRule),
        Arc::new(HashJoinRule),
    ]
}

/// Advice appended when normalization dropped part of the plan
pub fn truncation_advice(limits: PlanLimits) -> String {
    format!(
        "Plan exceeds analysis limits (max depth {}, max nodes {}); deeper or later nodes were not analyzed.",
        limits.max_depth, limits.max_nodes
    )
}

/// Plan advisor that runs an ordered rule list over every node
#[derive(Debug, Clone)]
pub struct Advisor {
    rules: Vec<Arc<dyn AdviceRule>>,
    limits: PlanLimits,
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Advisor {
    /// Creates an advisor with the built-in rules and default limits
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
            limits: PlanLimits::default(),
        }
    }

    /// Replaces the rule list
    pub fn with_rules(mut self, rules: Vec<Arc<dyn AdviceRule>>) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the normalization limits used by [`Advisor::advise`]
    pub fn with_limits(mut self, limits: PlanLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Returns the rules in evaluation order
    pub fn rules(&self) -> &[Arc<dyn AdviceRule>] {
        &self.rules
    }

    /// Normalizes `root` and returns deduplicated advice
    pub fn advise(&self, root: &Value) -> Vec<String> {
        self.advise_tree(&PlanTree::from_value(root, self.limits))
    }

    /// Returns deduplicated advice for an already normalized tree
    pub fn advise_tree(&self, tree: &PlanTree) -> Vec<String> {
        let mut advice = IndexSet::new();

        for node in tree.iter_nodes() {
            for rule in &self.rules {
                if let Some(message) = rule.check(node) {
                    tracing::trace!(rule = rule.kind().as_str(), %message, "Rule matched");
                    advice.insert(message);
                }
            }
        }

        if tree.is_truncated() {
            advice.insert(truncation_advice(tree.limits()));
        }

        advice.into_iter().collect()
    }
}

/// Returns advice for a plan root using the built-in rules and default limits
pub fn advise(root: &Value) -> Vec<String> {
    Advisor::new().advise(root)
}

/// Returns advice for a request payload (see [`extract_plan_root`])
pub fn advise_payload(payload: &Value) -> Vec<String> {
    advise(extract_plan_root(payload))
}
