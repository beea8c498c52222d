//! Plan Model - Typed view of an EXPLAIN plan tree
//!
//! EXPLAIN JSON has no fixed schema, so every field of [`PlanNode`] is
//! optional and keys outside the known set are kept in [`PlanNode::extra`].
//! Normalization is bounded by [`PlanLimits`]: nodes beyond the depth or node
//! budget are dropped and their parent is flagged as truncated.

use crate::explain::fields::{PlanField, display_text};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const NESTING_HEADROOM: usize = 16;

/// Bounds applied while normalizing a plan tree
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlanLimits {
    /// Deepest level that is materialized (the root is level 1)
    pub max_depth: usize,
    /// Maximum number of nodes materialized across the whole tree
    pub max_nodes: usize,
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_nodes: 50_000,
        }
    }
}

impl PlanLimits {
    /// Creates limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum depth (at least 1)
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Sets the maximum node count (at least 1)
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes.max(1);
        self
    }

    /// Deepest array/object nesting kept when parsing a payload.
    ///
    /// Each plan level is a node object plus its `Plans` array; the extra
    /// levels cover wrappers and structured field values.
    pub fn max_nesting(&self) -> usize {
        self.max_depth.saturating_mul(2).saturating_add(NESTING_HEADROOM)
    }
}

/// A single operator in the plan tree
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PlanNode {
    /// Operator kind, e.g. "Seq Scan" or "Hash Join"
    pub node_type: Option<String>,
    /// Scanned relation
    pub relation: Option<String>,
    /// Filter predicate
    pub filter: Option<String>,
    /// Index used by index scans
    pub index_name: Option<String>,
    /// Sort keys, kept as they appeared (string or sequence)
    pub sort_keys: Option<Value>,
    /// Total cost (or plain cost)
    pub cost: Option<Value>,
    /// Actual rows (from EXPLAIN ANALYZE)
    pub actual_rows: Option<Value>,
    /// Actual time (from EXPLAIN ANALYZE)
    pub actual_time: Option<Value>,
    /// Whether the node carries an explicit hash-join marker field
    pub hash_join: bool,
    /// Child nodes, in plan order
    pub children: Vec<PlanNode>,
    /// True when some children were dropped by [`PlanLimits`]
    pub truncated: bool,
    /// Keys not covered by any [`PlanField`]
    pub extra: Map<String, Value>,
}

impl PlanNode {
    /// Creates an empty node with the given type
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: Some(node_type.into()),
            ..Self::default()
        }
    }

    /// Reads the node's own fields from a JSON object, without children
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            node_type: PlanField::NodeType.resolve_text(object),
            relation: PlanField::RelationName.resolve_text(object),
            filter: PlanField::Filter.resolve_text(object),
            index_name: PlanField::IndexName.resolve_text(object),
            sort_keys: PlanField::SortKey.resolve(object).cloned(),
            cost: PlanField::Cost.resolve(object).cloned(),
            actual_rows: PlanField::ActualRows.resolve(object).cloned(),
            actual_time: PlanField::ActualTime.resolve(object).cloned(),
            hash_join: PlanField::HashJoin.resolve(object).is_some(),
            children: Vec::new(),
            truncated: false,
            extra: object
                .iter()
                .filter(|(key, _)| !PlanField::is_known_key(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }
    }

    /// Sets the relation name
    pub fn with_relation(mut self, relation: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self
    }

    /// Sets the filter predicate
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Sets the index name
    pub fn with_index(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    /// Sets the sort keys
    pub fn with_sort_keys(mut self, sort_keys: Value) -> Self {
        self.sort_keys = Some(sort_keys);
        self
    }

    /// Sets the cost
    pub fn with_cost(mut self, cost: impl Into<Value>) -> Self {
        self.cost = Some(cost.into());
        self
    }

    /// Adds a child node
    pub fn with_child(mut self, child: PlanNode) -> Self {
        self.children.push(child);
        self
    }

    /// Node type as used by rule matching (empty when absent)
    pub fn type_name(&self) -> &str {
        self.node_type.as_deref().unwrap_or("")
    }

    /// Cost as display text, if present
    pub fn cost_text(&self) -> Option<String> {
        self.cost.as_ref().map(display_text)
    }

    /// Metadata lines `(field name, value)` in display order, present fields only
    pub fn metadata(&self) -> Vec<(&'static str, String)> {
        PlanField::METADATA
            .iter()
            .filter_map(|field| {
                let value = match field {
                    PlanField::RelationName => self.relation.clone(),
                    PlanField::IndexName => self.index_name.clone(),
                    PlanField::Filter => self.filter.clone(),
                    PlanField::SortKey => self.sort_keys.as_ref().map(display_text),
                    PlanField::ActualRows => self.actual_rows.as_ref().map(display_text),
                    PlanField::ActualTime => self.actual_time.as_ref().map(display_text),
                    _ => None,
                };
                value.map(|v| (field.label(), v))
            })
            .collect()
    }

    /// Returns the total number of nodes in this subtree (including self)
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Returns the maximum depth of this subtree
    pub fn depth(&self) -> usize {
        if self.children.is_empty() {
            1
        } else {
            1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
        }
    }

    /// Returns true if this is a leaf node (no children)
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns an iterator over this subtree (depth-first, pre-order)
    pub fn iter(&self) -> PlanNodeIterator<'_> {
        PlanNodeIterator { stack: vec![self] }
    }
}

/// Summary numbers for a normalized plan
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanStats {
    /// Materialized node count
    pub node_count: usize,
    /// Maximum depth (root is 1, empty tree is 0)
    pub depth: usize,
    /// Whether normalization dropped any nodes
    pub truncated: bool,
}

/// A normalized plan tree together with the limits it was built under
#[derive(Debug, Clone, PartialEq)]
pub struct PlanTree {
    root: Option<PlanNode>,
    limits: PlanLimits,
    truncated: bool,
}

impl PlanTree {
    /// Normalizes a JSON plan root.
    ///
    /// A root that is not a JSON object yields an empty tree. Recursion never
    /// goes deeper than `limits.max_depth`.
    pub fn from_value(value: &Value, limits: PlanLimits) -> Self {
        let limits = PlanLimits::new()
            .with_max_depth(limits.max_depth)
            .with_max_nodes(limits.max_nodes);
        let mut builder = TreeBuilder {
            limits,
            node_count: 0,
            truncated: false,
        };
        let root = builder.build(value, 1);
        Self {
            root,
            limits,
            truncated: builder.truncated,
        }
    }

    /// Returns the root node, if the input was an object
    pub fn root(&self) -> Option<&PlanNode> {
        self.root.as_ref()
    }

    /// Limits the tree was normalized with
    pub fn limits(&self) -> PlanLimits {
        self.limits
    }

    /// Returns true if normalization dropped any nodes
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Returns true if there is no root node
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns an iterator over all nodes in the plan (depth-first, pre-order)
    pub fn iter_nodes(&self) -> PlanNodeIterator<'_> {
        PlanNodeIterator {
            stack: self.root.iter().collect(),
        }
    }

    /// Computes node count, depth and truncation
    pub fn stats(&self) -> PlanStats {
        PlanStats {
            node_count: self.root.as_ref().map_or(0, PlanNode::node_count),
            depth: self.root.as_ref().map_or(0, PlanNode::depth),
            truncated: self.truncated,
        }
    }
}

struct TreeBuilder {
    limits: PlanLimits,
    node_count: usize,
    truncated: bool,
}

impl TreeBuilder {
    fn build(&mut self, value: &Value, depth: usize) -> Option<PlanNode> {
        let object = value.as_object()?;
        if self.node_count >= self.limits.max_nodes {
            self.truncated = true;
            return None;
        }
        self.node_count += 1;

        let mut node = PlanNode::from_object(object);
        let Some(children) = PlanField::Plans.resolve(object).and_then(Value::as_array) else {
            return Some(node);
        };

        for child in children {
            if !child.is_object() {
                continue;
            }
            if depth >= self.limits.max_depth || self.node_count >= self.limits.max_nodes {
                node.truncated = true;
                self.truncated = true;
                break;
            }
            if let Some(child_node) = self.build(child, depth + 1) {
                node.children.push(child_node);
            }
        }

        Some(node)
    }
}

/// Iterator for traversing plan nodes depth-first
pub struct PlanNodeIterator<'a> {
    stack: Vec<&'a PlanNode>,
}

impl<'a> Iterator for PlanNodeIterator<'a> {
    type Item = &'a PlanNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order so we visit them in order
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}
