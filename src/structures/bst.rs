//! Binary search tree
//!
//! Nodes own their children through `Option<Box<BstNode>>`, so the tree can
//! never share or cycle. Every node carries a synthetic [`NodeId`] handed out
//! on insertion, which the rendering layer uses to track nodes across frames.
//!
//! # Ordering Invariant
//!
//! For every node, all values in the left subtree are strictly less and all
//! values in the right subtree strictly greater. Duplicates are rejected.
//!
//! # Deletion
//!
//! The classic three cases:
//! 1. leaf: remove it
//! 2. one child: splice the child into the parent's slot
//! 3. two children: copy the in-order successor (minimum of the right
//!    subtree) into the node, then delete the successor from the right subtree
//!
//! All algorithms are recursive; depth is bounded by the tree height.

use super::NodeId;
use crate::trace::{ExecutionStep, StepLog};
use crate::value::{format_values, Value};
use serde::Serialize;
use std::cmp::Ordering;

/// Depth-first traversal orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalOrder {
    Inorder,
    Preorder,
    Postorder,
}

impl TraversalOrder {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "inorder" | "in_order" | "in-order" | "in" => Some(TraversalOrder::Inorder),
            "preorder" | "pre_order" | "pre-order" | "pre" => Some(TraversalOrder::Preorder),
            "postorder" | "post_order" | "post-order" | "post" => Some(TraversalOrder::Postorder),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TraversalOrder::Inorder => "inorder",
            TraversalOrder::Preorder => "preorder",
            TraversalOrder::Postorder => "postorder",
        }
    }
}

/// Operations on a binary search tree
#[derive(Debug, Clone, PartialEq)]
pub enum TreeOp {
    Insert(Value),
    Delete(Value),
    Search(Value),
    Traverse(TraversalOrder),
    Min,
    Max,
    Height,
    Clear,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BstNode {
    pub id: NodeId,
    pub value: Value,
    pub left: Option<Box<BstNode>>,
    pub right: Option<Box<BstNode>>,
}

impl BstNode {
    fn leaf(id: NodeId, value: Value) -> Self {
        BstNode {
            id,
            value,
            left: None,
            right: None,
        }
    }

    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreeStats {
    pub size: usize,
    pub is_empty: bool,
    /// Number of nodes on the longest root-to-leaf path (0 when empty)
    pub height: usize,
    pub root: Option<Value>,
    pub min: Option<Value>,
    pub max: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinarySearchTree {
    root: Option<Box<BstNode>>,
    #[serde(skip)]
    next_id: u32,
    stats: TreeStats,
}

impl Default for BinarySearchTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BinarySearchTree {
    pub fn new() -> Self {
        let mut tree = BinarySearchTree {
            root: None,
            next_id: 0,
            stats: TreeStats::default(),
        };
        tree.refresh_stats();
        tree
    }

    pub fn root(&self) -> Option<&BstNode> {
        self.root.as_deref()
    }

    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.stats.size
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn contains(&self, value: &Value) -> bool {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match value.cmp(&node.value) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Values in the given traversal order
    pub fn values(&self, order: TraversalOrder) -> Vec<Value> {
        let mut visited = Vec::new();
        Self::collect(self.root.as_deref(), order, &mut visited);
        visited.into_iter().map(|n| n.value.clone()).collect()
    }

    pub fn apply(&mut self, op: &TreeOp) -> StepLog {
        let log = match op {
            TreeOp::Insert(value) => self.insert(value),
            TreeOp::Delete(value) => self.delete(value),
            TreeOp::Search(value) => self.search(value),
            TreeOp::Traverse(order) => self.traverse(*order),
            TreeOp::Min => self.extreme(true),
            TreeOp::Max => self.extreme(false),
            TreeOp::Height => {
                let height = Self::height_of(self.root.as_deref());
                StepLog::from_summary(
                    format!("The tree has height {}", height),
                    format!("height() -> {}", height),
                )
            }
            TreeOp::Clear => {
                if self.root.take().is_some() {
                    StepLog::from_summary("Removed every node from the tree", "root = None")
                } else {
                    StepLog::noop("The tree is already empty", "clear(): root is None")
                }
            }
        };
        self.refresh_stats();
        log
    }

    fn refresh_stats(&mut self) {
        let inorder = self.values(TraversalOrder::Inorder);
        self.stats = TreeStats {
            size: inorder.len(),
            is_empty: inorder.is_empty(),
            height: Self::height_of(self.root.as_deref()),
            root: self.root.as_ref().map(|n| n.value.clone()),
            min: inorder.first().cloned(),
            max: inorder.last().cloned(),
        };
    }

    fn height_of(node: Option<&BstNode>) -> usize {
        match node {
            None => 0,
            Some(n) => {
                1 + Self::height_of(n.left.as_deref()).max(Self::height_of(n.right.as_deref()))
            }
        }
    }

    fn leftmost(node: &BstNode) -> &BstNode {
        let mut current = node;
        while let Some(left) = current.left.as_deref() {
            current = left;
        }
        current
    }

    // === INSERT ===

    fn insert(&mut self, value: &Value) -> StepLog {
        let mut log = StepLog::new();
        let mut path = Vec::new();
        let id = NodeId(self.next_id);

        if !Self::insert_into(&mut self.root, value, id, &mut path, &mut log) {
            return StepLog::noop(
                format!("{} is already in the tree, duplicates are not inserted", value),
                format!("insert({}): duplicate", value),
            );
        }
        self.next_id += 1;

        let placement = match path.last() {
            Some(last) => format!("as the {} child", last.to_lowercase()),
            None => "as the root".to_string(),
        };
        log.push(
            ExecutionStep::summary(
                format!("Inserted {} {}", value, placement),
                format!("insert({})  // depth {}", value, path.len()),
            )
            .with_node(value)
            .with_path(path),
        );
        log
    }

    fn insert_into(
        slot: &mut Option<Box<BstNode>>,
        value: &Value,
        id: NodeId,
        path: &mut Vec<String>,
        log: &mut StepLog,
    ) -> bool {
        let Some(node) = slot.as_deref_mut() else {
            *slot = Some(Box::new(BstNode::leaf(id, value.clone())));
            return true;
        };

        match value.cmp(&node.value) {
            Ordering::Less => {
                log.push(ExecutionStep::visit(
                    &node.value,
                    format!("{} < {}, go left", value, node.value),
                    format!("node = node.left  // {} < {}", value, node.value),
                ));
                path.push(format!("Left of {}", node.value));
                Self::insert_into(&mut node.left, value, id, path, log)
            }
            Ordering::Greater => {
                log.push(ExecutionStep::visit(
                    &node.value,
                    format!("{} > {}, go right", value, node.value),
                    format!("node = node.right  // {} > {}", value, node.value),
                ));
                path.push(format!("Right of {}", node.value));
                Self::insert_into(&mut node.right, value, id, path, log)
            }
            Ordering::Equal => false,
        }
    }

    // === DELETE ===

    fn delete(&mut self, value: &Value) -> StepLog {
        if !self.contains(value) {
            return StepLog::noop(
                format!("{} is not in the tree, nothing deleted", value),
                format!("delete({}): not found", value),
            );
        }
        let mut log = StepLog::new();
        Self::delete_from(&mut self.root, value, &mut log);
        log.push(
            ExecutionStep::summary(format!("Deleted {}", value), format!("delete({})", value))
                .with_node(value),
        );
        log
    }

    fn delete_from(slot: &mut Option<Box<BstNode>>, value: &Value, log: &mut StepLog) -> bool {
        let Some(node) = slot.as_deref_mut() else {
            return false;
        };

        match value.cmp(&node.value) {
            Ordering::Less => {
                log.push(ExecutionStep::visit(
                    &node.value,
                    format!("{} < {}, search left", value, node.value),
                    "node = node.left",
                ));
                return Self::delete_from(&mut node.left, value, log);
            }
            Ordering::Greater => {
                log.push(ExecutionStep::visit(
                    &node.value,
                    format!("{} > {}, search right", value, node.value),
                    "node = node.right",
                ));
                return Self::delete_from(&mut node.right, value, log);
            }
            Ordering::Equal => {}
        }

        if node.left.is_some() {
            if let Some(right) = node.right.as_deref() {
                let successor = Self::leftmost(right).value.clone();
                log.push(ExecutionStep::visit(
                    &node.value,
                    format!(
                        "{} has two children; its in-order successor is {}",
                        node.value, successor
                    ),
                    "successor = min(node.right)",
                ));
                log.push(
                    ExecutionStep::new(
                        format!("Replace {} with {}", node.value, successor),
                        format!("node.value = {}", successor),
                    )
                    .with_node(&successor),
                );
                node.value = successor.clone();
                return Self::delete_from(&mut node.right, &successor, log);
            }
        }

        if node.is_leaf() {
            log.push(ExecutionStep::visit(
                &node.value,
                format!("{} is a leaf, remove it", node.value),
                "parent.child = None",
            ));
        } else {
            log.push(ExecutionStep::visit(
                &node.value,
                format!("{} has one child, splice the child into its place", node.value),
                "parent.child = node.child",
            ));
        }
        let child = node.left.take().or_else(|| node.right.take());
        *slot = child;
        true
    }

    // === QUERIES ===

    fn search(&self, value: &Value) -> StepLog {
        let mut log = StepLog::new();
        let mut path = Vec::new();
        let mut current = self.root.as_deref();

        while let Some(node) = current {
            match value.cmp(&node.value) {
                Ordering::Equal => {
                    log.push(
                        ExecutionStep::summary(
                            format!("Found {}", value),
                            format!("search({}) -> true", value),
                        )
                        .with_node(&node.value)
                        .with_path(path),
                    );
                    return log;
                }
                Ordering::Less => {
                    log.push(ExecutionStep::visit(
                        &node.value,
                        format!("{} < {}, go left", value, node.value),
                        "node = node.left",
                    ));
                    path.push(format!("Left of {}", node.value));
                    current = node.left.as_deref();
                }
                Ordering::Greater => {
                    log.push(ExecutionStep::visit(
                        &node.value,
                        format!("{} > {}, go right", value, node.value),
                        "node = node.right",
                    ));
                    path.push(format!("Right of {}", node.value));
                    current = node.right.as_deref();
                }
            }
        }

        log.push(
            ExecutionStep::summary(
                format!("{} is not in the tree", value),
                format!("search({}) -> false", value),
            )
            .with_path(path),
        );
        log
    }

    fn collect<'a>(node: Option<&'a BstNode>, order: TraversalOrder, out: &mut Vec<&'a BstNode>) {
        let Some(node) = node else {
            return;
        };
        match order {
            TraversalOrder::Preorder => {
                out.push(node);
                Self::collect(node.left.as_deref(), order, out);
                Self::collect(node.right.as_deref(), order, out);
            }
            TraversalOrder::Inorder => {
                Self::collect(node.left.as_deref(), order, out);
                out.push(node);
                Self::collect(node.right.as_deref(), order, out);
            }
            TraversalOrder::Postorder => {
                Self::collect(node.left.as_deref(), order, out);
                Self::collect(node.right.as_deref(), order, out);
                out.push(node);
            }
        }
    }

    fn traverse(&self, order: TraversalOrder) -> StepLog {
        if self.root.is_none() {
            return StepLog::noop(
                "The tree is empty, nothing to traverse",
                format!("{}(): root is None", order.name()),
            );
        }
        let mut visited = Vec::new();
        Self::collect(self.root.as_deref(), order, &mut visited);

        let mut log = StepLog::new();
        for (i, node) in visited.iter().enumerate() {
            log.push(ExecutionStep::visit(
                &node.value,
                format!("Visit {}", node.value),
                format!("{}: visit #{} -> {}", order.name(), i + 1, node.value),
            ));
        }
        let values: Vec<Value> = visited.iter().map(|n| n.value.clone()).collect();
        log.push(
            ExecutionStep::summary(
                format!("{} traversal: {}", capitalize(order.name()), format_values(&values)),
                format!("{}() -> {}", order.name(), format_values(&values)),
            )
            .with_path(values.iter().map(Value::to_string).collect()),
        );
        log
    }

    fn extreme(&self, minimum: bool) -> StepLog {
        let Some(root) = self.root.as_deref() else {
            return StepLog::noop(
                "The tree is empty, it has no minimum or maximum",
                if minimum { "min(): root is None" } else { "max(): root is None" },
            );
        };

        let mut log = StepLog::new();
        let mut current = root;
        loop {
            let next = if minimum {
                current.left.as_deref()
            } else {
                current.right.as_deref()
            };
            let Some(next) = next else {
                break;
            };
            log.push(ExecutionStep::visit(
                &current.value,
                format!(
                    "{} has a {} child, keep going",
                    current.value,
                    if minimum { "left" } else { "right" }
                ),
                if minimum { "node = node.left" } else { "node = node.right" },
            ));
            current = next;
        }
        log.push(
            ExecutionStep::summary(
                format!(
                    "The {} value is {}",
                    if minimum { "minimum" } else { "maximum" },
                    current.value
                ),
                format!("{}() -> {}", if minimum { "min" } else { "max" }, current.value),
            )
            .with_node(&current.value),
        );
        log
    }

    /// Verify the strict ordering invariant, describing the first violation
    pub fn check_order(&self) -> Result<(), String> {
        Self::check_bounds(self.root.as_deref(), None, None)
    }

    fn check_bounds(
        node: Option<&BstNode>,
        lower: Option<&Value>,
        upper: Option<&Value>,
    ) -> Result<(), String> {
        let Some(node) = node else {
            return Ok(());
        };
        if let Some(lo) = lower {
            if node.value <= *lo {
                return Err(format!("{} is in the right subtree of {}", node.value, lo));
            }
        }
        if let Some(hi) = upper {
            if node.value >= *hi {
                return Err(format!("{} is in the left subtree of {}", node.value, hi));
            }
        }
        Self::check_bounds(node.left.as_deref(), lower, Some(&node.value))?;
        Self::check_bounds(node.right.as_deref(), Some(&node.value), upper)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
