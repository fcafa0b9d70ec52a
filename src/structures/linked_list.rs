//! Singly and doubly linked lists
//!
//! Nodes live in an arena (`Vec<Option<ListNode>>`) and are addressed by
//! [`NodeId`], which is simply the slot index. Removed nodes leave an empty
//! slot behind so ids stay stable for the rendering layer.
//!
//! # Link Invariants
//!
//! - Following `next` from the head visits every live node exactly once.
//! - Doubly lists keep `prev` symmetric: `a.next == Some(b)` iff
//!   `b.prev == Some(a)`, and the head has no `prev`.
//! - Singly lists never set `prev`.
//!
//! All relinking goes through [`LinkedList::link_after`] and
//! [`LinkedList::unlink`], which maintain both directions at once.
//! [`LinkedList::check_links`] verifies the invariants and is used by tests.

use super::{position_in_range, NodeId};
use crate::trace::{ExecutionStep, StepLog};
use crate::value::{format_values, Value};
use rustc_hash::FxHashSet;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

/// Which links a list maintains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Singly,
    Doubly,
}

/// Operations on a linked list
#[derive(Debug, Clone, PartialEq)]
pub enum ListOp {
    InsertFront(Value),
    InsertBack(Value),
    InsertAt { position: i64, value: Value },
    /// Doubly only: insert before the node currently at `position`
    InsertBefore { position: i64, value: Value },
    /// Doubly only: insert after the node currently at `position`
    InsertAfter { position: i64, value: Value },
    DeleteValue(Value),
    DeleteFront,
    DeleteBack,
    DeleteAt(i64),
    Search(Value),
    Traverse,
    TraverseBackward,
    Reverse,
    Clear,
}

/// A node in the arena
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListNode {
    pub id: NodeId,
    pub value: Value,
    pub next: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<NodeId>,
}

/// Summary statistics, rebuilt after every operation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListStats {
    pub size: usize,
    pub is_empty: bool,
    pub head: Option<Value>,
    pub tail: Option<Value>,
}

/// A linked list over a node arena.
///
/// `slots[i]` holds the node with id `first_id + i`. Deleting a node empties
/// its slot without compacting, so ids stay stable; `clear` releases the whole
/// arena and moves `first_id` past every id handed out so far.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedList {
    kind: LinkKind,
    slots: Vec<Option<ListNode>>,
    first_id: u32,
    head: Option<NodeId>,
    stats: ListStats,
}

impl LinkedList {
    pub fn new(kind: LinkKind) -> Self {
        let mut list = LinkedList {
            kind,
            slots: Vec::new(),
            first_id: 0,
            head: None,
            stats: ListStats::default(),
        };
        list.refresh_stats();
        list
    }

    pub fn singly() -> Self {
        LinkedList::new(LinkKind::Singly)
    }

    pub fn doubly() -> Self {
        LinkedList::new(LinkKind::Doubly)
    }

    /// Build a list by appending `values` in order
    pub fn from_values<I, V>(kind: LinkKind, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut list = LinkedList::new(kind);
        let mut last = None;
        for value in values {
            let id = list.alloc(value.into());
            list.link_after(last, id);
            last = Some(id);
        }
        list.refresh_stats();
        list
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn is_doubly(&self) -> bool {
        self.kind == LinkKind::Doubly
    }

    pub fn stats(&self) -> &ListStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.stats.size
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty
    }

    pub fn head_id(&self) -> Option<NodeId> {
        self.head
    }

    pub fn tail_id(&self) -> Option<NodeId> {
        self.order().last().copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&ListNode> {
        self.slots.get(self.slot_index(id)?).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut ListNode> {
        let index = self.slot_index(id)?;
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    fn slot_index(&self, id: NodeId) -> Option<usize> {
        id.0.checked_sub(self.first_id).map(|i| i as usize)
    }

    /// Node ids in forward link order
    pub fn order(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut current = self.head;
        // A well-formed list can never be longer than the arena
        while let Some(id) = current {
            if order.len() >= self.slots.len() {
                break;
            }
            order.push(id);
            current = self.node(id).and_then(|n| n.next);
        }
        order
    }

    pub fn nodes(&self) -> Vec<&ListNode> {
        self.order().into_iter().filter_map(|id| self.node(id)).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.nodes().into_iter().map(|n| n.value.clone()).collect()
    }

    fn value_of(&self, id: NodeId) -> Value {
        self.node(id)
            .map(|n| n.value.clone())
            .unwrap_or_else(|| Value::new("?"))
    }

    /// Apply one operation, returning the steps that describe it
    pub fn apply(&mut self, op: &ListOp) -> StepLog {
        let log = match op {
            ListOp::InsertFront(value) => self.insert_front(value),
            ListOp::InsertBack(value) => self.insert_back(value),
            ListOp::InsertAt { position, value } => self.insert_at(*position, value),
            ListOp::InsertBefore { position, value } => self.insert_before(*position, value),
            ListOp::InsertAfter { position, value } => self.insert_after(*position, value),
            ListOp::DeleteValue(value) => self.delete_value(value),
            ListOp::DeleteFront => self.delete_front(),
            ListOp::DeleteBack => self.delete_back(),
            ListOp::DeleteAt(position) => self.delete_at(*position),
            ListOp::Search(value) => self.search(value),
            ListOp::Traverse => self.traverse(),
            ListOp::TraverseBackward => self.traverse_backward(),
            ListOp::Reverse => self.reverse(),
            ListOp::Clear => self.clear(),
        };
        self.refresh_stats();
        log
    }

    fn refresh_stats(&mut self) {
        let order = self.order();
        self.stats = ListStats {
            size: order.len(),
            is_empty: order.is_empty(),
            head: order.first().map(|&id| self.value_of(id)),
            tail: order.last().map(|&id| self.value_of(id)),
        };
    }

    // === ARENA PRIMITIVES ===

    fn alloc(&mut self, value: Value) -> NodeId {
        let id = NodeId(self.first_id + self.slots.len() as u32);
        self.slots.push(Some(ListNode {
            id,
            value,
            next: None,
            prev: None,
        }));
        id
    }

    /// Link `id` directly after `after`, or at the head when `after` is `None`
    fn link_after(&mut self, after: Option<NodeId>, id: NodeId) {
        let next = match after {
            Some(a) => self.node(a).and_then(|n| n.next),
            None => self.head,
        };
        let doubly = self.is_doubly();

        if let Some(node) = self.node_mut(id) {
            node.next = next;
            node.prev = if doubly { after } else { None };
        }
        match after {
            Some(a) => {
                if let Some(node) = self.node_mut(a) {
                    node.next = Some(id);
                }
            }
            None => self.head = Some(id),
        }
        if doubly {
            if let Some(node) = next.and_then(|n| self.node_mut(n)) {
                node.prev = Some(id);
            }
        }
    }

    /// Detach `id`, whose predecessor is `before`, and free its slot
    fn unlink(&mut self, before: Option<NodeId>, id: NodeId) -> Option<ListNode> {
        let index = self.slot_index(id)?;
        let removed = self.slots.get_mut(index)?.take()?;
        match before {
            Some(b) => {
                if let Some(node) = self.node_mut(b) {
                    node.next = removed.next;
                }
            }
            None => self.head = removed.next,
        }
        if self.is_doubly() {
            if let Some(node) = removed.next.and_then(|n| self.node_mut(n)) {
                node.prev = before;
            }
        }
        Some(removed)
    }

    /// Push one visit step per node from the head up to (not including) `index`
    fn walk_steps(&self, order: &[NodeId], index: usize, log: &mut StepLog) {
        for (i, &id) in order.iter().take(index).enumerate() {
            let value = self.value_of(id);
            log.push(ExecutionStep::visit(
                &value,
                format!("Move to node {} at index {}", value, i),
                format!("current = current.next  // index {}", i),
            ));
        }
    }

    // === INSERTION ===

    fn insert_front(&mut self, value: &Value) -> StepLog {
        let mut log = StepLog::new();
        log.push(
            ExecutionStep::new(
                format!("Create a new node holding {}", value),
                format!("node = Node({})", value),
            )
            .with_node(value),
        );

        match self.head {
            Some(head) => {
                let old = self.value_of(head);
                log.push(ExecutionStep::new(
                    format!("Point the new node's next at the current head {}", old),
                    "node.next = head",
                ));
                if self.is_doubly() {
                    log.push(ExecutionStep::new(
                        format!("Point {}'s prev back at the new node", old),
                        "head.prev = node",
                    ));
                }
            }
            None => log.push(ExecutionStep::new(
                "The list is empty, so the new node becomes both head and tail",
                "head = tail = node",
            )),
        }

        let id = self.alloc(value.clone());
        self.link_after(None, id);
        log.push(
            ExecutionStep::summary(format!("{} is now the head of the list", value), "head = node")
                .with_node(value),
        );
        log
    }

    fn insert_back(&mut self, value: &Value) -> StepLog {
        let order = self.order();
        let Some(&tail) = order.last() else {
            return self.insert_front(value);
        };

        let mut log = StepLog::new();
        log.push(
            ExecutionStep::new(
                format!("Create a new node holding {}", value),
                format!("node = Node({})", value),
            )
            .with_node(value),
        );
        if self.is_doubly() {
            let tail_value = self.value_of(tail);
            log.push(ExecutionStep::visit(
                &tail_value,
                format!("Jump straight to the tail {}", tail_value),
                "current = tail",
            ));
        } else {
            self.walk_steps(&order, order.len(), &mut log);
        }

        let tail_value = self.value_of(tail);
        log.push(ExecutionStep::new(
            format!("Point {}'s next at the new node", tail_value),
            "tail.next = node",
        ));
        if self.is_doubly() {
            log.push(ExecutionStep::new(
                format!("Point the new node's prev back at {}", tail_value),
                "node.prev = tail",
            ));
        }

        let id = self.alloc(value.clone());
        self.link_after(Some(tail), id);
        log.push(
            ExecutionStep::summary(format!("{} is now the tail of the list", value), "tail = node")
                .with_node(value),
        );
        log
    }

    fn insert_at(&mut self, position: i64, value: &Value) -> StepLog {
        let len = self.len();
        let Some(index) = position_in_range(position, len) else {
            return StepLog::noop(
                format!(
                    "Position {} is out of range for a list of length {}, nothing inserted",
                    position, len
                ),
                format!("insert_at({}): index must be within 0..={}", position, len),
            );
        };
        if index == 0 {
            return self.insert_front(value);
        }

        let order = self.order();
        let prev = order[index - 1];
        let prev_value = self.value_of(prev);
        let mut log = StepLog::new();
        self.walk_steps(&order, index, &mut log);
        log.push(
            ExecutionStep::new(
                format!("Create a new node holding {}", value),
                format!("node = Node({})", value),
            )
            .with_node(value),
        );
        log.push(ExecutionStep::new(
            format!(
                "Point the new node's next at whatever followed {}",
                prev_value
            ),
            "node.next = current.next",
        ));
        if self.is_doubly() && index < len {
            log.push(ExecutionStep::new(
                "Point the following node's prev back at the new node",
                "current.next.prev = node",
            ));
        }
        log.push(ExecutionStep::new(
            format!("Point {}'s next at the new node", prev_value),
            "current.next = node",
        ));
        if self.is_doubly() {
            log.push(ExecutionStep::new(
                format!("Point the new node's prev at {}", prev_value),
                "node.prev = current",
            ));
        }

        let id = self.alloc(value.clone());
        self.link_after(Some(prev), id);
        log.push(
            ExecutionStep::summary(
                format!("Inserted {} at position {}", value, index),
                format!("insert_at({}, {})", index, value),
            )
            .with_node(value),
        );
        log
    }

    fn insert_before(&mut self, position: i64, value: &Value) -> StepLog {
        if !self.is_doubly() {
            return StepLog::noop(
                "Inserting before a node needs prev links; a singly linked list has none",
                "insert_before: unsupported on singly linked list",
            );
        }
        let len = self.len();
        if len == 0 && position == 0 {
            return self.insert_front(value);
        }
        let Some(index) = position_in_range(position, len.saturating_sub(1)).filter(|_| len > 0)
        else {
            return StepLog::noop(
                format!("There is no node at position {}, nothing inserted", position),
                format!("insert_before({}): index must be within 0..{}", position, len),
            );
        };

        if index == 0 {
            let mut log = StepLog::new();
            log.push(ExecutionStep::new(
                "Inserting before the head is the same as inserting at the beginning",
                "insert_before(0) -> insert_front",
            ));
            log.append(self.insert_front(value));
            return log;
        }

        let order = self.order();
        let target = order[index];
        let prev = order[index - 1];
        let target_value = self.value_of(target);
        let prev_value = self.value_of(prev);

        let mut log = StepLog::new();
        self.walk_steps(&order, index + 1, &mut log);
        log.push(
            ExecutionStep::new(
                format!("Create a new node holding {}", value),
                format!("node = Node({})", value),
            )
            .with_node(value),
        );
        log.push(ExecutionStep::new(
            format!(
                "Link the new node between {} and {}",
                prev_value, target_value
            ),
            "node.prev = target.prev; node.next = target",
        ));
        log.push(ExecutionStep::new(
            format!("Point {}'s next and {}'s prev at the new node", prev_value, target_value),
            "target.prev.next = node; target.prev = node",
        ));

        let id = self.alloc(value.clone());
        self.link_after(Some(prev), id);
        log.push(
            ExecutionStep::summary(
                format!("Inserted {} before {}", value, target_value),
                format!("insert_before({}, {})", index, value),
            )
            .with_node(value),
        );
        log
    }

    fn insert_after(&mut self, position: i64, value: &Value) -> StepLog {
        if !self.is_doubly() {
            return StepLog::noop(
                "insert_after is only offered on doubly linked lists",
                "insert_after: unsupported on singly linked list",
            );
        }
        let len = self.len();
        if len == 0 && position == 0 {
            return self.insert_front(value);
        }
        let Some(index) = position_in_range(position, len.saturating_sub(1)).filter(|_| len > 0)
        else {
            return StepLog::noop(
                format!("There is no node at position {}, nothing inserted", position),
                format!("insert_after({}): index must be within 0..{}", position, len),
            );
        };

        if index == len - 1 {
            let mut log = StepLog::new();
            log.push(ExecutionStep::new(
                "Inserting after the tail is the same as inserting at the end",
                format!("insert_after({}) -> insert_back", index),
            ));
            log.append(self.insert_back(value));
            return log;
        }

        let order = self.order();
        let target = order[index];
        let target_value = self.value_of(target);
        let next_value = self.value_of(order[index + 1]);

        let mut log = StepLog::new();
        self.walk_steps(&order, index + 1, &mut log);
        log.push(
            ExecutionStep::new(
                format!("Create a new node holding {}", value),
                format!("node = Node({})", value),
            )
            .with_node(value),
        );
        log.push(ExecutionStep::new(
            format!(
                "Link the new node between {} and {}",
                target_value, next_value
            ),
            "node.prev = target; node.next = target.next",
        ));
        log.push(ExecutionStep::new(
            format!("Point {}'s next and {}'s prev at the new node", target_value, next_value),
            "target.next.prev = node; target.next = node",
        ));

        let id = self.alloc(value.clone());
        self.link_after(Some(target), id);
        log.push(
            ExecutionStep::summary(
                format!("Inserted {} after {}", value, target_value),
                format!("insert_after({}, {})", index, value),
            )
            .with_node(value),
        );
        log
    }

    // === DELETION ===

    fn unlink_steps(&self, before: Option<NodeId>, id: NodeId, log: &mut StepLog) {
        let removed = self.value_of(id);
        let next = self.node(id).and_then(|n| n.next);
        match before {
            Some(b) => {
                let before_value = self.value_of(b);
                log.push(ExecutionStep::new(
                    format!("Point {}'s next past {}", before_value, removed),
                    "prev.next = node.next",
                ));
            }
            None => log.push(ExecutionStep::new(
                format!("Move the head past {}", removed),
                "head = head.next",
            )),
        }
        if self.is_doubly() {
            if let Some(next) = next {
                let next_value = self.value_of(next);
                log.push(ExecutionStep::new(
                    format!("Point {}'s prev past {}", next_value, removed),
                    "node.next.prev = node.prev",
                ));
            }
        }
    }

    fn delete_value(&mut self, value: &Value) -> StepLog {
        let order = self.order();
        let Some(index) = order.iter().position(|&id| self.value_of(id) == *value) else {
            return StepLog::noop(
                format!("{} is not in the list, nothing deleted", value),
                format!("delete({}): not found", value),
            );
        };

        let mut log = StepLog::new();
        for (i, &id) in order.iter().take(index + 1).enumerate() {
            let current = self.value_of(id);
            log.push(ExecutionStep::visit(
                &current,
                format!("Compare {} with {}", current, value),
                format!("current.value == {}  // index {}", value, i),
            ));
        }
        let id = order[index];
        let before = index.checked_sub(1).map(|i| order[i]);
        self.unlink_steps(before, id, &mut log);
        self.unlink(before, id);
        log.push(
            ExecutionStep::summary(
                format!("Deleted {} from index {}", value, index),
                format!("delete({})", value),
            )
            .with_node(value),
        );
        log
    }

    fn delete_front(&mut self) -> StepLog {
        let Some(head) = self.head else {
            return StepLog::noop(
                "The list is empty, nothing to delete",
                "delete_front: head is None",
            );
        };
        let value = self.value_of(head);
        let mut log = StepLog::new();
        log.push(ExecutionStep::visit(
            &value,
            format!("The head holds {}", value),
            "node = head",
        ));
        self.unlink_steps(None, head, &mut log);
        self.unlink(None, head);
        log.push(
            ExecutionStep::summary(format!("Deleted the head {}", value), "delete_front()")
                .with_node(&value),
        );
        log
    }

    fn delete_back(&mut self) -> StepLog {
        let order = self.order();
        let Some(&tail) = order.last() else {
            return StepLog::noop(
                "The list is empty, nothing to delete",
                "delete_back: head is None",
            );
        };
        let value = self.value_of(tail);
        let before = order.len().checked_sub(2).map(|i| order[i]);

        let mut log = StepLog::new();
        if self.is_doubly() {
            log.push(ExecutionStep::visit(
                &value,
                format!("Jump straight to the tail {}", value),
                "node = tail",
            ));
        } else {
            self.walk_steps(&order, order.len(), &mut log);
        }
        match before {
            Some(b) => {
                let before_value = self.value_of(b);
                log.push(ExecutionStep::new(
                    format!("{} becomes the new tail", before_value),
                    "tail = node.prev; tail.next = None",
                ));
            }
            None => log.push(ExecutionStep::new(
                format!("{} was the only node, the list becomes empty", value),
                "head = tail = None",
            )),
        }
        self.unlink(before, tail);
        log.push(
            ExecutionStep::summary(format!("Deleted the tail {}", value), "delete_back()")
                .with_node(&value),
        );
        log
    }

    fn delete_at(&mut self, position: i64) -> StepLog {
        let len = self.len();
        let Some(index) = position_in_range(position, len.saturating_sub(1)).filter(|_| len > 0)
        else {
            return StepLog::noop(
                format!(
                    "Position {} is out of range for a list of length {}, nothing deleted",
                    position, len
                ),
                format!("delete_at({}): index must be within 0..{}", position, len),
            );
        };

        let order = self.order();
        let id = order[index];
        let before = index.checked_sub(1).map(|i| order[i]);
        let value = self.value_of(id);

        let mut log = StepLog::new();
        self.walk_steps(&order, index + 1, &mut log);
        self.unlink_steps(before, id, &mut log);
        self.unlink(before, id);
        log.push(
            ExecutionStep::summary(
                format!("Deleted {} from position {}", value, index),
                format!("delete_at({})", index),
            )
            .with_node(&value),
        );
        log
    }

    // === QUERIES ===

    fn search(&self, value: &Value) -> StepLog {
        let mut log = StepLog::new();
        for (i, id) in self.order().into_iter().enumerate() {
            let current = self.value_of(id);
            log.push(ExecutionStep::visit(
                &current,
                format!("Compare {} with {}", current, value),
                format!("current.value == {}  // index {}", value, i),
            ));
            if current == *value {
                log.push(
                    ExecutionStep::summary(
                        format!("Found {} at index {}", value, i),
                        format!("search({}) -> {}", value, i),
                    )
                    .with_node(value),
                );
                return log;
            }
        }
        log.push(ExecutionStep::summary(
            format!("{} is not in the list", value),
            format!("search({}) -> -1", value),
        ));
        log
    }

    fn traverse(&self) -> StepLog {
        let values = self.values();
        if values.is_empty() {
            return StepLog::noop("The list is empty, nothing to traverse", "traverse: head is None");
        }
        let mut log = StepLog::new();
        for (i, value) in values.iter().enumerate() {
            log.push(ExecutionStep::visit(
                value,
                format!("Visit {}", value),
                format!("print(current.value)  // index {}", i),
            ));
        }
        log.push(
            ExecutionStep::summary(
                format!("Traversal complete: {}", format_values(&values)),
                "current = None",
            )
            .with_path(values.iter().map(Value::to_string).collect()),
        );
        log
    }

    fn traverse_backward(&self) -> StepLog {
        if !self.is_doubly() {
            return StepLog::noop(
                "A singly linked list cannot be walked backwards",
                "traverse_backward: no prev links",
            );
        }
        let Some(tail) = self.tail_id() else {
            return StepLog::noop(
                "The list is empty, nothing to traverse",
                "traverse_backward: tail is None",
            );
        };

        let mut log = StepLog::new();
        let mut visited = Vec::new();
        let mut current = Some(tail);
        while let Some(id) = current {
            if visited.len() >= self.slots.len() {
                break;
            }
            let value = self.value_of(id);
            log.push(ExecutionStep::visit(
                &value,
                format!("Visit {}", value),
                "print(current.value); current = current.prev",
            ));
            visited.push(value);
            current = self.node(id).and_then(|n| n.prev);
        }
        log.push(
            ExecutionStep::summary(
                format!("Backward traversal complete: {}", format_values(&visited)),
                "current = None",
            )
            .with_path(visited.iter().map(Value::to_string).collect()),
        );
        log
    }

    fn reverse(&mut self) -> StepLog {
        let order = self.order();
        if order.len() < 2 {
            return StepLog::noop(
                "A list with fewer than two nodes is already its own reverse",
                "reverse: len < 2",
            );
        }

        let mut log = StepLog::new();
        let doubly = self.is_doubly();
        let mut previous: Option<NodeId> = None;
        for &id in &order {
            let value = self.value_of(id);
            let next = self.node(id).and_then(|n| n.next);
            if let Some(node) = self.node_mut(id) {
                node.next = previous;
                if doubly {
                    node.prev = next;
                }
            }
            let target = previous.map_or_else(|| "None".to_string(), |p| self.value_of(p).to_string());
            log.push(ExecutionStep::visit(
                &value,
                format!("Point {}'s next back at {}", value, target),
                if doubly {
                    "swap(current.next, current.prev)"
                } else {
                    "next = current.next; current.next = prev; prev = current"
                },
            ));
            previous = Some(id);
        }
        self.head = previous;

        let values = self.values();
        log.push(ExecutionStep::summary(
            format!("List reversed: {}", format_values(&values)),
            "head = prev",
        ));
        log
    }

    fn clear(&mut self) -> StepLog {
        if self.head.is_none() {
            return StepLog::noop("The list is already empty", "clear: head is None");
        }
        let count = self.len();
        self.first_id += self.slots.len() as u32;
        self.slots.clear();
        self.head = None;
        StepLog::from_summary(
            format!("Removed all {} nodes", count),
            "head = tail = None",
        )
    }

    /// Verify the link invariants, describing the first violation found
    pub fn check_links(&self) -> Result<(), String> {
        let live = self.slots.iter().flatten().count();
        let mut seen = FxHashSet::default();
        let mut previous: Option<NodeId> = None;
        let mut current = self.head;

        while let Some(id) = current {
            let node = self
                .node(id)
                .ok_or_else(|| format!("dangling link to {}", id))?;
            if !seen.insert(id) {
                return Err(format!("cycle through {}", id));
            }
            match self.kind {
                LinkKind::Doubly if node.prev != previous => {
                    return Err(format!(
                        "{}.prev is {:?}, expected {:?}",
                        id, node.prev, previous
                    ));
                }
                LinkKind::Singly if node.prev.is_some() => {
                    return Err(format!("singly node {} has a prev link", id));
                }
                _ => {}
            }
            previous = Some(id);
            current = node.next;
        }

        if seen.len() != live {
            return Err(format!(
                "{} live nodes but only {} reachable from head",
                live,
                seen.len()
            ));
        }
        Ok(())
    }
}

impl Serialize for LinkedList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LinkedList", 5)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("nodes", &self.nodes())?;
        state.serialize_field("head", &self.head)?;
        state.serialize_field("tail", &self.tail_id())?;
        state.serialize_field("stats", &self.stats)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(list: &LinkedList) -> Vec<String> {
        list.values().iter().map(Value::to_string).collect()
    }

    #[test]
    fn test_insert_front_and_back() {
        for kind in [LinkKind::Singly, LinkKind::Doubly] {
            let mut list = LinkedList::new(kind);
            list.apply(&ListOp::InsertBack("2".into()));
            list.apply(&ListOp::InsertFront("1".into()));
            list.apply(&ListOp::InsertBack("3".into()));
            assert_eq!(values(&list), ["1", "2", "3"]);
            assert_eq!(list.stats().head, Some(Value::from("1")));
            assert_eq!(list.stats().tail, Some(Value::from("3")));
            list.check_links().unwrap();
        }
    }

    #[test]
    fn test_insert_at_valid_and_invalid() {
        let mut list = LinkedList::from_values(LinkKind::Doubly, ["a", "c"]);
        list.apply(&ListOp::InsertAt {
            position: 1,
            value: "b".into(),
        });
        list.apply(&ListOp::InsertAt {
            position: 3,
            value: "d".into(),
        });
        assert_eq!(values(&list), ["a", "b", "c", "d"]);
        list.check_links().unwrap();

        let before = list.clone();
        let log = list.apply(&ListOp::InsertAt {
            position: 9,
            value: "z".into(),
        });
        assert_eq!(log.len(), 1);
        assert_eq!(list, before);

        let log = list.apply(&ListOp::InsertAt {
            position: -1,
            value: "z".into(),
        });
        assert_eq!(log.len(), 1);
        assert_eq!(list, before);
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut list = LinkedList::from_values(LinkKind::Doubly, ["10", "30"]);
        list.apply(&ListOp::InsertBefore {
            position: 1,
            value: "20".into(),
        });
        list.apply(&ListOp::InsertBefore {
            position: 0,
            value: "5".into(),
        });
        list.apply(&ListOp::InsertAfter {
            position: 3,
            value: "40".into(),
        });
        list.apply(&ListOp::InsertAfter {
            position: 0,
            value: "7".into(),
        });
        assert_eq!(values(&list), ["5", "7", "10", "20", "30", "40"]);
        list.check_links().unwrap();

        let before = list.clone();
        let log = list.apply(&ListOp::InsertBefore {
            position: 6,
            value: "x".into(),
        });
        assert_eq!(log.len(), 1);
        assert_eq!(list, before);
    }

    #[test]
    fn test_insert_before_on_empty_delegates() {
        let mut list = LinkedList::doubly();
        list.apply(&ListOp::InsertBefore {
            position: 0,
            value: "1".into(),
        });
        assert_eq!(values(&list), ["1"]);
    }

    #[test]
    fn test_insert_before_unsupported_on_singly() {
        let mut list = LinkedList::from_values(LinkKind::Singly, ["1"]);
        let before = list.clone();
        let log = list.apply(&ListOp::InsertBefore {
            position: 0,
            value: "0".into(),
        });
        assert_eq!(log.len(), 1);
        assert_eq!(list, before);
    }

    #[test]
    fn test_delete_first_match() {
        let mut list = LinkedList::from_values(LinkKind::Singly, ["1", "2", "1"]);
        list.apply(&ListOp::DeleteValue("1".into()));
        assert_eq!(values(&list), ["2", "1"]);
        list.check_links().unwrap();
    }

    #[test]
    fn test_delete_missing_is_single_step_noop() {
        for kind in [LinkKind::Singly, LinkKind::Doubly] {
            let mut list = LinkedList::from_values(kind, ["1", "2"]);
            let before = list.clone();
            let log = list.apply(&ListOp::DeleteValue("9".into()));
            assert_eq!(log.len(), 1);
            assert_eq!(list, before);
        }
    }

    #[test]
    fn test_delete_front_back_at() {
        let mut list = LinkedList::from_values(LinkKind::Doubly, ["1", "2", "3", "4"]);
        list.apply(&ListOp::DeleteFront);
        list.apply(&ListOp::DeleteBack);
        assert_eq!(values(&list), ["2", "3"]);
        list.apply(&ListOp::DeleteAt(1));
        assert_eq!(values(&list), ["2"]);
        list.apply(&ListOp::DeleteBack);
        assert!(list.is_empty());
        assert_eq!(list.stats().head, None);
        list.check_links().unwrap();

        let log = list.apply(&ListOp::DeleteFront);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_search_reports_index() {
        let mut list = LinkedList::from_values(LinkKind::Singly, ["a", "b", "c"]);
        let log = list.apply(&ListOp::Search("b".into()));
        assert_eq!(log.len(), 3);
        assert!(log.last().unwrap().human_message.contains("index 1"));
    }

    #[test]
    fn test_traverse_backward() {
        let mut list = LinkedList::from_values(LinkKind::Doubly, ["1", "2", "3"]);
        let log = list.apply(&ListOp::TraverseBackward);
        assert_eq!(
            log.last().unwrap().path,
            Some(vec!["3".to_string(), "2".to_string(), "1".to_string()])
        );

        let mut singly = LinkedList::from_values(LinkKind::Singly, ["1"]);
        assert_eq!(singly.apply(&ListOp::TraverseBackward).len(), 1);
    }

    #[test]
    fn test_reverse_keeps_symmetry() {
        for kind in [LinkKind::Singly, LinkKind::Doubly] {
            let mut list = LinkedList::from_values(kind, ["1", "2", "3", "4"]);
            list.apply(&ListOp::Reverse);
            assert_eq!(values(&list), ["4", "3", "2", "1"]);
            assert_eq!(list.stats().tail, Some(Value::from("1")));
            list.check_links().unwrap();
        }
    }

    #[test]
    fn test_clear_keeps_ids_unique() {
        let mut list = LinkedList::from_values(LinkKind::Doubly, ["1", "2"]);
        list.apply(&ListOp::Clear);
        assert!(list.is_empty());
        list.apply(&ListOp::InsertBack("3".into()));
        assert_eq!(list.head_id(), Some(NodeId(2)));
        list.check_links().unwrap();
    }

    #[test]
    fn test_clear_releases_arena() {
        let mut list = LinkedList::from_values(LinkKind::Singly, ["1", "2", "3", "4"]);
        list.apply(&ListOp::DeleteFront);
        assert_eq!(list.slots.len(), 4);
        list.apply(&ListOp::Clear);
        assert!(list.slots.is_empty());
        assert!(list.node(NodeId(1)).is_none());

        list.apply(&ListOp::InsertBack("5".into()));
        list.apply(&ListOp::InsertBack("6".into()));
        assert_eq!(list.slots.len(), 2);
        assert_eq!(list.head_id(), Some(NodeId(4)));
        assert_eq!(values(&list), ["5", "6"]);
        list.check_links().unwrap();
    }
}
