//! Structure kinds and live instances

use super::operation::Operation;
use super::StepLog;
use crate::graph::Graph;
use crate::structures::bst::BinarySearchTree;
use crate::structures::linked_list::{LinkKind, LinkedList};
use crate::structures::queue::Queue;
use crate::structures::stack::Stack;
use crate::value::format_values;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every structure the engine can simulate.
///
/// Deserializes from any name [`StructureKind::from_name`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum StructureKind {
    SinglyLinkedList,
    DoublyLinkedList,
    Stack,
    Queue,
    BinarySearchTree,
    DirectedGraph,
    UndirectedGraph,
}

impl StructureKind {
    pub const ALL: [StructureKind; 7] = [
        StructureKind::SinglyLinkedList,
        StructureKind::DoublyLinkedList,
        StructureKind::Stack,
        StructureKind::Queue,
        StructureKind::BinarySearchTree,
        StructureKind::DirectedGraph,
        StructureKind::UndirectedGraph,
    ];

    /// Look a kind up by any of its accepted names, ignoring case, `_` and `-`
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();
        let kind = match key.as_str() {
            "singlylinkedlist" | "linkedlist" | "sll" | "singly" => StructureKind::SinglyLinkedList,
            "doublylinkedlist" | "dll" | "doubly" => StructureKind::DoublyLinkedList,
            "arraystack" | "stack" | "linkedstack" => StructureKind::Stack,
            "queue" | "arrayqueue" | "linkedqueue" => StructureKind::Queue,
            "binarysearchtree" | "bst" | "tree" => StructureKind::BinarySearchTree,
            "directedgraph" | "digraph" | "directed" => StructureKind::DirectedGraph,
            "undirectedgraph" | "graph" | "undirected" => StructureKind::UndirectedGraph,
            _ => return None,
        };
        Some(kind)
    }

    pub fn name(self) -> &'static str {
        match self {
            StructureKind::SinglyLinkedList => "singly linked list",
            StructureKind::DoublyLinkedList => "doubly linked list",
            StructureKind::Stack => "stack",
            StructureKind::Queue => "queue",
            StructureKind::BinarySearchTree => "binary search tree",
            StructureKind::DirectedGraph => "directed graph",
            StructureKind::UndirectedGraph => "undirected graph",
        }
    }

    pub fn is_list(self) -> bool {
        matches!(
            self,
            StructureKind::SinglyLinkedList | StructureKind::DoublyLinkedList
        )
    }

    pub fn is_graph(self) -> bool {
        matches!(
            self,
            StructureKind::DirectedGraph | StructureKind::UndirectedGraph
        )
    }
}

impl TryFrom<String> for StructureKind {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        StructureKind::from_name(&name).ok_or_else(|| format!("unknown structure kind '{}'", name))
    }
}

impl fmt::Display for StructureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The state of one structure instance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "structure", content = "state", rename_all = "snake_case")]
pub enum Instance {
    LinkedList(LinkedList),
    Stack(Stack),
    Queue(Queue),
    Tree(BinarySearchTree),
    Graph(Graph),
}

impl Instance {
    /// An empty instance of `kind`
    pub fn new(kind: StructureKind) -> Self {
        match kind {
            StructureKind::SinglyLinkedList => Instance::LinkedList(LinkedList::singly()),
            StructureKind::DoublyLinkedList => Instance::LinkedList(LinkedList::doubly()),
            StructureKind::Stack => Instance::Stack(Stack::new()),
            StructureKind::Queue => Instance::Queue(Queue::new()),
            StructureKind::BinarySearchTree => Instance::Tree(BinarySearchTree::new()),
            StructureKind::DirectedGraph => Instance::Graph(Graph::directed()),
            StructureKind::UndirectedGraph => Instance::Graph(Graph::undirected()),
        }
    }

    pub fn kind(&self) -> StructureKind {
        match self {
            Instance::LinkedList(list) => match list.kind() {
                LinkKind::Singly => StructureKind::SinglyLinkedList,
                LinkKind::Doubly => StructureKind::DoublyLinkedList,
            },
            Instance::Stack(_) => StructureKind::Stack,
            Instance::Queue(_) => StructureKind::Queue,
            Instance::Tree(_) => StructureKind::BinarySearchTree,
            Instance::Graph(graph) if graph.is_directed() => StructureKind::DirectedGraph,
            Instance::Graph(_) => StructureKind::UndirectedGraph,
        }
    }

    /// Apply a typed operation.
    ///
    /// An operation from another family leaves the state untouched and
    /// explains the mismatch in a single step.
    pub fn apply(&mut self, op: &Operation) -> StepLog {
        match (self, op) {
            (Instance::LinkedList(list), Operation::List(op)) => list.apply(op),
            (Instance::Stack(stack), Operation::Stack(op)) => stack.apply(op),
            (Instance::Queue(queue), Operation::Queue(op)) => queue.apply(op),
            (Instance::Tree(tree), Operation::Tree(op)) => tree.apply(op),
            (Instance::Graph(graph), Operation::Graph(op)) => graph.apply(op),
            (instance, op) => StepLog::noop(
                format!(
                    "A {} cannot perform a {} operation",
                    instance.kind(),
                    op.family()
                ),
                format!("{:?}: wrong structure", op),
            ),
        }
    }

    /// Number of elements (nodes or vertices)
    pub fn len(&self) -> usize {
        match self {
            Instance::LinkedList(list) => list.len(),
            Instance::Stack(stack) => stack.len(),
            Instance::Queue(queue) => queue.len(),
            Instance::Tree(tree) => tree.len(),
            Instance::Graph(graph) => graph.nodes().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One-line textual rendering of the contents
    pub fn summary(&self) -> String {
        match self {
            Instance::LinkedList(list) => {
                let values = list.values();
                if values.is_empty() {
                    "(empty)".to_string()
                } else {
                    let joiner = if list.is_doubly() { " ⇄ " } else { " → " };
                    values
                        .iter()
                        .map(|v| v.to_string())
                        .collect::<Vec<_>>()
                        .join(joiner)
                }
            }
            Instance::Stack(stack) => format!("bottom {} top", format_values(stack.elements())),
            Instance::Queue(queue) => format!("front {} rear", format_values(&queue.elements())),
            Instance::Tree(tree) => format!(
                "inorder {}",
                format_values(&tree.values(crate::structures::bst::TraversalOrder::Inorder))
            ),
            Instance::Graph(graph) => {
                let stats = graph.stats();
                format!(
                    "{} vertices, {} edges",
                    stats.vertex_count, stats.edge_count
                )
            }
        }
    }
}

/// Instances keyed by name, in creation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedInstanceTable {
    entries: Vec<(String, Instance)>,
}

impl NamedInstanceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, instance)| instance)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Instance> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, instance)| instance)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Existing instance called `name`, or a fresh empty one of `kind`
    pub fn get_or_create(&mut self, name: &str, kind: StructureKind) -> &mut Instance {
        let index = match self.entries.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.entries.push((name.to_string(), Instance::new(kind)));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    /// The first instance created
    pub fn first(&self) -> Option<(&str, &Instance)> {
        self.entries
            .first()
            .map(|(name, instance)| (name.as_str(), instance))
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.entries
            .iter()
            .map(|(name, instance)| (name.as_str(), instance))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for NamedInstanceTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, instance) in &self.entries {
            map.serialize_entry(name, instance)?;
        }
        map.end()
    }
}
