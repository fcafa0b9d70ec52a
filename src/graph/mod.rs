//! Directed and undirected graphs
//!
//! A [`Graph`] keeps vertices and edges in insertion order and addresses them
//! by stable [`NodeId`] / [`EdgeId`]s. Adjacency is stored on the vertices as
//! id lists:
//!
//! - undirected vertices keep a single neighbor-id list
//! - directed vertices keep separate outgoing and incoming edge-id lists
//!
//! Undirected edges are stored once; the algorithms treat them as traversable
//! from either endpoint.
//!
//! # Invariants
//!
//! - vertex labels are unique within a graph
//! - at most one edge per ordered (directed) or unordered (undirected) pair
//! - no self-loops
//! - every id in an adjacency list refers to a live vertex or edge
//!
//! Removing a vertex first removes every edge touching it, pruning the
//! surviving neighbors' adjacency lists, and only then removes the vertex.
//!
//! [`GraphStats`] (counts, connectivity, cycle flag, degree maps, strong
//! connectivity) is recomputed at the end of every [`Graph::apply`].

pub mod algorithms;
pub mod layout;

use crate::structures::NodeId;
use crate::trace::{ExecutionStep, StepLog};
use crate::value::{format_values, Value};
use algorithms::AdjacencyView;
use layout::Position;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EdgeId(pub u32);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Per-vertex adjacency
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Adjacency {
    Undirected {
        neighbors: Vec<NodeId>,
    },
    Directed {
        outgoing: Vec<EdgeId>,
        incoming: Vec<EdgeId>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub value: Value,
    pub position: Position,
    pub adjacency: Adjacency,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub directed: bool,
}

impl GraphEdge {
    /// Weight used by shortest-path searches
    pub fn cost(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }

    fn joins(&self, a: NodeId, b: NodeId) -> bool {
        (self.from == a && self.to == b) || (!self.directed && self.from == b && self.to == a)
    }

    fn touches(&self, id: NodeId) -> bool {
        self.from == id || self.to == id
    }
}

/// Operations on a graph
#[derive(Debug, Clone, PartialEq)]
pub enum GraphOp {
    AddVertex(Value),
    AddEdge {
        from: Value,
        to: Value,
        weight: Option<f64>,
    },
    RemoveVertex(Value),
    RemoveEdge {
        from: Value,
        to: Value,
    },
    Dfs(Value),
    Bfs(Value),
    ShortestPath {
        start: Value,
        end: Value,
    },
    /// Directed only
    TopologicalSort,
    HasCycle,
    IsConnected,
    /// Directed only
    IsStronglyConnected,
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphStats {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub is_connected: bool,
    pub has_cycle: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_strongly_connected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_degree: Option<BTreeMap<String, usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_degree: Option<BTreeMap<String, usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    directed: bool,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    #[serde(skip)]
    next_node: u32,
    #[serde(skip)]
    next_edge: u32,
    stats: GraphStats,
}

impl Graph {
    pub fn new(directed: bool) -> Self {
        let mut graph = Graph {
            directed,
            nodes: Vec::new(),
            edges: Vec::new(),
            next_node: 0,
            next_edge: 0,
            stats: GraphStats::default(),
        };
        graph.refresh_stats();
        graph
    }

    pub fn directed() -> Self {
        Graph::new(true)
    }

    pub fn undirected() -> Self {
        Graph::new(false)
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn stats(&self) -> &GraphStats {
        &self.stats
    }

    pub fn node_by_value(&self, value: &Value) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.value == *value)
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    fn label(&self, id: NodeId) -> Value {
        self.node(id)
            .map(|n| n.value.clone())
            .unwrap_or_else(|| Value::new("?"))
    }

    fn find_edge(&self, from: NodeId, to: NodeId) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.joins(from, to))
    }

    fn arrow(&self) -> &'static str {
        if self.directed {
            "→"
        } else {
            "–"
        }
    }

    /// Dense view for the algorithms, indexed by vertex insertion order
    pub fn view(&self) -> AdjacencyView {
        let index: FxHashMap<NodeId, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id, i))
            .collect();
        let edge_by_id: FxHashMap<EdgeId, &GraphEdge> =
            self.edges.iter().map(|e| (e.id, e)).collect();

        let mut out = vec![Vec::new(); self.nodes.len()];
        let mut inc = vec![Vec::new(); self.nodes.len()];
        for (u, node) in self.nodes.iter().enumerate() {
            match &node.adjacency {
                Adjacency::Directed { outgoing, incoming } => {
                    for edge in outgoing.iter().filter_map(|e| edge_by_id.get(e)) {
                        if let Some(&v) = index.get(&edge.to) {
                            out[u].push((v, edge.cost()));
                        }
                    }
                    for edge in incoming.iter().filter_map(|e| edge_by_id.get(e)) {
                        if let Some(&v) = index.get(&edge.from) {
                            inc[u].push(v);
                        }
                    }
                }
                Adjacency::Undirected { neighbors } => {
                    for &neighbor in neighbors {
                        let (Some(&v), Some(edge)) =
                            (index.get(&neighbor), self.find_edge(node.id, neighbor))
                        else {
                            continue;
                        };
                        out[u].push((v, edge.cost()));
                    }
                }
            }
        }
        AdjacencyView {
            directed: self.directed,
            out,
            inc,
        }
    }

    pub fn apply(&mut self, op: &GraphOp) -> StepLog {
        let log = match op {
            GraphOp::AddVertex(value) => self.add_vertex(value),
            GraphOp::AddEdge { from, to, weight } => self.add_edge(from, to, *weight),
            GraphOp::RemoveVertex(value) => self.remove_vertex(value),
            GraphOp::RemoveEdge { from, to } => self.remove_edge(from, to),
            GraphOp::Dfs(start) => self.traverse(start, false),
            GraphOp::Bfs(start) => self.traverse(start, true),
            GraphOp::ShortestPath { start, end } => self.shortest_path_steps(start, end),
            GraphOp::TopologicalSort => self.topological_sort_steps(),
            GraphOp::HasCycle => {
                let cyclic = algorithms::has_cycle(&self.view());
                StepLog::from_summary(
                    if cyclic {
                        "The graph contains a cycle"
                    } else {
                        "The graph has no cycle"
                    },
                    format!("has_cycle() -> {}", cyclic),
                )
            }
            GraphOp::IsConnected => {
                let connected = algorithms::is_connected(&self.view());
                StepLog::from_summary(
                    if connected {
                        "Every vertex can be reached from every other"
                    } else {
                        "The graph falls apart into several components"
                    },
                    format!("is_connected() -> {}", connected),
                )
            }
            GraphOp::IsStronglyConnected => self.strong_connectivity_steps(),
            GraphOp::Clear => self.clear(),
        };
        self.refresh_stats();
        log
    }

    fn refresh_stats(&mut self) {
        let view = self.view();
        let (in_degree, out_degree, strongly) = if self.directed {
            let mut ins = BTreeMap::new();
            let mut outs = BTreeMap::new();
            for node in &self.nodes {
                if let Adjacency::Directed { outgoing, incoming } = &node.adjacency {
                    ins.insert(node.value.to_string(), incoming.len());
                    outs.insert(node.value.to_string(), outgoing.len());
                }
            }
            (
                Some(ins),
                Some(outs),
                Some(algorithms::is_strongly_connected(&view)),
            )
        } else {
            (None, None, None)
        };

        self.stats = GraphStats {
            vertex_count: self.nodes.len(),
            edge_count: self.edges.len(),
            is_connected: algorithms::is_connected(&view),
            has_cycle: algorithms::has_cycle(&view),
            is_strongly_connected: strongly,
            in_degree,
            out_degree,
        };
    }

    fn relayout(&mut self) {
        let positions = layout::circle(self.nodes.len());
        for (node, position) in self.nodes.iter_mut().zip(positions) {
            node.position = position;
        }
    }

    // === MUTATIONS ===

    fn add_vertex(&mut self, value: &Value) -> StepLog {
        if self.node_by_value(value).is_some() {
            return StepLog::noop(
                format!("Vertex {} already exists", value),
                format!("add_vertex({}): duplicate", value),
            );
        }
        let id = NodeId(self.next_node);
        self.next_node += 1;
        let adjacency = if self.directed {
            Adjacency::Directed {
                outgoing: Vec::new(),
                incoming: Vec::new(),
            }
        } else {
            Adjacency::Undirected {
                neighbors: Vec::new(),
            }
        };
        self.nodes.push(GraphNode {
            id,
            value: value.clone(),
            position: Position { x: 0.0, y: 0.0 },
            adjacency,
        });
        self.relayout();

        let mut log = StepLog::new();
        log.push(
            ExecutionStep::new(
                format!("Create vertex {}", value),
                format!("graph.vertices[{}] = {}", id, value),
            )
            .with_node(value),
        );
        log.push(ExecutionStep::summary(
            format!("Added vertex {}; the graph now has {} vertices", value, self.nodes.len()),
            format!("add_vertex({})", value),
        ));
        log
    }

    fn add_edge(&mut self, from: &Value, to: &Value, weight: Option<f64>) -> StepLog {
        let signature = format!("add_edge({}, {})", from, to);
        if from == to {
            return StepLog::noop(
                format!("An edge from {} to itself is not allowed", from),
                format!("{}: self-loop", signature),
            );
        }
        if let Some(w) = weight {
            if !w.is_finite() || w < 0.0 {
                return StepLog::noop(
                    format!("Edge weight {} must be a non-negative number", w),
                    format!("{}: invalid weight", signature),
                );
            }
        }
        let (Some(a), Some(b)) = (
            self.node_by_value(from).map(|n| n.id),
            self.node_by_value(to).map(|n| n.id),
        ) else {
            let missing = if self.node_by_value(from).is_none() {
                from
            } else {
                to
            };
            return StepLog::noop(
                format!("Vertex {} does not exist, add it first", missing),
                format!("{}: unknown vertex {}", signature, missing),
            );
        };
        if self.find_edge(a, b).is_some() {
            return StepLog::noop(
                format!("Edge {} {} {} already exists", from, self.arrow(), to),
                format!("{}: duplicate", signature),
            );
        }

        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.edges.push(GraphEdge {
            id,
            from: a,
            to: b,
            weight,
            directed: self.directed,
        });

        let mut log = StepLog::new();
        if self.directed {
            if let Some(Adjacency::Directed { outgoing, .. }) =
                self.node_mut(a).map(|n| &mut n.adjacency)
            {
                outgoing.push(id);
            }
            if let Some(Adjacency::Directed { incoming, .. }) =
                self.node_mut(b).map(|n| &mut n.adjacency)
            {
                incoming.push(id);
            }
            log.push(
                ExecutionStep::visit(
                    from,
                    format!("Record {} as an outgoing edge of {}", id, from),
                    format!("{}.outgoing.push({})", from, id),
                ),
            );
            log.push(
                ExecutionStep::visit(
                    to,
                    format!("Record {} as an incoming edge of {}", id, to),
                    format!("{}.incoming.push({})", to, id),
                ),
            );
        } else {
            for (owner, other) in [(a, b), (b, a)] {
                if let Some(Adjacency::Undirected { neighbors }) =
                    self.node_mut(owner).map(|n| &mut n.adjacency)
                {
                    neighbors.push(other);
                }
            }
            log.push(ExecutionStep::visit(
                from,
                format!("Add {} to {}'s neighbors", to, from),
                format!("{}.neighbors.push({})", from, to),
            ));
            log.push(ExecutionStep::visit(
                to,
                format!("Add {} to {}'s neighbors", from, to),
                format!("{}.neighbors.push({})", to, from),
            ));
        }

        let weight_note = weight.map(|w| format!(" with weight {}", w)).unwrap_or_default();
        log.push(ExecutionStep::summary(
            format!("Added edge {} {} {}{}", from, self.arrow(), to, weight_note),
            signature,
        ));
        log
    }

    fn detach_edge(&mut self, edge: &GraphEdge) {
        if self.directed {
            if let Some(Adjacency::Directed { outgoing, .. }) =
                self.node_mut(edge.from).map(|n| &mut n.adjacency)
            {
                outgoing.retain(|&e| e != edge.id);
            }
            if let Some(Adjacency::Directed { incoming, .. }) =
                self.node_mut(edge.to).map(|n| &mut n.adjacency)
            {
                incoming.retain(|&e| e != edge.id);
            }
        } else {
            for (owner, other) in [(edge.from, edge.to), (edge.to, edge.from)] {
                if let Some(Adjacency::Undirected { neighbors }) =
                    self.node_mut(owner).map(|n| &mut n.adjacency)
                {
                    neighbors.retain(|&n| n != other);
                }
            }
        }
        self.edges.retain(|e| e.id != edge.id);
    }

    fn remove_vertex(&mut self, value: &Value) -> StepLog {
        let Some(id) = self.node_by_value(value).map(|n| n.id) else {
            return StepLog::noop(
                format!("Vertex {} does not exist, nothing removed", value),
                format!("remove_vertex({}): not found", value),
            );
        };

        let mut log = StepLog::new();
        let touching: Vec<GraphEdge> = self
            .edges
            .iter()
            .filter(|e| e.touches(id))
            .cloned()
            .collect();
        for edge in &touching {
            let (a, b) = (self.label(edge.from), self.label(edge.to));
            log.push(ExecutionStep::new(
                format!("Remove edge {} {} {}", a, self.arrow(), b),
                format!("remove_edge({}, {})  // {}", a, b, edge.id),
            ));
            self.detach_edge(edge);
        }

        self.nodes.retain(|n| n.id != id);
        self.relayout();
        log.push(
            ExecutionStep::summary(
                format!(
                    "Removed vertex {} and its {} edge{}",
                    value,
                    touching.len(),
                    if touching.len() == 1 { "" } else { "s" }
                ),
                format!("remove_vertex({})", value),
            )
            .with_node(value),
        );
        log
    }

    fn remove_edge(&mut self, from: &Value, to: &Value) -> StepLog {
        let edge = match (self.node_by_value(from), self.node_by_value(to)) {
            (Some(a), Some(b)) => self.find_edge(a.id, b.id).cloned(),
            _ => None,
        };
        let Some(edge) = edge else {
            return StepLog::noop(
                format!("There is no edge {} {} {}", from, self.arrow(), to),
                format!("remove_edge({}, {}): not found", from, to),
            );
        };

        self.detach_edge(&edge);
        StepLog::from_summary(
            format!("Removed edge {} {} {}", from, self.arrow(), to),
            format!("remove_edge({}, {})  // {}", from, to, edge.id),
        )
    }

    fn clear(&mut self) -> StepLog {
        if self.nodes.is_empty() {
            return StepLog::noop("The graph is already empty", "clear(): no vertices");
        }
        let (vertices, edges) = (self.nodes.len(), self.edges.len());
        self.nodes.clear();
        self.edges.clear();
        StepLog::from_summary(
            format!("Removed {} vertices and {} edges", vertices, edges),
            "graph.clear()",
        )
    }

    // === QUERIES ===

    fn index_of(&self, value: &Value) -> Option<usize> {
        self.nodes.iter().position(|n| n.value == *value)
    }

    /// Vertex labels in DFS preorder from `start`
    pub fn dfs(&self, start: &Value) -> Vec<Value> {
        self.index_of(start)
            .map(|s| {
                algorithms::dfs_order(&self.view(), s)
                    .into_iter()
                    .map(|(v, _)| self.nodes[v].value.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Vertex labels in BFS order from `start`
    pub fn bfs(&self, start: &Value) -> Vec<Value> {
        self.index_of(start)
            .map(|s| {
                algorithms::bfs_order(&self.view(), s)
                    .into_iter()
                    .map(|(v, _)| self.nodes[v].value.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Cheapest path from `start` to `end` and its total weight.
    ///
    /// `None` when either endpoint is missing or `end` is unreachable.
    pub fn shortest_path(&self, start: &Value, end: &Value) -> Option<(Vec<Value>, f64)> {
        let (s, t) = (self.index_of(start)?, self.index_of(end)?);
        let found = algorithms::dijkstra(&self.view(), s, t)?;
        let path = found
            .vertices
            .iter()
            .map(|&v| self.nodes[v].value.clone())
            .collect();
        Some((path, found.total))
    }

    /// Topological order of the vertex labels; empty for undirected or cyclic
    /// graphs
    pub fn topological_sort(&self) -> Vec<Value> {
        if !self.directed {
            return Vec::new();
        }
        algorithms::topological_order(&self.view())
            .into_iter()
            .map(|v| self.nodes[v].value.clone())
            .collect()
    }

    fn traverse(&self, start: &Value, breadth_first: bool) -> StepLog {
        let name = if breadth_first { "bfs" } else { "dfs" };
        let Some(s) = self.index_of(start) else {
            return StepLog::noop(
                format!("Vertex {} does not exist, cannot start a traversal there", start),
                format!("{}({}): unknown vertex", name, start),
            );
        };
        let view = self.view();
        let order = if breadth_first {
            algorithms::bfs_order(&view, s)
        } else {
            algorithms::dfs_order(&view, s)
        };

        let mut log = StepLog::new();
        for &(v, parent) in &order {
            let value = &self.nodes[v].value;
            let (human, technical) = match parent {
                None => (
                    format!("Start at {}", value),
                    format!("visited = {{{}}}", value),
                ),
                Some(p) => {
                    let from = &self.nodes[p].value;
                    (
                        format!("Visit {} (reached from {})", value, from),
                        format!(
                            "{}: {} -> {}",
                            if breadth_first { "dequeue" } else { "recurse" },
                            from,
                            value
                        ),
                    )
                }
            };
            log.push(ExecutionStep::visit(value, human, technical));
        }

        let visited: Vec<Value> = order.iter().map(|&(v, _)| self.nodes[v].value.clone()).collect();
        log.push(
            ExecutionStep::summary(
                format!(
                    "{} order from {}: {}",
                    name.to_uppercase(),
                    start,
                    format_values(&visited)
                ),
                format!("{}({}) -> {}", name, start, format_values(&visited)),
            )
            .with_path(visited.iter().map(Value::to_string).collect()),
        );
        log
    }

    fn shortest_path_steps(&self, start: &Value, end: &Value) -> StepLog {
        let signature = format!("shortest_path({}, {})", start, end);
        let (Some(s), Some(t)) = (self.index_of(start), self.index_of(end)) else {
            let missing = if self.index_of(start).is_none() {
                start
            } else {
                end
            };
            return StepLog::noop(
                format!("Vertex {} does not exist", missing),
                format!("{}: unknown vertex {}", signature, missing),
            );
        };
        if s == t {
            return StepLog::noop(
                format!("Start and end are both {}, there is no path to find", start),
                format!("{}: start == end", signature),
            );
        }

        let mut log = StepLog::new();
        let Some(found) = algorithms::dijkstra(&self.view(), s, t) else {
            log.push(
                ExecutionStep::summary(
                    format!("{} cannot be reached from {}", end, start),
                    format!("{} -> []", signature),
                )
                .with_path(Vec::new()),
            );
            return log;
        };

        for &(v, distance) in &found.settled {
            let value = &self.nodes[v].value;
            log.push(ExecutionStep::visit(
                value,
                format!("Settle {} at distance {}", value, distance),
                format!("dist[{}] = {}", value, distance),
            ));
        }
        let path: Vec<Value> = found
            .vertices
            .iter()
            .map(|&v| self.nodes[v].value.clone())
            .collect();
        log.push(
            ExecutionStep::summary(
                format!(
                    "Shortest path {} with total weight {}",
                    format_values(&path),
                    found.total
                ),
                format!("{} -> {}", signature, format_values(&path)),
            )
            .with_path(path.iter().map(Value::to_string).collect()),
        );
        log
    }

    fn topological_sort_steps(&self) -> StepLog {
        if !self.directed {
            return StepLog::noop(
                "Topological order is only defined for directed graphs",
                "topological_sort(): graph is undirected",
            );
        }
        let order = self.topological_sort();
        if order.is_empty() && !self.nodes.is_empty() {
            return StepLog::from_summary(
                "The graph has a cycle, so no topological order exists",
                "topological_sort() -> []",
            );
        }

        let mut log = StepLog::new();
        for (i, value) in order.iter().enumerate() {
            log.push(ExecutionStep::visit(
                value,
                format!("Place {} at position {}", value, i),
                format!("order[{}] = {}", i, value),
            ));
        }
        log.push(
            ExecutionStep::summary(
                format!("Topological order: {}", format_values(&order)),
                format!("topological_sort() -> {}", format_values(&order)),
            )
            .with_path(order.iter().map(Value::to_string).collect()),
        );
        log
    }

    fn strong_connectivity_steps(&self) -> StepLog {
        if !self.directed {
            return StepLog::noop(
                "Strong connectivity only applies to directed graphs",
                "is_strongly_connected(): graph is undirected",
            );
        }
        let strongly = algorithms::is_strongly_connected(&self.view());
        StepLog::from_summary(
            if strongly {
                "Every vertex can reach every other vertex along directed edges"
            } else {
                "Some vertex cannot reach another along directed edges"
            },
            format!("is_strongly_connected() -> {}", strongly),
        )
    }

    /// Verify adjacency bookkeeping, describing the first violation found
    pub fn check_adjacency(&self) -> Result<(), String> {
        for edge in &self.edges {
            if self.node(edge.from).is_none() || self.node(edge.to).is_none() {
                return Err(format!("{} has a dangling endpoint", edge.id));
            }
            if edge.from == edge.to {
                return Err(format!("{} is a self-loop", edge.id));
            }
            if self.edges.iter().filter(|e| e.joins(edge.from, edge.to)).count() != 1 {
                return Err(format!("{} is duplicated", edge.id));
            }
        }

        let mut listed = 0;
        for node in &self.nodes {
            match &node.adjacency {
                Adjacency::Directed { outgoing, incoming } => {
                    for id in outgoing {
                        match self.edges.iter().find(|e| e.id == *id) {
                            Some(e) if e.from == node.id => listed += 1,
                            _ => return Err(format!("{} lists bad outgoing {}", node.id, id)),
                        }
                    }
                    for id in incoming {
                        match self.edges.iter().find(|e| e.id == *id) {
                            Some(e) if e.to == node.id => listed += 1,
                            _ => return Err(format!("{} lists bad incoming {}", node.id, id)),
                        }
                    }
                }
                Adjacency::Undirected { neighbors } => {
                    for &other in neighbors {
                        if self.find_edge(node.id, other).is_none() {
                            return Err(format!("{} lists {} without an edge", node.id, other));
                        }
                        listed += 1;
                    }
                }
            }
        }
        if listed != 2 * self.edges.len() {
            return Err(format!(
                "{} adjacency entries for {} edges",
                listed,
                self.edges.len()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(directed: bool, vertices: &[&str], edges: &[(&str, &str, Option<f64>)]) -> Graph {
        let mut g = Graph::new(directed);
        for v in vertices {
            g.apply(&GraphOp::AddVertex((*v).into()));
        }
        for (a, b, w) in edges {
            g.apply(&GraphOp::AddEdge {
                from: (*a).into(),
                to: (*b).into(),
                weight: *w,
            });
        }
        g
    }

    fn labels(values: Vec<Value>) -> Vec<String> {
        values.iter().map(Value::to_string).collect()
    }

    #[test]
    fn test_directed_cycle_flips_topological_order() {
        let mut g = graph(true, &["A", "B", "C"], &[("A", "B", None), ("B", "C", None)]);
        assert!(!g.stats().has_cycle);
        assert_eq!(labels(g.topological_sort()), ["A", "B", "C"]);

        g.apply(&GraphOp::AddEdge {
            from: "C".into(),
            to: "A".into(),
            weight: None,
        });
        assert!(g.stats().has_cycle);
        assert!(g.topological_sort().is_empty());
        let log = g.apply(&GraphOp::TopologicalSort);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_shortest_path_by_weight() {
        let g = graph(
            false,
            &["A", "B", "C", "D"],
            &[
                ("A", "B", Some(1.0)),
                ("B", "C", None),
                ("A", "C", Some(5.0)),
                ("C", "D", None),
            ],
        );
        let (path, total) = g.shortest_path(&"A".into(), &"D".into()).unwrap();
        assert_eq!(labels(path), ["A", "B", "C", "D"]);
        assert_eq!(total, 3.0);
    }

    #[test]
    fn test_shortest_path_unreachable_is_empty() {
        let mut g = graph(true, &["A", "B"], &[("B", "A", None)]);
        let log = g.apply(&GraphOp::ShortestPath {
            start: "A".into(),
            end: "B".into(),
        });
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().path, Some(Vec::new()));

        let log = g.apply(&GraphOp::ShortestPath {
            start: "A".into(),
            end: "A".into(),
        });
        assert!(log.last().unwrap().human_message.contains("both A"));
    }

    #[test]
    fn test_strong_connectivity_flag() {
        let mut g = graph(
            true,
            &["A", "B", "C"],
            &[("A", "B", None), ("B", "C", None), ("C", "A", None)],
        );
        assert_eq!(g.stats().is_strongly_connected, Some(true));
        g.apply(&GraphOp::RemoveEdge {
            from: "C".into(),
            to: "A".into(),
        });
        assert_eq!(g.stats().is_strongly_connected, Some(false));
        g.check_adjacency().unwrap();
    }

    #[test]
    fn test_duplicates_and_self_loops_are_noops() {
        let mut g = graph(false, &["A", "B"], &[("A", "B", None)]);
        let before = g.clone();
        for op in [
            GraphOp::AddVertex("A".into()),
            GraphOp::AddEdge {
                from: "B".into(),
                to: "A".into(),
                weight: None,
            },
            GraphOp::AddEdge {
                from: "A".into(),
                to: "A".into(),
                weight: None,
            },
            GraphOp::AddEdge {
                from: "A".into(),
                to: "Z".into(),
                weight: None,
            },
        ] {
            assert_eq!(g.apply(&op).len(), 1);
        }
        assert_eq!(g, before);
    }

    #[test]
    fn test_reverse_directed_edge_is_distinct() {
        let g = graph(true, &["A", "B"], &[("A", "B", None), ("B", "A", None)]);
        assert_eq!(g.stats().edge_count, 2);
        assert!(g.stats().has_cycle);
    }

    #[test]
    fn test_remove_vertex_cascades() {
        let mut g = graph(
            true,
            &["A", "B", "C"],
            &[("A", "B", None), ("B", "C", None), ("C", "A", None)],
        );
        g.apply(&GraphOp::RemoveVertex("B".into()));
        assert_eq!(g.stats().vertex_count, 2);
        assert_eq!(g.stats().edge_count, 1);
        assert_eq!(g.stats().out_degree.as_ref().unwrap()["C"], 1);
        assert_eq!(g.stats().in_degree.as_ref().unwrap()["A"], 1);
        g.check_adjacency().unwrap();

        let mut u = graph(false, &["A", "B", "C"], &[("A", "B", None), ("B", "C", None)]);
        u.apply(&GraphOp::RemoveVertex("B".into()));
        assert_eq!(u.stats().edge_count, 0);
        assert!(!u.stats().is_connected);
        u.check_adjacency().unwrap();
    }

    #[test]
    fn test_undirected_connectivity_and_cycle() {
        let mut g = graph(false, &["A", "B", "C"], &[("A", "B", None)]);
        assert!(!g.stats().is_connected);
        g.apply(&GraphOp::AddEdge {
            from: "C".into(),
            to: "B".into(),
            weight: None,
        });
        assert!(g.stats().is_connected);
        assert!(!g.stats().has_cycle);
        g.apply(&GraphOp::AddEdge {
            from: "A".into(),
            to: "C".into(),
            weight: None,
        });
        assert!(g.stats().has_cycle);
        assert_eq!(g.stats().is_strongly_connected, None);
    }

    #[test]
    fn test_traversals_follow_insertion_order() {
        let mut g = graph(
            false,
            &["A", "B", "C", "D"],
            &[("A", "C", None), ("A", "B", None), ("C", "D", None)],
        );
        assert_eq!(labels(g.dfs(&"A".into())), ["A", "C", "D", "B"]);
        assert_eq!(labels(g.bfs(&"A".into())), ["A", "C", "B", "D"]);

        let log = g.apply(&GraphOp::Bfs("A".into()));
        assert_eq!(log.len(), 5);
        let log = g.apply(&GraphOp::Dfs("Z".into()));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_layout_tracks_vertex_set() {
        let mut g = graph(false, &["A"], &[]);
        assert_eq!(g.nodes()[0].position.x, crate::config::GRAPH_LAYOUT_CENTER.0);
        g.apply(&GraphOp::AddVertex("B".into()));
        assert_ne!(g.nodes()[0].position, g.nodes()[1].position);
    }
}
