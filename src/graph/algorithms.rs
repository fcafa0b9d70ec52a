//! Graph algorithms over an index-based adjacency view
//!
//! [`AdjacencyView`] flattens a [`Graph`](super::Graph) into dense indices
//! (vertex insertion order) so the algorithms below can use plain vectors for
//! their bookkeeping. Undirected edges appear in both endpoints' `out` lists.
//!
//! Neighbor order is always edge insertion order, which makes every traversal
//! and every tie-break deterministic.

use rustc_hash::FxHashSet;

/// Dense adjacency snapshot of a graph
#[derive(Debug, Clone)]
pub struct AdjacencyView {
    pub directed: bool,
    /// `out[u]` lists `(v, weight)` for every edge leaving `u`
    pub out: Vec<Vec<(usize, f64)>>,
    /// `inc[v]` lists every `u` with an edge into `v` (directed only)
    pub inc: Vec<Vec<usize>>,
}

impl AdjacencyView {
    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    fn successors(&self, u: usize) -> impl Iterator<Item = usize> + '_ {
        self.out[u].iter().map(|&(v, _)| v)
    }

    /// Neighbors ignoring direction
    fn undirected_neighbors(&self, u: usize) -> Vec<usize> {
        let mut neighbors: Vec<usize> = self.successors(u).collect();
        if self.directed {
            neighbors.extend(self.inc[u].iter().copied());
        }
        neighbors
    }
}

/// Connectivity: every vertex reachable from vertex 0.
///
/// Directed graphs are tested for weak connectivity (edges followed in both
/// directions). The empty graph counts as connected.
pub fn is_connected(view: &AdjacencyView) -> bool {
    if view.is_empty() {
        return true;
    }
    let mut seen = vec![false; view.len()];
    let mut stack = vec![0];
    seen[0] = true;
    let mut reached = 1;
    while let Some(u) = stack.pop() {
        for v in view.undirected_neighbors(u) {
            if !seen[v] {
                seen[v] = true;
                reached += 1;
                stack.push(v);
            }
        }
    }
    reached == view.len()
}

pub fn has_cycle(view: &AdjacencyView) -> bool {
    if view.directed {
        has_directed_cycle(view)
    } else {
        has_undirected_cycle(view)
    }
}

/// DFS remembering the vertex we arrived from; reaching any other visited
/// neighbor closes a cycle. Edges are unique per pair and self-loops are
/// rejected on insertion, so the parent vertex identifies the parent edge.
fn has_undirected_cycle(view: &AdjacencyView) -> bool {
    fn visit(view: &AdjacencyView, u: usize, parent: Option<usize>, seen: &mut [bool]) -> bool {
        seen[u] = true;
        for v in view.successors(u) {
            if !seen[v] {
                if visit(view, v, Some(u), seen) {
                    return true;
                }
            } else if Some(v) != parent {
                return true;
            }
        }
        false
    }

    let mut seen = vec![false; view.len()];
    (0..view.len()).any(|u| !seen[u] && visit(view, u, None, &mut seen))
}

/// DFS with a recursion-stack set; an edge into a vertex still on the stack
/// is a back edge.
fn has_directed_cycle(view: &AdjacencyView) -> bool {
    fn visit(view: &AdjacencyView, u: usize, seen: &mut [bool], on_stack: &mut [bool]) -> bool {
        seen[u] = true;
        on_stack[u] = true;
        for v in view.successors(u) {
            if on_stack[v] || (!seen[v] && visit(view, v, seen, on_stack)) {
                return true;
            }
        }
        on_stack[u] = false;
        false
    }

    let mut seen = vec![false; view.len()];
    let mut on_stack = vec![false; view.len()];
    (0..view.len()).any(|u| !seen[u] && visit(view, u, &mut seen, &mut on_stack))
}

/// Vertices in DFS finish order, starting roots in index order
fn finish_order(view: &AdjacencyView) -> Vec<usize> {
    fn visit(view: &AdjacencyView, u: usize, seen: &mut [bool], out: &mut Vec<usize>) {
        seen[u] = true;
        for v in view.successors(u) {
            if !seen[v] {
                visit(view, v, seen, out);
            }
        }
        out.push(u);
    }

    let mut seen = vec![false; view.len()];
    let mut order = Vec::with_capacity(view.len());
    for u in 0..view.len() {
        if !seen[u] {
            visit(view, u, &mut seen, &mut order);
        }
    }
    order
}

/// Kosaraju: finish order on the graph, then one DFS on the transpose from
/// the last-finished vertex. Strongly connected iff that DFS reaches every
/// vertex. Graphs with at most one vertex are trivially strongly connected.
pub fn is_strongly_connected(view: &AdjacencyView) -> bool {
    if view.len() <= 1 {
        return true;
    }
    let order = finish_order(view);
    let Some(&root) = order.last() else {
        return true;
    };

    let mut seen = vec![false; view.len()];
    let mut stack = vec![root];
    seen[root] = true;
    let mut reached = 1;
    while let Some(v) = stack.pop() {
        for &u in &view.inc[v] {
            if !seen[u] {
                seen[u] = true;
                reached += 1;
                stack.push(u);
            }
        }
    }
    reached == view.len()
}

/// Reversed DFS finish order; empty when the graph has a cycle
pub fn topological_order(view: &AdjacencyView) -> Vec<usize> {
    if has_directed_cycle(view) {
        return Vec::new();
    }
    let mut order = finish_order(view);
    order.reverse();
    order
}

/// Preorder DFS from `start` as `(vertex, discovered_from)` pairs
pub fn dfs_order(view: &AdjacencyView, start: usize) -> Vec<(usize, Option<usize>)> {
    fn visit(
        view: &AdjacencyView,
        u: usize,
        parent: Option<usize>,
        seen: &mut FxHashSet<usize>,
        out: &mut Vec<(usize, Option<usize>)>,
    ) {
        seen.insert(u);
        out.push((u, parent));
        for v in view.successors(u) {
            if !seen.contains(&v) {
                visit(view, v, Some(u), seen, out);
            }
        }
    }

    let mut seen = FxHashSet::default();
    let mut out = Vec::new();
    if start < view.len() {
        visit(view, start, None, &mut seen, &mut out);
    }
    out
}

/// Level-order BFS from `start` as `(vertex, discovered_from)` pairs
pub fn bfs_order(view: &AdjacencyView, start: usize) -> Vec<(usize, Option<usize>)> {
    let mut out = Vec::new();
    if start >= view.len() {
        return out;
    }
    let mut seen = vec![false; view.len()];
    let mut queue = std::collections::VecDeque::from([(start, None)]);
    seen[start] = true;
    while let Some((u, parent)) = queue.pop_front() {
        out.push((u, parent));
        for v in view.successors(u) {
            if !seen[v] {
                seen[v] = true;
                queue.push_back((v, Some(u)));
            }
        }
    }
    out
}

/// Result of a successful shortest-path search
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    pub vertices: Vec<usize>,
    pub total: f64,
    /// Vertices in the order Dijkstra settled them
    pub settled: Vec<(usize, f64)>,
}

/// Dijkstra with a linear scan of the unvisited frontier.
///
/// Each round settles the unvisited vertex of least known distance; ties go to
/// the first one found in index order. Returns `None` when `target` is
/// unreachable.
pub fn dijkstra(view: &AdjacencyView, source: usize, target: usize) -> Option<ShortestPath> {
    let n = view.len();
    if source >= n || target >= n {
        return None;
    }
    let mut dist: Vec<Option<f64>> = vec![None; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    let mut done = vec![false; n];
    let mut settled = Vec::new();
    dist[source] = Some(0.0);

    loop {
        let mut best: Option<(usize, f64)> = None;
        for u in 0..n {
            if done[u] {
                continue;
            }
            if let Some(d) = dist[u] {
                if best.map_or(true, |(_, b)| d < b) {
                    best = Some((u, d));
                }
            }
        }
        let Some((u, d)) = best else {
            break;
        };
        done[u] = true;
        settled.push((u, d));
        if u == target {
            break;
        }
        for &(v, weight) in &view.out[u] {
            if done[v] {
                continue;
            }
            let candidate = d + weight;
            if dist[v].map_or(true, |current| candidate < current) {
                dist[v] = Some(candidate);
                prev[v] = Some(u);
            }
        }
    }

    let total = dist[target].filter(|_| done[target])?;
    let mut vertices = vec![target];
    let mut current = target;
    while let Some(p) = prev[current] {
        vertices.push(p);
        current = p;
    }
    vertices.reverse();
    Some(ShortestPath {
        vertices,
        total,
        settled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(n: usize, directed: bool, edges: &[(usize, usize, f64)]) -> AdjacencyView {
        let mut out = vec![Vec::new(); n];
        let mut inc = vec![Vec::new(); n];
        for &(u, v, w) in edges {
            out[u].push((v, w));
            if directed {
                inc[v].push(u);
            } else {
                out[v].push((u, w));
            }
        }
        AdjacencyView { directed, out, inc }
    }

    #[test]
    fn test_undirected_cycle() {
        let path = view(3, false, &[(0, 1, 1.0), (1, 2, 1.0)]);
        assert!(!has_cycle(&path));
        let triangle = view(3, false, &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]);
        assert!(has_cycle(&triangle));
    }

    #[test]
    fn test_directed_cycle_and_topo() {
        let chain = view(3, true, &[(0, 1, 1.0), (1, 2, 1.0)]);
        assert!(!has_cycle(&chain));
        assert_eq!(topological_order(&chain), vec![0, 1, 2]);

        let ring = view(3, true, &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]);
        assert!(has_cycle(&ring));
        assert!(topological_order(&ring).is_empty());
    }

    #[test]
    fn test_diamond_is_not_a_directed_cycle() {
        let diamond = view(4, true, &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)]);
        assert!(!has_cycle(&diamond));
        assert_eq!(topological_order(&diamond), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_strong_connectivity() {
        let ring = view(3, true, &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]);
        assert!(is_strongly_connected(&ring));
        let chain = view(3, true, &[(0, 1, 1.0), (1, 2, 1.0)]);
        assert!(!is_strongly_connected(&chain));
        assert!(is_strongly_connected(&view(1, true, &[])));
        assert!(is_strongly_connected(&view(0, true, &[])));
    }

    #[test]
    fn test_weak_connectivity_for_directed() {
        let chain = view(3, true, &[(0, 1, 1.0), (2, 1, 1.0)]);
        assert!(is_connected(&chain));
        assert!(!is_connected(&view(2, true, &[])));
    }

    #[test]
    fn test_dijkstra_prefers_lighter_path() {
        let g = view(4, false, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, 5.0), (2, 3, 1.0)]);
        let result = dijkstra(&g, 0, 3).unwrap();
        assert_eq!(result.vertices, vec![0, 1, 2, 3]);
        assert_eq!(result.total, 3.0);
    }

    #[test]
    fn test_dijkstra_unreachable() {
        let g = view(3, true, &[(0, 1, 1.0)]);
        assert!(dijkstra(&g, 0, 2).is_none());
        assert!(dijkstra(&g, 1, 0).is_none());
    }

    #[test]
    fn test_traversal_orders() {
        let g = view(5, false, &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 4, 1.0)]);
        let dfs: Vec<usize> = dfs_order(&g, 0).into_iter().map(|(v, _)| v).collect();
        assert_eq!(dfs, vec![0, 1, 3, 2, 4]);
        let bfs: Vec<usize> = bfs_order(&g, 0).into_iter().map(|(v, _)| v).collect();
        assert_eq!(bfs, vec![0, 1, 2, 3, 4]);
    }
}
