// Integration tests for script replay and single-operation tracing

use structty::graph::{Graph, GraphOp};
use structty::structures::bst::TraversalOrder;
use structty::trace::{Instance, OperationRequest, StructureKind, TraceEngine};
use structty::value::Value;

fn strings(values: &[Value]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_stack_script_replay() {
    let script = "s = ArrayStack()\ns.push(10)\ns.push(20)\ns.pop()\n";
    let result = TraceEngine::new()
        .run_script(script, StructureKind::Queue)
        .expect("script should extract");

    assert_eq!(result.all_instances.names(), ["s"]);
    assert_eq!(result.primary_name.as_deref(), Some("s"));
    match result.primary_state {
        Some(Instance::Stack(ref stack)) => assert_eq!(stack.elements(), [Value::from("10")]),
        ref other => panic!("expected a stack, got {:?}", other),
    }

    // Start frame plus one per call
    assert_eq!(result.frames.len(), 4);
    let popped: Vec<_> = result.steps.iter().filter(|s| s.line == 4).collect();
    assert!(!popped.is_empty());
    assert!(popped.iter().all(|s| s.instance == "s"));
}

#[test]
fn test_pops_used_as_values_are_replayed() {
    let script = "\
s = Stack()
s.push(1)
s.push(2)
top = s.pop()
print(s.pop())
";
    let result = TraceEngine::new()
        .run_script(script, StructureKind::Stack)
        .expect("script should extract");

    match result.primary_state {
        Some(Instance::Stack(ref stack)) => assert!(stack.is_empty()),
        ref other => panic!("expected a stack, got {:?}", other),
    }
    assert_eq!(result.frames.len(), 5);
    assert!(result.steps.iter().any(|s| s.line == 4));
    assert!(result.steps.iter().any(|s| s.line == 5));
}

#[test]
fn test_bst_inorder_after_script() {
    let script = "t = BST()\nt.insert(5)\nt.insert(3)\nt.insert(8)\nt.insert(1)\nt.insert(4)\n";
    let result = TraceEngine::new()
        .run_script(script, StructureKind::Stack)
        .expect("script should extract");

    let Some(Instance::Tree(tree)) = result.all_instances.get("t") else {
        panic!("t should be a tree");
    };
    assert_eq!(strings(&tree.values(TraversalOrder::Inorder)), ["1", "3", "4", "5", "8"]);
    assert_eq!(strings(&tree.values(TraversalOrder::Preorder)), ["5", "3", "1", "4", "8"]);
    assert!(tree.check_order().is_ok());
}

#[test]
fn test_numeric_values_order_numerically() {
    let mut tree = Instance::new(StructureKind::BinarySearchTree);
    let engine = TraceEngine::new();
    for v in ["10", "9", "100"] {
        engine.apply_request(&mut tree, &OperationRequest::new("insert").with_value(v));
    }
    let Instance::Tree(tree) = tree else {
        panic!("kind changed");
    };
    assert_eq!(strings(&tree.values(TraversalOrder::Inorder)), ["9", "10", "100"]);
}

#[test]
fn test_directed_graph_topology_and_cycle() {
    let script = "\
g = DirectedGraph()
g.add_vertex('A')
g.add_vertex('B')
g.add_vertex('C')
g.add_edge('A', 'B')
g.add_edge('B', 'C')
g.topological_sort()
g.add_edge('C', 'A')
g.has_cycle()
";
    let result = TraceEngine::new()
        .run_script(script, StructureKind::Stack)
        .expect("script should extract");

    let topo: Vec<_> = result.steps.iter().filter(|s| s.line == 7).collect();
    let last = topo.last().expect("topological sort should produce steps");
    assert_eq!(
        last.step.path.as_deref(),
        Some(&["A".to_string(), "B".to_string(), "C".to_string()][..])
    );

    let Some(Instance::Graph(graph)) = result.all_instances.get("g") else {
        panic!("g should be a graph");
    };
    assert!(graph.stats().has_cycle);
    assert!(graph.topological_sort().is_empty());
}

#[test]
fn test_weighted_shortest_path() {
    let mut graph = Graph::undirected();
    for v in ["A", "B", "C", "D"] {
        graph.apply(&GraphOp::AddVertex(Value::from(v)));
    }
    for (from, to, weight) in [("A", "B", 1.0), ("B", "C", 1.0), ("C", "D", 1.0), ("A", "D", 5.0)] {
        graph.apply(&GraphOp::AddEdge {
            from: Value::from(from),
            to: Value::from(to),
            weight: Some(weight),
        });
    }

    let (path, total) = graph
        .shortest_path(&Value::from("A"), &Value::from("D"))
        .expect("D is reachable");
    assert_eq!(strings(&path), ["A", "B", "C", "D"]);
    assert_eq!(total, 3.0);

    let log = graph.apply(&GraphOp::ShortestPath {
        start: Value::from("A"),
        end: Value::from("D"),
    });
    let summary = log.last().expect("steps");
    assert_eq!(summary.path.as_ref().map(|p| p.len()), Some(4));
}

#[test]
fn test_strong_connectivity_breaks_on_edge_removal() {
    let engine = TraceEngine::new();
    let mut graph = Instance::new(StructureKind::DirectedGraph);
    for v in ["A", "B", "C"] {
        engine.apply_request(&mut graph, &OperationRequest::new("add_vertex").with_value(v));
    }
    for (from, to) in [("A", "B"), ("B", "C"), ("C", "A")] {
        engine.apply_request(&mut graph, &OperationRequest::new("add_edge").with_edge(from, to));
    }

    let check = OperationRequest::new("is_strongly_connected");
    let before = engine.apply_request(&mut graph, &check);
    assert!(before.last().unwrap().technical_message.ends_with("true"));

    engine.apply_request(&mut graph, &OperationRequest::new("remove_edge").with_edge("C", "A"));
    let after = engine.apply_request(&mut graph, &check);
    assert!(after.last().unwrap().technical_message.ends_with("false"));
}

#[test]
fn test_deleting_absent_value_leaves_state_unchanged() {
    let engine = TraceEngine::new();
    let mut list = Instance::new(StructureKind::SinglyLinkedList);
    for v in ["1", "2"] {
        engine.apply_request(&mut list, &OperationRequest::new("insert_back").with_value(v));
    }
    let before = list.clone();

    let result = engine.execute(
        StructureKind::SinglyLinkedList,
        list,
        &OperationRequest::new("delete_value").with_value("9"),
    );
    assert_eq!(result.steps.len(), 1);
    assert_eq!(result.new_state, before);
}

#[test]
fn test_program_result_serializes_to_json() {
    let script = "q = Queue()\nq.enqueue('a')\nq.enqueue('b')\nq.dequeue()\n";
    let result = TraceEngine::new()
        .run_script(script, StructureKind::Stack)
        .expect("script should extract");

    let json = serde_json::to_value(&result).expect("serializable");
    assert_eq!(json["primaryName"], "q");
    assert_eq!(json["primaryState"]["structure"], "queue");
    assert!(json["allInstances"]["q"].is_object());

    let steps = json["steps"].as_array().expect("steps array");
    assert_eq!(steps.len(), result.steps.len());
    assert!(steps.iter().all(|s| s["humanMessage"].is_string()));
    assert!(steps.iter().all(|s| s["line"].is_u64()));
}

#[test]
fn test_rejected_script_reports_every_fault() {
    let err = TraceEngine::new()
        .run_script("s = Stack()\ns.push('x)\ns.push((1)\n", StructureKind::Stack)
        .expect_err("malformed calls should be rejected");
    assert_eq!(err.errors.len(), 2);
}
