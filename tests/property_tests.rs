//! Property tests for structural invariants under random operation sequences

use proptest::prelude::*;
use structty::graph::{Graph, GraphOp};
use structty::script::extract;
use structty::structures::bst::{BinarySearchTree, TraversalOrder, TreeOp};
use structty::structures::linked_list::{LinkedList, ListOp};
use structty::structures::stack::{Stack, StackOp};
use structty::trace::StructureKind;
use structty::value::Value;

/// Script lines stitched from call-shaped fragments, quotes and brackets
fn script_text() -> impl Strategy<Value = String> {
    let fragment = prop::sample::select(vec![
        "s = Stack()",
        "g = Graph()",
        "s.push(",
        "s.pop(",
        "q.enqueue(",
        "g.add_edge(",
        "print(",
        "x.",
        "'",
        "\"",
        "\\",
        "(",
        ")",
        "[",
        "]",
        ",",
        "=",
        "#",
        "//",
        "1",
        "a",
        "é",
        " ",
    ]);
    let line = prop::collection::vec(fragment, 0..8).prop_map(|parts| parts.concat());
    prop::collection::vec(line, 0..10).prop_map(|lines| lines.join("\n"))
}

fn list_op() -> impl Strategy<Value = ListOp> {
    let value = (0i64..20).prop_map(Value::from);
    prop_oneof![
        value.clone().prop_map(ListOp::InsertFront),
        value.clone().prop_map(ListOp::InsertBack),
        (-1i64..6, value.clone()).prop_map(|(position, value)| ListOp::InsertAt { position, value }),
        (-1i64..6, value.clone())
            .prop_map(|(position, value)| ListOp::InsertBefore { position, value }),
        (-1i64..6, value.clone()).prop_map(|(position, value)| ListOp::InsertAfter { position, value }),
        value.prop_map(ListOp::DeleteValue),
        Just(ListOp::DeleteFront),
        Just(ListOp::DeleteBack),
        (-1i64..6).prop_map(ListOp::DeleteAt),
        Just(ListOp::Reverse),
    ]
}

proptest! {
    #[test]
    fn bst_keeps_search_order(
        inserts in prop::collection::vec(-50i64..50, 0..40),
        deletes in prop::collection::vec(-50i64..50, 0..20),
    ) {
        let mut tree = BinarySearchTree::new();
        for v in &inserts {
            tree.apply(&TreeOp::Insert(Value::from(*v)));
        }
        for v in &deletes {
            tree.apply(&TreeOp::Delete(Value::from(*v)));
            prop_assert!(tree.check_order().is_ok());
            prop_assert!(!tree.contains(&Value::from(*v)));
        }

        let inorder = tree.values(TraversalOrder::Inorder);
        prop_assert!(inorder.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(inorder.len(), tree.len());
    }

    #[test]
    fn doubly_linked_list_links_stay_consistent(ops in prop::collection::vec(list_op(), 0..40)) {
        let mut list = LinkedList::doubly();
        for op in &ops {
            let before = list.len();
            let log = list.apply(op);
            prop_assert!(!log.is_empty());
            prop_assert!(list.check_links().is_ok(), "{:?}", list.check_links());
            prop_assert!(list.len().abs_diff(before) <= 1);
        }
        prop_assert_eq!(list.stats().size, list.values().len());
    }

    #[test]
    fn singly_linked_list_matches_a_vec_model(ops in prop::collection::vec(list_op(), 0..40)) {
        let mut list = LinkedList::singly();
        let mut model: Vec<Value> = Vec::new();
        for op in &ops {
            list.apply(op);
            match op {
                ListOp::InsertFront(v) => model.insert(0, v.clone()),
                ListOp::InsertBack(v) => model.push(v.clone()),
                ListOp::InsertAt { position, value } => {
                    if (0..=model.len() as i64).contains(position) {
                        model.insert(*position as usize, value.clone());
                    }
                }
                ListOp::DeleteValue(v) => {
                    if let Some(i) = model.iter().position(|m| m == v) {
                        model.remove(i);
                    }
                }
                ListOp::DeleteFront => {
                    if !model.is_empty() {
                        model.remove(0);
                    }
                }
                ListOp::DeleteBack => {
                    model.pop();
                }
                ListOp::DeleteAt(position) => {
                    if (0..model.len() as i64).contains(position) {
                        model.remove(*position as usize);
                    }
                }
                ListOp::Reverse => model.reverse(),
                // Before/after are doubly-only and leave a singly list alone
                _ => {}
            }
            prop_assert_eq!(list.values(), model.clone());
        }
    }

    #[test]
    fn stack_pops_in_reverse_push_order(values in prop::collection::vec(0i64..100, 1..20)) {
        let mut stack = Stack::new();
        for v in &values {
            stack.apply(&StackOp::Push(Value::from(*v)));
        }
        for v in values.iter().rev() {
            prop_assert_eq!(stack.top(), Some(&Value::from(*v)));
            stack.apply(&StackOp::Pop);
        }
        prop_assert!(stack.is_empty());
    }

    #[test]
    fn graph_adjacency_mirrors_edges(
        edges in prop::collection::vec((0u8..6, 0u8..6), 0..20),
        removed in prop::collection::vec(0u8..6, 0..3),
        directed in any::<bool>(),
    ) {
        let mut graph = Graph::new(directed);
        for v in 0..6i64 {
            graph.apply(&GraphOp::AddVertex(Value::from(v)));
        }
        for (from, to) in &edges {
            graph.apply(&GraphOp::AddEdge {
                from: Value::from(i64::from(*from)),
                to: Value::from(i64::from(*to)),
                weight: None,
            });
        }
        for v in &removed {
            graph.apply(&GraphOp::RemoveVertex(Value::from(i64::from(*v))));
        }
        prop_assert!(graph.check_adjacency().is_ok(), "{:?}", graph.check_adjacency());
        prop_assert_eq!(graph.stats().edge_count, graph.edges().len());
    }

    #[test]
    fn extract_never_panics_on_arbitrary_text(script in ".*") {
        let extraction = extract(&script, StructureKind::Stack);
        prop_assert_eq!(extraction.is_valid, extraction.errors.is_empty());
        prop_assert!(extraction.is_valid || extraction.operations.is_empty());
    }

    #[test]
    fn extract_reports_faults_consistently(script in script_text()) {
        let extraction = extract(&script, StructureKind::Stack);
        prop_assert_eq!(extraction.is_valid, extraction.errors.is_empty());
        prop_assert!(extraction.is_valid || extraction.operations.is_empty());
        let line_count = script.lines().count();
        for op in &extraction.operations {
            prop_assert!(op.line >= 1 && op.line <= line_count);
        }
    }
}
