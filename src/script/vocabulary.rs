//! Method vocabulary per structure kind
//!
//! Each recognized method name maps to the operation type it requests and the
//! order its positional arguments fill the request. Lookup ignores case and
//! `_`, so `insertFront`, `insert_front` and `InsertFront` are the same
//! method.

use crate::trace::{OperationRequest, StructureKind};

/// How positional arguments fill an [`OperationRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    NoArgs,
    /// `(value)`
    Value,
    /// `(position)`
    Position,
    /// `(position, value)`, like Python's `list.insert`
    PositionValue,
    /// `(order?)`
    Order,
    /// `(start)`
    Start,
    /// `(from, to, weight?)`
    Edge,
    /// `(from, to)`
    EdgeEnds,
    /// `(start, end)`
    Path,
}

/// A recognized method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Method {
    pub op_type: &'static str,
    pub signature: Signature,
}

const fn method(op_type: &'static str, signature: Signature) -> Method {
    Method { op_type, signature }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|&c| c != '_')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// The method `name` means on a structure of `kind`, if any
pub fn lookup(kind: StructureKind, name: &str) -> Option<Method> {
    use Signature::*;
    let key = normalize(name);
    let found = match kind {
        StructureKind::SinglyLinkedList | StructureKind::DoublyLinkedList => match key.as_str() {
            "insertfront" | "insertatbeginning" | "insertbeginning" | "prepend" | "pushfront"
            | "addfirst" => method("insert_front", Value),
            "insertback" | "insertatend" | "insertend" | "append" | "pushback" | "addlast"
            | "add" => method("insert_back", Value),
            "insert" | "insertat" | "insertatposition" => method("insert_at", PositionValue),
            "insertbefore" => method("insert_before", PositionValue),
            "insertafter" => method("insert_after", PositionValue),
            "delete" | "remove" | "deletevalue" | "removevalue" => method("delete_value", Value),
            "deletefront" | "deleteatbeginning" | "deletebeginning" | "popfront"
            | "removefirst" => method("delete_front", NoArgs),
            "deleteback" | "deleteatend" | "deleteend" | "popback" | "removelast" => {
                method("delete_back", NoArgs)
            }
            "deleteat" | "deleteatposition" | "removeat" => method("delete_at", Position),
            "search" | "find" | "contains" | "indexof" => method("search", Value),
            "traverse" | "display" | "print" | "traverseforward" => method("traverse", NoArgs),
            "traversebackward" | "traversebackwards" | "traversereverse" | "displaybackward" => {
                method("traverse_backward", NoArgs)
            }
            "reverse" => method("reverse", NoArgs),
            "clear" => method("clear", NoArgs),
            _ => return None,
        },
        StructureKind::Stack => match key.as_str() {
            "push" | "append" => method("push", Value),
            "pop" => method("pop", NoArgs),
            "peek" | "top" => method("peek", NoArgs),
            "isempty" | "empty" => method("is_empty", NoArgs),
            "size" | "len" | "length" => method("size", NoArgs),
            "clear" => method("clear", NoArgs),
            _ => return None,
        },
        StructureKind::Queue => match key.as_str() {
            "enqueue" | "offer" | "add" | "push" | "append" => method("enqueue", Value),
            "dequeue" | "poll" | "pop" | "popleft" => method("dequeue", NoArgs),
            "front" | "peek" | "first" => method("front", NoArgs),
            "rear" | "back" | "last" => method("rear", NoArgs),
            "isempty" | "empty" => method("is_empty", NoArgs),
            "size" | "len" | "length" => method("size", NoArgs),
            "clear" => method("clear", NoArgs),
            _ => return None,
        },
        StructureKind::BinarySearchTree => match key.as_str() {
            "insert" | "add" => method("insert", Value),
            "delete" | "remove" => method("delete", Value),
            "search" | "find" | "contains" => method("search", Value),
            "traverse" => method("traverse", Order),
            "inorder" | "inordertraversal" => method("inorder", NoArgs),
            "preorder" | "preordertraversal" => method("preorder", NoArgs),
            "postorder" | "postordertraversal" => method("postorder", NoArgs),
            "min" | "findmin" | "minimum" => method("min", NoArgs),
            "max" | "findmax" | "maximum" => method("max", NoArgs),
            "height" => method("height", NoArgs),
            "clear" => method("clear", NoArgs),
            _ => return None,
        },
        StructureKind::DirectedGraph | StructureKind::UndirectedGraph => match key.as_str() {
            "addvertex" | "addnode" => method("add_vertex", Value),
            "addedge" | "connect" => method("add_edge", Edge),
            "removevertex" | "removenode" => method("remove_vertex", Value),
            "removeedge" | "disconnect" => method("remove_edge", EdgeEnds),
            "dfs" | "traversedfs" | "depthfirst" => method("dfs", Start),
            "bfs" | "traversebfs" | "breadthfirst" => method("bfs", Start),
            "shortestpath" | "dijkstra" => method("shortest_path", Path),
            "topologicalsort" | "toposort" if kind == StructureKind::DirectedGraph => {
                method("topological_sort", NoArgs)
            }
            "hascycle" => method("has_cycle", NoArgs),
            "isconnected" => method("is_connected", NoArgs),
            "isstronglyconnected" if kind == StructureKind::DirectedGraph => {
                method("is_strongly_connected", NoArgs)
            }
            "clear" => method("clear", NoArgs),
            _ => return None,
        },
    };
    Some(found)
}

impl Method {
    /// Fill a request from positional arguments.
    ///
    /// Missing arguments are left unset; resolution reports them later as a
    /// no-op step on the instance. Extra arguments are ignored.
    pub fn request(&self, args: &[String]) -> OperationRequest {
        let mut request = OperationRequest::new(self.op_type);
        let arg = |i: usize| args.get(i).map(|a| a.as_str());
        match self.signature {
            Signature::NoArgs => {}
            Signature::Value => {
                if let Some(v) = arg(0) {
                    request = request.with_value(v);
                }
            }
            Signature::Position => {
                if let Some(p) = arg(0) {
                    request = request.with_position(p);
                }
            }
            Signature::PositionValue => {
                if let Some(p) = arg(0) {
                    request = request.with_position(p);
                }
                if let Some(v) = arg(1) {
                    request = request.with_value(v);
                }
            }
            Signature::Order => {
                if let Some(order) = arg(0) {
                    request = request.with_order(order);
                }
            }
            Signature::Start => {
                if let Some(start) = arg(0) {
                    request = request.with_start(start);
                }
            }
            Signature::Edge | Signature::EdgeEnds => {
                request.from_vertex = arg(0).map(Into::into);
                request.to_vertex = arg(1).map(Into::into);
                if self.signature == Signature::Edge {
                    request.weight = arg(2).map(Into::into);
                }
            }
            Signature::Path => {
                request.start_vertex = arg(0).map(Into::into);
                request.end_vertex = arg(1).map(Into::into);
            }
        }
        request
    }
}
