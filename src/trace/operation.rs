//! Untyped operation requests and their typed resolution
//!
//! An [`OperationRequest`] is what arrives from outside: a loose bag of
//! optional arguments keyed by an operation-type string. Both single-operation
//! callers and script extraction produce one. [`Operation::resolve`] is the
//! only place a request becomes a typed [`Operation`], so argument checking
//! happens once for both entry points.
//!
//! On the wire a single operation arrives wrapped in a
//! [`SingleOperationRequest`]:
//!
//! ```json
//! { "kind": "stack", "operation": { "type": "push", "value": 10 } }
//! ```

use super::errors::ResolveError;
use super::StructureKind;
use crate::graph::GraphOp;
use crate::structures::bst::{TraversalOrder, TreeOp};
use crate::structures::linked_list::ListOp;
use crate::structures::queue::QueueOp;
use crate::structures::stack::StackOp;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar request argument, accepted as either a JSON number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestArg {
    Number(f64),
    Text(String),
}

impl RequestArg {
    pub fn text(&self) -> String {
        self.to_string()
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            RequestArg::Number(n) => Some(*n),
            RequestArg::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl fmt::Display for RequestArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestArg::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            RequestArg::Number(n) => write!(f, "{}", n),
            RequestArg::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for RequestArg {
    fn from(text: &str) -> Self {
        RequestArg::Text(text.to_string())
    }
}

impl From<String> for RequestArg {
    fn from(text: String) -> Self {
        RequestArg::Text(text)
    }
}

impl From<i64> for RequestArg {
    fn from(n: i64) -> Self {
        RequestArg::Number(n as f64)
    }
}

impl From<f64> for RequestArg {
    fn from(n: f64) -> Self {
        RequestArg::Number(n)
    }
}

/// Operation type plus optional arguments, as received from a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    #[serde(rename = "type", alias = "opType")]
    pub op_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RequestArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<RequestArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_vertex: Option<RequestArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_vertex: Option<RequestArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_vertex: Option<RequestArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_vertex: Option<RequestArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<RequestArg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

/// One operation addressed to an instance of `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleOperationRequest {
    pub kind: StructureKind,
    pub operation: OperationRequest,
}

impl OperationRequest {
    pub fn new(op_type: impl Into<String>) -> Self {
        OperationRequest {
            op_type: op_type.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<RequestArg>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<RequestArg>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_edge(mut self, from: impl Into<RequestArg>, to: impl Into<RequestArg>) -> Self {
        self.from_vertex = Some(from.into());
        self.to_vertex = Some(to.into());
        self
    }

    pub fn with_weight(mut self, weight: impl Into<RequestArg>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    pub fn with_start(mut self, start: impl Into<RequestArg>) -> Self {
        self.start_vertex = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: impl Into<RequestArg>) -> Self {
        self.end_vertex = Some(end.into());
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    /// `op_type` lowercased with separators removed, so `insertFront`,
    /// `insert_front` and `InsertFront` all name the same operation
    fn normalized_type(&self) -> String {
        self.op_type
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_ascii_lowercase()
    }

    fn missing(&self, field: &'static str) -> ResolveError {
        ResolveError::MissingArgument {
            op_type: self.op_type.clone(),
            field,
        }
    }

    fn value(&self) -> Result<Value, ResolveError> {
        self.value
            .as_ref()
            .map(|arg| Value::new(arg.text()))
            .ok_or_else(|| self.missing("value"))
    }

    fn position(&self) -> Result<i64, ResolveError> {
        let arg = self.position.as_ref().ok_or_else(|| self.missing("position"))?;
        arg.as_number()
            .filter(|n| n.fract() == 0.0 && n.is_finite())
            .map(|n| n as i64)
            .ok_or_else(|| ResolveError::InvalidNumber {
                field: "position",
                text: arg.text(),
            })
    }

    /// First present candidate, as a vertex label; `field` names the argument
    /// in the error when none is present
    fn vertex(
        &self,
        field: &'static str,
        candidates: [&Option<RequestArg>; 2],
    ) -> Result<Value, ResolveError> {
        candidates
            .into_iter()
            .flatten()
            .next()
            .map(|arg| Value::new(arg.text()))
            .ok_or_else(|| self.missing(field))
    }

    fn weight(&self) -> Result<Option<f64>, ResolveError> {
        match &self.weight {
            None => Ok(None),
            Some(arg) => arg
                .as_number()
                .map(Some)
                .ok_or_else(|| ResolveError::InvalidNumber {
                    field: "weight",
                    text: arg.text(),
                }),
        }
    }

    fn order(&self) -> Result<TraversalOrder, ResolveError> {
        match self.order.as_deref() {
            None => Ok(TraversalOrder::Inorder),
            Some(name) => {
                TraversalOrder::from_name(name).ok_or_else(|| ResolveError::UnknownOrder(name.into()))
            }
        }
    }
}

/// A typed operation for one structure family
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    List(ListOp),
    Stack(StackOp),
    Queue(QueueOp),
    Tree(TreeOp),
    Graph(GraphOp),
}

impl Operation {
    pub fn family(&self) -> &'static str {
        match self {
            Operation::List(_) => "linked list",
            Operation::Stack(_) => "stack",
            Operation::Queue(_) => "queue",
            Operation::Tree(_) => "tree",
            Operation::Graph(_) => "graph",
        }
    }

    /// Build the typed operation `request` names for a structure of `kind`
    pub fn resolve(kind: StructureKind, request: &OperationRequest) -> Result<Self, ResolveError> {
        let op_type = request.normalized_type();
        let unknown = || ResolveError::UnknownOperation {
            kind,
            op_type: request.op_type.clone(),
        };

        let op = match kind {
            StructureKind::SinglyLinkedList | StructureKind::DoublyLinkedList => {
                Operation::List(match op_type.as_str() {
                    "insertfront" | "insertbeginning" | "insertatbeginning" | "prepend" => {
                        ListOp::InsertFront(request.value()?)
                    }
                    "insertback" | "insertend" | "insertatend" | "append" => {
                        ListOp::InsertBack(request.value()?)
                    }
                    "insertat" | "insertatposition" | "insert" => ListOp::InsertAt {
                        position: request.position()?,
                        value: request.value()?,
                    },
                    "insertbefore" => ListOp::InsertBefore {
                        position: request.position()?,
                        value: request.value()?,
                    },
                    "insertafter" => ListOp::InsertAfter {
                        position: request.position()?,
                        value: request.value()?,
                    },
                    "deletevalue" | "delete" | "remove" => ListOp::DeleteValue(request.value()?),
                    "deletefront" | "deletebeginning" | "deletefromfront" | "popfront" => {
                        ListOp::DeleteFront
                    }
                    "deleteback" | "deleteend" | "deletefromend" | "popback" => ListOp::DeleteBack,
                    "deleteat" | "deleteatposition" | "removeat" => {
                        ListOp::DeleteAt(request.position()?)
                    }
                    "search" | "find" => ListOp::Search(request.value()?),
                    "traverse" | "traverseforward" => ListOp::Traverse,
                    "traversebackward" | "traversebackwards" | "traversereverse" => {
                        ListOp::TraverseBackward
                    }
                    "reverse" => ListOp::Reverse,
                    "clear" => ListOp::Clear,
                    _ => return Err(unknown()),
                })
            }
            StructureKind::Stack => Operation::Stack(match op_type.as_str() {
                "push" => StackOp::Push(request.value()?),
                "pop" => StackOp::Pop,
                "peek" | "top" => StackOp::Peek,
                "isempty" => StackOp::IsEmpty,
                "size" => StackOp::Size,
                "clear" => StackOp::Clear,
                _ => return Err(unknown()),
            }),
            StructureKind::Queue => Operation::Queue(match op_type.as_str() {
                "enqueue" => QueueOp::Enqueue(request.value()?),
                "dequeue" => QueueOp::Dequeue,
                "front" | "peek" => QueueOp::Front,
                "rear" | "back" => QueueOp::Rear,
                "isempty" => QueueOp::IsEmpty,
                "size" => QueueOp::Size,
                "clear" => QueueOp::Clear,
                _ => return Err(unknown()),
            }),
            StructureKind::BinarySearchTree => Operation::Tree(match op_type.as_str() {
                "insert" => TreeOp::Insert(request.value()?),
                "delete" | "remove" => TreeOp::Delete(request.value()?),
                "search" | "find" | "contains" => TreeOp::Search(request.value()?),
                "traverse" => TreeOp::Traverse(request.order()?),
                "inorder" => TreeOp::Traverse(TraversalOrder::Inorder),
                "preorder" => TreeOp::Traverse(TraversalOrder::Preorder),
                "postorder" => TreeOp::Traverse(TraversalOrder::Postorder),
                "min" | "findmin" => TreeOp::Min,
                "max" | "findmax" => TreeOp::Max,
                "height" => TreeOp::Height,
                "clear" => TreeOp::Clear,
                _ => return Err(unknown()),
            }),
            StructureKind::DirectedGraph | StructureKind::UndirectedGraph => {
                Operation::Graph(match op_type.as_str() {
                    "addvertex" => GraphOp::AddVertex(request.value()?),
                    "addedge" => GraphOp::AddEdge {
                        from: request.vertex("fromVertex", [&request.from_vertex, &None])?,
                        to: request.vertex("toVertex", [&request.to_vertex, &None])?,
                        weight: request.weight()?,
                    },
                    "removevertex" => GraphOp::RemoveVertex(request.value()?),
                    "removeedge" => GraphOp::RemoveEdge {
                        from: request.vertex("fromVertex", [&request.from_vertex, &None])?,
                        to: request.vertex("toVertex", [&request.to_vertex, &None])?,
                    },
                    "dfs" | "traversedfs" => GraphOp::Dfs(
                        request.vertex("startVertex", [&request.start_vertex, &request.value])?,
                    ),
                    "bfs" | "traversebfs" => GraphOp::Bfs(
                        request.vertex("startVertex", [&request.start_vertex, &request.value])?,
                    ),
                    "shortestpath" | "dijkstra" => GraphOp::ShortestPath {
                        start: request
                            .vertex("startVertex", [&request.start_vertex, &request.from_vertex])?,
                        end: request.vertex("endVertex", [&request.end_vertex, &request.to_vertex])?,
                    },
                    "topologicalsort" | "toposort" if kind == StructureKind::DirectedGraph => {
                        GraphOp::TopologicalSort
                    }
                    "hascycle" => GraphOp::HasCycle,
                    "isconnected" => GraphOp::IsConnected,
                    "isstronglyconnected" if kind == StructureKind::DirectedGraph => {
                        GraphOp::IsStronglyConnected
                    }
                    "clear" => GraphOp::Clear,
                    _ => return Err(unknown()),
                })
            }
        };
        Ok(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_spellings_are_equivalent() {
        let kind = StructureKind::SinglyLinkedList;
        for spelling in ["insertFront", "insert_front", "InsertFront", "prepend"] {
            let op = Operation::resolve(kind, &OperationRequest::new(spelling).with_value("7")).unwrap();
            assert_eq!(op, Operation::List(ListOp::InsertFront("7".into())));
        }
    }

    #[test]
    fn test_missing_and_invalid_arguments() {
        let err = Operation::resolve(StructureKind::Stack, &OperationRequest::new("push")).unwrap_err();
        assert!(matches!(err, ResolveError::MissingArgument { field: "value", .. }));

        let err = Operation::resolve(
            StructureKind::DoublyLinkedList,
            &OperationRequest::new("insert_at").with_position("two").with_value("x"),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::InvalidNumber { field: "position", .. }));

        let err = Operation::resolve(StructureKind::Queue, &OperationRequest::new("push")).unwrap_err();
        assert_eq!(err.to_string(), "'push' is not an operation of queue");
    }

    #[test]
    fn test_topological_sort_is_directed_only() {
        let request = OperationRequest::new("topological_sort");
        assert!(Operation::resolve(StructureKind::DirectedGraph, &request).is_ok());
        assert!(Operation::resolve(StructureKind::UndirectedGraph, &request).is_err());
    }

    #[test]
    fn test_edge_request_from_json() {
        let request: OperationRequest = serde_json::from_str(
            r#"{"opType": "addEdge", "fromVertex": "A", "toVertex": "B", "weight": 2.5}"#,
        )
        .unwrap();
        let op = Operation::resolve(StructureKind::UndirectedGraph, &request).unwrap();
        assert_eq!(
            op,
            Operation::Graph(GraphOp::AddEdge {
                from: "A".into(),
                to: "B".into(),
                weight: Some(2.5),
            })
        );
    }

    #[test]
    fn test_numeric_value_keeps_integer_text() {
        let request: OperationRequest =
            serde_json::from_str(r#"{"opType": "push", "value": 10}"#).unwrap();
        let op = Operation::resolve(StructureKind::Stack, &request).unwrap();
        assert_eq!(op, Operation::Stack(StackOp::Push(Value::new("10"))));
    }

    #[test]
    fn test_wire_request_uses_type_field() {
        let request: OperationRequest =
            serde_json::from_str(r#"{"type": "insertAt", "value": "x", "position": 1}"#).unwrap();
        assert_eq!(request.op_type, "insertAt");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "insertAt");
        assert!(json.get("opType").is_none());
    }

    #[test]
    fn test_single_operation_envelope() {
        let envelope: SingleOperationRequest = serde_json::from_str(
            r#"{"kind": "doublyLinkedList", "operation": {"type": "insertFront", "value": 3}}"#,
        )
        .unwrap();
        assert_eq!(envelope.kind, StructureKind::DoublyLinkedList);
        let op = Operation::resolve(envelope.kind, &envelope.operation).unwrap();
        assert_eq!(op, Operation::List(ListOp::InsertFront("3".into())));

        let bad = serde_json::from_str::<SingleOperationRequest>(
            r#"{"kind": "heap", "operation": {"type": "push", "value": 1}}"#,
        );
        assert!(bad.is_err());
    }
}
