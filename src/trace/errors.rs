//! Error types for the trace layer
//!
//! A [`ResolveError`] never escapes the engine as `Err`: the engine turns it
//! into a single no-op step on the affected instance.

use super::StructureKind;
use thiserror::Error;

/// Failure converting an untyped request into a typed operation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("'{op_type}' is not an operation of {}", .kind.name())]
    UnknownOperation { kind: StructureKind, op_type: String },

    #[error("'{op_type}' needs a {field} argument")]
    MissingArgument {
        op_type: String,
        field: &'static str,
    },

    #[error("'{text}' is not a valid {field}")]
    InvalidNumber { field: &'static str, text: String },

    #[error("'{0}' is not a traversal order (use inorder, preorder or postorder)")]
    UnknownOrder(String),
}

/// A script whose extraction found faults; nothing was replayed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("script rejected: {}", .errors.join("; "))]
pub struct ScriptRejected {
    pub errors: Vec<String>,
}
