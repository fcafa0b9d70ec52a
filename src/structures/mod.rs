//! Linear and tree structure state machines
//!
//! Each structure owns its state and exposes a single `apply` entry point that
//! mutates the state in place and returns the [`StepLog`] describing what
//! happened:
//!
//! - [`linked_list`]: singly and doubly linked lists over a node arena
//! - [`stack`]: last-in-first-out sequence
//! - [`queue`]: first-in-first-out sequence
//! - [`bst`]: binary search tree with recursive insert/delete/traverse
//!
//! # No-op Discipline
//!
//! `apply` never fails. Operations that cannot be carried out (pop from an
//! empty stack, delete a missing value, insert at an invalid position) leave
//! the state untouched and return exactly one explanatory step.
//!
//! # Derived Statistics
//!
//! Every structure caches its summary statistics (size, head/tail, min/max,
//! height). The cache is rebuilt from the structural state at the end of every
//! `apply`, never patched incrementally.
//!
//! [`StepLog`]: crate::trace::StepLog

pub mod bst;
pub mod linked_list;
pub mod queue;
pub mod stack;

use serde::Serialize;
use std::fmt;

/// Stable identity of a node inside one structure instance.
///
/// Ids are handed out in allocation order and never reused within an
/// instance, so the rendering layer can diff snapshots by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Convert a requested position to an index in `0..=upper_inclusive`
pub(crate) fn position_in_range(position: i64, upper_inclusive: usize) -> Option<usize> {
    usize::try_from(position)
        .ok()
        .filter(|&p| p <= upper_inclusive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_in_range() {
        assert_eq!(position_in_range(0, 0), Some(0));
        assert_eq!(position_in_range(3, 3), Some(3));
        assert_eq!(position_in_range(4, 3), None);
        assert_eq!(position_in_range(-1, 3), None);
    }
}
