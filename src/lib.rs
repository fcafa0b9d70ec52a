//! # Introduction
//!
//! structty simulates data-structure operations and records a human-readable
//! trace of every step they take. Traces come either from single operation
//! requests against a live structure, or from replaying a small script of
//! declarations and method calls. A terminal front end steps backward and
//! forward through a replay, built with [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Script → Extraction → Operation descriptors → Trace engine → Frames → TUI
//! ```
//!
//! 1. [`script`]: pattern-matches declarations and calls into
//!    [`script::OperationDescriptor`]s.
//! 2. [`trace`]: resolves requests into typed operations, applies them to
//!    named instances and collects [`trace::ExecutionStep`]s.
//! 3. [`structures`] and [`graph`]: the state machines themselves, namely
//!    linked lists, stack, queue, binary search tree, and graphs.
//! 4. [`snapshot`]: memory-bounded history of per-operation frames.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Single operations
//!
//! ```
//! use structty::trace::{Instance, OperationRequest, StructureKind, TraceEngine};
//!
//! let engine = TraceEngine::new();
//! let mut queue = Instance::new(StructureKind::Queue);
//! let steps = engine.apply_request(&mut queue, &OperationRequest::new("enqueue").with_value("a"));
//! assert!(!steps.is_empty());
//! assert_eq!(queue.len(), 1);
//! ```

pub mod config;
pub mod graph;
pub mod script;
pub mod snapshot;
pub mod structures;
pub mod trace;
pub mod ui;
pub mod value;
