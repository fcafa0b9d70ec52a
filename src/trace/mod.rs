//! Trace orchestration
//!
//! This module ties the structures to their callers:
//! - [`operation`]: untyped [`OperationRequest`]s and their resolution into
//!   typed [`Operation`]s
//! - [`instance`]: [`StructureKind`], live [`Instance`]s and the ordered
//!   [`NamedInstanceTable`]
//! - [`step`]: [`ExecutionStep`] and the append-only [`StepLog`]
//! - [`engine`]: [`TraceEngine`], with single-operation and program modes
//! - [`errors`]: resolution and script rejection errors
//!
//! # Execution Model
//!
//! Everything is synchronous. An operation runs to completion, updating the
//! instance in place, and returns the full list of steps it produced. Program
//! mode replays extracted operations in file order and snapshots every
//! instance after each one, so a front end can step backward and forward.

pub mod engine;
pub mod errors;
pub mod instance;
pub mod operation;
pub mod step;

pub use engine::{OperationResult, ProgramResult, TraceEngine, TracedStep};
pub use errors::{ResolveError, ScriptRejected};
pub use instance::{Instance, NamedInstanceTable, StructureKind};
pub use operation::{Operation, OperationRequest, RequestArg, SingleOperationRequest};
pub use step::{ExecutionStep, StepLog};
