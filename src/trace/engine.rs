// Trace orchestration: single operations and whole-program replay

use super::errors::ScriptRejected;
use super::instance::{Instance, NamedInstanceTable, StructureKind};
use super::operation::{Operation, OperationRequest, SingleOperationRequest};
use super::step::{ExecutionStep, StepLog};
use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::script::{self, Extraction, OperationDescriptor};
use crate::snapshot::{Snapshot, SnapshotManager};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Outcome of a single-operation call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    pub new_state: Instance,
    pub steps: StepLog,
}

/// A step tagged with where in the script it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TracedStep {
    pub instance: String,
    pub line: usize,
    #[serde(flatten)]
    pub step: ExecutionStep,
}

/// Outcome of replaying a whole script
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramResult {
    pub primary_name: Option<String>,
    pub primary_state: Option<Instance>,
    pub all_instances: NamedInstanceTable,
    pub steps: Vec<TracedStep>,
    /// Frame 0 is the state before any operation; frame `i` follows the
    /// `i`-th operation. May stop early when the history limit is reached.
    #[serde(skip)]
    pub frames: SnapshotManager,
}

/// Applies operations to instances and records what happened
#[derive(Debug, Clone)]
pub struct TraceEngine {
    history_limit: usize,
}

impl Default for TraceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceEngine {
    pub fn new() -> Self {
        TraceEngine {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Engine whose program replays record at most `bytes` of frames
    pub fn with_history_limit(bytes: usize) -> Self {
        TraceEngine {
            history_limit: bytes,
        }
    }

    /// Resolve `request` against the instance's kind and apply it.
    ///
    /// A request that does not resolve leaves the instance untouched and
    /// yields one explanatory step.
    pub fn apply_request(&self, instance: &mut Instance, request: &OperationRequest) -> StepLog {
        match Operation::resolve(instance.kind(), request) {
            Ok(op) => instance.apply(&op),
            Err(err) => {
                debug!(op_type = %request.op_type, %err, "request rejected");
                StepLog::noop(err.to_string(), format!("{}: rejected", request.op_type))
            }
        }
    }

    /// Apply one request to `state`, which is expected to be a `kind`
    pub fn execute(
        &self,
        kind: StructureKind,
        mut state: Instance,
        request: &OperationRequest,
    ) -> OperationResult {
        let steps = if state.kind() == kind {
            self.apply_request(&mut state, request)
        } else {
            StepLog::noop(
                format!("The state is a {}, not a {}", state.kind(), kind),
                format!("{}: kind mismatch", request.op_type),
            )
        };
        OperationResult {
            new_state: state,
            steps,
        }
    }

    /// [`TraceEngine::execute`] for a request as received on the wire
    pub fn execute_request(
        &self,
        state: Instance,
        request: &SingleOperationRequest,
    ) -> OperationResult {
        self.execute(request.kind, state, &request.operation)
    }

    /// Replay every extracted operation in order.
    ///
    /// Declared instances exist from the start; any other name is created
    /// empty, with the descriptor's kind, on first reference.
    pub fn run_program(&self, extraction: &Extraction) -> ProgramResult {
        let mut table = NamedInstanceTable::new();
        for declaration in &extraction.declarations {
            table.get_or_create(&declaration.name, declaration.kind);
        }

        let mut frames = SnapshotManager::new(self.history_limit);
        let mut recording = self.record(
            &mut frames,
            Snapshot {
                line: 0,
                instance: None,
                label: "start".to_string(),
                steps: Vec::new(),
                instances: table.clone(),
            },
        );

        let mut steps = Vec::new();
        for descriptor in &extraction.operations {
            let log = self.replay(&mut table, descriptor);
            debug!(
                line = descriptor.line,
                call = %descriptor.label(),
                steps = log.len(),
                "replayed operation"
            );
            let produced = log.into_steps();
            if recording {
                recording = self.record(
                    &mut frames,
                    Snapshot {
                        line: descriptor.line,
                        instance: Some(descriptor.instance.clone()),
                        label: descriptor.label(),
                        steps: produced.clone(),
                        instances: table.clone(),
                    },
                );
            }
            steps.extend(produced.into_iter().map(|step| TracedStep {
                instance: descriptor.instance.clone(),
                line: descriptor.line,
                step,
            }));
        }

        let (primary_name, primary_state) = match table.first() {
            Some((name, instance)) => (Some(name.to_string()), Some(instance.clone())),
            None => (None, None),
        };
        info!(
            operations = extraction.operations.len(),
            instances = table.len(),
            steps = steps.len(),
            frames = frames.len(),
            "program replay finished"
        );

        ProgramResult {
            primary_name,
            primary_state,
            all_instances: table,
            steps,
            frames,
        }
    }

    /// Extract `script` and replay it
    pub fn run_script(
        &self,
        script: &str,
        default_kind: StructureKind,
    ) -> Result<ProgramResult, ScriptRejected> {
        let extraction = script::extract(script, default_kind);
        if !extraction.is_valid {
            return Err(ScriptRejected {
                errors: extraction.errors,
            });
        }
        Ok(self.run_program(&extraction))
    }

    fn replay(&self, table: &mut NamedInstanceTable, descriptor: &OperationDescriptor) -> StepLog {
        let instance = table.get_or_create(&descriptor.instance, descriptor.kind);
        self.apply_request(instance, &descriptor.request)
    }

    /// Push a frame; on the first refusal, warn once and report that
    /// recording has stopped
    fn record(&self, frames: &mut SnapshotManager, snapshot: Snapshot) -> bool {
        match frames.push(snapshot) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, recorded = frames.len(), "history limit reached, no further frames recorded");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::stack::Stack;
    use crate::value::Value;

    #[test]
    fn test_execute_returns_new_state() {
        let engine = TraceEngine::new();
        let result = engine.execute(
            StructureKind::Stack,
            Instance::new(StructureKind::Stack),
            &OperationRequest::new("push").with_value(5i64),
        );
        let Instance::Stack(stack) = &result.new_state else {
            panic!("expected a stack");
        };
        assert_eq!(stack.elements(), [Value::from("5")]);
        assert!(!result.steps.is_empty());
    }

    #[test]
    fn test_execute_wire_request() {
        let engine = TraceEngine::new();
        let request: SingleOperationRequest = serde_json::from_str(
            r#"{"kind": "stack", "operation": {"type": "push", "value": 10}}"#,
        )
        .unwrap();
        let result = engine.execute_request(Instance::new(StructureKind::Stack), &request);
        let Instance::Stack(stack) = &result.new_state else {
            panic!("expected a stack");
        };
        assert_eq!(stack.elements(), [Value::from("10")]);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["newState"]["structure"], "stack");
        assert!(json["steps"].as_array().is_some_and(|steps| !steps.is_empty()));
    }

    #[test]
    fn test_unresolvable_request_is_a_noop() {
        let engine = TraceEngine::new();
        let mut instance = Instance::Stack(Stack::new());
        let log = engine.apply_request(&mut instance, &OperationRequest::new("dequeue"));
        assert_eq!(log.len(), 1);
        assert_eq!(instance, Instance::new(StructureKind::Stack));
    }

    #[test]
    fn test_kind_mismatch_is_a_noop() {
        let engine = TraceEngine::new();
        let result = engine.execute(
            StructureKind::Queue,
            Instance::new(StructureKind::Stack),
            &OperationRequest::new("enqueue").with_value(1i64),
        );
        assert_eq!(result.steps.len(), 1);
        assert!(result.new_state.is_empty());
    }

    #[test]
    fn test_program_frames_follow_operations() {
        let engine = TraceEngine::new();
        let result = engine
            .run_script("s = Stack()\ns.push(1)\nt.push(2)\n", StructureKind::Stack)
            .unwrap();
        assert_eq!(result.frames.len(), 3);
        assert_eq!(result.frames.get(0).map(|f| f.instances.len()), Some(1));
        assert_eq!(result.frames.get(2).map(|f| f.instances.len()), Some(2));
        assert_eq!(result.all_instances.names(), ["s", "t"]);
        assert_eq!(result.primary_name.as_deref(), Some("s"));
        assert!(result.steps.iter().all(|s| s.line == 2 || s.line == 3));
    }

    #[test]
    fn test_history_limit_does_not_stop_replay() {
        let engine = TraceEngine::with_history_limit(0);
        let result = engine
            .run_script("s = Stack()\ns.push(1)\ns.push(2)\n", StructureKind::Stack)
            .unwrap();
        assert!(result.frames.is_empty());
        assert!(result.frames.is_truncated());
        assert_eq!(result.primary_state.map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_invalid_script_is_rejected() {
        let err = TraceEngine::new()
            .run_script("s = Stack()\ns.push('x)\n", StructureKind::Stack)
            .unwrap_err();
        assert_eq!(err.errors.len(), 1);
    }
}
