//! Execution steps
//!
//! An [`ExecutionStep`] is one human/technical message pair describing a single
//! sub-action of an operation. Steps are collected into a [`StepLog`], which is
//! append-only: once pushed, a step can be read but never changed or removed.

use crate::config::{NOOP_DURATION_MS, STEP_DURATION_MS, SUMMARY_DURATION_MS, VISIT_DURATION_MS};
use crate::value::Value;
use serde::Serialize;

/// A single playback step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStep {
    pub human_message: String,
    pub technical_message: String,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<String>>,
}

impl ExecutionStep {
    pub fn new(human: impl Into<String>, technical: impl Into<String>) -> Self {
        ExecutionStep {
            human_message: human.into(),
            technical_message: technical.into(),
            duration_ms: STEP_DURATION_MS,
            node_value: None,
            path: None,
        }
    }

    /// A step that highlights one node
    pub fn visit(value: &Value, human: impl Into<String>, technical: impl Into<String>) -> Self {
        ExecutionStep::new(human, technical)
            .with_node(value)
            .with_duration(VISIT_DURATION_MS)
    }

    /// Explanation for an operation that left the structure unchanged
    pub fn noop(human: impl Into<String>, technical: impl Into<String>) -> Self {
        ExecutionStep::new(human, technical).with_duration(NOOP_DURATION_MS)
    }

    /// Closing step that reports the overall result of an operation
    pub fn summary(human: impl Into<String>, technical: impl Into<String>) -> Self {
        ExecutionStep::new(human, technical).with_duration(SUMMARY_DURATION_MS)
    }

    pub fn with_node(mut self, value: &Value) -> Self {
        self.node_value = Some(value.clone());
        self
    }

    pub fn with_path(mut self, path: Vec<String>) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Append-only list of steps produced by one operation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StepLog {
    steps: Vec<ExecutionStep>,
}

impl StepLog {
    pub fn new() -> Self {
        StepLog { steps: Vec::new() }
    }

    /// A log holding a single no-op explanation
    pub fn noop(human: impl Into<String>, technical: impl Into<String>) -> Self {
        let mut log = StepLog::new();
        log.push(ExecutionStep::noop(human, technical));
        log
    }

    /// A log holding a single summary step
    pub fn from_summary(human: impl Into<String>, technical: impl Into<String>) -> Self {
        let mut log = StepLog::new();
        log.push(ExecutionStep::summary(human, technical));
        log
    }

    pub fn push(&mut self, step: ExecutionStep) {
        self.steps.push(step);
    }

    /// Move every step of `other` to the end of this log
    pub fn append(&mut self, other: StepLog) {
        self.steps.extend(other.steps);
    }

    pub fn steps(&self) -> &[ExecutionStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&ExecutionStep> {
        self.steps.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExecutionStep> {
        self.steps.iter()
    }

    /// Total suggested playback time
    pub fn total_duration_ms(&self) -> u64 {
        self.steps.iter().map(|s| s.duration_ms).sum()
    }

    pub fn into_steps(self) -> Vec<ExecutionStep> {
        self.steps
    }
}

impl<'a> IntoIterator for &'a StepLog {
    type Item = &'a ExecutionStep;
    type IntoIter = std::slice::Iter<'a, ExecutionStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
