// Replay history for stepping backward and forward through a trace

use crate::trace::{ExecutionStep, NamedInstanceTable};
use serde::Serialize;
use thiserror::Error;

/// Failure to record another frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("snapshot memory limit exceeded: {current} + {requested} > {limit} bytes")]
    LimitExceeded {
        current: usize,
        requested: usize,
        limit: usize,
    },
}

/// Every instance as it stood after one replayed operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// 1-based script line of the operation; 0 for the initial frame
    pub line: usize,
    /// Instance the operation ran on; `None` for the initial frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    /// The call as written, e.g. `s.push(10)`
    pub label: String,
    pub steps: Vec<ExecutionStep>,
    pub instances: NamedInstanceTable,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // Rough: 96 bytes per stored element, plus the step text
        let elements: usize = self.instances.iter().map(|(_, i)| i.len() + 1).sum();
        let text: usize = self
            .steps
            .iter()
            .map(|s| s.human_message.len() + s.technical_message.len() + 64)
            .sum();
        elements * 96 + text + self.label.len()
    }
}

/// Bounded history of replay frames
#[derive(Debug, Clone)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
    truncated: bool,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
            truncated: false,
        }
    }

    /// Add a snapshot to history.
    ///
    /// Once a push has been refused every later push is refused too, so the
    /// recorded frames are always a prefix of the replay.
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), HistoryError> {
        let snapshot_size = snapshot.estimated_size();

        if self.truncated || self.current_memory + snapshot_size > self.max_memory {
            self.truncated = true;
            return Err(HistoryError::LimitExceeded {
                current: self.current_memory,
                requested: snapshot_size,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Whether recording stopped early because of the memory limit
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}
