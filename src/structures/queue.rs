//! First-in-first-out queue
//!
//! Enqueue at the rear, dequeue from the front. Backed by a `VecDeque` so
//! both ends are O(1).

use crate::trace::{ExecutionStep, StepLog};
use crate::value::Value;
use serde::Serialize;
use std::collections::VecDeque;

/// Operations on a queue
#[derive(Debug, Clone, PartialEq)]
pub enum QueueOp {
    Enqueue(Value),
    Dequeue,
    Front,
    Rear,
    IsEmpty,
    Size,
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueueStats {
    pub size: usize,
    pub is_empty: bool,
    pub front: Option<Value>,
    pub rear: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Queue {
    /// Front first, rear last
    elements: VecDeque<Value>,
    stats: QueueStats,
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Queue {
    pub fn new() -> Self {
        let mut queue = Queue {
            elements: VecDeque::new(),
            stats: QueueStats::default(),
        };
        queue.refresh_stats();
        queue
    }

    pub fn elements(&self) -> Vec<Value> {
        self.elements.iter().cloned().collect()
    }

    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn apply(&mut self, op: &QueueOp) -> StepLog {
        let log = match op {
            QueueOp::Enqueue(value) => self.enqueue(value),
            QueueOp::Dequeue => self.dequeue(),
            QueueOp::Front => Self::inspect(self.elements.front(), "front"),
            QueueOp::Rear => Self::inspect(self.elements.back(), "rear"),
            QueueOp::IsEmpty => StepLog::from_summary(
                if self.is_empty() {
                    "The queue is empty".to_string()
                } else {
                    format!("The queue is not empty ({} elements)", self.len())
                },
                format!("is_empty() -> {}", self.is_empty()),
            ),
            QueueOp::Size => StepLog::from_summary(
                format!("The queue holds {} elements", self.len()),
                format!("size() -> {}", self.len()),
            ),
            QueueOp::Clear => {
                if self.elements.is_empty() {
                    StepLog::noop("The queue is already empty", "clear(): queue is empty")
                } else {
                    let count = self.elements.len();
                    self.elements.clear();
                    StepLog::from_summary(
                        format!("Removed all {} elements from the queue", count),
                        "queue.clear()",
                    )
                }
            }
        };
        self.refresh_stats();
        log
    }

    fn refresh_stats(&mut self) {
        self.stats = QueueStats {
            size: self.elements.len(),
            is_empty: self.elements.is_empty(),
            front: self.elements.front().cloned(),
            rear: self.elements.back().cloned(),
        };
    }

    fn enqueue(&mut self, value: &Value) -> StepLog {
        let mut log = StepLog::new();
        match self.elements.back() {
            Some(rear) => log.push(ExecutionStep::new(
                format!("{} is at the rear; {} joins behind it", rear, value),
                format!("rear = queue[{}]", self.elements.len() - 1),
            )),
            None => log.push(ExecutionStep::new(
                format!("The queue is empty; {} will be both front and rear", value),
                "front = rear = None",
            )),
        }
        self.elements.push_back(value.clone());
        log.push(
            ExecutionStep::summary(
                format!("Enqueued {} at the rear", value),
                format!("queue.enqueue({})  // size {}", value, self.elements.len()),
            )
            .with_node(value),
        );
        log
    }

    fn dequeue(&mut self) -> StepLog {
        let Some(value) = self.elements.pop_front() else {
            return StepLog::noop(
                "The queue is empty, there is nothing to dequeue",
                "dequeue(): queue underflow",
            );
        };
        let mut log = StepLog::new();
        log.push(ExecutionStep::visit(
            &value,
            format!("The front element is {}", value),
            "front = queue[0]",
        ));
        let next = match self.elements.front() {
            Some(front) => format!("{} is now at the front", front),
            None => "The queue is now empty".to_string(),
        };
        log.push(
            ExecutionStep::summary(
                format!("Dequeued {}. {}", value, next),
                format!("queue.dequeue() -> {}", value),
            )
            .with_node(&value),
        );
        log
    }

    fn inspect(element: Option<&Value>, end: &str) -> StepLog {
        match element {
            Some(value) => {
                let mut log = StepLog::new();
                log.push(
                    ExecutionStep::summary(
                        format!("The {} element is {}", end, value),
                        format!("queue.{}() -> {}", end, value),
                    )
                    .with_node(value),
                );
                log
            }
            None => StepLog::noop(
                format!("The queue is empty, there is no {} element", end),
                format!("{}(): queue is empty", end),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_of(values: &[&str]) -> Queue {
        let mut queue = Queue::new();
        for v in values {
            queue.apply(&QueueOp::Enqueue((*v).into()));
        }
        queue
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = queue_of(&["1", "2", "3"]);
        let log = queue.apply(&QueueOp::Dequeue);
        assert_eq!(log.last().unwrap().node_value, Some(Value::from("1")));
        assert_eq!(queue.elements(), vec![Value::from("2"), Value::from("3")]);
        assert_eq!(queue.stats().front, Some(Value::from("2")));
        assert_eq!(queue.stats().rear, Some(Value::from("3")));
    }

    #[test]
    fn test_front_and_rear_do_not_mutate() {
        let mut queue = queue_of(&["x", "y"]);
        let before = queue.clone();
        queue.apply(&QueueOp::Front);
        queue.apply(&QueueOp::Rear);
        assert_eq!(queue, before);
    }

    #[test]
    fn test_dequeue_empty_is_noop() {
        let mut queue = Queue::new();
        let before = queue.clone();
        let log = queue.apply(&QueueOp::Dequeue);
        assert_eq!(log.len(), 1);
        assert_eq!(queue, before);
    }
}
