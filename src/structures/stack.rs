//! Last-in-first-out stack
//!
//! A flat `Vec` whose end is the top. `Peek`, `IsEmpty` and `Size` are pure
//! queries and never touch the elements.

use crate::trace::{ExecutionStep, StepLog};
use crate::value::{format_values, Value};
use serde::Serialize;

/// Operations on a stack
#[derive(Debug, Clone, PartialEq)]
pub enum StackOp {
    Push(Value),
    Pop,
    Peek,
    IsEmpty,
    Size,
    Clear,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StackStats {
    pub size: usize,
    pub is_empty: bool,
    pub top: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stack {
    /// Bottom first, top last
    elements: Vec<Value>,
    stats: StackStats,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    pub fn new() -> Self {
        let mut stack = Stack {
            elements: Vec::new(),
            stats: StackStats::default(),
        };
        stack.refresh_stats();
        stack
    }

    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    pub fn stats(&self) -> &StackStats {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn top(&self) -> Option<&Value> {
        self.elements.last()
    }

    pub fn apply(&mut self, op: &StackOp) -> StepLog {
        let log = match op {
            StackOp::Push(value) => self.push(value),
            StackOp::Pop => self.pop(),
            StackOp::Peek => self.peek(),
            StackOp::IsEmpty => StepLog::from_summary(
                if self.is_empty() {
                    "The stack is empty".to_string()
                } else {
                    format!("The stack is not empty ({} elements)", self.len())
                },
                format!("is_empty() -> {}", self.is_empty()),
            ),
            StackOp::Size => StepLog::from_summary(
                format!("The stack holds {} elements", self.len()),
                format!("size() -> {}", self.len()),
            ),
            StackOp::Clear => self.clear(),
        };
        self.refresh_stats();
        log
    }

    fn refresh_stats(&mut self) {
        self.stats = StackStats {
            size: self.elements.len(),
            is_empty: self.elements.is_empty(),
            top: self.elements.last().cloned(),
        };
    }

    fn push(&mut self, value: &Value) -> StepLog {
        let mut log = StepLog::new();
        match self.top() {
            Some(top) => log.push(ExecutionStep::new(
                format!("{} is on top; {} will go above it", top, value),
                format!("top = stack[{}]", self.len() - 1),
            )),
            None => log.push(ExecutionStep::new(
                format!("The stack is empty; {} will be the first element", value),
                "top = None",
            )),
        }
        self.elements.push(value.clone());
        log.push(
            ExecutionStep::summary(
                format!("Pushed {} onto the stack", value),
                format!("stack.push({})  // size {}", value, self.elements.len()),
            )
            .with_node(value),
        );
        log
    }

    fn pop(&mut self) -> StepLog {
        let Some(value) = self.elements.pop() else {
            return StepLog::noop(
                "The stack is empty, there is nothing to pop",
                "pop(): stack underflow",
            );
        };
        let mut log = StepLog::new();
        log.push(ExecutionStep::visit(
            &value,
            format!("The top element is {}", value),
            format!("top = stack[{}]", self.elements.len()),
        ));
        let next = match self.top() {
            Some(top) => format!("{} is the new top", top),
            None => "The stack is now empty".to_string(),
        };
        log.push(
            ExecutionStep::summary(
                format!("Popped {}. {}", value, next),
                format!("stack.pop() -> {}", value),
            )
            .with_node(&value),
        );
        log
    }

    fn peek(&self) -> StepLog {
        match self.top() {
            Some(top) => {
                let mut log = StepLog::new();
                log.push(
                    ExecutionStep::summary(
                        format!("The top element is {}", top),
                        format!("stack.peek() -> {}", top),
                    )
                    .with_node(top),
                );
                log
            }
            None => StepLog::noop(
                "The stack is empty, there is nothing to peek at",
                "peek(): stack is empty",
            ),
        }
    }

    fn clear(&mut self) -> StepLog {
        if self.elements.is_empty() {
            return StepLog::noop("The stack is already empty", "clear(): stack is empty");
        }
        let removed = std::mem::take(&mut self.elements);
        StepLog::from_summary(
            format!("Removed {} from the stack", format_values(removed.iter().rev())),
            "stack.clear()",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_order() {
        let mut stack = Stack::new();
        stack.apply(&StackOp::Push("1".into()));
        stack.apply(&StackOp::Push("2".into()));
        let log = stack.apply(&StackOp::Pop);
        assert_eq!(log.last().unwrap().node_value, Some(Value::from("2")));
        assert_eq!(stack.elements(), &[Value::from("1")]);
        assert_eq!(stack.stats().top, Some(Value::from("1")));
    }

    #[test]
    fn test_peek_does_not_mutate() {
        let mut stack = Stack::new();
        stack.apply(&StackOp::Push("7".into()));
        let before = stack.clone();
        let log = stack.apply(&StackOp::Peek);
        assert_eq!(stack, before);
        assert_eq!(log.last().unwrap().node_value, Some(Value::from("7")));
    }

    #[test]
    fn test_pop_empty_is_noop() {
        let mut stack = Stack::new();
        let before = stack.clone();
        let log = stack.apply(&StackOp::Pop);
        assert_eq!(log.len(), 1);
        assert_eq!(stack, before);
        assert!(stack.stats().is_empty);
    }

    #[test]
    fn test_clear_and_size() {
        let mut stack = Stack::new();
        stack.apply(&StackOp::Push("a".into()));
        stack.apply(&StackOp::Push("b".into()));
        let log = stack.apply(&StackOp::Size);
        assert!(log.last().unwrap().technical_message.ends_with("2"));
        stack.apply(&StackOp::Clear);
        assert!(stack.is_empty());
        assert_eq!(stack.stats().size, 0);
    }
}
