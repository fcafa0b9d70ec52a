//! Element value representation
//!
//! Every element stored in a structure is a [`Value`]: the token exactly as the
//! user wrote it (`10`, `"A"`, `x+1`). Values are never evaluated, but they are
//! *ordered* so that binary search trees and graph vertex labels behave the way
//! a reader expects:
//!
//! - two values that both parse as finite numbers compare numerically
//!   (`9 < 10`, and `10 == 10.0`)
//! - numbers sort before non-numbers
//! - non-numbers compare lexicographically
//!
//! Equality is defined through the ordering so that `Eq` and `Ord` agree.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single element value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value(String);

impl Value {
    pub fn new(text: impl Into<String>) -> Self {
        Value(text.into().trim().to_string())
    }

    /// The text as written
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric interpretation, if the text is a finite number
    pub fn as_number(&self) -> Option<f64> {
        self.0.parse::<f64>().ok().filter(|n| n.is_finite())
    }

    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::new(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::new(text)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value(n.to_string())
    }
}

/// Render a sequence of values as `[a, b, c]`
pub fn format_values<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a Value>,
{
    let parts: Vec<&str> = values.into_iter().map(Value::as_str).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_ordering() {
        assert!(Value::from("9") < Value::from("10"));
        assert!(Value::from("-3") < Value::from("2.5"));
        assert_eq!(Value::from("10"), Value::from("10.0"));
    }

    #[test]
    fn test_mixed_ordering() {
        assert!(Value::from("100") < Value::from("A"));
        assert!(Value::from("A") < Value::from("B"));
        assert_ne!(Value::from("a"), Value::from("A"));
    }

    #[test]
    fn test_non_finite_is_text() {
        assert!(!Value::from("NaN").is_numeric());
        assert!(!Value::from("inf").is_numeric());
        assert!(Value::from("1e3").is_numeric());
    }

    #[test]
    fn test_display_keeps_text() {
        assert_eq!(Value::from(" 10.0 ").to_string(), "10.0");
        assert_eq!(
            format_values(&[Value::from("1"), Value::from("x")]),
            "[1, x]"
        );
    }
}
