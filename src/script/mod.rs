//! Script extraction
//!
//! Turns free-form script text into an ordered list of
//! [`OperationDescriptor`]s by pattern matching, without evaluating anything.
//!
//! # What Is Recognized
//!
//! - Declarations: `name = Kind()`, optionally written `let name = new Kind();`
//!   (also `const`/`var`). Only the first declaration of a name counts.
//! - Calls: `name.method(args)` where `method` belongs to the vocabulary of
//!   the instance's kind. Names that are never declared take the caller's
//!   default kind. A call may appear anywhere in a line, so `top = s.pop()`
//!   and `print(s.pop())` count, and a line may hold several calls. Calls
//!   inside string literals, after a trailing comment, or on an attribute
//!   (`self.s.push(1)`) are ignored. Arguments are kept as text, so in
//!   `s.push(t.pop())` only the outer call is extracted.
//!
//! Only lines starting in the first column are considered, so bodies of
//! loops, functions and class definitions are skipped. Blank lines and
//! comment lines (`#`, `//`) are skipped as well.
//!
//! # Faults
//!
//! A recognized call whose argument list has an unterminated string or
//! unbalanced parentheses makes the whole extraction invalid: `is_valid` is
//! false, `errors` describes every faulty line, and no operations are
//! returned. Extraction itself never fails.

mod args;
pub mod vocabulary;

use crate::trace::{OperationRequest, StructureKind};
use args::{ArgFault, ArgScanner};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

/// `[let|const|var] name = [new] Kind();`
static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:let|const|var)\s+)?([A-Za-z_]\w*)\s*=\s*(?:new\s+)?([A-Za-z_]\w*)\s*\(\s*\)\s*;?\s*$")
        .unwrap()
});

/// `name.method(` anywhere in a line
static CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z_]\w*)\s*\.\s*([A-Za-z_]\w*)\s*\(").unwrap());

/// Fault in a recognized script line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("line {line}: unterminated string in `{text}`")]
    UnterminatedString { line: usize, text: String },

    #[error("line {line}: unbalanced parentheses in `{text}`")]
    UnbalancedParens { line: usize, text: String },
}

impl ExtractionError {
    fn from_fault(fault: ArgFault, line: usize, text: &str) -> Self {
        let text = text.trim().to_string();
        match fault {
            ArgFault::UnterminatedString => ExtractionError::UnterminatedString { line, text },
            ArgFault::UnbalancedParens => ExtractionError::UnbalancedParens { line, text },
        }
    }
}

/// A declared instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub name: String,
    pub kind: StructureKind,
    pub line: usize,
}

/// One recognized call, ready to replay
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    pub instance: String,
    pub kind: StructureKind,
    /// 1-based
    pub line: usize,
    /// Method name as written
    pub method: String,
    /// Argument texts as written, unquoted
    pub args: Vec<String>,
    pub request: OperationRequest,
}

impl OperationDescriptor {
    /// The call as it would be written, e.g. `s.push(10)`
    pub fn label(&self) -> String {
        format!("{}.{}({})", self.instance, self.method, self.args.join(", "))
    }
}

/// Result of [`extract`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    pub operations: Vec<OperationDescriptor>,
    pub instance_names: Vec<String>,
    pub declarations: Vec<Declaration>,
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl Extraction {
    pub fn kind_of(&self, name: &str) -> Option<StructureKind> {
        self.declarations
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.kind)
    }
}

fn is_skipped(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("//")
        || line.starts_with(char::is_whitespace)
}

/// Whether a call starting right after `prefix` is live code: not inside a
/// string literal, not after a comment marker, not an attribute access
fn is_code_position(prefix: &str) -> bool {
    if prefix.ends_with('.') {
        return false;
    }
    let mut quote: Option<char> = None;
    let mut chars = prefix.chars().peekable();
    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(_), '\\') => {
                chars.next();
            }
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '#') => return false,
            (None, '/') if chars.peek() == Some(&'/') => return false,
            (None, _) => {}
        }
    }
    quote.is_none()
}

/// Read every declaration, first occurrence of a name winning
fn declarations(script: &str) -> Vec<Declaration> {
    let mut found: Vec<Declaration> = Vec::new();
    for (index, line) in script.lines().enumerate() {
        if is_skipped(line) {
            continue;
        }
        let Some(caps) = DECLARATION_RE.captures(line.trim_end()) else {
            continue;
        };
        let (name, kind_name) = (&caps[1], &caps[2]);
        let Some(kind) = StructureKind::from_name(kind_name) else {
            debug!(line = index + 1, kind = kind_name, "ignoring declaration of unknown kind");
            continue;
        };
        if found.iter().any(|d| d.name == name) {
            debug!(line = index + 1, name, "ignoring redeclaration");
            continue;
        }
        found.push(Declaration {
            name: name.to_string(),
            kind,
            line: index + 1,
        });
    }
    found
}

/// Extract operations from `script`, assuming `default_kind` for names that
/// are never declared
pub fn extract(script: &str, default_kind: StructureKind) -> Extraction {
    let declarations = declarations(script);
    let kind_of = |name: &str| {
        declarations
            .iter()
            .find(|d| d.name == name)
            .map_or(default_kind, |d| d.kind)
    };

    let mut operations = Vec::new();
    let mut errors = Vec::new();
    let mut seen_names: Vec<String> = Vec::new();

    for (index, line) in script.lines().enumerate() {
        let line_no = index + 1;
        if is_skipped(line) {
            continue;
        }
        let mut pos = 0;
        while let Some(caps) = CALL_RE.captures_at(line, pos) {
            let (Some(whole), Some(name_match)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            let (name, method_name) = (name_match.as_str(), &caps[2]);
            pos = whole.end();
            if !is_code_position(&line[..name_match.start()]) {
                continue;
            }
            let kind = kind_of(name);
            let Some(method) = vocabulary::lookup(kind, method_name) else {
                debug!(line = line_no, name, method = method_name, %kind, "ignoring unrecognized call");
                continue;
            };

            let mut scanner = ArgScanner::new(&line[whole.end()..]);
            let args = match scanner.scan_arguments() {
                Ok(args) => args,
                Err(fault) => {
                    let err = ExtractionError::from_fault(fault, line_no, line);
                    debug!(%err, "extraction fault");
                    errors.push(err.to_string());
                    break;
                }
            };
            pos += scanner.consumed();

            if !seen_names.iter().any(|n| n == name) {
                seen_names.push(name.to_string());
            }
            operations.push(OperationDescriptor {
                instance: name.to_string(),
                kind,
                line: line_no,
                method: method_name.to_string(),
                request: method.request(&args),
                args,
            });
        }
    }

    let instance_names = if declarations.is_empty() {
        seen_names
    } else {
        declarations.iter().map(|d| d.name.clone()).collect()
    };

    if errors.is_empty() {
        Extraction {
            operations,
            instance_names,
            declarations,
            is_valid: true,
            errors,
        }
    } else {
        Extraction {
            operations: Vec::new(),
            instance_names,
            declarations,
            is_valid: false,
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_stack_script() {
        let script = "s = ArrayStack()\ns.push(10)\ns.push(20)\ns.pop()\n";
        let extraction = extract(script, StructureKind::Queue);
        assert!(extraction.is_valid);
        assert_eq!(extraction.instance_names, ["s"]);
        let methods: Vec<&str> = extraction.operations.iter().map(|o| o.method.as_str()).collect();
        assert_eq!(methods, ["push", "push", "pop"]);
        assert_eq!(extraction.operations[0].args, ["10"]);
        assert_eq!(extraction.operations[2].line, 4);
        assert!(extraction.operations.iter().all(|o| o.kind == StructureKind::Stack));
    }

    #[test]
    fn test_declaration_forms() {
        let script = "let a = new DLL();\nconst b = BST()\nvar c = Digraph();\nd = Heap()\n";
        let extraction = extract(script, StructureKind::Stack);
        assert_eq!(extraction.instance_names, ["a", "b", "c"]);
        assert_eq!(extraction.kind_of("a"), Some(StructureKind::DoublyLinkedList));
        assert_eq!(extraction.kind_of("b"), Some(StructureKind::BinarySearchTree));
        assert_eq!(extraction.kind_of("c"), Some(StructureKind::DirectedGraph));
        assert_eq!(extraction.kind_of("d"), None);
    }

    #[test]
    fn test_undeclared_names_use_default_kind() {
        let script = "q.enqueue(1)\nother.enqueue(2)\nq.dequeue()\n";
        let extraction = extract(script, StructureKind::Queue);
        assert_eq!(extraction.instance_names, ["q", "other"]);
        assert_eq!(extraction.operations.len(), 3);
    }

    #[test]
    fn test_indented_comment_and_unknown_lines_are_skipped() {
        let script = "\
s = Stack()
# s.push(1)
// s.push(2)
for i in range(3):
    s.push(i)
s.frobnicate()
print(s)
s.push(3)
";
        let extraction = extract(script, StructureKind::Stack);
        assert_eq!(extraction.operations.len(), 1);
        assert_eq!(extraction.operations[0].line, 8);
    }

    #[test]
    fn test_malformed_call_invalidates_extraction() {
        let script = "s = Stack()\ns.push(1)\ns.push(\"oops)\ns.push((2)\n";
        let extraction = extract(script, StructureKind::Stack);
        assert!(!extraction.is_valid);
        assert!(extraction.operations.is_empty());
        assert_eq!(extraction.errors.len(), 2);
        assert!(extraction.errors[0].contains("line 3"));
        assert!(extraction.errors[1].contains("unbalanced"));
    }

    #[test]
    fn test_calls_inside_expressions() {
        let script = "\
s = Stack()
s.push(1)
s.push(2)
top = s.pop()
print(s.pop())
s.push(3); s.push(4)
";
        let extraction = extract(script, StructureKind::Queue);
        assert!(extraction.is_valid);
        let labels: Vec<String> = extraction.operations.iter().map(|o| o.label()).collect();
        assert_eq!(
            labels,
            ["s.push(1)", "s.push(2)", "s.pop()", "s.pop()", "s.push(3)", "s.push(4)"]
        );
        let lines: Vec<usize> = extraction.operations.iter().map(|o| o.line).collect();
        assert_eq!(lines, [2, 3, 4, 5, 6, 6]);
    }

    #[test]
    fn test_calls_in_strings_comments_and_attributes_are_ignored() {
        let script = "\
s = Stack()
print(\"s.push(1)\")
msg = 'it\\'s s.pop()'
s.push(2)  # s.pop()
s.push(3)  // s.pop()
self.s.push(4)
";
        let extraction = extract(script, StructureKind::Stack);
        assert!(extraction.is_valid);
        let labels: Vec<String> = extraction.operations.iter().map(|o| o.label()).collect();
        assert_eq!(labels, ["s.push(2)", "s.push(3)"]);
    }

    #[test]
    fn test_unrecognized_outer_call_exposes_inner_call() {
        let extraction = extract("log.info(s.pop())
", StructureKind::Stack);
        assert_eq!(extraction.operations.len(), 1);
        assert_eq!(extraction.operations[0].instance, "s");
        assert_eq!(extraction.operations[0].method, "pop");
    }

    #[test]
    fn test_arguments_are_not_evaluated() {
        let extraction = extract("x.push(a+1)\n", StructureKind::Stack);
        assert_eq!(extraction.operations[0].args, ["a+1"]);
        assert_eq!(extraction.operations[0].label(), "x.push(a+1)");
    }

    #[test]
    fn test_graph_calls_fill_request_fields() {
        let script = "g = Graph()\ng.add_edge('A', 'B', weight=3)\ng.shortest_path(\"A\", \"B\")\n";
        let extraction = extract(script, StructureKind::Stack);
        let edge = &extraction.operations[0].request;
        assert_eq!(edge.from_vertex.as_ref().map(|a| a.text()), Some("A".to_string()));
        assert_eq!(edge.weight.as_ref().map(|a| a.text()), Some("3".to_string()));
        let path = &extraction.operations[1].request;
        assert_eq!(path.end_vertex.as_ref().map(|a| a.text()), Some("B".to_string()));
    }
}
