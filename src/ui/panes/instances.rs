//! Instance pane rendering
//!
//! Draws every named instance of the current frame as text:
//!
//! - lists as a chain of boxed values
//! - stacks top-down, queues front-to-rear
//! - trees as an indented outline
//! - graphs as adjacency lines followed by their derived flags
//!
//! The node the current step points at is highlighted in the instance the
//! operation ran on.

use crate::graph::{Adjacency, Graph};
use crate::structures::bst::BstNode;
use crate::trace::{Instance, NamedInstanceTable};
use crate::ui::theme::DEFAULT_THEME;
use crate::value::Value;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// What to emphasize in the drawing
#[derive(Debug, Clone, Copy, Default)]
pub struct Highlight<'a> {
    pub instance: Option<&'a str>,
    pub value: Option<&'a Value>,
}

fn value_span(value: &Value, highlighted: bool) -> Span<'static> {
    let style = if highlighted {
        Style::default()
            .fg(DEFAULT_THEME.node_highlight)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    };
    Span::styled(format!("[{}]", value), style)
}

fn muted(text: impl Into<String>) -> Span<'static> {
    Span::styled(text.into(), Style::default().fg(DEFAULT_THEME.comment))
}

fn flag(name: &str, value: bool) -> Vec<Span<'static>> {
    let style = if value {
        Style::default().fg(DEFAULT_THEME.success)
    } else {
        Style::default().fg(DEFAULT_THEME.error)
    };
    vec![
        muted(format!("{}: ", name)),
        Span::styled(if value { "yes" } else { "no" }, style),
        muted("  "),
    ]
}

fn tree_lines(
    node: &BstNode,
    prefix: &str,
    label: &str,
    is_last: bool,
    target: Option<&Value>,
    out: &mut Vec<Line<'static>>,
) {
    let connector = match (label.is_empty(), is_last) {
        (true, _) => "",
        (false, true) => "└── ",
        (false, false) => "├── ",
    };
    out.push(Line::from(vec![
        muted(format!("  {}{}{}", prefix, connector, label)),
        value_span(&node.value, target == Some(&node.value)),
    ]));

    let child_prefix = match (label.is_empty(), is_last) {
        (true, _) => prefix.to_string(),
        (false, true) => format!("{}    ", prefix),
        (false, false) => format!("{}│   ", prefix),
    };
    match (node.left.as_deref(), node.right.as_deref()) {
        (Some(left), Some(right)) => {
            tree_lines(left, &child_prefix, "L ", false, target, out);
            tree_lines(right, &child_prefix, "R ", true, target, out);
        }
        (Some(only), None) => tree_lines(only, &child_prefix, "L ", true, target, out),
        (None, Some(only)) => tree_lines(only, &child_prefix, "R ", true, target, out),
        (None, None) => {}
    }
}

fn graph_lines(graph: &Graph, target: Option<&Value>, out: &mut Vec<Line<'static>>) {
    let arrow = if graph.is_directed() { " → " } else { " – " };
    for node in graph.nodes() {
        let mut spans = vec![muted("  "), value_span(&node.value, target == Some(&node.value))];
        let targets: Vec<String> = match &node.adjacency {
            Adjacency::Directed { outgoing, .. } => outgoing
                .iter()
                .filter_map(|id| graph.edges().iter().find(|e| e.id == *id))
                .filter_map(|e| {
                    let to = graph.node(e.to)?;
                    Some(match e.weight {
                        Some(w) => format!("{} ({})", to.value, w),
                        None => to.value.to_string(),
                    })
                })
                .collect(),
            Adjacency::Undirected { neighbors } => neighbors
                .iter()
                .filter_map(|id| graph.node(*id))
                .map(|n| n.value.to_string())
                .collect(),
        };
        if !targets.is_empty() {
            spans.push(muted(arrow));
            spans.push(Span::raw(targets.join(", ")));
        }
        out.push(Line::from(spans));
    }

    let stats = graph.stats();
    let mut flags = vec![muted("  ")];
    flags.extend(flag("connected", stats.is_connected));
    flags.extend(flag("cycle", stats.has_cycle));
    if let Some(strong) = stats.is_strongly_connected {
        flags.extend(flag("strongly connected", strong));
    }
    out.push(Line::from(flags));
}

/// Text lines drawing one instance
pub fn instance_lines(instance: &Instance, target: Option<&Value>) -> Vec<Line<'static>> {
    let mut out = Vec::new();
    if instance.is_empty() {
        out.push(Line::from(muted("  (empty)")));
        return out;
    }

    match instance {
        Instance::LinkedList(list) => {
            let link = if list.is_doubly() { " ⇄ " } else { " → " };
            let mut spans = vec![muted("  head → ")];
            for (i, value) in list.values().iter().enumerate() {
                if i > 0 {
                    spans.push(muted(link));
                }
                spans.push(value_span(value, target == Some(value)));
            }
            spans.push(muted(" → null"));
            out.push(Line::from(spans));
        }
        Instance::Stack(stack) => {
            for (i, value) in stack.elements().iter().rev().enumerate() {
                let mut spans = vec![muted("  │ "), value_span(value, target == Some(value))];
                if i == 0 {
                    spans.push(muted(" ← top"));
                }
                out.push(Line::from(spans));
            }
            out.push(Line::from(muted("  └───")));
        }
        Instance::Queue(queue) => {
            let mut spans = vec![muted("  front → ")];
            for value in queue.elements() {
                let highlighted = target == Some(&value);
                spans.push(value_span(&value, highlighted));
                spans.push(muted(" "));
            }
            spans.push(muted("← rear"));
            out.push(Line::from(spans));
        }
        Instance::Tree(tree) => {
            if let Some(root) = tree.root() {
                tree_lines(root, "", "", true, target, &mut out);
            }
            let stats = tree.stats();
            out.push(Line::from(muted(format!(
                "  height {}  min {}  max {}",
                stats.height,
                stats.min.as_ref().map(|v| v.to_string()).unwrap_or_default(),
                stats.max.as_ref().map(|v| v.to_string()).unwrap_or_default(),
            ))));
        }
        Instance::Graph(graph) => graph_lines(graph, target, &mut out),
    }
    out
}

/// Render every instance in creation order
pub fn render_instances_pane(
    frame: &mut Frame,
    area: Rect,
    instances: Option<&NamedInstanceTable>,
    highlight: Highlight<'_>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = super::pane_block(" Structures ", is_focused);

    let mut lines: Vec<Line> = Vec::new();
    for (name, instance) in instances.into_iter().flat_map(|table| table.iter()) {
        let active = highlight.instance == Some(name);
        let name_style = if active {
            Style::default()
                .fg(DEFAULT_THEME.secondary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(vec![
            Span::styled(name.to_string(), name_style),
            muted(format!(": {} ({} elements)", instance.kind(), instance.len())),
        ]));
        let target = if active { highlight.value } else { None };
        lines.extend(instance_lines(instance, target));
        lines.push(Line::default());
    }

    if lines.is_empty() {
        let paragraph = Paragraph::new("(no instances)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    *scroll_offset = super::clamp_scroll(*scroll_offset, lines.len(), visible_height);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((*scroll_offset as u16, 0));
    frame.render_widget(paragraph, area);
}
