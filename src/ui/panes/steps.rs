//! Step log pane rendering

use crate::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the steps the current frame's operation produced
pub fn render_steps_pane(
    frame: &mut Frame,
    area: Rect,
    snapshot: Option<&Snapshot>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = match snapshot {
        Some(s) if s.line > 0 => format!(" Steps: {} (line {}) ", s.label, s.line),
        _ => " Steps ".to_string(),
    };
    let block = super::pane_block(&title, is_focused);

    let steps = snapshot.map(|s| s.steps.as_slice()).unwrap_or_default();
    if steps.is_empty() {
        let paragraph = Paragraph::new("(no operation yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let all_items: Vec<ListItem> = steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let is_last = i + 1 == steps.len();
            let human_style = if is_last {
                Style::default()
                    .fg(DEFAULT_THEME.success)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{:2}. ", i + 1), Style::default().fg(DEFAULT_THEME.comment)),
                    Span::styled(step.human_message.clone(), human_style),
                ]),
                Line::from(Span::styled(
                    format!("    {}", step.technical_message),
                    Style::default().fg(DEFAULT_THEME.comment),
                )),
            ])
        })
        .collect();

    // Each step takes two rows
    let visible_items = (area.height.saturating_sub(2).max(2) / 2) as usize;
    *scroll_offset = super::clamp_scroll(*scroll_offset, all_items.len(), visible_items);

    let visible: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_items)
        .collect();
    frame.render_widget(List::new(visible).block(block), area);
}
