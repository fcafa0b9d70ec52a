//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: the script with syntax highlighting and a current-line marker
//! - [`instances`]: every named structure of the current frame
//! - [`steps`]: the steps produced by the current frame's operation
//! - [`status`]: status bar with keybindings and playback state
//!
//! Each pane module exports a `render_*` function that draws from borrowed
//! state and updates only its own scroll offset.

pub mod instances;
pub mod source;
pub mod status;
pub mod steps;

pub use instances::{render_instances_pane, Highlight};
pub use source::{render_source_pane, SourceScrollState};
pub use status::render_status_bar;
pub use steps::render_steps_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered block with the focus color applied
fn pane_block(title: &str, is_focused: bool) -> Block<'static> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp a scroll offset so the last page stays full
fn clamp_scroll(offset: usize, total: usize, visible: usize) -> usize {
    if total > visible {
        offset.min(total - visible)
    } else {
        0
    }
}
