//! Main TUI application state and logic

use crate::config::AUTOPLAY_INTERVAL_MS;
use crate::snapshot::Snapshot;
use crate::trace::ProgramResult;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

use super::panes::{self, Highlight, SourceScrollState};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Structures,
    Steps,
}

impl FocusedPane {
    /// Clockwise: source -> steps -> structures
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Steps,
            FocusedPane::Steps => FocusedPane::Structures,
            FocusedPane::Structures => FocusedPane::Source,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Structures,
            FocusedPane::Steps => FocusedPane::Source,
            FocusedPane::Structures => FocusedPane::Steps,
        }
    }
}

/// The main application state
pub struct App {
    /// Replay being browsed; its frames drive every pane
    pub result: ProgramResult,

    pub source_code: String,

    /// Index of the displayed frame
    pub position: usize,

    pub focused_pane: FocusedPane,

    pub source_scroll: SourceScrollState,
    pub structures_scroll: usize,
    pub steps_scroll: usize,

    pub should_quit: bool,
    pub status_message: String,

    pub is_playing: bool,
    pub last_play_time: Instant,
    /// Debounce for the play toggle
    pub last_space_press: Instant,
}

impl App {
    pub fn new(result: ProgramResult, source_code: String) -> Self {
        let status_message = if result.frames.is_truncated() {
            "Ready (history limit reached, later operations not recorded)".to_string()
        } else {
            "Ready!".to_string()
        };
        App {
            result,
            source_code,
            position: 0,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState::default(),
            structures_scroll: 0,
            steps_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    pub fn current_frame(&self) -> Option<&Snapshot> {
        self.result.frames.get(self.position)
    }

    fn total_frames(&self) -> usize {
        self.result.frames.len()
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let interval = Duration::from_millis(AUTOPLAY_INTERVAL_MS);
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= interval {
                if self.step_forward() {
                    self.status_message = "Playing...".to_string();
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Poll with a timeout so autoplay keeps ticking
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(main_chunks[0]);

        // Left: script over steps; right: structures
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[0]);

        let snapshot = self.result.frames.get(self.position);
        let line = snapshot.map_or(0, |s| s.line);

        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_steps_pane(
            frame,
            left_rows[1],
            snapshot,
            self.focused_pane == FocusedPane::Steps,
            &mut self.steps_scroll,
        );

        let highlight = Highlight {
            instance: snapshot.and_then(|s| s.instance.as_deref()),
            value: snapshot
                .and_then(|s| s.steps.iter().rev().find_map(|step| step.node_value.as_ref())),
        };
        panes::render_instances_pane(
            frame,
            columns[1],
            snapshot.map(|s| &s.instances),
            highlight,
            self.focused_pane == FocusedPane::Structures,
            &mut self.structures_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.position,
            self.total_frames(),
            self.is_playing,
            self.result.frames.is_truncated(),
        );
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N frames
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let mut stepped = 0;
                for _ in 0..n {
                    if !self.step_forward() {
                        break;
                    }
                    stepped += 1;
                }
                self.status_message = format!("Stepped forward {} frame(s)", stepped);
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.status_message = if self.step_backward() {
                    "Stepped backward".to_string()
                } else {
                    "Already at the start".to_string()
                };
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.status_message = if self.step_forward() {
                    "Stepped forward".to_string()
                } else {
                    "Already at the end".to_string()
                };
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up moves the current line down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Structures => {
                    self.structures_scroll = self.structures_scroll.saturating_sub(1);
                }
                FocusedPane::Steps => {
                    self.steps_scroll = self.steps_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Structures => {
                    self.structures_scroll = self.structures_scroll.saturating_add(1);
                }
                FocusedPane::Steps => {
                    self.steps_scroll = self.steps_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_millis(AUTOPLAY_INTERVAL_MS))
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.jump_to(self.total_frames().saturating_sub(1));
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.jump_to(0);
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    fn jump_to(&mut self, position: usize) {
        self.position = position;
        self.steps_scroll = 0;
    }

    /// Advance one frame; false at the last frame
    fn step_forward(&mut self) -> bool {
        if self.position + 1 < self.total_frames() {
            self.jump_to(self.position + 1);
            true
        } else {
            false
        }
    }

    /// Go back one frame; false at the first frame
    fn step_backward(&mut self) -> bool {
        if self.position > 0 {
            self.jump_to(self.position - 1);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{StructureKind, TraceEngine};

    fn app(script: &str) -> App {
        let result = TraceEngine::new()
            .run_script(script, StructureKind::Stack)
            .unwrap();
        App::new(result, script.to_string())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::from(code));
    }

    #[test]
    fn test_stepping_is_bounded() {
        let mut app = app("s = Stack()\ns.push(1)\ns.push(2)\n");
        press(&mut app, KeyCode::Left);
        assert_eq!(app.position, 0);
        press(&mut app, KeyCode::Char('9'));
        assert_eq!(app.position, 2);
        assert_eq!(app.current_frame().map(|f| f.line), Some(3));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.position, 0);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.position, 2);
    }

    #[test]
    fn test_focus_cycles() {
        let mut app = app("s = Stack()\n");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Steps);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Source);
    }
}
