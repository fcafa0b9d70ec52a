//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: playback state, keyboard event loop, pane focus, autoplay
//! - **[`panes`]**: render functions for each visible pane (script, steps,
//!   structures, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point is [`App`]: construct it with a [`ProgramResult`] and the
//! script text, then call [`App::run`] to start the event loop.
//!
//! [`ProgramResult`]: crate::trace::ProgramResult
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
