//! tasklane TUI: two screens (lists, items) over a channel pair.
//!
//! The TUI owns no network or persistence; it sends [`UiCommand`]s to the app
//! loop and renders [`AppEvent`]s the loop pushes back. Job state arrives the
//! same way, so the interface stays a pure projection.

pub mod msgs;
pub mod run;
pub mod state;
pub mod view;

pub use msgs::{AppEvent, UiCommand};
pub use run::run_tui;
pub use state::{InputMode, Screen, TuiState};
