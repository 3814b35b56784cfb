//! Channel messages between the TUI and the app loop.

use tasklane_core::{JobEvent, TodoItem, TodoList};
use tasklane_runtime::PollProgress;

/// Commands the TUI sends to the app loop.
#[derive(Debug, Clone)]
pub enum UiCommand {
    LoadLists,
    OpenList { list_id: String },
    CreateList { name: String },
    RenameList { list_id: String, name: String },
    DeleteList { list_id: String },
    CreateItem { list_id: String, title: String },
    ToggleItem { list_id: String, item_id: String },
    DeleteItem { list_id: String, item_id: String },
    /// Confirmation was already collected on screen.
    CompleteAll { list_id: String, pending: u64 },
}

/// Events the app loop pushes to the TUI.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Lists(Vec<TodoList>),
    Items {
        list_id: String,
        items: Vec<TodoItem>,
    },
    Job(JobEvent),
    JobProgress(PollProgress),
    /// Transient status-line message (e.g. a failed CRUD call).
    Notice(String),
}
