//! TUI state: current screen, loaded data, input mode, job banner.
//!
//! [`TuiState`] holds everything the view needs to render. [`apply_event`]
//! folds app-loop events into it; key handling lives in [`crate::run`].

use std::time::Instant;

use tasklane_core::{item, JobEvent, TodoItem, TodoList};
use tasklane_runtime::PollProgress;

use crate::msgs::AppEvent;

/// Which screen is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Lists,
    Items,
}

/// Modal text input collected in the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    None,
    CreateList { buffer: String },
    RenameList { list_id: String, buffer: String },
    CreateItem { buffer: String },
    /// y/n prompt before the irreversible bulk completion.
    ConfirmCompleteAll { pending: u64 },
}

/// TUI application state.
#[derive(Debug)]
pub struct TuiState {
    pub screen: Screen,
    pub lists: Vec<TodoList>,
    pub selected_list: usize,
    /// Id and name of the list whose items screen is open.
    pub open_list: Option<(String, String)>,
    pub items: Vec<TodoItem>,
    pub selected_item: usize,
    pub input: InputMode,
    /// Live job banner data; `polling` gates the item controls.
    pub progress: PollProgress,
    pub status: String,
    pub status_set_at: Option<Instant>,
    pub needs_redraw: bool,
}

impl Default for TuiState {
    fn default() -> Self {
        Self {
            screen: Screen::Lists,
            lists: Vec::new(),
            selected_list: 0,
            open_list: None,
            items: Vec::new(),
            selected_item: 0,
            input: InputMode::None,
            progress: PollProgress::default(),
            status: String::new(),
            status_set_at: None,
            needs_redraw: true,
        }
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_list_id(&self) -> Option<&str> {
        self.open_list.as_ref().map(|(id, _)| id.as_str())
    }

    pub fn selected_list(&self) -> Option<&TodoList> {
        self.lists.get(self.selected_list)
    }

    pub fn selected_item(&self) -> Option<&TodoItem> {
        self.items.get(self.selected_item)
    }

    pub fn pending_count(&self) -> u64 {
        item::pending_count(&self.items)
    }

    pub fn completed_count(&self) -> u64 {
        item::completed_count(&self.items)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
        self.status_set_at = Some(Instant::now());
        self.needs_redraw = true;
    }

    pub fn move_selection(&mut self, delta: isize) {
        let (index, len) = match self.screen {
            Screen::Lists => (&mut self.selected_list, self.lists.len()),
            Screen::Items => (&mut self.selected_item, self.items.len()),
        };
        if len == 0 {
            *index = 0;
            return;
        }
        let next = index.saturating_add_signed(delta).min(len - 1);
        if next != *index {
            *index = next;
            self.needs_redraw = true;
        }
    }

    pub fn back_to_lists(&mut self) {
        self.screen = Screen::Lists;
        self.open_list = None;
        self.items.clear();
        self.selected_item = 0;
        self.input = InputMode::None;
        self.needs_redraw = true;
    }
}

/// Fold one app-loop event into the state.
pub fn apply_event(state: &mut TuiState, event: AppEvent) {
    match event {
        AppEvent::Lists(lists) => {
            state.lists = lists;
            if state.selected_list >= state.lists.len() {
                state.selected_list = state.lists.len().saturating_sub(1);
            }
            state.needs_redraw = true;
        }
        AppEvent::Items { list_id, items } => {
            // Stale responses for a list we already left are dropped.
            if state.open_list_id() == Some(list_id.as_str()) {
                state.items = items;
                if state.selected_item >= state.items.len() {
                    state.selected_item = state.items.len().saturating_sub(1);
                }
                state.needs_redraw = true;
            }
        }
        AppEvent::JobProgress(progress) => {
            state.progress = progress;
            state.needs_redraw = true;
        }
        AppEvent::Job(job_event) => {
            let message = match &job_event {
                JobEvent::Started { .. } => "Completing all items…".to_string(),
                JobEvent::Resumed { .. } => "Resuming bulk completion…".to_string(),
                JobEvent::Completed {
                    completed: Some(n), ..
                } => format!("Completed {} items", n),
                JobEvent::Completed { completed: None, .. } => {
                    "All pending items completed".to_string()
                }
                JobEvent::Failed { error, .. } => format!("Bulk completion failed: {}", error),
                JobEvent::StartFailed { error, .. } => {
                    format!("Could not start bulk completion: {}", error)
                }
            };
            state.set_status(message);
        }
        AppEvent::Notice(message) => {
            state.set_status(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tasklane_core::ItemStatus;

    fn list(id: &str, name: &str) -> TodoList {
        TodoList {
            id: id.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            items: Vec::new(),
        }
    }

    fn an_item(id: &str, list_id: &str, status: ItemStatus) -> TodoItem {
        TodoItem {
            id: id.to_string(),
            todo_list_id: list_id.to_string(),
            title: format!("item {}", id),
            description: None,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_lists_event_clamps_selection() {
        let mut state = TuiState::new();
        state.selected_list = 5;
        apply_event(&mut state, AppEvent::Lists(vec![list("l1", "a")]));
        assert_eq!(state.selected_list, 0);
        assert_eq!(state.lists.len(), 1);
    }

    #[test]
    fn test_items_for_other_list_are_dropped() {
        let mut state = TuiState::new();
        state.open_list = Some(("l1".to_string(), "a".to_string()));
        apply_event(
            &mut state,
            AppEvent::Items {
                list_id: "l2".to_string(),
                items: vec![an_item("i1", "l2", ItemStatus::Pending)],
            },
        );
        assert!(state.items.is_empty());

        apply_event(
            &mut state,
            AppEvent::Items {
                list_id: "l1".to_string(),
                items: vec![an_item("i1", "l1", ItemStatus::Pending)],
            },
        );
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.pending_count(), 1);
    }

    #[test]
    fn test_completed_event_sets_notification() {
        let mut state = TuiState::new();
        apply_event(
            &mut state,
            AppEvent::Job(JobEvent::completed("l1", Some(3))),
        );
        assert_eq!(state.status, "Completed 3 items");
        assert!(state.status_set_at.is_some());

        apply_event(&mut state, AppEvent::Job(JobEvent::completed("l1", None)));
        assert_eq!(state.status, "All pending items completed");
    }

    #[test]
    fn test_progress_event_updates_banner() {
        let mut state = TuiState::new();
        apply_event(
            &mut state,
            AppEvent::JobProgress(PollProgress {
                percent: 40,
                polling: true,
            }),
        );
        assert_eq!(state.progress.percent, 40);
        assert!(state.progress.polling);
    }

    #[test]
    fn test_move_selection_stays_in_bounds() {
        let mut state = TuiState::new();
        state.lists = vec![list("l1", "a"), list("l2", "b")];
        state.move_selection(1);
        assert_eq!(state.selected_list, 1);
        state.move_selection(1);
        assert_eq!(state.selected_list, 1);
        state.move_selection(-1);
        state.move_selection(-1);
        assert_eq!(state.selected_list, 0);
    }

    #[test]
    fn test_back_to_lists_clears_item_state() {
        let mut state = TuiState::new();
        state.screen = Screen::Items;
        state.open_list = Some(("l1".to_string(), "a".to_string()));
        state.items = vec![an_item("i1", "l1", ItemStatus::Pending)];
        state.input = InputMode::CreateItem {
            buffer: "x".to_string(),
        };

        state.back_to_lists();
        assert_eq!(state.screen, Screen::Lists);
        assert!(state.items.is_empty());
        assert_eq!(state.input, InputMode::None);
    }
}
