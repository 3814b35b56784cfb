//! TUI run loop: terminal setup, event handling, draw.
//!
//! Key events are read in a dedicated thread so the main loop never blocks on
//! terminal input; app-loop events are drained each tick.

use std::io;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc as tokio_mpsc;

use tasklane_core::{validate, CoreError};

use crate::msgs::{AppEvent, UiCommand};
use crate::state::{apply_event, InputMode, Screen, TuiState};
use crate::view;

const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Run the TUI: alternate screen, raw mode, event loop. Returns when the user
/// quits.
pub fn run_tui(
    cmd_tx: tokio_mpsc::Sender<UiCommand>,
    mut event_rx: tokio_mpsc::Receiver<AppEvent>,
) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = TuiState::new();
    let result = run_loop(&mut terminal, &mut state, &cmd_tx, &mut event_rx);

    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    disable_raw_mode()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut TuiState,
    cmd_tx: &tokio_mpsc::Sender<UiCommand>,
    event_rx: &mut tokio_mpsc::Receiver<AppEvent>,
) -> anyhow::Result<()> {
    let (key_tx, key_rx) = mpsc::channel();
    let _reader = std::thread::spawn(move || loop {
        if event::poll(Duration::from_millis(50)).unwrap_or(false) {
            if let Ok(ev) = event::read() {
                let _ = key_tx.send(ev);
            }
        }
    });

    let _ = cmd_tx.try_send(UiCommand::LoadLists);

    loop {
        while let Ok(ev) = event_rx.try_recv() {
            apply_event(state, ev);
        }

        // Transient status clears after 5s.
        if let Some(set_at) = state.status_set_at {
            if set_at.elapsed() > STATUS_TIMEOUT {
                state.status.clear();
                state.status_set_at = None;
                state.needs_redraw = true;
            }
        }

        if state.needs_redraw {
            terminal.draw(|f| view::draw(f, state, f.area()))?;
            state.needs_redraw = false;
        }

        match key_rx.try_recv() {
            Ok(Event::Key(e)) if e.kind == KeyEventKind::Press => {
                if handle_key(state, cmd_tx, e.code, e.modifiers) {
                    break;
                }
            }
            Ok(Event::Resize(_, _)) => state.needs_redraw = true,
            Ok(_) => {}
            Err(_) => std::thread::sleep(Duration::from_millis(50)),
        }
    }
    Ok(())
}

/// Returns true when the TUI should exit.
fn handle_key(
    state: &mut TuiState,
    cmd_tx: &tokio_mpsc::Sender<UiCommand>,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> bool {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return true;
    }

    match std::mem::replace(&mut state.input, InputMode::None) {
        InputMode::None => {}
        mode => {
            handle_input_key(state, cmd_tx, mode, code);
            return false;
        }
    }

    match state.screen {
        Screen::Lists => handle_lists_key(state, cmd_tx, code),
        Screen::Items => handle_items_key(state, cmd_tx, code),
    }
}

fn handle_input_key(
    state: &mut TuiState,
    cmd_tx: &tokio_mpsc::Sender<UiCommand>,
    mode: InputMode,
    code: KeyCode,
) {
    state.needs_redraw = true;
    if code == KeyCode::Esc {
        return;
    }

    if let InputMode::ConfirmCompleteAll { pending } = &mode {
        if code == KeyCode::Char('y') {
            if let Some(list_id) = state.open_list_id() {
                let _ = cmd_tx.try_send(UiCommand::CompleteAll {
                    list_id: list_id.to_string(),
                    pending: *pending,
                });
            }
        }
        // Anything but y declines.
        return;
    }

    match code {
        KeyCode::Enter => submit_input(state, cmd_tx, mode),
        KeyCode::Char(c) => state.input = edit_buffer(mode, |b| b.push(c)),
        KeyCode::Backspace => {
            state.input = edit_buffer(mode, |b| {
                b.pop();
            })
        }
        _ => state.input = mode,
    }
}

fn edit_buffer(mode: InputMode, edit: impl FnOnce(&mut String)) -> InputMode {
    match mode {
        InputMode::CreateList { mut buffer } => {
            edit(&mut buffer);
            InputMode::CreateList { buffer }
        }
        InputMode::RenameList { list_id, mut buffer } => {
            edit(&mut buffer);
            InputMode::RenameList { list_id, buffer }
        }
        InputMode::CreateItem { mut buffer } => {
            edit(&mut buffer);
            InputMode::CreateItem { buffer }
        }
        other => other,
    }
}

fn validation_message(err: CoreError) -> String {
    match err {
        CoreError::Validation(message) => message,
        other => other.to_string(),
    }
}

fn submit_input(state: &mut TuiState, cmd_tx: &tokio_mpsc::Sender<UiCommand>, mode: InputMode) {
    match mode {
        InputMode::CreateList { buffer } => match validate::list_name(&buffer) {
            Ok(()) => {
                let _ = cmd_tx.try_send(UiCommand::CreateList {
                    name: buffer.trim().to_string(),
                });
            }
            Err(e) => {
                state.set_status(validation_message(e));
                state.input = InputMode::CreateList { buffer };
            }
        },
        InputMode::RenameList { list_id, buffer } => match validate::list_name(&buffer) {
            Ok(()) => {
                let _ = cmd_tx.try_send(UiCommand::RenameList {
                    list_id,
                    name: buffer.trim().to_string(),
                });
            }
            Err(e) => {
                state.set_status(validation_message(e));
                state.input = InputMode::RenameList { list_id, buffer };
            }
        },
        InputMode::CreateItem { buffer } => match validate::item_title(&buffer) {
            Ok(()) => {
                if let Some(list_id) = state.open_list_id() {
                    let _ = cmd_tx.try_send(UiCommand::CreateItem {
                        list_id: list_id.to_string(),
                        title: buffer.trim().to_string(),
                    });
                }
            }
            Err(e) => {
                state.set_status(validation_message(e));
                state.input = InputMode::CreateItem { buffer };
            }
        },
        InputMode::ConfirmCompleteAll { .. } | InputMode::None => {}
    }
}

fn handle_lists_key(
    state: &mut TuiState,
    cmd_tx: &tokio_mpsc::Sender<UiCommand>,
    code: KeyCode,
) -> bool {
    match code {
        KeyCode::Char('q') => return true,
        KeyCode::Up | KeyCode::Char('k') => state.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => state.move_selection(1),
        KeyCode::Enter => {
            if let Some((list_id, name)) = state
                .selected_list()
                .map(|l| (l.id.clone(), l.name.clone()))
            {
                state.screen = Screen::Items;
                state.open_list = Some((list_id.clone(), name));
                state.items.clear();
                state.selected_item = 0;
                state.set_status("Loading items…");
                let _ = cmd_tx.try_send(UiCommand::OpenList { list_id });
            }
        }
        KeyCode::Char('n') => {
            state.input = InputMode::CreateList {
                buffer: String::new(),
            };
            state.needs_redraw = true;
        }
        KeyCode::Char('r') => {
            if let Some((list_id, name)) = state
                .selected_list()
                .map(|l| (l.id.clone(), l.name.clone()))
            {
                state.input = InputMode::RenameList {
                    list_id,
                    buffer: name,
                };
                state.needs_redraw = true;
            }
        }
        KeyCode::Char('d') => {
            if let Some(list_id) = state.selected_list().map(|l| l.id.clone()) {
                let _ = cmd_tx.try_send(UiCommand::DeleteList { list_id });
            }
        }
        _ => {}
    }
    false
}

fn handle_items_key(
    state: &mut TuiState,
    cmd_tx: &tokio_mpsc::Sender<UiCommand>,
    code: KeyCode,
) -> bool {
    let controls_enabled = tasklane_runtime::bridge::item_controls_enabled(state.progress);
    match code {
        KeyCode::Char('q') => return true,
        KeyCode::Esc | KeyCode::Char('b') => state.back_to_lists(),
        KeyCode::Up | KeyCode::Char('k') => state.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => state.move_selection(1),
        KeyCode::Char('a') => {
            state.input = InputMode::CreateItem {
                buffer: String::new(),
            };
            state.needs_redraw = true;
        }
        KeyCode::Char(' ') if controls_enabled => {
            if let (Some(list_id), Some(item_id)) = (
                state.open_list_id().map(str::to_string),
                state.selected_item().map(|i| i.id.clone()),
            ) {
                let _ = cmd_tx.try_send(UiCommand::ToggleItem { list_id, item_id });
            }
        }
        KeyCode::Char('d') if controls_enabled => {
            if let (Some(list_id), Some(item_id)) = (
                state.open_list_id().map(str::to_string),
                state.selected_item().map(|i| i.id.clone()),
            ) {
                let _ = cmd_tx.try_send(UiCommand::DeleteItem { list_id, item_id });
            }
        }
        KeyCode::Char('c') => {
            let pending = state.pending_count();
            if pending > 0 && !state.progress.polling {
                state.input = InputMode::ConfirmCompleteAll { pending };
                state.needs_redraw = true;
            }
        }
        _ => {}
    }
    false
}
