//! Rendering: header, lists screen, items screen with the job banner, footer.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph};
use ratatui::Frame;

use tasklane_core::{item, ItemStatus};
use tasklane_runtime::bridge;

use crate::state::{InputMode, Screen, TuiState};

const ACCENT: Color = Color::Cyan;
const DIM: Color = Color::DarkGray;

pub fn draw(f: &mut Frame, state: &TuiState, area: Rect) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .areas(area);

    draw_header(f, state, header);
    match state.screen {
        Screen::Lists => draw_lists(f, state, body),
        Screen::Items => draw_items(f, state, body),
    }
    draw_footer(f, state, footer);
}

fn draw_header(f: &mut Frame, state: &TuiState, area: Rect) {
    let mut spans = vec![Span::styled(
        " tasklane ",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )];
    match (&state.screen, &state.open_list) {
        (Screen::Items, Some((_, name))) => {
            spans.push(Span::raw(format!("— {} ", name)));
            if let Some(summary) =
                bridge::completion_summary(state.completed_count(), state.items.len() as u64)
            {
                spans.push(Span::styled(summary, Style::default().fg(DIM)));
            }
        }
        _ => spans.push(Span::styled("— lists", Style::default().fg(DIM))),
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_lists(f: &mut Frame, state: &TuiState, area: Rect) {
    if state.lists.is_empty() {
        let hint = Paragraph::new("No lists yet. Press n to create one.")
            .style(Style::default().fg(DIM))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(hint, area);
        return;
    }

    let rows: Vec<ListItem> = state
        .lists
        .iter()
        .enumerate()
        .map(|(i, list)| {
            let mut spans = vec![Span::raw(format!(" {} ", list.name))];
            // Summary only where the collection read included items.
            if let Some(summary) = bridge::completion_summary(
                item::completed_count(&list.items),
                list.items.len() as u64,
            ) {
                spans.push(Span::styled(format!("({})", summary), Style::default().fg(DIM)));
            }
            let mut line = Line::from(spans);
            if i == state.selected_list {
                line = line.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            ListItem::new(line)
        })
        .collect();

    f.render_widget(List::new(rows).block(Block::default().borders(Borders::ALL)), area);
}

fn draw_items(f: &mut Frame, state: &TuiState, area: Rect) {
    let body = if state.progress.polling {
        let [banner, rest] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL))
            .gauge_style(Style::default().fg(ACCENT))
            .percent(state.progress.percent as u16)
            .label(format!("Completing... {}%", state.progress.percent));
        f.render_widget(gauge, banner);
        rest
    } else {
        area
    };

    if state.items.is_empty() {
        let hint = Paragraph::new("No items yet. Press a to add one.")
            .style(Style::default().fg(DIM))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(hint, body);
        return;
    }

    let rows: Vec<ListItem> = state
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let checkbox = match item.status {
                ItemStatus::Pending => "[ ]",
                ItemStatus::Completed => "[x]",
            };
            let mut spans = vec![
                Span::styled(format!(" {} ", checkbox), Style::default().fg(ACCENT)),
                Span::raw(item.title.clone()),
            ];
            if let Some(description) = &item.description {
                spans.push(Span::styled(
                    format!("  {}", description),
                    Style::default().fg(DIM),
                ));
            }
            let mut line = Line::from(spans);
            if i == state.selected_item {
                line = line.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            ListItem::new(line)
        })
        .collect();

    f.render_widget(List::new(rows).block(Block::default().borders(Borders::ALL)), body);
}

fn draw_footer(f: &mut Frame, state: &TuiState, area: Rect) {
    let [hint_area, status_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    let hint = match &state.input {
        InputMode::CreateList { buffer } => Line::from(format!(" New list name: {}▏", buffer)),
        InputMode::RenameList { buffer, .. } => Line::from(format!(" Rename list: {}▏", buffer)),
        InputMode::CreateItem { buffer } => Line::from(format!(" New item title: {}▏", buffer)),
        InputMode::ConfirmCompleteAll { pending } => Line::styled(
            format!(
                " Complete all {} pending items? This cannot be undone. (y/n)",
                pending
            ),
            Style::default().fg(Color::Yellow),
        ),
        InputMode::None => hints_line(state),
    };
    f.render_widget(Paragraph::new(hint), hint_area);

    f.render_widget(
        Paragraph::new(Line::styled(
            format!(" {}", state.status),
            Style::default().fg(DIM),
        )),
        status_area,
    );
}

fn hints_line(state: &TuiState) -> Line<'static> {
    match state.screen {
        Screen::Lists => Line::styled(
            " ↑/↓ select · Enter open · n new · r rename · d delete · q quit",
            Style::default().fg(DIM),
        ),
        Screen::Items => {
            let mut hints = String::from(" ↑/↓ select · a add");
            if bridge::item_controls_enabled(state.progress) {
                hints.push_str(" · Space toggle · d delete");
            } else {
                hints.push_str(" · (item controls locked while completing)");
            }
            if let Some(label) = bridge::bulk_trigger_label(state.pending_count(), state.progress)
            {
                if !state.progress.polling {
                    hints.push_str(&format!(" · c {}", label));
                }
            }
            hints.push_str(" · Esc back");
            Line::styled(hints, Style::default().fg(DIM))
        }
    }
}
