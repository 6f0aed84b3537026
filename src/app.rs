// App state and main event loop.
// Maps keyboard input onto store operations and tracks the table cursor.

use std::future::Future;
use std::io;
use std::sync::Arc;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::prelude::*;
use serde_json::Value;
use tokio::sync::watch;

use tabsync::{NotificationLog, Result, TableDataStore, TableError, TableState};

use crate::ui;

/// What typed characters are currently going into.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
    Filter { column: String },
    Edit { row: usize, column: String },
}

impl InputMode {
    pub fn prompt(&self) -> String {
        match self {
            InputMode::Normal => String::new(),
            InputMode::Search => "Search: ".to_string(),
            InputMode::Filter { column } => format!("Filter {}: ", column),
            InputMode::Edit { column, .. } => format!("Edit {}: ", column),
        }
    }
}

/// Main application state.
pub struct App {
    pub store: TableDataStore,
    pub notifications: Arc<NotificationLog>,
    /// Latest store snapshot, refreshed every frame.
    pub table: TableState,
    /// Resource URL shown in the title bar.
    pub resource: String,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub mode: InputMode,
    pub input: String,
    pub show_help: bool,
    pub should_quit: bool,
    updates: watch::Receiver<TableState>,
}

impl App {
    pub fn new(
        store: TableDataStore,
        notifications: Arc<NotificationLog>,
        resource: String,
    ) -> Self {
        let updates = store.subscribe();
        let table = store.snapshot();
        Self {
            store,
            notifications,
            table,
            resource,
            cursor_row: 0,
            cursor_col: 0,
            mode: InputMode::Normal,
            input: String::new(),
            show_help: false,
            should_quit: false,
            updates,
        }
    }

    /// Main event loop. Must be called inside a tokio runtime.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.spawn(|store| async move { store.load().await });

        while !self.should_quit {
            self.sync_state();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Column names in display order.
    pub fn columns(&self) -> Vec<String> {
        if !self.table.query.available_filters.is_empty() {
            return self.table.query.available_filters.clone();
        }
        self.table
            .rows
            .first()
            .map(|row| row.field_names())
            .unwrap_or_default()
    }

    pub fn current_column(&self) -> Option<String> {
        self.columns().get(self.cursor_col).cloned()
    }

    /// Pull the latest snapshot and keep the cursor inside it.
    fn sync_state(&mut self) {
        if self.updates.has_changed().unwrap_or(false) {
            self.table = self.updates.borrow_and_update().clone();
        }
        self.cursor_row = clamp_cursor(self.cursor_row, self.table.rows.len());
        self.cursor_col = clamp_cursor(self.cursor_col, self.columns().len());
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if self.mode == InputMode::Normal {
                        self.handle_normal_key(key);
                    } else {
                        self.handle_input_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor_row = self.cursor_row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.cursor_row = clamp_cursor(self.cursor_row + 1, self.table.rows.len());
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.cursor_col = self.cursor_col.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.cursor_col = clamp_cursor(self.cursor_col + 1, self.columns().len());
            }
            KeyCode::Char('n') | KeyCode::PageDown => {
                self.spawn(|store| async move { store.next_page().await });
            }
            KeyCode::Char('p') | KeyCode::PageUp => {
                self.spawn(|store| async move { store.previous_page().await });
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.spawn(|store| async move { store.go_to_page(1).await });
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.spawn(|store| async move { store.go_to_page(i64::MAX).await });
            }
            KeyCode::Char('r') => {
                self.spawn(|store| async move { store.load().await });
            }
            KeyCode::Char(' ') => {
                if let Err(e) = self.store.toggle_row(self.cursor_row) {
                    log::debug!("toggle ignored: {}", e);
                }
            }
            KeyCode::Char('a') => self.store.toggle_all_rows(),
            KeyCode::Char('d') => self.delete_rows(),
            KeyCode::Char('/') => {
                self.input = self.table.query.search_query.clone();
                self.mode = InputMode::Search;
            }
            KeyCode::Char('f') => {
                if let Some(column) = self.current_column() {
                    self.input = self
                        .table
                        .query
                        .params
                        .get(&column)
                        .unwrap_or_default()
                        .to_string();
                    self.mode = InputMode::Filter { column };
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let (Some(column), Some(row)) =
                    (self.current_column(), self.table.rows.get(self.cursor_row))
                {
                    self.input = row.display(&column);
                    self.mode = InputMode::Edit {
                        row: self.cursor_row,
                        column,
                    };
                }
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.input.clear();
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Enter => {
                let mode = std::mem::take(&mut self.mode);
                let input = std::mem::take(&mut self.input);
                self.submit_input(mode, input);
            }
            _ => {}
        }
    }

    fn submit_input(&mut self, mode: InputMode, input: String) {
        match mode {
            InputMode::Normal => {}
            InputMode::Search => {
                self.spawn(move |store| async move { store.search(input.trim()).await });
            }
            InputMode::Filter { column } => {
                self.store.set_filter(&column, input.trim());
                self.spawn(|store| async move { store.go_to_page(1).await });
            }
            InputMode::Edit { row, column } => {
                let value = parse_cell_input(&input);
                self.spawn(move |store| async move { store.edit_field(row, &column, value).await });
            }
        }
    }

    /// Delete the selected rows, or the row under the cursor when nothing is selected.
    fn delete_rows(&mut self) {
        let mut ids = self.store.selected_ids();
        if ids.is_empty() {
            if let Some(id) = self.table.rows.get(self.cursor_row).and_then(|r| r.id()) {
                ids.push(id);
            }
        }
        if ids.is_empty() {
            return;
        }

        self.spawn(move |store| async move {
            for id in ids {
                store.delete_item(id).await?;
            }
            Ok::<(), TableError>(())
        });
    }

    /// Run a store operation in the background. Failures are already
    /// surfaced as notifications, so they are only logged here.
    fn spawn<F, Fut>(&self, op: F)
    where
        F: FnOnce(TableDataStore) -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let fut = op(self.store.clone());
        tokio::spawn(async move {
            match fut.await {
                Err(e) if e.is_remote() => log::warn!("remote operation failed: {}", e),
                Err(e) => log::debug!("operation finished with error: {}", e),
                Ok(()) => {}
            }
        });
    }
}

fn clamp_cursor(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}

/// Interpret typed cell text: JSON scalars stay typed, anything else is a string.
pub fn parse_cell_input(input: &str) -> Value {
    match serde_json::from_str::<Value>(input.trim()) {
        Ok(value @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => value,
        _ => Value::String(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_cell_input() {
        assert_eq!(parse_cell_input("42"), json!(42));
        assert_eq!(parse_cell_input(" 2.5 "), json!(2.5));
        assert_eq!(parse_cell_input("true"), json!(true));
        assert_eq!(parse_cell_input("null"), Value::Null);
        assert_eq!(parse_cell_input("hello"), json!("hello"));
        assert_eq!(parse_cell_input("\"quoted\""), json!("\"quoted\""));
        assert_eq!(parse_cell_input("[1]"), json!("[1]"));
    }

    #[test]
    fn test_clamp_cursor() {
        assert_eq!(clamp_cursor(0, 0), 0);
        assert_eq!(clamp_cursor(5, 3), 2);
        assert_eq!(clamp_cursor(1, 3), 1);
    }

    #[test]
    fn test_prompts() {
        assert_eq!(InputMode::Search.prompt(), "Search: ");
        assert_eq!(
            InputMode::Filter {
                column: "name".to_string()
            }
            .prompt(),
            "Filter name: "
        );
    }
}
