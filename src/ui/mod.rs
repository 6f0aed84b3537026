// UI module for rendering the TUI.
// Lays out the title bar, table, prompt/notification line, and key hints.

mod table;

use ratatui::{prelude::*, widgets::*};

use tabsync::Severity;

use crate::app::{App, InputMode};

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Min(1),    // Table
            Constraint::Length(1), // Prompt or latest notification
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title(frame, app, chunks[0]);

    let columns = app.columns();
    table::render_table(
        frame,
        &app.table,
        &columns,
        (app.cursor_row, app.cursor_col),
        chunks[1],
    );

    draw_message_line(frame, app, chunks[2]);
    draw_status_bar(frame, chunks[3]);

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw resource, page position, and active query.
fn draw_title(frame: &mut Frame, app: &App, area: Rect) {
    let query = &app.table.query;
    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.resource),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" page {}/{} ", query.current_page, query.pages_count),
            Style::default().fg(Color::Yellow),
        ),
    ];

    let shared = query.params.to_query_string();
    if !shared.is_empty() {
        spans.push(Span::styled(
            format!(" ?{}", shared),
            Style::default().fg(Color::Magenta),
        ));
    }

    if app.table.is_loading {
        spans.push(Span::styled(" ⏳", Style::default().fg(Color::Yellow)));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(title, area);
}

/// Draw the input prompt when typing, otherwise the most recent notification.
fn draw_message_line(frame: &mut Frame, app: &App, area: Rect) {
    if app.mode != InputMode::Normal {
        let line = Line::from(vec![
            Span::styled(app.mode.prompt(), Style::default().fg(Color::Yellow)),
            Span::raw(&app.input),
            Span::styled("█", Style::default().fg(Color::Yellow)),
        ]);
        let widget = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
        frame.render_widget(widget, area);
        return;
    }

    if let Some(note) = app.notifications.latest() {
        let (icon, color) = match note.severity {
            Severity::Default => ("✅", Color::Green),
            Severity::Warning => ("⚠", Color::Yellow),
            Severity::Error => ("❌", Color::Red),
        };
        let line = Line::from(vec![
            Span::styled(
                format!("{} ", note.timestamp.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format!("{} {}", icon, note.message), Style::default().fg(color)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Draw the status bar with key hints.
fn draw_status_bar(frame: &mut Frame, area: Rect) {
    let hints = vec![
        Span::raw(" ↑↓←→ "),
        Span::styled("Move", Style::default().fg(Color::DarkGray)),
        Span::raw("  n/p "),
        Span::styled("Page", Style::default().fg(Color::DarkGray)),
        Span::raw("  / "),
        Span::styled("Search", Style::default().fg(Color::DarkGray)),
        Span::raw("  f "),
        Span::styled("Filter", Style::default().fg(Color::DarkGray)),
        Span::raw("  e "),
        Span::styled("Edit", Style::default().fg(Color::DarkGray)),
        Span::raw("  ␣ "),
        Span::styled("Select", Style::default().fg(Color::DarkGray)),
        Span::raw("  d "),
        Span::styled("Delete", Style::default().fg(Color::DarkGray)),
        Span::raw("  ? "),
        Span::styled("Help", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ];

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 50;
    let popup_height = 20;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(
        popup_x,
        popup_y,
        popup_width.min(area.width),
        popup_height.min(area.height),
    );

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let entries = [
        ("↑/↓ or j/k", "Move row cursor"),
        ("←/→ or h/l", "Move column cursor"),
        ("n / PgDn", "Next page"),
        ("p / PgUp", "Previous page"),
        ("g / G", "First / last page"),
        ("Space", "Toggle row selection"),
        ("a", "Select all / clear selection"),
        ("/", "Search"),
        ("f", "Filter by current column"),
        ("e / Enter", "Edit current cell"),
        ("d", "Delete selected (or current) rows"),
        ("r", "Reload"),
        ("?", "Show/hide this help"),
        ("q", "Quit"),
    ];

    let mut help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ];
    help_text.extend(entries.iter().map(|(keys, action)| {
        Line::from(vec![
            Span::styled(format!("  {:<14}", keys), Style::default().fg(Color::Cyan)),
            Span::raw(*action),
        ])
    }));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" or ", Style::default().fg(Color::DarkGray)),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::styled(" to close", Style::default().fg(Color::DarkGray)),
    ]));

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}
