// Table rendering for the loaded page.
// Shows selection checkboxes, resolves foreign-key ids to option labels, and marks the cursor.

use ratatui::{prelude::*, widgets::*};

use tabsync::TableState as TableSnapshot;
use tabsync::api::{Row as Record, SupplementaryData};

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

/// Cell text, using the option label when the field has one for this id.
pub fn cell_text(row: &Record, column: &str, supplementary: &SupplementaryData) -> String {
    let options = supplementary.get(column);
    let id = row.get(column).and_then(|v| v.as_i64());
    match (options, id) {
        (Some(options), Some(id)) => options
            .iter()
            .find(|option| option.id == id)
            .map(|option| option.name.clone())
            .unwrap_or_else(|| row.display(column)),
        _ => row.display(column),
    }
}

/// Render the rows of the current page.
pub fn render_table(
    frame: &mut Frame,
    table: &TableSnapshot,
    columns: &[String],
    cursor: (usize, usize),
    area: Rect,
) {
    if table.rows.is_empty() {
        if table.is_loading {
            render_loading(frame, area, "Loading rows");
        } else {
            render_empty(frame, area, "No rows found");
        }
        return;
    }

    let (cursor_row, cursor_col) = cursor;
    let header_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let check = if table.all_selected() { "[x]" } else { "[ ]" };
    let mut header_cells = vec![Cell::from(check)];
    header_cells.extend(columns.iter().map(|column| Cell::from(column.as_str())));
    let header = Row::new(header_cells).style(header_style);

    let rows: Vec<Row> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mark = if table.selection.is_selected(i) {
                Cell::from("[x]").style(Style::default().fg(Color::Green))
            } else {
                Cell::from("[ ]").style(Style::default().fg(Color::DarkGray))
            };

            let mut cells = vec![mark];
            cells.extend(columns.iter().enumerate().map(|(c, column)| {
                let cell = Cell::from(cell_text(row, column, &table.supplementary));
                if i == cursor_row && c == cursor_col {
                    cell.style(Style::default().fg(Color::Black).bg(Color::Yellow))
                } else {
                    cell
                }
            }));
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(3)];
    widths.extend(columns.iter().map(|_| Constraint::Fill(1)));

    let title = if table.is_loading {
        " Rows (refreshing) ".to_string()
    } else {
        format!(" Rows ({}) ", table.rows.len())
    };

    let widget = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .column_spacing(1);

    let mut state = TableState::default().with_selected(Some(cursor_row));
    frame.render_stateful_widget(widget, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tabsync::api::OptionItem;

    #[test]
    fn test_cell_text_resolves_options() {
        let row: Record = serde_json::from_value(json!({"id": 1, "ownerFK": 7, "name": "x"})).unwrap();
        let mut supplementary = SupplementaryData::new();
        supplementary.insert(
            "ownerFK".to_string(),
            vec![OptionItem {
                id: 7,
                name: "Alice".to_string(),
            }],
        );

        assert_eq!(cell_text(&row, "ownerFK", &supplementary), "Alice");
        assert_eq!(cell_text(&row, "name", &supplementary), "x");
        assert_eq!(cell_text(&row, "missing", &supplementary), "");
    }

    #[test]
    fn test_cell_text_unknown_option_falls_back_to_id() {
        let row: Record = serde_json::from_value(json!({"ownerFK": 9})).unwrap();
        let mut supplementary = SupplementaryData::new();
        supplementary.insert("ownerFK".to_string(), Vec::new());

        assert_eq!(cell_text(&row, "ownerFK", &supplementary), "9");
    }
}
