// Observable table snapshot.
// Everything a view needs to render one table, replaced as a unit on each load.

use crate::api::{PageResponse, Row, SupplementaryData};
use crate::query::QueryState;

use super::selection::Selection;

/// Complete state of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    /// Rows of the current page, vacuous rows removed.
    pub rows: Vec<Row>,
    /// Option lists for foreign-key fields.
    pub supplementary: SupplementaryData,
    /// Selection flags, index-aligned with `rows`.
    pub selection: Selection,
    /// Paging, search, and filter parameters.
    pub query: QueryState,
    /// Whether a fetch is in flight.
    pub is_loading: bool,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            supplementary: SupplementaryData::new(),
            selection: Selection::default(),
            query: QueryState::default(),
            is_loading: true,
        }
    }
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile a fetched page into this state.
    pub fn apply_page(&mut self, page: PageResponse) {
        self.rows = page
            .data
            .into_iter()
            .filter(|row| !row.is_vacuous())
            .collect();
        self.supplementary = page.additional.unwrap_or_default();
        self.query.set_pages_count(page.total_pages);
        self.selection = Selection::for_rows(&self.rows);

        // Filters are derived once and kept for the lifetime of the table.
        if self.query.available_filters.is_empty() {
            self.query.available_filters = self
                .rows
                .first()
                .map(Row::field_names)
                .unwrap_or_default();
        }

        self.is_loading = false;
    }

    /// True when every row is selected (vacuously true with no rows).
    pub fn all_selected(&self) -> bool {
        self.selection.all_selected()
    }

    pub fn row_index(&self, id: i64) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == Some(id))
    }

    pub fn find_row(&self, id: i64) -> Option<&Row> {
        self.rows.iter().find(|row| row.id() == Some(id))
    }
}
