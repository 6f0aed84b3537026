// Per-row selection state.
// One entry per loaded row, index-aligned with the row list.

use crate::api::Row;
use crate::error::{Result, TableError};

/// Selection flag for one loaded row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionEntry {
    pub id: Option<i64>,
    pub selected: bool,
}

/// Selection flags, index-aligned with the loaded rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: Vec<SelectionEntry>,
}

impl Selection {
    /// Fresh, fully deselected entries for the given rows.
    pub fn for_rows(rows: &[Row]) -> Self {
        Self {
            entries: rows
                .iter()
                .map(|row| SelectionEntry {
                    id: row.id(),
                    selected: false,
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&SelectionEntry> {
        self.entries.get(index)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.entries.get(index).is_some_and(|e| e.selected)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flip one entry. Returns its new state.
    pub fn toggle(&mut self, index: usize) -> Result<bool> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(TableError::IndexOutOfRange { index, len })?;
        entry.selected = !entry.selected;
        Ok(entry.selected)
    }

    /// Select everything, or clear everything if it is already all selected.
    pub fn toggle_all(&mut self) {
        let select = !self.all_selected();
        for entry in &mut self.entries {
            entry.selected = select;
        }
    }

    /// True when every entry is selected (vacuously true when empty).
    pub fn all_selected(&self) -> bool {
        self.entries.iter().all(|e| e.selected)
    }

    /// Ids of selected rows, in row order.
    pub fn selected_ids(&self) -> Vec<i64> {
        self.entries
            .iter()
            .filter(|e| e.selected)
            .filter_map(|e| e.id)
            .collect()
    }
}
