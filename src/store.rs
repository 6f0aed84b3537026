// Table data store.
// Keeps paging, search, selection, and edits in sync with the remote collection.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::watch;

use crate::api::{ResourceClient, Transport};
use crate::config::Config;
use crate::error::{Result, TableError};
use crate::notify::{Notifier, Severity};
use crate::query::{PARAM_SEARCH, QueryParams};
use crate::session::Session;
use crate::state::TableState;

pub const MSG_FETCH_FAILED: &str = "Failed to fetch data. Try to re-login";
pub const MSG_DELETED: &str = "Item deleted successfully";
pub const MSG_DELETE_FAILED: &str = "Failed to delete the item.";
pub const MSG_ITEM_NOT_FOUND: &str = "Item with the specified ID not found.";
pub const MSG_UPDATED: &str = "Data successfully updated";

/// Store for one remote table.
///
/// State lives in a [`watch`] channel: every transition is a single
/// `send_modify`, so subscribers only ever observe complete snapshots.
/// Each load is tagged with a generation number and a response is applied
/// only while its generation is still the latest one issued.
///
/// Cloning is cheap and clones share state.
#[derive(Clone)]
pub struct TableDataStore {
    inner: Arc<Inner>,
}

struct Inner {
    client: ResourceClient,
    notifier: Arc<dyn Notifier>,
    page_size: u32,
    state: watch::Sender<TableState>,
    generation: AtomicU64,
}

impl TableDataStore {
    pub fn new(
        config: &Config,
        transport: Arc<dyn Transport>,
        session: Arc<dyn Session>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(TableState::new());
        Self {
            inner: Arc::new(Inner {
                client: ResourceClient::new(config, transport, session),
                notifier,
                page_size: config.page_size(),
                state,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<TableState> {
        self.inner.state.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> TableState {
        self.inner.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    // Query parameters

    /// Insert or replace an additional query parameter. Applies on the next load.
    pub fn set_param(&self, key: &str, value: &str) {
        self.inner
            .state
            .send_modify(|state| state.query.params.set(key, value));
    }

    /// Remove an additional query parameter if present.
    pub fn clear_param(&self, key: &str) {
        self.inner.state.send_if_modified(|state| {
            if !state.query.params.contains(key) {
                return false;
            }
            state.query.params.remove(key);
            true
        });
    }

    /// Set a column filter. An empty value removes it.
    pub fn set_filter(&self, column: &str, value: &str) {
        if value.is_empty() {
            self.clear_param(column);
        } else {
            self.set_param(column, value);
        }
    }

    /// Query string for a shareable view URL.
    pub fn share_query(&self) -> String {
        self.inner.state.borrow().query.params.to_query_string()
    }

    // Search

    /// Search the collection. An empty query removes the search filter.
    pub async fn search(&self, query: &str) -> Result<()> {
        self.inner.state.send_modify(|state| {
            state.is_loading = true;
            state.query.search_query = query.to_string();
            if query.is_empty() {
                state.query.params.remove(PARAM_SEARCH);
            } else {
                state.query.params.set(PARAM_SEARCH, query);
            }
        });
        self.load().await
    }

    // Pagination

    /// Jump to a page, clamped into `[1, pages_count]`.
    pub async fn go_to_page(&self, page: i64) -> Result<()> {
        self.inner.state.send_modify(|state| {
            state.query.current_page = state.query.clamp_page(page);
        });
        self.load().await
    }

    pub async fn next_page(&self) -> Result<()> {
        let (current, at_end) = {
            let state = self.inner.state.borrow();
            (state.query.current_page, state.query.is_last_page())
        };
        if at_end {
            return Ok(());
        }
        self.go_to_page(i64::from(current) + 1).await
    }

    pub async fn previous_page(&self) -> Result<()> {
        let (current, at_start) = {
            let state = self.inner.state.borrow();
            (state.query.current_page, state.query.is_first_page())
        };
        if at_start {
            return Ok(());
        }
        self.go_to_page(i64::from(current) - 1).await
    }

    // Selection

    /// Flip the selection of one row. Returns the new state.
    pub fn toggle_row(&self, index: usize) -> Result<bool> {
        let mut result = Ok(false);
        self.inner.state.send_if_modified(|state| {
            result = state.selection.toggle(index);
            result.is_ok()
        });
        result
    }

    /// Select every row, or clear the selection if all rows are selected.
    pub fn toggle_all_rows(&self) {
        self.inner
            .state
            .send_modify(|state| state.selection.toggle_all());
    }

    pub fn all_selected(&self) -> bool {
        self.inner.state.borrow().all_selected()
    }

    pub fn selected_ids(&self) -> Vec<i64> {
        self.inner.state.borrow().selection.selected_ids()
    }

    // Remote operations

    /// Reload the current page.
    ///
    /// A failure clears the session and leaves rows and paging untouched.
    pub async fn load(&self) -> Result<()> {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let params = {
            let state = self.inner.state.borrow();
            state.query.request_params(self.inner.page_size)
        };
        self.inner.state.send_modify(|state| state.is_loading = true);

        match self.inner.client.fetch_page(&params).await {
            Ok(page) => {
                let applied = self.inner.state.send_if_modified(|state| {
                    if !self.is_latest(generation) {
                        return false;
                    }
                    state.apply_page(page);
                    true
                });
                if !applied {
                    log::debug!("discarded stale page (generation {})", generation);
                }
                Ok(())
            }
            Err(e) => {
                let applied = self.inner.state.send_if_modified(|state| {
                    if !self.is_latest(generation) {
                        return false;
                    }
                    state.is_loading = false;
                    true
                });
                if applied {
                    log::warn!("load failed: {}", e);
                    self.invalidate_session();
                } else {
                    log::debug!("discarded stale failure (generation {}): {}", generation, e);
                }
                Err(e)
            }
        }
    }

    /// Delete an item and reload on success.
    pub async fn delete_item(&self, id: i64) -> Result<()> {
        match self.inner.client.delete(id).await {
            Ok(response) if response.ok() => {
                self.notify(MSG_DELETED, Severity::Default);
                self.load().await
            }
            Ok(response) => {
                self.notify(MSG_DELETE_FAILED, Severity::Error);
                Err(TableError::Status {
                    status: response.status,
                })
            }
            Err(e) => {
                log::warn!("delete of {} failed: {}", id, e);
                self.invalidate_session();
                Err(e)
            }
        }
    }

    /// Change one field of a loaded row and submit the row.
    pub async fn edit_field(&self, index: usize, key: &str, value: Value) -> Result<()> {
        let mut outcome = Ok(None);
        self.inner.state.send_if_modified(|state| {
            let len = state.rows.len();
            match state.rows.get_mut(index) {
                Some(row) => {
                    row.set(key, value);
                    outcome = Ok(row.id());
                    true
                }
                None => {
                    outcome = Err(TableError::IndexOutOfRange { index, len });
                    false
                }
            }
        });

        match outcome {
            Ok(Some(id)) => self.submit(id).await,
            Ok(None) => {
                self.notify(MSG_ITEM_NOT_FOUND, Severity::Warning);
                Err(TableError::MissingId { index })
            }
            Err(e) => {
                self.notify(&e.to_string(), Severity::Warning);
                Err(e)
            }
        }
    }

    /// Send a loaded row back to the server, then reload.
    pub async fn submit(&self, id: i64) -> Result<()> {
        let fields = {
            let state = self.inner.state.borrow();
            state.find_row(id).map(|row| row.form_pairs())
        };
        let Some(fields) = fields else {
            self.notify(MSG_ITEM_NOT_FOUND, Severity::Warning);
            return Err(TableError::ItemNotFound(id));
        };
        let params: QueryParams = fields.into_iter().collect();

        match self.inner.client.update(id, &params).await {
            Ok(response) => {
                let outcome = if response.ok() {
                    self.notify(MSG_UPDATED, Severity::Default);
                    Ok(())
                } else {
                    let err = TableError::Status {
                        status: response.status,
                    };
                    self.notify(&err.to_string(), Severity::Error);
                    Err(err)
                };
                let reloaded = self.load().await;
                outcome.and(reloaded)
            }
            Err(e) => {
                self.notify(&format!("Failed to submit data: {}", e), Severity::Warning);
                Err(e)
            }
        }
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == generation
    }

    fn invalidate_session(&self) {
        self.inner.client.session().logout();
        self.notify(MSG_FETCH_FAILED, Severity::Warning);
    }

    fn notify(&self, message: &str, severity: Severity) {
        self.inner.notifier.notify(message, severity);
    }
}
