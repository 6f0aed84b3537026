// Client-side store for a paginated, searchable table backed by a REST collection.
// Syncs paging, search, selection, and edits with the remote resource.

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod paths;
pub mod query;
pub mod session;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{Result, TableError};
pub use notify::{Notification, NotificationLog, Notifier, Severity};
pub use session::{Session, StaticSession, TokenFile};
pub use state::{Selection, SelectionEntry, TableState};
pub use store::TableDataStore;
