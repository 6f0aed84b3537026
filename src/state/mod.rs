// State management module.
// Holds the table snapshot published to observers and its selection model.

pub mod selection;
pub mod table;

pub use selection::{Selection, SelectionEntry};
pub use table::TableState;
