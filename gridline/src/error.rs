//! Engine error types.

use gridline_layout::LayoutError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by [`Grid`](crate::Grid) operations.
///
/// Row keys are carried in their `Debug` form so the error stays
/// independent of the key type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// Two rows in one collection resolved to the same identity.
    #[error("Row key {0} appears more than once")]
    DuplicateRowKey(String),

    /// A column key that is not part of the column set.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// Sorting was requested on a column not marked sortable.
    #[error("Column '{0}' is not sortable")]
    ColumnNotSortable(String),

    /// Client-side sorting needs a comparator for every sortable column.
    #[error("Sortable column '{0}' has no comparator in client sort mode")]
    MissingComparator(String),

    /// A row index outside the rendered rows.
    #[error("Row index {index} out of range for {len} rows")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of rows it was checked against.
        len: usize,
    },

    /// A drag named a row that is not at the given page index.
    #[error("Row {key} is not at page index {index}")]
    DragKeyMismatch {
        /// `Debug` form of the dragged key.
        key: String,
        /// The page index it was claimed to be at.
        index: usize,
    },

    /// Drag reordering is not available in the current mode.
    #[error("Drag reorder unavailable: {0}")]
    DragUnavailable(&'static str),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
