//! Imperative handle exposed to hosts.

use gridline_layout::ScrollAlign;

use crate::grid::Grid;
use crate::identity::{RowData, RowKey};

/// Scroll and measurement commands for a grid.
pub struct GridHandle<T, K: RowKey> {
    grid: Grid<T, K>,
}

impl<T, K: RowKey> Clone for GridHandle<T, K> {
    fn clone(&self) -> Self {
        Self {
            grid: self.grid.clone(),
        }
    }
}

impl<T: RowData, K: RowKey> GridHandle<T, K> {
    pub(crate) fn new(grid: Grid<T, K>) -> Self {
        Self { grid }
    }

    /// Bring the page row at `index` into view. Returns the new scroll
    /// offset, `None` for an out-of-range index.
    pub fn scroll_to_index(&self, index: usize, align: ScrollAlign) -> Option<f64> {
        self.grid.scroll_to_index(index, align)
    }

    /// Report a rendered row's height. Returns true if it changed.
    pub fn measure(&self, key: K, height: f64) -> bool {
        self.grid.measure_row(key, height)
    }
}
