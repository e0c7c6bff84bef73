//! What the engine hands to a renderer.

use gridline_layout::{FixedLayout, FixedOffset, VirtualWindow, WidthMap};

use crate::pagination::PageState;
use crate::sort::{SortDirection, SortState};

/// Per-row state merged from every controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowFlags {
    pub selected: bool,
    pub disabled: bool,
    pub expanded: bool,
    pub adding: bool,
    pub deleting: bool,
    pub fading_out: bool,
    pub dragging: bool,
}

/// A column as it should be drawn, action columns included.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderColumn {
    pub key: String,
    pub title: Option<String>,
    pub width: f64,
    /// Sticky placement, `None` for scrolling columns.
    pub fixed: Option<FixedOffset>,
    pub sort: SortDirection,
    pub sortable: bool,
    pub resizable: bool,
    /// Drag handle, selection or expansion column.
    pub action: bool,
}

/// A row to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow<T, K> {
    pub key: K,
    /// Index within the rendered page.
    pub index: usize,
    pub row: T,
    pub flags: RowFlags,
}

/// One frame of computed grid state.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot<T, K> {
    /// Columns in render order.
    pub columns: Vec<RenderColumn>,
    /// Resolved data column widths.
    pub widths: WidthMap,
    pub fixed: FixedLayout,
    /// Rows windowed out of the page, `None` when every row is rendered.
    pub window: Option<VirtualWindow>,
    pub rows: Vec<RenderedRow<T, K>>,
    pub sort: SortState,
    pub page: Option<PageState>,
    /// Rows before paging, animating removals included.
    pub total_rows: usize,
    pub all_selected: bool,
    pub indeterminate: bool,
    pub scroll_left: f64,
    pub scroll_top: f64,
}

impl<T, K> RenderSnapshot<T, K> {
    pub fn column(&self, key: &str) -> Option<&RenderColumn> {
        self.columns.iter().find(|column| column.key == key)
    }

    pub fn row(&self, key: &K) -> Option<&RenderedRow<T, K>>
    where
        K: PartialEq,
    {
        self.rows.iter().find(|row| &row.key == key)
    }

    /// Total width of every column.
    pub fn content_width(&self) -> f64 {
        self.columns.iter().map(|column| column.width).sum()
    }
}

/// Turns a snapshot into something visible.
pub trait HostRenderer<T, K> {
    type Error;

    fn render(&mut self, snapshot: &RenderSnapshot<T, K>) -> Result<(), Self::Error>;
}
