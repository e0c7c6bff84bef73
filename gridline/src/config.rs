//! Grid configuration.

use std::time::Duration;

use gridline_layout::{ActionColumns, WindowConfig, DEFAULT_OVERSCAN, DEFAULT_ROW_HEIGHT};
use serde::Deserialize;
use thiserror::Error;

use crate::selection::SelectionMode;

/// Default time an added or deleted row stays highlighted.
pub const DEFAULT_HIGHLIGHT_DURATION: Duration = Duration::from_millis(1000);

/// Default fade-out time before a deleted row leaves the collection.
pub const DEFAULT_FADE_OUT_DURATION: Duration = Duration::from_millis(300);

/// Per-grid configuration.
///
/// Deserialises from a map with millisecond durations; every field is
/// optional and falls back to [`GridConfig::default`].
///
/// ```ignore
/// let config = GridConfig::new()
///     .selection(SelectionMode::Multiple)
///     .virtualized(36.0)
///     .highlight(Duration::from_millis(600));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Estimated height of an unmeasured row.
    pub row_height: f64,
    /// Rows rendered beyond each viewport edge when virtualized.
    pub overscan: usize,
    /// Render only the rows near the viewport.
    pub virtualized: bool,
    #[serde(rename = "highlight_ms", with = "millis")]
    pub highlight_duration: Duration,
    #[serde(rename = "fade_out_ms", with = "millis")]
    pub fade_out_duration: Duration,
    pub selection_mode: SelectionMode,
    /// Keep selections of rows outside the current page on "select all".
    pub preserve_selection: bool,
    /// Show the expand toggle column.
    pub expandable: bool,
    /// Allow drag reordering of rows.
    pub drag_sort: bool,
    /// Rows per page; `None` shows every row.
    pub page_size: Option<usize>,
    pub drag_handle_width: f64,
    pub selection_column_width: f64,
    pub expansion_column_width: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            virtualized: false,
            highlight_duration: DEFAULT_HIGHLIGHT_DURATION,
            fade_out_duration: DEFAULT_FADE_OUT_DURATION,
            selection_mode: SelectionMode::None,
            preserve_selection: false,
            expandable: false,
            drag_sort: false,
            page_size: None,
            drag_handle_width: 32.0,
            selection_column_width: 48.0,
            expansion_column_width: 48.0,
        }
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn on windowing with the given row height estimate.
    pub fn virtualized(mut self, row_height: f64) -> Self {
        self.virtualized = true;
        self.row_height = row_height;
        self
    }

    pub fn overscan(mut self, rows: usize) -> Self {
        self.overscan = rows;
        self
    }

    pub fn highlight(mut self, duration: Duration) -> Self {
        self.highlight_duration = duration;
        self
    }

    pub fn fade_out(mut self, duration: Duration) -> Self {
        self.fade_out_duration = duration;
        self
    }

    pub fn selection(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Keep off-page selections when toggling all rows.
    pub fn preserve_selection(mut self) -> Self {
        self.preserve_selection = true;
        self
    }

    pub fn expandable(mut self) -> Self {
        self.expandable = true;
        self
    }

    pub fn drag_sort(mut self) -> Self {
        self.drag_sort = true;
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Drag reordering competes with windowing for row materialisation,
    /// so it is only live when windowing is off.
    pub fn drag_enabled(&self) -> bool {
        self.drag_sort && !self.virtualized
    }

    pub fn window_config(&self) -> WindowConfig {
        WindowConfig {
            row_height: self.row_height,
            overscan: self.overscan,
        }
    }

    /// The constant-width action columns this configuration renders.
    pub fn action_columns(&self) -> ActionColumns {
        ActionColumns {
            drag_handle: self.drag_enabled().then_some(self.drag_handle_width),
            selection: (self.selection_mode != SelectionMode::None)
                .then_some(self.selection_column_width),
            expansion: self.expandable.then_some(self.expansion_column_width),
        }
    }

    /// Check the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            return Err(ConfigError::InvalidRowHeight(self.row_height));
        }
        for (name, width) in [
            ("drag_handle_width", self.drag_handle_width),
            ("selection_column_width", self.selection_column_width),
            ("expansion_column_width", self.expansion_column_width),
        ] {
            if !width.is_finite() || width < 0.0 {
                return Err(ConfigError::InvalidActionWidth { name, width });
            }
        }
        if self.page_size == Some(0) {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }
}

/// Configuration values rejected by [`GridConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Row height must be a positive number, got {0}")]
    InvalidRowHeight(f64),

    #[error("Action column width '{name}' must be a non-negative number, got {width}")]
    InvalidActionWidth {
        /// Which width field.
        name: &'static str,
        /// The rejected value.
        width: f64,
    },

    #[error("Page size must be at least 1")]
    ZeroPageSize,
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
