use std::collections::HashSet;

use crate::error::LayoutError;

/// Edge a column is pinned to while the body scrolls horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedSide {
    Start,
    End,
}

/// A column declaration.
///
/// Widths are in pixels. A column with neither a declared width nor a
/// resized width is flexible and shares whatever space is left.
///
/// ```ignore
/// let columns = vec![
///     Column::new("name").min_width(120.0),
///     Column::new("status").width(90.0).fixed(FixedSide::End),
///     Column::new("email").sortable().resizable(),
/// ];
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub key: String,
    pub title: Option<String>,
    pub width: Option<f64>,
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub fixed: Option<FixedSide>,
    pub sortable: bool,
    pub resizable: bool,
}

impl Column {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: None,
            width: None,
            min_width: None,
            max_width: None,
            fixed: None,
            sortable: false,
            resizable: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Declare an explicit width.
    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn min_width(mut self, width: f64) -> Self {
        self.min_width = Some(width);
        self
    }

    pub fn max_width(mut self, width: f64) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Pin the column to an edge.
    pub fn fixed(mut self, side: FixedSide) -> Self {
        self.fixed = Some(side);
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn resizable(mut self) -> Self {
        self.resizable = true;
        self
    }

    /// Clamp a width into this column's `[min_width, max_width]` bounds.
    ///
    /// The lower bound wins when the bounds are inverted. Never negative.
    pub fn clamp(&self, width: f64) -> f64 {
        let mut width = width;
        if let Some(max) = self.max_width {
            width = width.min(max);
        }
        if let Some(min) = self.min_width {
            width = width.max(min);
        }
        width.max(0.0)
    }
}

/// Columns partitioned by their fixed side, each group in declared order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnGroups<'a> {
    pub start: Vec<&'a Column>,
    pub scrollable: Vec<&'a Column>,
    pub end: Vec<&'a Column>,
}

impl<'a> ColumnGroups<'a> {
    pub fn partition(columns: &'a [Column]) -> Self {
        let mut groups = Self::default();
        for column in columns {
            match column.fixed {
                Some(FixedSide::Start) => groups.start.push(column),
                Some(FixedSide::End) => groups.end.push(column),
                None => groups.scrollable.push(column),
            }
        }
        groups
    }

    /// Keys in render order: start-fixed, scrollable, end-fixed.
    pub fn render_order(&self) -> Vec<&'a str> {
        self.start
            .iter()
            .chain(self.scrollable.iter())
            .chain(self.end.iter())
            .map(|c| c.key.as_str())
            .collect()
    }

    pub fn start_keys(&self) -> Vec<&'a str> {
        self.start.iter().map(|c| c.key.as_str()).collect()
    }

    pub fn end_keys(&self) -> Vec<&'a str> {
        self.end.iter().map(|c| c.key.as_str()).collect()
    }

    pub fn has_fixed(&self) -> bool {
        !self.start.is_empty() || !self.end.is_empty()
    }
}

/// Reject column sets that reuse a key.
pub fn validate_columns(columns: &[Column]) -> Result<(), LayoutError> {
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if !seen.insert(column.key.as_str()) {
            return Err(LayoutError::DuplicateColumnKey(column.key.clone()));
        }
    }
    Ok(())
}
