//! Column resizing. [`ColumnResizeController`] is the only writer of the
//! resized-width map the width resolver reads.

use std::collections::HashMap;

use gridline_layout::Column;
use log::{debug, trace};

use crate::error::GridError;

/// Pointer drag on a column edge.
#[derive(Debug, Clone, PartialEq)]
struct ActiveResize {
    column: String,
    origin_x: f64,
    start_width: f64,
}

/// Owns user-resized column widths.
#[derive(Debug, Clone, Default)]
pub struct ColumnResizeController {
    widths: HashMap<String, f64>,
    active: Option<ActiveResize>,
}

impl ColumnResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn widths(&self) -> &HashMap<String, f64> {
        &self.widths
    }

    pub fn width_of(&self, column: &str) -> Option<f64> {
        self.widths.get(column).copied()
    }

    /// Set a column's width, clamped to its bounds. Returns the stored width.
    pub fn set_width(
        &mut self,
        columns: &[Column],
        key: &str,
        width: f64,
    ) -> Result<f64, GridError> {
        let column = find(columns, key)?;
        let width = column.clamp(width);
        debug!("resize {key} -> {width}");
        self.widths.insert(key.to_string(), width);
        Ok(width)
    }

    /// Drop every resized width (and any active drag).
    pub fn reset(&mut self) {
        self.widths.clear();
        self.active = None;
    }

    /// Forget widths of columns no longer in the set.
    pub fn retain_columns(&mut self, columns: &[Column]) {
        self.widths
            .retain(|key, _| columns.iter().any(|column| &column.key == key));
    }

    /// Start dragging the edge of `key`. Non-resizable columns are ignored.
    pub fn begin(
        &mut self,
        columns: &[Column],
        key: &str,
        pointer_x: f64,
        start_width: f64,
    ) -> Result<bool, GridError> {
        let column = find(columns, key)?;
        if !column.resizable {
            trace!("resize ignored: {key} is not resizable");
            return Ok(false);
        }
        self.active = Some(ActiveResize {
            column: key.to_string(),
            origin_x: pointer_x,
            start_width,
        });
        Ok(true)
    }

    /// Follow the pointer. Returns the column and its new width while a
    /// drag is active.
    pub fn pointer_move(&mut self, columns: &[Column], pointer_x: f64) -> Option<(String, f64)> {
        let active = self.active.as_ref()?;
        let proposed = active.start_width + (pointer_x - active.origin_x);
        let column = active.column.clone();
        let width = self.set_width(columns, &column, proposed).ok()?;
        Some((column, width))
    }

    /// Finish the drag. Returns the column that was being resized.
    pub fn pointer_up(&mut self) -> Option<String> {
        self.active.take().map(|active| active.column)
    }
}

fn find<'a>(columns: &'a [Column], key: &str) -> Result<&'a Column, GridError> {
    columns
        .iter()
        .find(|column| column.key == key)
        .ok_or_else(|| GridError::UnknownColumn(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name").min_width(60.0).max_width(200.0).resizable(),
            Column::new("age"),
        ]
    }

    #[test]
    fn test_set_width_clamps() {
        let mut resize = ColumnResizeController::new();
        assert_eq!(resize.set_width(&columns(), "name", 500.0), Ok(200.0));
        assert_eq!(resize.width_of("name"), Some(200.0));
        assert_eq!(
            resize.set_width(&columns(), "nope", 10.0),
            Err(GridError::UnknownColumn("nope".into()))
        );
    }

    #[test]
    fn test_pointer_session() {
        let cols = columns();
        let mut resize = ColumnResizeController::new();
        assert_eq!(resize.begin(&cols, "age", 0.0, 100.0), Ok(false));
        assert_eq!(resize.pointer_move(&cols, 10.0), None);

        assert_eq!(resize.begin(&cols, "name", 100.0, 100.0), Ok(true));
        assert_eq!(resize.pointer_move(&cols, 130.0), Some(("name".into(), 130.0)));
        assert_eq!(resize.pointer_move(&cols, 0.0), Some(("name".into(), 60.0)));
        assert_eq!(resize.pointer_up(), Some("name".into()));
        assert_eq!(resize.width_of("name"), Some(60.0));
        assert_eq!(resize.pointer_move(&cols, 200.0), None);
    }
}
