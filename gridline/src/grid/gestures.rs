//! Gesture handling: row drags, column-edge drags, resize and scroll.

use log::{debug, trace, warn};

use super::{Grid, GridInner};
use crate::error::GridError;
use crate::events::GridEvent;
use crate::gesture::GestureEvent;
use crate::identity::{RowData, RowKey};
use crate::reorder::reorder;

impl<T: RowData, K: RowKey> GridInner<T, K> {
    fn check_drag(&self) -> Result<(), GridError> {
        if !self.config.drag_sort {
            return Err(GridError::DragUnavailable("drag sorting is off"));
        }
        if self.config.virtualized {
            return Err(GridError::DragUnavailable("rows are virtualized"));
        }
        if self.client_sort_active() {
            return Err(GridError::DragUnavailable("a client-side sort is active"));
        }
        Ok(())
    }

    fn drag_start(
        &mut self,
        key: K,
        index: usize,
        events: &mut Vec<GridEvent<T, K>>,
    ) -> Result<(), GridError> {
        self.check_drag()?;
        let rows = self.page_rows();
        let Some(row) = rows.get(index) else {
            return Err(GridError::IndexOutOfRange {
                index,
                len: rows.len(),
            });
        };
        if self.identity.key_of(row) != key {
            return Err(GridError::DragKeyMismatch {
                key: format!("{key:?}"),
                index,
            });
        }
        self.drag.begin(key.clone(), index);
        events.push(GridEvent::DragStart { key, index });
        Ok(())
    }

    /// Move the page row at `source` to `destination`. Both are page
    /// relative; the move is applied to the full row order.
    fn drag_end(
        &mut self,
        source: usize,
        destination: Option<usize>,
        events: &mut Vec<GridEvent<T, K>>,
    ) -> Result<(), GridError> {
        if self.drag.end().is_none() {
            warn!("drag end without a drag start");
        }
        let Some(destination) = destination else {
            debug!("drag dropped outside the grid");
            return Ok(());
        };
        self.check_drag()?;

        let visible = self.transitions.visible().to_vec();
        let page = self.page_range(visible.len());
        for index in [source, destination] {
            if index >= page.len() {
                return Err(GridError::IndexOutOfRange {
                    index,
                    len: page.len(),
                });
            }
        }
        if source == destination {
            return Ok(());
        }

        let next = reorder(&visible, page.start + source, page.start + destination)?;
        let key = self.identity.key_of(&next[page.start + destination]);
        self.transitions.set_order(next);
        debug!("reordered {key:?} {source} -> {destination}");
        events.push(GridEvent::Reorder {
            key,
            from: source,
            to: destination,
            rows: self.transitions.rows().to_vec(),
        });
        Ok(())
    }

    fn pointer_down(&mut self, column: &str, x: f64) -> Result<(), GridError> {
        let start_width = self
            .resolved_widths()
            .get(column)
            .or_else(|| self.resize.width_of(column))
            .unwrap_or(0.0);
        self.resize.begin(&self.columns, column, x, start_width)?;
        Ok(())
    }

    fn pointer_move(&mut self, x: f64, events: &mut Vec<GridEvent<T, K>>) {
        match self.resize.pointer_move(&self.columns, x) {
            Some((column, width)) => events.push(GridEvent::ColumnResize { column, width }),
            None => trace!("pointer move without a resize session"),
        }
    }
}

impl<T: RowData, K: RowKey> Grid<T, K> {
    /// Apply a gesture reported by the host.
    pub fn handle_gesture(&self, gesture: GestureEvent<K>) -> Result<(), GridError> {
        self.update(|inner, events| match gesture {
            GestureEvent::DragStart { key, index } => inner.drag_start(key, index, events),
            GestureEvent::DragEnd {
                source,
                destination,
            } => inner.drag_end(source, destination, events),
            GestureEvent::PointerDown { column, x } => inner.pointer_down(&column, x),
            GestureEvent::PointerMove { x } => {
                inner.pointer_move(x, events);
                Ok(())
            }
            GestureEvent::PointerUp => {
                if let Some(column) = inner.resize.pointer_up() {
                    debug!("resize of {column} finished");
                }
                Ok(())
            }
            GestureEvent::Resize { width } => {
                trace!("container resized to {width}");
                inner.container_width = width;
                Ok(())
            }
            GestureEvent::Scroll { top, left } => {
                inner.scroll_top = top.max(0.0);
                inner.scroll_left = left.max(0.0);
                Ok(())
            }
        })
    }

    /// Key of the row being dragged.
    pub fn dragging(&self) -> Option<K> {
        self.read().drag.dragging().cloned()
    }

    /// Resizable data column whose trailing edge is within `tolerance` of
    /// the on-screen position `x`.
    pub fn resize_edge_at(&self, x: f64, tolerance: f64) -> Option<String> {
        let inner = self.read();
        inner
            .column_spans()
            .into_iter()
            .filter(|span| !span.action && span.resizable)
            .find(|span| (span.left + span.width - x).abs() <= tolerance)
            .map(|span| span.key)
    }
}
