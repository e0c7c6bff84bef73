//! Drag-to-reorder sessions.

use log::debug;

use crate::error::GridError;
use crate::identity::RowKey;

/// An in-progress drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession<K> {
    pub key: K,
    /// Index of the dragged row within the rendered rows.
    pub index: usize,
}

/// Tracks the row being dragged between a drag-start and a drag-end.
#[derive(Debug, Clone)]
pub struct DragReorder<K: RowKey> {
    active: Option<DragSession<K>>,
}

impl<K: RowKey> Default for DragReorder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RowKey> DragReorder<K> {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn begin(&mut self, key: K, index: usize) {
        debug!("drag start {key:?} at {index}");
        self.active = Some(DragSession { key, index });
    }

    pub fn dragging(&self) -> Option<&K> {
        self.active.as_ref().map(|session| &session.key)
    }

    /// Finish the drag. Returns the session that was active, if any.
    pub fn end(&mut self) -> Option<DragSession<K>> {
        let session = self.active.take();
        if let Some(session) = &session {
            debug!("drag end {:?}", session.key);
        }
        session
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }
}

/// Move the row at `from` to `to`, keeping every other row in order.
///
/// Both indices refer to `rows`. Moving a row onto itself returns an
/// unchanged copy.
pub fn reorder<T: Clone>(rows: &[T], from: usize, to: usize) -> Result<Vec<T>, GridError> {
    let len = rows.len();
    for index in [from, to] {
        if index >= len {
            return Err(GridError::IndexOutOfRange { index, len });
        }
    }
    let mut next = rows.to_vec();
    let row = next.remove(from);
    next.insert(to, row);
    Ok(next)
}
