//! Grid events and the listener registry.
//!
//! The grid collects events while it holds its state lock and publishes
//! them once the lock is released, so listeners may call back into the
//! grid freely.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use log::trace;

use crate::pagination::PageState;
use crate::sort::SortState;

// =============================================================================
// Event Types
// =============================================================================

/// Identifies an event without its payload, for filtered subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridEventKind {
    /// Selected set changed
    SelectionChange,
    /// A row expanded or collapsed
    ExpandChange,
    /// Sort column or direction changed
    SortChange,
    /// Current page or page size changed
    PageChange,
    /// A row drag started
    DragStart,
    /// A drag moved a row
    Reorder,
    /// An added row's highlight expired
    RowAddSettled,
    /// A deleted row started fading
    RowFadeOut,
    /// A deleted row finished fading and left the rows
    RowRemoved,
    /// A column width changed by user resize
    ColumnResize,
}

/// A grid event with its payload.
#[derive(Debug, Clone)]
pub enum GridEvent<T, K> {
    SelectionChange {
        /// Full proposed selection.
        selected: HashSet<K>,
        /// The row that was toggled, when a single row caused the change.
        row: Option<T>,
        /// Records of every selected row present in the data.
        selected_rows: Vec<T>,
    },
    ExpandChange {
        key: K,
        expanded: bool,
        /// Full proposed expanded set.
        expanded_keys: HashSet<K>,
    },
    SortChange(SortState),
    PageChange(PageState),
    DragStart {
        key: K,
        index: usize,
    },
    Reorder {
        key: K,
        from: usize,
        to: usize,
        /// Stored rows in their new order.
        rows: Vec<T>,
    },
    RowAddSettled(K),
    RowFadeOut(K),
    RowRemoved {
        key: K,
        row: T,
    },
    ColumnResize {
        column: String,
        width: f64,
    },
}

// Key sets compare as sets, so `K` needs `Eq + Hash` rather than the
// `PartialEq` a derive would ask for.
impl<T: PartialEq, K: Eq + Hash> PartialEq for GridEvent<T, K> {
    fn eq(&self, other: &Self) -> bool {
        use GridEvent::*;
        match (self, other) {
            (
                SelectionChange {
                    selected,
                    row,
                    selected_rows,
                },
                SelectionChange {
                    selected: o_selected,
                    row: o_row,
                    selected_rows: o_rows,
                },
            ) => selected == o_selected && row == o_row && selected_rows == o_rows,
            (
                ExpandChange {
                    key,
                    expanded,
                    expanded_keys,
                },
                ExpandChange {
                    key: o_key,
                    expanded: o_expanded,
                    expanded_keys: o_keys,
                },
            ) => key == o_key && expanded == o_expanded && expanded_keys == o_keys,
            (SortChange(a), SortChange(b)) => a == b,
            (PageChange(a), PageChange(b)) => a == b,
            (DragStart { key, index }, DragStart { key: o_key, index: o_index }) => {
                key == o_key && index == o_index
            }
            (
                Reorder { key, from, to, rows },
                Reorder {
                    key: o_key,
                    from: o_from,
                    to: o_to,
                    rows: o_rows,
                },
            ) => key == o_key && from == o_from && to == o_to && rows == o_rows,
            (RowAddSettled(a), RowAddSettled(b)) => a == b,
            (RowFadeOut(a), RowFadeOut(b)) => a == b,
            (RowRemoved { key, row }, RowRemoved { key: o_key, row: o_row }) => {
                key == o_key && row == o_row
            }
            (
                ColumnResize { column, width },
                ColumnResize {
                    column: o_column,
                    width: o_width,
                },
            ) => column == o_column && width == o_width,
            _ => false,
        }
    }
}

impl<T, K> GridEvent<T, K> {
    pub fn kind(&self) -> GridEventKind {
        match self {
            GridEvent::SelectionChange { .. } => GridEventKind::SelectionChange,
            GridEvent::ExpandChange { .. } => GridEventKind::ExpandChange,
            GridEvent::SortChange(_) => GridEventKind::SortChange,
            GridEvent::PageChange(_) => GridEventKind::PageChange,
            GridEvent::DragStart { .. } => GridEventKind::DragStart,
            GridEvent::Reorder { .. } => GridEventKind::Reorder,
            GridEvent::RowAddSettled(_) => GridEventKind::RowAddSettled,
            GridEvent::RowFadeOut(_) => GridEventKind::RowFadeOut,
            GridEvent::RowRemoved { .. } => GridEventKind::RowRemoved,
            GridEvent::ColumnResize { .. } => GridEventKind::ColumnResize,
        }
    }
}

// =============================================================================
// Event Bus
// =============================================================================

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T, K> = Arc<dyn Fn(&GridEvent<T, K>) + Send + Sync>;

struct Listener<T, K> {
    id: SubscriptionId,
    kind: Option<GridEventKind>,
    callback: Callback<T, K>,
}

/// Registry of event listeners.
pub struct EventBus<T, K> {
    listeners: Mutex<Vec<Listener<T, K>>>,
    next_id: AtomicU64,
}

impl<T, K> Default for EventBus<T, K> {
    fn default() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<T, K> fmt::Debug for EventBus<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.len())
            .finish()
    }
}

impl<T, K> EventBus<T, K> {
    pub fn new() -> Self {
        Self::default()
    }

    fn listeners(&self) -> std::sync::MutexGuard<'_, Vec<Listener<T, K>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Listen to every event.
    pub fn subscribe(
        &self,
        callback: impl Fn(&GridEvent<T, K>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.register(None, Arc::new(callback))
    }

    /// Listen to one kind of event.
    pub fn subscribe_kind(
        &self,
        kind: GridEventKind,
        callback: impl Fn(&GridEvent<T, K>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.register(Some(kind), Arc::new(callback))
    }

    fn register(&self, kind: Option<GridEventKind>, callback: Callback<T, K>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.listeners().push(Listener { id, kind, callback });
        id
    }

    /// Remove one listener. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id);
        listeners.len() != before
    }

    /// Remove every listener.
    pub fn clear(&self) {
        self.listeners().clear();
    }

    pub fn len(&self) -> usize {
        self.listeners().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners().is_empty()
    }

    /// Deliver `event` to matching listeners in subscription order.
    ///
    /// The registry is not locked while callbacks run.
    pub fn emit(&self, event: &GridEvent<T, K>) {
        let kind = event.kind();
        let targets: Vec<Callback<T, K>> = self
            .listeners()
            .iter()
            .filter(|listener| listener.kind.is_none_or(|k| k == kind))
            .map(|listener| Arc::clone(&listener.callback))
            .collect();
        trace!("emit {kind:?} to {} listeners", targets.len());
        for callback in targets {
            callback(event);
        }
    }

    pub fn emit_all(&self, events: impl IntoIterator<Item = GridEvent<T, K>>) {
        for event in events {
            self.emit(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filtered_and_unsubscribed() {
        let bus: EventBus<u32, u32> = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let all = {
            let seen = Arc::clone(&seen);
            bus.subscribe(move |e| seen.lock().unwrap().push(("all", e.kind())))
        };
        {
            let seen = Arc::clone(&seen);
            bus.subscribe_kind(GridEventKind::RowFadeOut, move |e| {
                seen.lock().unwrap().push(("fade", e.kind()))
            });
        }

        bus.emit(&GridEvent::RowAddSettled(1));
        bus.emit(&GridEvent::RowFadeOut(2));
        assert!(bus.unsubscribe(all));
        assert!(!bus.unsubscribe(all));
        bus.emit(&GridEvent::RowFadeOut(3));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                ("all", GridEventKind::RowAddSettled),
                ("all", GridEventKind::RowFadeOut),
                ("fade", GridEventKind::RowFadeOut),
                ("fade", GridEventKind::RowFadeOut),
            ]
        );

        bus.clear();
        assert!(bus.is_empty());
    }

    #[test]
    fn test_events_compare_key_sets_as_sets() {
        let a: GridEvent<u32, u32> = GridEvent::SelectionChange {
            selected: HashSet::from([1, 2, 3]),
            row: Some(2),
            selected_rows: vec![1, 2, 3],
        };
        let b = GridEvent::SelectionChange {
            selected: HashSet::from([3, 2, 1]),
            row: Some(2),
            selected_rows: vec![1, 2, 3],
        };
        assert_eq!(a, b);
        assert_ne!(
            a,
            GridEvent::SelectionChange {
                selected: HashSet::from([1]),
                row: Some(2),
                selected_rows: vec![1, 2, 3],
            }
        );

        let expand: GridEvent<u32, u32> = GridEvent::ExpandChange {
            key: 4,
            expanded: true,
            expanded_keys: HashSet::from([4, 5]),
        };
        assert_eq!(expand.clone(), expand);
        assert_ne!(expand, GridEvent::RowFadeOut(4));
    }
}
