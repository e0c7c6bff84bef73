//! Column sorting.
//!
//! Two explicit modes: [`SortMode::Client`] sorts rows in the engine with
//! per-column comparators, [`SortMode::Delegated`] only reports the sort
//! state and leaves ordering to whoever supplies the rows.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::controlled::Controlled;

/// Direction of the active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    None,
    Descending,
    Ascending,
}

impl SortDirection {
    /// Next step of the cycle `None → Descending → Ascending → None`.
    pub fn next(self) -> Self {
        match self {
            SortDirection::None => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
            SortDirection::Ascending => SortDirection::None,
        }
    }
}

/// The active sort column and its direction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        if direction == SortDirection::None {
            return Self::default();
        }
        Self {
            column: Some(column.into()),
            direction,
        }
    }

    pub fn is_active(&self) -> bool {
        self.column.is_some() && self.direction != SortDirection::None
    }

    /// Direction shown for `column`; `None` unless it is the active one.
    pub fn direction_of(&self, column: &str) -> SortDirection {
        match &self.column {
            Some(active) if active == column => self.direction,
            _ => SortDirection::None,
        }
    }
}

/// Orders two rows for one column.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// How sort activations are applied.
pub enum SortMode<T> {
    /// Sort in the engine using the comparator registered per column.
    Client(HashMap<String, Comparator<T>>),
    /// Report sort changes only; rows arrive already ordered.
    Delegated,
}

impl<T> Default for SortMode<T> {
    fn default() -> Self {
        SortMode::Delegated
    }
}

impl<T> Clone for SortMode<T> {
    fn clone(&self) -> Self {
        match self {
            SortMode::Client(comparators) => SortMode::Client(comparators.clone()),
            SortMode::Delegated => SortMode::Delegated,
        }
    }
}

impl<T> fmt::Debug for SortMode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMode::Client(comparators) => {
                let mut columns: Vec<&str> = comparators.keys().map(String::as_str).collect();
                columns.sort_unstable();
                f.debug_tuple("Client").field(&columns).finish()
            }
            SortMode::Delegated => f.write_str("Delegated"),
        }
    }
}

impl<T> SortMode<T> {
    /// Client mode with no comparators yet.
    pub fn client() -> Self {
        SortMode::Client(HashMap::new())
    }

    /// Register a comparator. Switches a delegated mode to client mode.
    pub fn comparator(
        self,
        column: impl Into<String>,
        cmp: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        let mut comparators = match self {
            SortMode::Client(comparators) => comparators,
            SortMode::Delegated => HashMap::new(),
        };
        comparators.insert(column.into(), Arc::new(cmp));
        SortMode::Client(comparators)
    }

    pub fn is_client(&self) -> bool {
        matches!(self, SortMode::Client(_))
    }

    pub fn has_comparator(&self, column: &str) -> bool {
        match self {
            SortMode::Client(comparators) => comparators.contains_key(column),
            SortMode::Delegated => false,
        }
    }

    /// Stable in-place sort by `state`. No-op when delegated, inactive or
    /// missing a comparator.
    pub fn apply(&self, rows: &mut [T], state: &SortState) {
        let SortMode::Client(comparators) = self else {
            return;
        };
        let Some(column) = state.column.as_deref() else {
            return;
        };
        let Some(cmp) = comparators.get(column) else {
            return;
        };
        match state.direction {
            SortDirection::None => {}
            SortDirection::Ascending => rows.sort_by(|a, b| cmp(a, b)),
            SortDirection::Descending => rows.sort_by(|a, b| cmp(b, a)),
        }
    }
}

/// Cycles the sort state on column activation.
#[derive(Debug, Clone, Default)]
pub struct SortController {
    state: Controlled<SortState>,
}

impl SortController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SortState {
        self.state.value()
    }

    pub fn is_controlled(&self) -> bool {
        self.state.is_controlled()
    }

    pub fn sync(&mut self, external: SortState) {
        self.state.sync(external);
    }

    pub fn release(&mut self) {
        self.state.release();
    }

    /// Activate a column's sort control and return the proposed state.
    ///
    /// The active column steps through its cycle; a different column
    /// starts at `Descending`.
    pub fn activate(&mut self, column: &str) -> SortState {
        let direction = self.state().direction_of(column).next();
        let next = SortState::new(column, direction);
        debug!("sort {column} -> {:?}", next.direction);
        self.state.set(next)
    }

    pub fn clear(&mut self) -> SortState {
        self.state.set(SortState::default())
    }
}
