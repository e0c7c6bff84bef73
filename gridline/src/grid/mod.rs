//! The grid engine: one table instance.

mod gestures;
mod snapshot;

use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use gridline_layout::{validate_columns, Column, RowWindowing, ScrollAlign, Viewport};
use log::{debug, trace};
use tokio::time::Instant;

use crate::config::GridConfig;
use crate::driver::WakeupSender;
use crate::error::GridError;
use crate::events::{EventBus, GridEvent, GridEventKind, SubscriptionId};
use crate::expansion::ExpansionController;
use crate::handle::GridHandle;
use crate::identity::{RowData, RowIdentity, RowKey};
use crate::pagination::{PageState, PaginationController};
use crate::reorder::DragReorder;
use crate::resize::ColumnResizeController;
use crate::selection::{SelectionController, SelectionMode};
use crate::sort::{SortController, SortMode, SortState};
use crate::transition::{
    DataSourceHints, TransitionConfig, TransitionEffect, TransitionPhase, TransitionTracker,
};

/// Unique identifier for a grid instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridId(usize);

impl GridId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__grid_{}", self.0)
    }
}

type DisabledFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Internal state for one grid.
pub(crate) struct GridInner<T, K: RowKey> {
    config: GridConfig,
    columns: Vec<Column>,
    identity: RowIdentity<T, K>,
    sort_mode: SortMode<T>,
    /// Rows excluded from selection.
    disabled: Option<DisabledFn<T>>,
    transitions: TransitionTracker<T, K>,
    selection: SelectionController<K>,
    expansion: ExpansionController<K>,
    sort: SortController,
    pagination: Option<PaginationController>,
    drag: DragReorder<K>,
    resize: ColumnResizeController,
    windowing: RowWindowing<K>,
    container_width: f64,
    /// Height of the scroll container, unknown until first observed.
    viewport_height: Option<f64>,
    scroll_top: f64,
    scroll_left: f64,
}

impl<T: RowData, K: RowKey> GridInner<T, K> {
    fn is_disabled(&self, row: &T) -> bool {
        self.disabled.as_ref().is_some_and(|disabled| disabled(row))
    }

    fn find_row(&self, key: &K) -> Option<T> {
        let visible = self.transitions.visible();
        self.identity
            .position(visible, key)
            .map(|index| visible[index].clone())
    }

    fn selected_rows(&self, selected: &HashSet<K>) -> Vec<T> {
        self.transitions
            .visible()
            .iter()
            .filter(|row| selected.contains(&self.identity.key_of(row)))
            .cloned()
            .collect()
    }

    fn client_sort_active(&self) -> bool {
        self.sort_mode.is_client() && self.sort.state().is_active()
    }

    /// Visible rows in display order, before paging.
    fn sorted_rows(&self) -> Vec<T> {
        let mut rows = self.transitions.visible().to_vec();
        if self.client_sort_active() {
            self.sort_mode.apply(&mut rows, self.sort.state());
        }
        rows
    }

    fn page_range(&self, total: usize) -> Range<usize> {
        match &self.pagination {
            Some(pagination) => pagination.range(total),
            None => 0..total,
        }
    }

    /// Rows of the current page in display order.
    fn page_rows(&self) -> Vec<T> {
        let mut rows = self.sorted_rows();
        let range = self.page_range(rows.len());
        rows.truncate(range.end);
        rows.drain(..range.start);
        rows
    }

    /// Keys of the current page, and which of them may be selected.
    fn page_eligibility(&self) -> (Vec<K>, HashSet<K>) {
        let rows = self.page_rows();
        let keys = self.identity.keys(&rows);
        let eligible = rows
            .iter()
            .zip(&keys)
            .filter(|(row, _)| !self.is_disabled(row))
            .map(|(_, key)| key.clone())
            .collect();
        (keys, eligible)
    }

    fn viewport(&self) -> Option<Viewport> {
        self.viewport_height
            .map(|height| Viewport::new(self.scroll_top, height))
    }

    fn prune_heights(&mut self) {
        let keys = self.identity.keys(self.transitions.visible());
        self.windowing.retain_keys(keys.iter());
    }

    fn selection_event(&self, selected: HashSet<K>, row: Option<T>) -> GridEvent<T, K> {
        let selected_rows = self.selected_rows(&selected);
        GridEvent::SelectionChange {
            selected,
            row,
            selected_rows,
        }
    }

    /// Expanded set changes invalidate every measured height, since an
    /// expanded row is measured together with its content.
    fn after_expansion_change(&mut self, before: &HashSet<K>) {
        if self.expansion.expanded() != before {
            debug!("expansion changed, invalidating row heights");
            self.windowing.invalidate();
        }
    }

    fn column(&self, key: &str) -> Result<&Column, GridError> {
        self.columns
            .iter()
            .find(|column| column.key == key)
            .ok_or_else(|| GridError::UnknownColumn(key.to_string()))
    }
}

/// Builder for [`Grid`].
pub struct GridBuilder<T, K: RowKey> {
    config: GridConfig,
    columns: Vec<Column>,
    identity: RowIdentity<T, K>,
    sort_mode: SortMode<T>,
    disabled: Option<DisabledFn<T>>,
    rows: Vec<T>,
}

impl<T: RowData, K: RowKey> GridBuilder<T, K> {
    pub fn config(mut self, config: GridConfig) -> Self {
        self.config = config;
        self
    }

    pub fn sort_mode(mut self, mode: SortMode<T>) -> Self {
        self.sort_mode = mode;
        self
    }

    /// Rows for which `disabled` returns true cannot be selected.
    pub fn disabled(mut self, disabled: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.disabled = Some(Arc::new(disabled));
        self
    }

    /// Initial rows.
    pub fn rows(mut self, rows: Vec<T>) -> Self {
        self.rows = rows;
        self
    }

    pub fn build(self) -> Result<Grid<T, K>, GridError> {
        self.config.validate()?;
        validate_columns(&self.columns)?;
        if let SortMode::Client(_) = &self.sort_mode {
            for column in self.columns.iter().filter(|c| c.sortable) {
                if !self.sort_mode.has_comparator(&column.key) {
                    return Err(GridError::MissingComparator(column.key.clone()));
                }
            }
        }
        self.identity.check_unique(&self.rows)?;

        let config = self.config;
        let mut transitions = TransitionTracker::new(
            TransitionConfig::new(config.highlight_duration, config.fade_out_duration),
            self.identity.clone(),
        );
        transitions.update_data_source(self.rows, &DataSourceHints::new(), Instant::now());

        let inner = GridInner {
            selection: SelectionController::new(config.selection_mode)
                .preserve_across_pages(config.preserve_selection),
            expansion: ExpansionController::new(),
            sort: SortController::new(),
            pagination: config.page_size.map(PaginationController::new),
            drag: DragReorder::new(),
            resize: ColumnResizeController::new(),
            windowing: RowWindowing::new(config.window_config()),
            container_width: 0.0,
            viewport_height: None,
            scroll_top: 0.0,
            scroll_left: 0.0,
            columns: self.columns,
            identity: self.identity,
            sort_mode: self.sort_mode,
            disabled: self.disabled,
            transitions,
            config,
        };

        let grid = Grid {
            id: GridId::new(),
            inner: Arc::new(RwLock::new(inner)),
            events: Arc::new(EventBus::new()),
            wakeup: Arc::new(Mutex::new(None)),
            dirty: Arc::new(AtomicBool::new(true)),
        };
        debug!("created grid {}", grid.id);
        Ok(grid)
    }
}

/// A data grid: rows, columns and every piece of per-row state.
///
/// Cloning is cheap and every clone refers to the same grid. Listeners
/// run after the grid's lock is released.
///
/// ```ignore
/// let grid = Grid::builder(columns, RowIdentity::new(|u: &User| u.id))
///     .config(GridConfig::new().selection(SelectionMode::Multiple))
///     .rows(users)
///     .build()?;
/// grid.set_container_width(960.0);
/// let frame = grid.snapshot();
/// ```
pub struct Grid<T, K: RowKey> {
    id: GridId,
    inner: Arc<RwLock<GridInner<T, K>>>,
    events: Arc<EventBus<T, K>>,
    wakeup: Arc<Mutex<Option<WakeupSender>>>,
    dirty: Arc<AtomicBool>,
}

impl<T, K: RowKey> Clone for Grid<T, K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            events: Arc::clone(&self.events),
            wakeup: Arc::clone(&self.wakeup),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl<T, K: RowKey> fmt::Debug for Grid<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid").field("id", &self.id).finish_non_exhaustive()
    }
}

impl<T: RowData, K: RowKey> Grid<T, K> {
    pub fn builder(columns: Vec<Column>, identity: RowIdentity<T, K>) -> GridBuilder<T, K> {
        GridBuilder {
            config: GridConfig::default(),
            columns,
            identity,
            sort_mode: SortMode::Delegated,
            disabled: None,
            rows: Vec::new(),
        }
    }

    pub fn new(
        config: GridConfig,
        columns: Vec<Column>,
        identity: RowIdentity<T, K>,
    ) -> Result<Self, GridError> {
        Self::builder(columns, identity).config(config).build()
    }

    pub fn id(&self) -> GridId {
        self.id
    }

    fn read(&self) -> RwLockReadGuard<'_, GridInner<T, K>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GridInner<T, K>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` under the write lock, then publish the events it collected.
    fn update<R>(&self, f: impl FnOnce(&mut GridInner<T, K>, &mut Vec<GridEvent<T, K>>) -> R) -> R {
        let mut events = Vec::new();
        let result = {
            let mut inner = self.write();
            f(&mut inner, &mut events)
        };
        self.mark_dirty();
        self.events.emit_all(events);
        result
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Whether anything changed since the last [`Grid::clear_dirty`].
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    pub fn config(&self) -> GridConfig {
        self.read().config.clone()
    }

    pub fn handle(&self) -> GridHandle<T, K> {
        GridHandle::new(self.clone())
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Replace every row. Selection, expansion and running transitions are
    /// kept; measured heights of rows that are gone are dropped.
    pub fn set_rows(&self, rows: Vec<T>) -> Result<(), GridError> {
        self.update_data_source(rows, DataSourceHints::new())
    }

    /// Replace every row, highlighting the hinted additions and removals.
    pub fn update_data_source(
        &self,
        rows: Vec<T>,
        hints: DataSourceHints<K>,
    ) -> Result<(), GridError> {
        self.update_data_source_at(rows, hints, Instant::now())
    }

    pub fn update_data_source_at(
        &self,
        rows: Vec<T>,
        hints: DataSourceHints<K>,
        now: Instant,
    ) -> Result<(), GridError> {
        self.update(|inner, _| {
            inner.identity.check_unique(&rows)?;
            debug!(
                "data source: {} rows, {} added, {} removed",
                rows.len(),
                hints.added.len(),
                hints.removed.len()
            );
            inner.transitions.update_data_source(rows, &hints, now);
            inner.prune_heights();
            Ok::<_, GridError>(())
        })?;
        self.wake();
        Ok(())
    }

    /// Stored rows, in stored order.
    pub fn rows(&self) -> Vec<T> {
        self.read().transitions.rows().to_vec()
    }

    /// Every row in display order, animating removals included.
    pub fn display_rows(&self) -> Vec<T> {
        self.read().sorted_rows()
    }

    /// Rows of the current page in display order.
    pub fn page_rows(&self) -> Vec<T> {
        self.read().page_rows()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Fire transition deadlines that have passed.
    pub fn tick(&self) -> usize {
        self.tick_at(Instant::now())
    }

    /// Fire transition deadlines at or before `now`. Returns how many
    /// transition steps fired.
    pub fn tick_at(&self, now: Instant) -> usize {
        let mut events = Vec::new();
        {
            let mut inner = self.write();
            let effects = inner.transitions.tick(now);
            if effects.is_empty() {
                return 0;
            }
            let mut removed = false;
            for effect in effects {
                events.push(match effect {
                    TransitionEffect::AddSettled(key) => GridEvent::RowAddSettled(key),
                    TransitionEffect::FadeOutStarted(key) => GridEvent::RowFadeOut(key),
                    TransitionEffect::Removed { key, row } => {
                        removed = true;
                        GridEvent::RowRemoved { key, row }
                    }
                });
            }
            if removed {
                inner.prune_heights();
            }
        }
        trace!("grid {} tick fired {} transitions", self.id, events.len());
        let fired = events.len();
        self.mark_dirty();
        self.events.emit_all(events);
        fired
    }

    pub fn next_transition_deadline(&self) -> Option<Instant> {
        self.read().transitions.next_deadline()
    }

    pub fn transition_phase(&self, key: &K) -> Option<TransitionPhase> {
        self.read().transitions.phase_of(key)
    }

    pub fn adding(&self) -> HashSet<K> {
        self.read().transitions.adding()
    }

    pub fn deleting(&self) -> HashSet<K> {
        self.read().transitions.deleting()
    }

    pub fn fading_out(&self) -> HashSet<K> {
        self.read().transitions.fading_out()
    }

    /// Stop the transition timers of one row.
    pub fn cancel_transition(&self, key: &K) {
        self.update(|inner, _| inner.transitions.cancel(key));
    }

    pub(crate) fn install_wakeup(&self, sender: WakeupSender) {
        *self.wakeup.lock().unwrap_or_else(PoisonError::into_inner) = Some(sender);
    }

    fn uninstall_wakeup(&self) {
        self.wakeup
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn wake(&self) {
        if let Some(sender) = self
            .wakeup
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            sender.send();
        }
    }

    // =========================================================================
    // Columns and geometry
    // =========================================================================

    pub fn columns(&self) -> Vec<Column> {
        self.read().columns.clone()
    }

    /// Replace the column set. Resized widths of dropped columns are forgotten.
    pub fn set_columns(&self, columns: Vec<Column>) -> Result<(), GridError> {
        validate_columns(&columns)?;
        self.update(|inner, _| {
            if let SortMode::Client(_) = &inner.sort_mode {
                for column in columns.iter().filter(|c| c.sortable) {
                    if !inner.sort_mode.has_comparator(&column.key) {
                        return Err(GridError::MissingComparator(column.key.clone()));
                    }
                }
            }
            inner.resize.retain_columns(&columns);
            inner.columns = columns;
            Ok(())
        })
    }

    /// User-resized widths by column key.
    pub fn resized_widths(&self) -> std::collections::HashMap<String, f64> {
        self.read().resize.widths().clone()
    }

    /// Resize a column, clamped to its bounds. Returns the stored width.
    pub fn set_column_width(&self, column: &str, width: f64) -> Result<f64, GridError> {
        self.update(|inner, events| {
            let width = inner.resize.set_width(&inner.columns, column, width)?;
            events.push(GridEvent::ColumnResize {
                column: column.to_string(),
                width,
            });
            Ok(width)
        })
    }

    /// Forget every user-resized width.
    pub fn reset_column_widths(&self) {
        self.update(|inner, _| inner.resize.reset());
    }

    pub fn set_container_width(&self, width: f64) {
        self.update(|inner, _| {
            trace!("container width {width}");
            inner.container_width = width;
        });
    }

    /// Record the scroll container's height.
    pub fn set_viewport(&self, height: f64) {
        self.update(|inner, _| inner.viewport_height = Some(height.max(0.0)));
    }

    pub fn set_scroll(&self, top: f64, left: f64) {
        self.update(|inner, _| {
            inner.scroll_top = top.max(0.0);
            inner.scroll_left = left.max(0.0);
        });
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.read().viewport()
    }

    /// Record a rendered row's height (its expanded content included).
    pub fn measure_row(&self, key: K, height: f64) -> bool {
        let changed = self.write().windowing.measure(key, height);
        if changed {
            self.mark_dirty();
        }
        changed
    }

    /// Scroll so the page row at `index` is in view. Returns the new
    /// scroll offset, or `None` when `index` is past the page.
    pub fn scroll_to_index(&self, index: usize, align: ScrollAlign) -> Option<f64> {
        self.update(|inner, _| {
            let keys = inner.identity.keys(&inner.page_rows());
            let viewport = inner
                .viewport()
                .unwrap_or_else(|| Viewport::new(inner.scroll_top, 0.0));
            let top = inner
                .windowing
                .scroll_offset_for(&keys, index, align, viewport)?;
            debug!("scroll to index {index} -> {top}");
            inner.scroll_top = top;
            Some(top)
        })
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn selected(&self) -> HashSet<K> {
        self.read().selection.selected().clone()
    }

    pub fn is_selected(&self, key: &K) -> bool {
        self.read().selection.is_selected(key)
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.read().selection.mode()
    }

    pub fn set_selection_mode(&self, mode: SelectionMode) {
        self.update(|inner, events| {
            inner.config.selection_mode = mode;
            if let Some(next) = inner.selection.set_mode(mode) {
                events.push(inner.selection_event(next, None));
            }
        });
    }

    /// Toggle one row. Disabled rows are left alone. Returns the proposed
    /// selection.
    pub fn toggle_row_selection(&self, key: K) -> Option<HashSet<K>> {
        self.update(|inner, events| {
            let row = inner.find_row(&key);
            if row.as_ref().is_some_and(|row| inner.is_disabled(row)) {
                trace!("selection toggle on disabled row {key:?}");
                return None;
            }
            let next = inner.selection.toggle(key)?;
            events.push(inner.selection_event(next.clone(), row));
            Some(next)
        })
    }

    /// Select (or clear, when already all selected) every eligible row of
    /// the current page.
    pub fn toggle_all_selection(&self) -> Option<HashSet<K>> {
        self.update(|inner, events| {
            let (keys, eligible) = inner.page_eligibility();
            let next = inner
                .selection
                .toggle_all(&keys, |key| eligible.contains(key))?;
            events.push(inner.selection_event(next.clone(), None));
            Some(next)
        })
    }

    /// Extend the selection from the last toggled row to `key`.
    pub fn select_range(&self, key: K) -> Option<HashSet<K>> {
        self.update(|inner, events| {
            let (keys, eligible) = inner.page_eligibility();
            let row = inner.find_row(&key);
            let next = inner
                .selection
                .select_range(key, &keys, |key| eligible.contains(key))?;
            events.push(inner.selection_event(next.clone(), row));
            Some(next)
        })
    }

    pub fn clear_selection(&self) -> HashSet<K> {
        self.update(|inner, events| {
            let next = inner.selection.clear();
            events.push(inner.selection_event(next.clone(), None));
            next
        })
    }

    /// Take the selection from the caller (`Some`) or hand it back to the
    /// grid (`None`).
    pub fn sync_selection(&self, selected: Option<HashSet<K>>) {
        self.update(|inner, _| match selected {
            Some(selected) => inner.selection.sync(selected),
            None => inner.selection.release(),
        });
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    pub fn expanded(&self) -> HashSet<K> {
        self.read().expansion.expanded().clone()
    }

    pub fn is_expanded(&self, key: &K) -> bool {
        self.read().expansion.is_expanded(key)
    }

    /// Expand or collapse one row. Returns whether it is expanded in the
    /// proposed set.
    pub fn toggle_expand(&self, key: K) -> bool {
        self.update(|inner, events| {
            let before = inner.expansion.expanded().clone();
            let (expanded_keys, expanded) = inner.expansion.toggle(key.clone());
            inner.after_expansion_change(&before);
            events.push(GridEvent::ExpandChange {
                key,
                expanded,
                expanded_keys,
            });
            expanded
        })
    }

    pub fn sync_expanded(&self, expanded: Option<HashSet<K>>) {
        self.update(|inner, _| {
            let before = inner.expansion.expanded().clone();
            match expanded {
                Some(expanded) => inner.expansion.sync(expanded),
                None => inner.expansion.release(),
            }
            inner.after_expansion_change(&before);
        });
    }

    // =========================================================================
    // Sorting and paging
    // =========================================================================

    pub fn sort_state(&self) -> SortState {
        self.read().sort.state().clone()
    }

    /// Activate a column's sort control. Returns the proposed sort state.
    pub fn sort_by(&self, column: &str) -> Result<SortState, GridError> {
        self.update(|inner, events| {
            if !inner.column(column)?.sortable {
                return Err(GridError::ColumnNotSortable(column.to_string()));
            }
            let next = inner.sort.activate(column);
            events.push(GridEvent::SortChange(next.clone()));
            Ok(next)
        })
    }

    pub fn sync_sort(&self, state: Option<SortState>) {
        self.update(|inner, _| match state {
            Some(state) => inner.sort.sync(state),
            None => inner.sort.release(),
        });
    }

    pub fn page_state(&self) -> Option<PageState> {
        self.read().pagination.as_ref().map(PaginationController::state)
    }

    /// Go to `page`, clamped to the available pages. `None` when the grid
    /// is not paginated.
    pub fn set_page(&self, page: usize) -> Option<PageState> {
        self.update(|inner, events| {
            let total = inner.transitions.visible().len();
            let next = inner.pagination.as_mut()?.set_page(page, total);
            events.push(GridEvent::PageChange(next));
            Some(next)
        })
    }

    /// Change the page size, paginating the grid if it was not.
    pub fn set_page_size(&self, size: usize) -> PageState {
        self.update(|inner, events| {
            let total = inner.transitions.visible().len();
            let pagination = inner
                .pagination
                .get_or_insert_with(|| PaginationController::new(size));
            let next = pagination.set_page_size(size, total);
            events.push(GridEvent::PageChange(next));
            next
        })
    }

    pub fn sync_page(&self, state: Option<PageState>) {
        self.update(|inner, _| match state {
            Some(state) => inner
                .pagination
                .get_or_insert_with(|| PaginationController::new(state.size))
                .sync(state),
            None => {
                if let Some(pagination) = inner.pagination.as_mut() {
                    pagination.release();
                }
            }
        });
    }

    // =========================================================================
    // Events and lifecycle
    // =========================================================================

    pub fn subscribe(
        &self,
        callback: impl Fn(&GridEvent<T, K>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(callback)
    }

    pub fn subscribe_kind(
        &self,
        kind: GridEventKind,
        callback: impl Fn(&GridEvent<T, K>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.events.subscribe_kind(kind, callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Cancel every timer, drop every listener and stop any driver.
    pub fn teardown(&self) {
        {
            let mut inner = self.write();
            inner.transitions.clear();
            inner.drag.cancel();
            inner.resize.pointer_up();
        }
        self.events.clear();
        self.uninstall_wakeup();
        self.mark_dirty();
        debug!("grid {} torn down", self.id);
    }
}
