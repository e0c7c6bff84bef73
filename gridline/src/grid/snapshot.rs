//! Geometry and the render snapshot.
//!
//! Widths resolve before fixed offsets, and the window is computed over
//! the current page only.

use gridline_layout::{
    available_width, resolve_widths, ColumnGroups, FixedInput, FixedLayout, FixedSide,
    VirtualWindow, WidthMap,
};
use log::trace;

use super::{Grid, GridInner};
use crate::identity::{RowData, RowKey};
use crate::render::{HostRenderer, RenderColumn, RenderSnapshot, RenderedRow, RowFlags};
use crate::sort::SortDirection;
use crate::transition::TransitionPhase;

/// Where a column sits on screen.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ColumnSpan {
    pub key: String,
    pub left: f64,
    pub width: f64,
    pub action: bool,
    pub resizable: bool,
}

impl<T: RowData, K: RowKey> GridInner<T, K> {
    pub(super) fn resolved_widths(&self) -> WidthMap {
        let actions = self.config.action_columns();
        let available = available_width(self.container_width, &actions);
        resolve_widths(&self.columns, self.resize.widths(), available)
    }

    fn action_width(&self, key: &str) -> Option<f64> {
        self.config
            .action_columns()
            .entries()
            .into_iter()
            .find(|(action, _)| *action == key)
            .map(|(_, width)| width)
    }

    /// Width of any rendered column, action columns included.
    fn column_width(&self, widths: &WidthMap, key: &str) -> f64 {
        self.action_width(key)
            .or_else(|| widths.get(key))
            .unwrap_or(0.0)
    }

    pub(super) fn fixed_layout(&self, widths: &WidthMap) -> FixedLayout {
        let actions = self.config.action_columns().entries();
        let groups = ColumnGroups::partition(&self.columns);

        let action_keys: Vec<&str> = actions.iter().map(|(key, _)| *key).collect();
        let mut order = action_keys.clone();
        order.extend(groups.render_order());

        // Action columns stick along with the start-pinned data columns.
        let start: Vec<&str> = if groups.start.is_empty() {
            Vec::new()
        } else {
            action_keys
                .iter()
                .copied()
                .chain(groups.start_keys())
                .collect()
        };
        let end = groups.end_keys();

        let input = FixedInput {
            order: &order,
            start: &start,
            end: &end,
            scroll_left: self.scroll_left,
            container_width: self.container_width,
        };
        FixedLayout::compute(&input, |key| Some(self.column_width(widths, key)))
    }

    pub(super) fn window(&self, keys: &[K]) -> Option<VirtualWindow> {
        if !self.config.virtualized {
            return None;
        }
        self.windowing.window(keys, self.viewport())
    }

    fn render_columns(&self, widths: &WidthMap, fixed: &FixedLayout) -> Vec<RenderColumn> {
        let sort = self.sort.state();
        let actions = self.config.action_columns().entries();
        let groups = ColumnGroups::partition(&self.columns);

        let mut columns: Vec<RenderColumn> = actions
            .into_iter()
            .map(|(key, width)| RenderColumn {
                key: key.to_string(),
                title: None,
                width,
                fixed: fixed.get(key),
                sort: SortDirection::None,
                sortable: false,
                resizable: false,
                action: true,
            })
            .collect();

        for column in groups
            .start
            .iter()
            .chain(groups.scrollable.iter())
            .chain(groups.end.iter())
        {
            columns.push(RenderColumn {
                key: column.key.clone(),
                title: column.title.clone(),
                width: widths.get(&column.key).unwrap_or(0.0),
                fixed: fixed.get(&column.key),
                sort: sort.direction_of(&column.key),
                sortable: column.sortable,
                resizable: column.resizable,
                action: false,
            });
        }
        columns
    }

    /// On-screen horizontal placement of every rendered column.
    pub(super) fn column_spans(&self) -> Vec<ColumnSpan> {
        let widths = self.resolved_widths();
        let fixed = self.fixed_layout(&widths);
        let mut natural = 0.0;
        self.render_columns(&widths, &fixed)
            .into_iter()
            .map(|column| {
                let left = match column.fixed {
                    Some(offset) if offset.side == FixedSide::Start => {
                        (natural - self.scroll_left).max(offset.offset)
                    }
                    Some(offset) => {
                        let right_limit = self.container_width - offset.offset - column.width;
                        (natural - self.scroll_left).min(right_limit)
                    }
                    None => natural - self.scroll_left,
                };
                natural += column.width;
                ColumnSpan {
                    key: column.key,
                    left,
                    width: column.width,
                    action: column.action,
                    resizable: column.resizable,
                }
            })
            .collect()
    }

    pub(super) fn snapshot(&self) -> RenderSnapshot<T, K> {
        let widths = self.resolved_widths();
        let fixed = self.fixed_layout(&widths);
        let columns = self.render_columns(&widths, &fixed);

        let sorted = self.sorted_rows();
        let total_rows = sorted.len();
        let page = self.pagination.as_ref().map(|p| p.state());
        let page_range = self.page_range(total_rows);
        let page_rows = &sorted[page_range];
        let keys = self.identity.keys(page_rows);

        let window = self.window(&keys);
        let rendered = window.map(|w| w.range()).unwrap_or(0..page_rows.len());

        let dragging = self.drag.dragging();
        let rows: Vec<RenderedRow<T, K>> = rendered
            .map(|index| {
                let row = &page_rows[index];
                let key = keys[index].clone();
                let phase = self.transitions.phase_of(&key);
                let flags = RowFlags {
                    selected: self.selection.is_selected(&key),
                    disabled: self.is_disabled(row),
                    expanded: self.expansion.is_expanded(&key),
                    adding: phase == Some(TransitionPhase::Adding),
                    deleting: phase == Some(TransitionPhase::Deleting),
                    fading_out: phase == Some(TransitionPhase::FadingOut),
                    dragging: dragging == Some(&key),
                };
                RenderedRow {
                    key,
                    index,
                    row: row.clone(),
                    flags,
                }
            })
            .collect();

        let eligible: Vec<K> = page_rows
            .iter()
            .zip(&keys)
            .filter(|(row, _)| !self.is_disabled(row))
            .map(|(_, key)| key.clone())
            .collect();
        let all_selected = self.selection.all_selected(&eligible, |_| true);
        let indeterminate = self.selection.indeterminate(&eligible, |_| true);

        trace!(
            "snapshot: {} columns, {} of {} rows",
            columns.len(),
            rows.len(),
            total_rows
        );
        RenderSnapshot {
            columns,
            widths,
            fixed,
            window,
            rows,
            sort: self.sort.state().clone(),
            page,
            total_rows,
            all_selected,
            indeterminate,
            scroll_left: self.scroll_left,
            scroll_top: self.scroll_top,
        }
    }
}

impl<T: RowData, K: RowKey> Grid<T, K> {
    /// Resolved data column widths.
    pub fn widths(&self) -> WidthMap {
        self.read().resolved_widths()
    }

    pub fn fixed_layout(&self) -> FixedLayout {
        let inner = self.read();
        let widths = inner.resolved_widths();
        inner.fixed_layout(&widths)
    }

    /// Window over the current page, `None` when every row renders.
    pub fn window(&self) -> Option<VirtualWindow> {
        let inner = self.read();
        let keys = inner.identity.keys(&inner.page_rows());
        inner.window(&keys)
    }

    pub fn snapshot(&self) -> RenderSnapshot<T, K> {
        self.read().snapshot()
    }

    /// Hand a fresh snapshot to `renderer` and clear the dirty flag.
    pub fn render<R: HostRenderer<T, K>>(&self, renderer: &mut R) -> Result<(), R::Error> {
        let snapshot = self.snapshot();
        self.clear_dirty();
        renderer.render(&snapshot)
    }
}
