//! Column width resolution.
//!
//! Columns with a resized or declared width are placed first. Whatever
//! space remains is split evenly across the flexible columns, re-splitting
//! each time a share lands outside a column's own bounds.

use std::collections::HashMap;

use log::trace;

use crate::column::Column;

/// Resolved column widths keyed by column key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidthMap {
    widths: HashMap<String, f64>,
}

impl WidthMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.widths.get(key).copied()
    }

    pub fn insert(&mut self, key: impl Into<String>, width: f64) {
        self.widths.insert(key.into(), width);
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// An empty map tells the renderer to fall back to natural sizing.
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Sum of every resolved width.
    pub fn total(&self) -> f64 {
        self.widths.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.widths.iter().map(|(k, w)| (k.as_str(), *w))
    }
}

/// Constant-width action columns rendered ahead of the data columns.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActionColumns {
    /// Drag handle width, `None` when drag sorting is off.
    pub drag_handle: Option<f64>,
    /// Row selection checkbox width.
    pub selection: Option<f64>,
    /// Expand toggle width.
    pub expansion: Option<f64>,
}

impl ActionColumns {
    pub const DRAG_KEY: &'static str = "__drag";
    pub const SELECTION_KEY: &'static str = "__selection";
    pub const EXPANSION_KEY: &'static str = "__expansion";

    /// Combined width of every enabled action column.
    pub fn total(&self) -> f64 {
        [self.drag_handle, self.selection, self.expansion]
            .into_iter()
            .flatten()
            .sum()
    }

    /// Enabled action columns in render order: drag, selection, expansion.
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        let mut entries = Vec::with_capacity(3);
        if let Some(w) = self.drag_handle {
            entries.push((Self::DRAG_KEY, w));
        }
        if let Some(w) = self.selection {
            entries.push((Self::SELECTION_KEY, w));
        }
        if let Some(w) = self.expansion {
            entries.push((Self::EXPANSION_KEY, w));
        }
        entries
    }
}

/// Width left for data columns once the action columns are laid out.
pub fn available_width(container: f64, actions: &ActionColumns) -> f64 {
    container - actions.total()
}

/// Resolve every column's width against the available space.
///
/// Returns an empty map when `available` is not a positive number.
pub fn resolve_widths(
    columns: &[Column],
    resized: &HashMap<String, f64>,
    available: f64,
) -> WidthMap {
    let mut widths = WidthMap::new();
    if !available.is_finite() || available <= 0.0 {
        trace!("resolve_widths: no usable width ({available}), natural sizing");
        return widths;
    }

    let mut flexible: Vec<&Column> = Vec::new();
    let mut explicit_total = 0.0;
    for column in columns {
        match resized.get(&column.key).copied().or(column.width) {
            Some(width) => {
                let width = column.clamp(width);
                explicit_total += width;
                widths.insert(column.key.clone(), width);
            }
            None => flexible.push(column),
        }
    }

    let mut remaining = available - explicit_total;
    let max_passes = flexible.len() + 1;
    let mut pending = flexible;

    for _ in 0..max_passes {
        if pending.is_empty() {
            break;
        }
        let share = remaining / pending.len() as f64;
        let (violating, fitting): (Vec<&Column>, Vec<&Column>) = std::mem::take(&mut pending)
            .into_iter()
            .partition(|c| c.clamp(share) != share);

        if violating.is_empty() {
            for column in fitting {
                widths.insert(column.key.clone(), share);
            }
            break;
        }

        if fitting.is_empty() {
            // Every pending column is out of bounds at once; settle them
            // in one go instead of re-splitting.
            let share = share.max(0.0);
            for column in violating {
                widths.insert(column.key.clone(), column.clamp(share));
            }
            break;
        }

        for column in violating {
            let width = column.clamp(share);
            remaining -= width;
            widths.insert(column.key.clone(), width);
        }
        pending = fitting;
    }

    if !pending.is_empty() {
        let share = (remaining / pending.len() as f64).max(0.0);
        for column in pending {
            widths.insert(column.key.clone(), column.clamp(share));
        }
    }

    trace!(
        "resolve_widths: {} columns into {available}px, total {}",
        widths.len(),
        widths.total()
    );
    widths
}
