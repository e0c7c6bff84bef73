//! Sticky offsets and separator shadows for pinned columns.

use std::collections::HashMap;

use log::trace;

use crate::column::FixedSide;

/// Sticky placement of one pinned column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedOffset {
    /// Distance from the pinned edge.
    pub offset: f64,
    pub side: FixedSide,
    /// Whether this column draws the boundary shadow against the body.
    pub shadow: bool,
}

/// Inputs for one offset pass.
#[derive(Debug, Clone, Copy)]
pub struct FixedInput<'a> {
    /// Every column key (action columns included) in render order.
    pub order: &'a [&'a str],
    /// Start-pinned keys: action columns first, then data columns.
    pub start: &'a [&'a str],
    /// End-pinned keys in declared order.
    pub end: &'a [&'a str],
    pub scroll_left: f64,
    pub container_width: f64,
}

/// Offsets and shadows for every pinned column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedLayout {
    offsets: HashMap<String, FixedOffset>,
    start_width: f64,
    end_width: f64,
}

impl FixedLayout {
    /// Compute sticky offsets and shadows. Missing widths count as zero.
    pub fn compute(input: &FixedInput<'_>, width_of: impl Fn(&str) -> Option<f64>) -> Self {
        let width = |key: &str| width_of(key).unwrap_or(0.0).max(0.0);

        let mut natural_left: HashMap<&str, f64> = HashMap::with_capacity(input.order.len());
        let mut x = 0.0;
        for &key in input.order {
            natural_left.insert(key, x);
            x += width(key);
        }

        let mut layout = Self::default();
        let visible_left = input.scroll_left;
        let visible_right = input.scroll_left + input.container_width;

        let mut offset = 0.0;
        let mut last_stuck = None;
        for &key in input.start {
            let left = natural_left.get(key).copied().unwrap_or(offset);
            if left - visible_left < offset {
                last_stuck = Some(key);
            }
            layout.offsets.insert(
                key.to_string(),
                FixedOffset {
                    offset,
                    side: FixedSide::Start,
                    shadow: false,
                },
            );
            offset += width(key);
        }
        layout.start_width = offset;

        let mut offset = 0.0;
        let mut first_stuck = None;
        for &key in input.end.iter().rev() {
            let w = width(key);
            let right = natural_left
                .get(key)
                .map(|left| left + w)
                .unwrap_or(visible_right - offset);
            if right > visible_right - offset {
                first_stuck = Some(key);
            }
            layout.offsets.insert(
                key.to_string(),
                FixedOffset {
                    offset,
                    side: FixedSide::End,
                    shadow: false,
                },
            );
            offset += w;
        }
        layout.end_width = offset;

        for key in [last_stuck, first_stuck].into_iter().flatten() {
            if let Some(entry) = layout.offsets.get_mut(key) {
                entry.shadow = true;
            }
        }

        trace!(
            "fixed layout: start {}px, end {}px at scroll {}",
            layout.start_width,
            layout.end_width,
            input.scroll_left
        );
        layout
    }

    /// Offset record for a key, `None` when the column is not pinned.
    pub fn get(&self, key: &str) -> Option<FixedOffset> {
        self.offsets.get(key).copied()
    }

    pub fn has_shadow(&self, key: &str) -> bool {
        self.get(key).is_some_and(|o| o.shadow)
    }

    /// Combined width of the start-pinned block.
    pub fn start_width(&self) -> f64 {
        self.start_width
    }

    /// Combined width of the end-pinned block.
    pub fn end_width(&self) -> f64 {
        self.end_width
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
