//! Variable-height row windowing.
//!
//! Only rows inside the viewport (plus an overscan margin) are
//! materialised. Padding before and after the window keeps the total
//! scroll height equal to the estimated height of every row.

mod cache;

use std::hash::Hash;

use log::trace;

pub use cache::HeightCache;

/// Estimated row height used until a row has been measured.
pub const DEFAULT_ROW_HEIGHT: f64 = 48.0;

/// Rows rendered beyond each edge of the viewport.
pub const DEFAULT_OVERSCAN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowConfig {
    pub row_height: f64,
    pub overscan: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
        }
    }
}

/// The scroll container as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_top: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_top: f64, height: f64) -> Self {
        Self { scroll_top, height }
    }
}

/// Rows to materialise, `start..end`, with the padding around them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VirtualWindow {
    pub start: usize,
    pub end: usize,
    pub padding_top: f64,
    pub padding_bottom: f64,
    pub total_height: f64,
}

impl VirtualWindow {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Where a row should land when scrolled to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAlign {
    Start,
    Center,
    End,
    /// Scroll as little as possible to bring the row into view.
    #[default]
    Auto,
}

/// Computes virtual windows over a row sequence.
///
/// Owns the measured-height cache; measurements go through
/// [`RowWindowing::measure`] and invalidation through
/// [`RowWindowing::invalidate`].
#[derive(Debug, Clone)]
pub struct RowWindowing<K> {
    config: WindowConfig,
    cache: HeightCache<K>,
}

impl<K: Eq + Hash + Clone> RowWindowing<K> {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            config,
            cache: HeightCache::new(),
        }
    }

    pub fn config(&self) -> WindowConfig {
        self.config
    }

    pub fn cache(&self) -> &HeightCache<K> {
        &self.cache
    }

    /// Record a row's rendered height, expanded content included.
    pub fn measure(&mut self, key: K, height: f64) -> bool {
        self.cache.set(key, height)
    }

    /// Drop all measurements. Expansion changes shift every row below the
    /// toggled one, so the whole cache goes.
    pub fn invalidate(&mut self) {
        self.cache.invalidate_all();
    }

    pub fn retain_keys<'a>(&mut self, keys: impl IntoIterator<Item = &'a K>)
    where
        K: 'a,
    {
        self.cache.retain_keys(keys);
    }

    /// Measured height of a row, else the estimate.
    pub fn height_of(&self, key: &K) -> f64 {
        self.cache.get(key).unwrap_or(self.config.row_height)
    }

    /// Cumulative top offsets; `offsets[i]` is the top of row `i` and the
    /// final entry is the total height.
    pub fn offsets(&self, keys: &[K]) -> Vec<f64> {
        let mut offsets = Vec::with_capacity(keys.len() + 1);
        let mut total = 0.0;
        offsets.push(total);
        for key in keys {
            total += self.height_of(key);
            offsets.push(total);
        }
        offsets
    }

    pub fn total_height(&self, keys: &[K]) -> f64 {
        keys.iter().map(|k| self.height_of(k)).sum()
    }

    /// Top offset of row `index`; `None` past the end.
    pub fn offset_of(&self, keys: &[K], index: usize) -> Option<f64> {
        (index < keys.len()).then(|| keys[..index].iter().map(|k| self.height_of(k)).sum())
    }

    /// Compute the window, or `None` when the scroll container is unknown.
    pub fn window(&self, keys: &[K], viewport: Option<Viewport>) -> Option<VirtualWindow> {
        viewport.map(|viewport| self.compute(keys, viewport))
    }

    pub fn compute(&self, keys: &[K], viewport: Viewport) -> VirtualWindow {
        let count = keys.len();
        if count == 0 {
            return VirtualWindow::default();
        }

        let offsets = self.offsets(keys);
        let total_height = offsets[count];
        let top = viewport.scroll_top.max(0.0);
        let bottom = top + viewport.height.max(0.0);

        let first = offsets.partition_point(|&h| h <= top).saturating_sub(1).min(count);
        let last = offsets[..count].partition_point(|&h| h < bottom).max(first);

        let start = first.saturating_sub(self.config.overscan);
        let end = (last + self.config.overscan).min(count);

        let window = VirtualWindow {
            start,
            end,
            padding_top: offsets[start],
            padding_bottom: total_height - offsets[end],
            total_height,
        };
        trace!(
            "window {}..{} of {count} at scroll {top} (visible {first}..{last})",
            window.start,
            window.end
        );
        window
    }

    /// Index of the row covering a vertical offset.
    pub fn index_at(&self, keys: &[K], y: f64) -> Option<usize> {
        if keys.is_empty() || y < 0.0 {
            return None;
        }
        let offsets = self.offsets(keys);
        let index = offsets.partition_point(|&h| h <= y).saturating_sub(1);
        (index < keys.len()).then_some(index)
    }

    /// Scroll offset that brings `index` into view with the given alignment.
    ///
    /// Returns `None` for an out-of-range index.
    pub fn scroll_offset_for(
        &self,
        keys: &[K],
        index: usize,
        align: ScrollAlign,
        viewport: Viewport,
    ) -> Option<f64> {
        if index >= keys.len() {
            return None;
        }
        let offsets = self.offsets(keys);
        let top = offsets[index];
        let height = offsets[index + 1] - top;
        let max_scroll = (offsets[keys.len()] - viewport.height).max(0.0);

        let target = match align {
            ScrollAlign::Start => top,
            ScrollAlign::End => top + height - viewport.height,
            ScrollAlign::Center => top + height / 2.0 - viewport.height / 2.0,
            ScrollAlign::Auto => {
                if top < viewport.scroll_top {
                    top
                } else if top + height > viewport.scroll_top + viewport.height {
                    top + height - viewport.height
                } else {
                    viewport.scroll_top
                }
            }
        };
        Some(target.clamp(0.0, max_scroll))
    }
}
