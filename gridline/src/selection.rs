//! Row selection keyed by row identity.

use std::collections::HashSet;

use log::debug;
use serde::Deserialize;

use crate::controlled::Controlled;
use crate::identity::RowKey;

/// Selection mode for the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// No selection allowed.
    #[default]
    None,
    /// Single row selection (radio-button style).
    Single,
    /// Multiple rows can be selected (checkbox style).
    Multiple,
}

/// Tracks selected rows by key.
///
/// Every mutating method returns the proposed selection. In controlled
/// mode the proposal is not stored; the caller decides whether to sync
/// it back.
#[derive(Debug, Clone)]
pub struct SelectionController<K: RowKey> {
    mode: SelectionMode,
    state: Controlled<HashSet<K>>,
    /// Last row toggled, the start of range selections.
    anchor: Option<K>,
    preserve_across_pages: bool,
}

impl<K: RowKey> SelectionController<K> {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            state: Controlled::uncontrolled(HashSet::new()),
            anchor: None,
            preserve_across_pages: false,
        }
    }

    /// Keep selections for rows outside the current collection when
    /// toggling all.
    pub fn preserve_across_pages(mut self, preserve: bool) -> Self {
        self.preserve_across_pages = preserve;
        self
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SelectionMode) -> Option<HashSet<K>> {
        self.mode = mode;
        match mode {
            SelectionMode::None if !self.selected().is_empty() => Some(self.commit(HashSet::new())),
            SelectionMode::Single if self.selected().len() > 1 => Some(self.commit(HashSet::new())),
            _ => None,
        }
    }

    pub fn selected(&self) -> &HashSet<K> {
        self.state.value()
    }

    pub fn is_selected(&self, key: &K) -> bool {
        self.state.value().contains(key)
    }

    pub fn is_controlled(&self) -> bool {
        self.state.is_controlled()
    }

    /// Mirror an externally owned selection.
    pub fn sync(&mut self, external: HashSet<K>) {
        self.state.sync(external);
    }

    pub fn release(&mut self) {
        self.state.release();
    }

    fn commit(&mut self, next: HashSet<K>) -> HashSet<K> {
        self.state.set(next)
    }

    /// Flip one row. Returns `None` when selection is off.
    pub fn toggle(&mut self, key: K) -> Option<HashSet<K>> {
        let current = self.selected();
        let next = match self.mode {
            SelectionMode::None => return None,
            SelectionMode::Single => {
                if current.contains(&key) {
                    HashSet::new()
                } else {
                    HashSet::from([key.clone()])
                }
            }
            SelectionMode::Multiple => {
                let mut next = current.clone();
                if !next.remove(&key) {
                    next.insert(key.clone());
                }
                next
            }
        };
        debug!("selection toggle {key:?}");
        self.anchor = Some(key);
        Some(self.commit(next))
    }

    /// Select or deselect every eligible row of `current`.
    ///
    /// Deselects when every eligible row is already selected. Disabled
    /// rows keep whatever state they had. Off-page keys survive only when
    /// preserving across pages.
    pub fn toggle_all(
        &mut self,
        current: &[K],
        eligible: impl Fn(&K) -> bool,
    ) -> Option<HashSet<K>> {
        if self.mode != SelectionMode::Multiple {
            return None;
        }
        let all_selected = self.all_selected(current, &eligible);
        let mut next: HashSet<K> = if self.preserve_across_pages {
            self.selected().clone()
        } else {
            let present: HashSet<&K> = current.iter().collect();
            self.selected()
                .iter()
                .filter(|k| present.contains(k))
                .cloned()
                .collect()
        };
        for key in current.iter().filter(|k| eligible(k)) {
            if all_selected {
                next.remove(key);
            } else {
                next.insert(key.clone());
            }
        }
        debug!(
            "selection toggle_all -> {} ({})",
            next.len(),
            if all_selected { "cleared" } else { "filled" }
        );
        Some(self.commit(next))
    }

    /// Select every eligible row between the anchor and `key`, inclusive.
    ///
    /// Without an anchor (or when it is no longer in `current`) this is a
    /// plain toggle.
    pub fn select_range(
        &mut self,
        key: K,
        current: &[K],
        eligible: impl Fn(&K) -> bool,
    ) -> Option<HashSet<K>> {
        if self.mode != SelectionMode::Multiple {
            return self.toggle(key);
        }
        let target = current.iter().position(|k| k == &key);
        let anchor = self
            .anchor
            .as_ref()
            .and_then(|a| current.iter().position(|k| k == a));
        let (Some(from), Some(to)) = (anchor, target) else {
            return self.toggle(key);
        };
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        let mut next = self.selected().clone();
        next.extend(current[lo..=hi].iter().filter(|k| eligible(k)).cloned());
        Some(self.commit(next))
    }

    /// Clear the selection.
    pub fn clear(&mut self) -> HashSet<K> {
        self.anchor = None;
        self.commit(HashSet::new())
    }

    /// Every eligible row of `current` is selected (and there is at least one).
    pub fn all_selected(&self, current: &[K], eligible: impl Fn(&K) -> bool) -> bool {
        let mut any = false;
        for key in current.iter().filter(|k| eligible(k)) {
            if !self.is_selected(key) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Some, but not all, eligible rows of `current` are selected.
    pub fn indeterminate(&self, current: &[K], eligible: impl Fn(&K) -> bool) -> bool {
        let (mut selected, mut total) = (0usize, 0usize);
        for key in current.iter().filter(|k| eligible(k)) {
            total += 1;
            if self.is_selected(key) {
                selected += 1;
            }
        }
        selected > 0 && selected < total
    }
}
