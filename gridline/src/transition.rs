//! Add/remove highlighting for row identities.
//!
//! The tracker is a deadline machine: every operation takes the current
//! instant and [`TransitionTracker::tick`] fires whatever has expired. A
//! [`TransitionDriver`](crate::driver::TransitionDriver) (or the host's own
//! loop) calls `tick` when [`TransitionTracker::next_deadline`] passes.
//!
//! Lifecycles:
//! - added: `Adding` for the highlight duration, then dropped.
//! - removed: `Deleting` for the highlight duration, `FadingOut` for the
//!   fade duration, then gone from both the visible and the stored rows.
//!   Until then the row stays in the visible collection even if the data
//!   source has already dropped it.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use log::{debug, trace};
use tokio::time::Instant;

use crate::identity::{RowIdentity, RowKey};

/// Highlight and fade timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionConfig {
    pub highlight: Duration,
    pub fade_out: Duration,
}

impl TransitionConfig {
    pub fn new(highlight: Duration, fade_out: Duration) -> Self {
        Self {
            highlight,
            fade_out,
        }
    }
}

/// Which rows an update adds and removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceHints<K> {
    pub added: Vec<K>,
    pub removed: Vec<K>,
}

impl<K> Default for DataSourceHints<K> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

impl<K> DataSourceHints<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn added(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.added.extend(keys);
        self
    }

    pub fn removed(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.removed.extend(keys);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Animation phase of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    Adding,
    Deleting,
    FadingOut,
}

/// Something that happened during [`TransitionTracker::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionEffect<T, K> {
    /// The added highlight on `K` expired.
    AddSettled(K),
    /// `K` moved from deleting to fading out.
    FadeOutStarted(K),
    /// `K` finished fading and left the stored rows.
    Removed { key: K, row: T },
}

#[derive(Debug, Clone)]
struct Removal<T, K> {
    row: T,
    /// Index in the visible collection when captured.
    index: usize,
    /// Key of the row visibly preceding it, `None` when it was first.
    after: Option<K>,
    /// Key of the row visibly following it, `None` when it was last.
    before: Option<K>,
    fading: bool,
    deadline: Instant,
}

/// Tracks adding, deleting and fading-out rows.
#[derive(Debug, Clone)]
pub struct TransitionTracker<T, K: RowKey> {
    config: TransitionConfig,
    identity: RowIdentity<T, K>,
    adding: HashMap<K, Instant>,
    removals: HashMap<K, Removal<T, K>>,
    /// Rows as last supplied by the data source, minus completed removals.
    rows: Vec<T>,
    /// `rows` plus every removed row still animating.
    visible: Vec<T>,
}

impl<T: Clone + 'static, K: RowKey> TransitionTracker<T, K> {
    pub fn new(config: TransitionConfig, identity: RowIdentity<T, K>) -> Self {
        Self {
            config,
            identity,
            adding: HashMap::new(),
            removals: HashMap::new(),
            rows: Vec::new(),
            visible: Vec::new(),
        }
    }

    pub fn config(&self) -> TransitionConfig {
        self.config
    }

    /// Stored rows.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Rows to render: stored rows plus removed rows still animating.
    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    /// Replace the data source.
    ///
    /// In-flight removals not mentioned by `hints` keep animating. Adding
    /// highlights for keys missing from `next` are dropped silently.
    pub fn update_data_source(&mut self, next: Vec<T>, hints: &DataSourceHints<K>, now: Instant) {
        let next_keys: HashSet<K> = next.iter().map(|r| self.identity.key_of(r)).collect();

        self.adding.retain(|key, _| next_keys.contains(key));

        for key in &hints.removed {
            self.adding.remove(key);
            let deadline = now + self.config.highlight;
            if let Some(removal) = self.removals.get_mut(key) {
                removal.fading = false;
                removal.deadline = deadline;
                if let Some(row) = next.iter().find(|r| &self.identity.key_of(r) == key) {
                    removal.row = row.clone();
                }
                trace!("transition: restart removal {key:?}");
                continue;
            }
            let Some(removal) = self.capture(key, &next, deadline) else {
                trace!("transition: removal hint for unknown row {key:?}");
                continue;
            };
            debug!("transition: deleting {key:?}");
            self.removals.insert(key.clone(), removal);
        }

        for key in &hints.added {
            if !next_keys.contains(key) {
                continue;
            }
            if self.removals.remove(key).is_some() {
                debug!("transition: {key:?} re-added while deleting");
            }
            debug!("transition: adding {key:?}");
            self.adding.insert(key.clone(), now + self.config.highlight);
        }

        self.rows = next;
        self.rebuild_visible();
    }

    /// Snapshot a row about to disappear, with enough context to put it
    /// back where it was.
    fn capture(&self, key: &K, next: &[T], deadline: Instant) -> Option<Removal<T, K>> {
        let (source, index) = match self.identity.position(&self.visible, key) {
            Some(index) => (self.visible.as_slice(), index),
            None => (next, self.identity.position(next, key)?),
        };
        let row = next
            .iter()
            .find(|r| &self.identity.key_of(r) == key)
            .unwrap_or(&source[index])
            .clone();
        let after = index
            .checked_sub(1)
            .map(|prev| self.identity.key_of(&source[prev]));
        let before = source.get(index + 1).map(|next| self.identity.key_of(next));
        Some(Removal {
            row,
            index,
            after,
            before,
            fading: false,
            deadline,
        })
    }

    fn rebuild_visible(&mut self) {
        let present: HashSet<K> = self.rows.iter().map(|r| self.identity.key_of(r)).collect();
        let mut pending: Vec<&Removal<T, K>> = self
            .removals
            .iter()
            .filter(|(key, _)| !present.contains(*key))
            .map(|(_, removal)| removal)
            .collect();
        pending.sort_by_key(|removal| removal.index);

        let mut visible = self.rows.clone();
        for removal in pending {
            let at = self.placement(&visible, removal);
            visible.insert(at, removal.row.clone());
        }
        self.visible = visible;
    }

    /// Where a removed row goes back in: right after its nearest
    /// surviving predecessor, else right before its nearest surviving
    /// successor, else at its captured index. Neighbours that are
    /// themselves unplaced removals are stepped over.
    fn placement(&self, visible: &[T], removal: &Removal<T, K>) -> usize {
        let mut after = removal.after.as_ref();
        for _ in 0..=self.removals.len() {
            let Some(key) = after else {
                return 0;
            };
            if let Some(position) = self.identity.position(visible, key) {
                return position + 1;
            }
            match self.removals.get(key) {
                Some(previous) => after = previous.after.as_ref(),
                None => break,
            }
        }

        let mut before = removal.before.as_ref();
        for _ in 0..=self.removals.len() {
            let Some(key) = before else {
                return visible.len();
            };
            if let Some(position) = self.identity.position(visible, key) {
                return position;
            }
            match self.removals.get(key) {
                Some(next) => before = next.before.as_ref(),
                None => break,
            }
        }

        removal.index.min(visible.len())
    }

    /// Fire every deadline at or before `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<TransitionEffect<T, K>> {
        let mut effects = Vec::new();

        let settled: Vec<K> = self
            .adding
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in settled {
            self.adding.remove(&key);
            trace!("transition: {key:?} settled");
            effects.push(TransitionEffect::AddSettled(key));
        }

        let fade_out = self.config.fade_out;
        let mut finished = Vec::new();
        for (key, removal) in self.removals.iter_mut() {
            if removal.deadline > now {
                continue;
            }
            if !removal.fading {
                removal.fading = true;
                removal.deadline += fade_out;
                debug!("transition: {key:?} fading out");
                effects.push(TransitionEffect::FadeOutStarted(key.clone()));
            }
            if removal.deadline <= now {
                finished.push(key.clone());
            }
        }

        if !finished.is_empty() {
            for key in finished {
                let Some(removal) = self.removals.remove(&key) else {
                    continue;
                };
                self.rows.retain(|r| self.identity.key_of(r) != key);
                // Rows anchored to the finished one inherit its anchors.
                for other in self.removals.values_mut() {
                    if other.after.as_ref() == Some(&key) {
                        other.after = removal.after.clone();
                    }
                    if other.before.as_ref() == Some(&key) {
                        other.before = removal.before.clone();
                    }
                    if other.index > removal.index {
                        other.index -= 1;
                    }
                }
                debug!("transition: {key:?} removed");
                effects.push(TransitionEffect::Removed {
                    key,
                    row: removal.row,
                });
            }
            self.rebuild_visible();
        }

        effects
    }

    /// Earliest pending deadline, if any timer is running.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.adding
            .values()
            .copied()
            .chain(self.removals.values().map(|r| r.deadline))
            .min()
    }

    pub fn has_pending(&self) -> bool {
        !self.adding.is_empty() || !self.removals.is_empty()
    }

    pub fn phase_of(&self, key: &K) -> Option<TransitionPhase> {
        if self.adding.contains_key(key) {
            return Some(TransitionPhase::Adding);
        }
        self.removals.get(key).map(|removal| {
            if removal.fading {
                TransitionPhase::FadingOut
            } else {
                TransitionPhase::Deleting
            }
        })
    }

    pub fn adding(&self) -> HashSet<K> {
        self.adding.keys().cloned().collect()
    }

    pub fn deleting(&self) -> HashSet<K> {
        self.removal_keys(false)
    }

    pub fn fading_out(&self) -> HashSet<K> {
        self.removal_keys(true)
    }

    fn removal_keys(&self, fading: bool) -> HashSet<K> {
        self.removals
            .iter()
            .filter(|(_, removal)| removal.fading == fading)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Stop every timer for `key`. A removed row that is no longer stored
    /// leaves the visible collection immediately.
    pub fn cancel(&mut self, key: &K) {
        let added = self.adding.remove(key).is_some();
        let removed = self.removals.remove(key).is_some();
        if removed {
            self.rebuild_visible();
        }
        if added || removed {
            debug!("transition: cancelled {key:?}");
        }
    }

    /// Stop all timers. The visible collection falls back to the stored rows.
    pub fn clear(&mut self) {
        self.adding.clear();
        self.removals.clear();
        self.visible = self.rows.clone();
    }

    /// Replace the visible order with a permutation of it. Stored rows and
    /// animating removals follow the new order.
    pub fn set_order(&mut self, visible: Vec<T>) {
        let order: HashMap<K, usize> = visible
            .iter()
            .enumerate()
            .map(|(i, r)| (self.identity.key_of(r), i))
            .collect();
        let identity = &self.identity;
        self.rows
            .sort_by_key(|r| order.get(&identity.key_of(r)).copied().unwrap_or(usize::MAX));
        for (key, removal) in self.removals.iter_mut() {
            if let Some(&index) = order.get(key) {
                removal.index = index;
                removal.after = index.checked_sub(1).map(|p| identity.key_of(&visible[p]));
            }
        }
        self.visible = visible;
    }
}
