//! Expanded rows keyed by row identity.

use std::collections::HashSet;

use log::debug;

use crate::controlled::Controlled;
use crate::identity::RowKey;

/// Tracks which rows show their expanded content.
///
/// Each key is independent: collapsing a row never collapses anything
/// nested under it. Nesting depth is the renderer's business.
#[derive(Debug, Clone)]
pub struct ExpansionController<K: RowKey> {
    state: Controlled<HashSet<K>>,
}

impl<K: RowKey> Default for ExpansionController<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RowKey> ExpansionController<K> {
    pub fn new() -> Self {
        Self {
            state: Controlled::uncontrolled(HashSet::new()),
        }
    }

    pub fn expanded(&self) -> &HashSet<K> {
        self.state.value()
    }

    pub fn is_expanded(&self, key: &K) -> bool {
        self.state.value().contains(key)
    }

    pub fn is_controlled(&self) -> bool {
        self.state.is_controlled()
    }

    pub fn sync(&mut self, external: HashSet<K>) {
        self.state.sync(external);
    }

    pub fn release(&mut self) {
        self.state.release();
    }

    /// Flip one row. Returns the proposed set and whether `key` is now
    /// expanded in it.
    pub fn toggle(&mut self, key: K) -> (HashSet<K>, bool) {
        let mut next = self.expanded().clone();
        let expanded = if next.remove(&key) {
            false
        } else {
            next.insert(key.clone());
            true
        };
        debug!("expansion toggle {key:?} -> {expanded}");
        (self.state.set(next), expanded)
    }
}
