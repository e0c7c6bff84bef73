use std::collections::HashMap;
use std::hash::Hash;

/// Measured row heights keyed by row identity.
///
/// An expanded row is stored as one entry covering the row and its
/// expanded content, never as two.
#[derive(Debug, Clone)]
pub struct HeightCache<K> {
    heights: HashMap<K, f64>,
    /// Bumped on every change so renderers know when to re-measure.
    revision: u64,
}

impl<K> Default for HeightCache<K> {
    fn default() -> Self {
        Self {
            heights: HashMap::new(),
            revision: 0,
        }
    }
}

impl<K: Eq + Hash + Clone> HeightCache<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.heights.get(key).copied()
    }

    /// Record a measurement. Returns true if the stored height changed.
    pub fn set(&mut self, key: K, height: f64) -> bool {
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        match self.heights.insert(key, height) {
            Some(previous) if previous == height => false,
            _ => {
                self.revision += 1;
                true
            }
        }
    }

    /// Drop every measurement.
    pub fn invalidate_all(&mut self) {
        if !self.heights.is_empty() {
            self.heights.clear();
        }
        self.revision += 1;
    }

    /// Forget measurements for rows that are no longer present.
    pub fn retain_keys<'a>(&mut self, keys: impl IntoIterator<Item = &'a K>)
    where
        K: 'a,
    {
        let live: std::collections::HashSet<&K> = keys.into_iter().collect();
        let before = self.heights.len();
        self.heights.retain(|k, _| live.contains(k));
        if self.heights.len() != before {
            self.revision += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
