//! Row identity: the join key shared by every stateful subsystem.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::GridError;

/// Bounds every row key satisfies.
pub trait RowKey: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

impl<K> RowKey for K where K: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

/// Bounds every row record satisfies.
pub trait RowData: Clone + Send + Sync + 'static {}

impl<T> RowData for T where T: Clone + Send + Sync + 'static {}

type KeyFn<T, K> = dyn Fn(&T) -> K + Send + Sync;

/// Derives a stable key from a row record.
///
/// Supplied once when the grid is built. The function must be pure:
/// the same record always yields the same key.
///
/// # Example
///
/// ```ignore
/// #[derive(Clone)]
/// struct Order {
///     key: Option<String>,
///     id: u64,
/// }
///
/// let identity = RowIdentity::with_fallback(|o: &Order| o.key.clone(), |o| o.id.to_string());
/// ```
pub struct RowIdentity<T, K> {
    key_fn: Arc<KeyFn<T, K>>,
}

impl<T, K> Clone for RowIdentity<T, K> {
    fn clone(&self) -> Self {
        Self {
            key_fn: Arc::clone(&self.key_fn),
        }
    }
}

impl<T, K> fmt::Debug for RowIdentity<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowIdentity").finish_non_exhaustive()
    }
}

impl<T: 'static, K: RowKey> RowIdentity<T, K> {
    /// Key rows with a single accessor.
    pub fn new(key_fn: impl Fn(&T) -> K + Send + Sync + 'static) -> Self {
        Self {
            key_fn: Arc::new(key_fn),
        }
    }

    /// Key rows by an explicit key field, falling back to an identifier
    /// field when the explicit key is absent.
    pub fn with_fallback(
        primary: impl Fn(&T) -> Option<K> + Send + Sync + 'static,
        fallback: impl Fn(&T) -> K + Send + Sync + 'static,
    ) -> Self {
        Self::new(move |row| primary(row).unwrap_or_else(|| fallback(row)))
    }

    pub fn key_of(&self, row: &T) -> K {
        (self.key_fn)(row)
    }

    pub fn keys(&self, rows: &[T]) -> Vec<K> {
        rows.iter().map(|row| self.key_of(row)).collect()
    }

    /// Position of the row with `key`.
    pub fn position(&self, rows: &[T], key: &K) -> Option<usize> {
        rows.iter().position(|row| &self.key_of(row) == key)
    }

    /// Reject collections where two rows share a key.
    pub fn check_unique(&self, rows: &[T]) -> Result<(), GridError> {
        let mut seen = HashSet::with_capacity(rows.len());
        for row in rows {
            let key = self.key_of(row);
            if !seen.insert(key.clone()) {
                return Err(GridError::DuplicateRowKey(format!("{key:?}")));
            }
        }
        Ok(())
    }
}
