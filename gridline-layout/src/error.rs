use thiserror::Error;

/// Errors raised while validating layout inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Two columns share the same key.
    #[error("Column key '{0}' is declared more than once")]
    DuplicateColumnKey(String),
}
