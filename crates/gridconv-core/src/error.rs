//! Unified error type for grid model and legacy case operations
//!
//! [`GridError`] covers the failures that can happen while manipulating the
//! in-memory values themselves (column rewrites, name overlays, table lookups).
//! File-level failures in `gridconv-io` are reported through `anyhow` and wrap
//! these variants when they originate here.

use thiserror::Error;

/// Error type for all gridconv value operations.
#[derive(Error, Debug)]
pub enum GridError {
    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors (length mismatches, short rows)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Errors raised while converting between the legacy case and the grid model
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// A table key that is not part of the grid model
    #[error("unknown table '{0}'")]
    UnknownTable(String),
}

/// Convenience type alias for Results using GridError.
pub type GridResult<T> = Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridError::Conversion("gen 3 references unknown bus 7".into());
        assert!(err.to_string().contains("Conversion error"));
        assert!(err.to_string().contains("unknown bus 7"));
    }
}
