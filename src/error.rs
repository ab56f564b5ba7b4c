//! Error types for property resolution.
//!
//! Ordinary malformed-member conditions (ambiguous keys, locator misses) are
//! absorbed with a diagnostic and fewer properties; only the unwrap recursion
//! guards surface as errors, since a runaway flatten would otherwise corrupt
//! the schema or blow the stack.

use thiserror::Error;

/// Errors during property resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cyclic unwrap: type {type_name} is already being flattened ({chain})")]
    CyclicUnwrap { type_name: String, chain: String },

    #[error("unwrap nesting exceeds {limit} levels at type {type_name}")]
    UnwrapDepthExceeded { type_name: String, limit: usize },
}
