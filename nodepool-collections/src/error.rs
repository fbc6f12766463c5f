//! Error type for tree and list operations.

use nodepool::ArenaError;

/// Failure of a collection operation.
///
/// All variants are recoverable. A failed operation leaves the structure
/// and its arena unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The backing arena rejected the operation.
    #[error(transparent)]
    Arena(#[from] ArenaError),
    /// `delete` on a tree that does not hold the key.
    #[error("key not found")]
    KeyNotFound,
    /// `delete` on a list that does not hold the value.
    #[error("value not found")]
    NotFound,
}
