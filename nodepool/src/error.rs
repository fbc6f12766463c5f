//! Error types for arena operations.

/// Failure of an arena operation.
///
/// Every variant is recoverable: the arena is left exactly as it was before
/// the failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    /// Allocation requested with no free slot.
    #[error("node pool exhausted (capacity {capacity})")]
    PoolExhausted {
        /// Capacity of the exhausted arena.
        capacity: usize,
    },
    /// Index outside `[0, capacity)` or referring to an unallocated slot.
    #[error("invalid node index {index} (capacity {capacity})")]
    InvalidIndex {
        /// The rejected index.
        index: usize,
        /// Capacity of the arena.
        capacity: usize,
    },
    /// Deallocation of a slot that is already free.
    #[error("node {index} is already deallocated")]
    DoubleFree {
        /// The slot that was freed twice.
        index: usize,
    },
}

/// Error during arena construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Requested capacity cannot be addressed by the index type.
    #[error("capacity ({requested}) exceeds index type maximum ({max})")]
    CapacityOverflow {
        /// Capacity passed to the builder.
        requested: usize,
        /// Largest capacity the index type supports.
        max: usize,
    },
}
