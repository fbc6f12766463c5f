//! Fallible arena construction.

use crate::{BuildError, Index, NodeArena, PoolNode};

/// Builder for [`NodeArena`].
///
/// Unlike [`NodeArena::with_capacity`], [`build`](Self::build) reports a
/// capacity the index type cannot address as an error instead of panicking.
///
/// # Example
///
/// ```
/// use nodepool::{ArenaBuilder, BuildError, NodeArena};
///
/// let arena: NodeArena<f64, u16> = ArenaBuilder::new().capacity(1000).build().unwrap();
/// assert_eq!(arena.capacity(), 1000);
///
/// let err = ArenaBuilder::new().capacity(300).build::<f64, u8>().unwrap_err();
/// assert_eq!(err, BuildError::CapacityOverflow { requested: 300, max: 256 });
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaBuilder {
    capacity: usize,
}

impl ArenaBuilder {
    /// Creates a builder with capacity 0.
    pub const fn new() -> Self {
        Self { capacity: 0 }
    }

    /// Sets the exact number of slots.
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds the arena.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::CapacityOverflow`] if the capacity exceeds
    /// `Idx::MAX_CAPACITY`.
    pub fn build<T: PoolNode, Idx: Index>(self) -> Result<NodeArena<T, Idx>, BuildError> {
        if self.capacity > Idx::MAX_CAPACITY {
            return Err(BuildError::CapacityOverflow {
                requested: self.capacity,
                max: Idx::MAX_CAPACITY,
            });
        }
        Ok(NodeArena::init(self.capacity))
    }
}
