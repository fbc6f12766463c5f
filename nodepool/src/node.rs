//! Payload contract for arena slots.

/// A value that can live in a [`NodeArena`](crate::NodeArena) slot.
///
/// `Default` is the slot's zero value: it is written into every slot at
/// construction and into a slot when it is deallocated. It must produce a
/// value with no links set.
///
/// `clear_links` resets the node's link fields (child or neighbour indices)
/// and is called on every freshly allocated slot, so a structure never
/// observes stale links from a payload built elsewhere.
///
/// # Example
///
/// ```
/// use nodepool::PoolNode;
///
/// #[derive(Debug, Default)]
/// struct Cell {
///     value: u64,
///     next: Option<u32>,
/// }
///
/// impl PoolNode for Cell {
///     fn clear_links(&mut self) {
///         self.next = None;
///     }
/// }
/// ```
pub trait PoolNode: Default {
    /// Resets every link field to `None`.
    fn clear_links(&mut self);
}

macro_rules! impl_pool_node_for_primitive {
    ($($ty:ty),*) => {
        $(
            impl PoolNode for $ty {
                #[inline]
                fn clear_links(&mut self) {}
            }
        )*
    };
}

impl_pool_node_for_primitive!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);
