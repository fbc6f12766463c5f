//! Index trait for arena slots.
//!
//! The [`Index`] trait abstracts over the integer types used to address
//! slots in a [`NodeArena`](crate::NodeArena). Links between nodes are stored
//! as `Option<Idx>`, so no sentinel value is reserved.

use core::fmt::Debug;

/// Trait for index types used to address arena slots.
///
/// Provides conversion to/from `usize` and the largest capacity the type can
/// address. Implemented for the unsigned integer types.
///
/// # Example
///
/// ```
/// use nodepool::Index;
///
/// let idx = u16::from_usize(300);
/// assert_eq!(idx.as_usize(), 300);
/// assert_eq!(u8::MAX_CAPACITY, 256);
/// ```
pub trait Index: Copy + Eq + Debug {
    /// Largest number of slots addressable with this type.
    ///
    /// Slot indices run `0..MAX_CAPACITY`, so for `u8` this is 256.
    const MAX_CAPACITY: usize;

    /// Creates an index from a `usize` slot position.
    ///
    /// The caller guarantees `val < MAX_CAPACITY`.
    fn from_usize(val: usize) -> Self;

    /// Returns the slot position as a `usize`.
    fn as_usize(self) -> usize;
}

macro_rules! impl_index_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Index for $ty {
                const MAX_CAPACITY: usize = {
                    let slots = <$ty>::MAX as u128 + 1;
                    if slots > usize::MAX as u128 {
                        usize::MAX
                    } else {
                        slots as usize
                    }
                };

                #[inline]
                fn from_usize(val: usize) -> Self {
                    val as Self
                }

                #[inline]
                fn as_usize(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_index_for_unsigned!(u8, u16, u32, u64, usize);
