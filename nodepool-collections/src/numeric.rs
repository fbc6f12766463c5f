//! Key and value bound for the collections.

use core::fmt::Debug;

/// A numeric key or value stored in a tree or list node.
///
/// Ordering and equality are the type's own `PartialOrd`/`PartialEq`, so for
/// floats a `NaN` never compares equal and always routes right in a tree.
/// `Default` is the zero value a node is reset to on deallocation.
pub trait Numeric: Copy + PartialOrd + Default + Debug {}

macro_rules! impl_numeric {
    ($($ty:ty),*) => {
        $(impl Numeric for $ty {})*
    };
}

impl_numeric!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);
