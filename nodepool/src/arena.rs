//! Fixed-capacity node arena with an intrusive free list.
//!
//! Slots are addressed by integer index. Free slots are threaded together
//! through a per-slot `free_next` link, so allocation pops the free-list head
//! and deallocation pushes onto it. Both are O(1) and reuse is LIFO.

use std::mem;

use tracing::{debug, trace};

use crate::{ArenaError, Index, PoolNode};

/// Fixed-capacity slot pool with stable indices.
///
/// Holds:
/// - Slot array (`T`, reset to `T::default()` when free)
/// - Occupancy bitmap (`u64` words)
/// - Free-list links (`Option<Idx>` per slot) and the free-list head
///
/// Capacity is exact and never changes. Indices stay valid until the slot is
/// deallocated.
///
/// # Example
///
/// ```
/// use nodepool::NodeArena;
///
/// let mut arena: NodeArena<u64> = NodeArena::with_capacity(4);
///
/// let idx = arena.allocate(42).unwrap();
/// assert_eq!(arena.get(idx), Some(&42));
///
/// assert_eq!(arena.deallocate(idx), Ok(42));
/// assert_eq!(arena.get(idx), None);
/// ```
#[derive(Debug, Clone)]
pub struct NodeArena<T, Idx: Index = u32> {
    slots: Box<[T]>,
    /// Free-list link per slot. Always `None` for allocated slots.
    free_next: Box<[Option<Idx>]>,
    occupied: Box<[u64]>,
    free_head: Option<Idx>,
    len: usize,
}

impl<T: PoolNode, Idx: Index> NodeArena<T, Idx> {
    /// Creates an arena with exactly `capacity` slots, all free.
    ///
    /// Capacity `0` is allowed and yields an arena on which every
    /// allocation fails with [`ArenaError::PoolExhausted`].
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds [`Index::MAX_CAPACITY`]. Use
    /// [`ArenaBuilder`](crate::ArenaBuilder) for a fallible constructor.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            capacity <= Idx::MAX_CAPACITY,
            "capacity exceeds index type maximum"
        );
        Self::init(capacity)
    }

    pub(crate) fn init(capacity: usize) -> Self {
        let slots = (0..capacity).map(|_| T::default()).collect();
        let free_next = (0..capacity)
            .map(|i| (i + 1 < capacity).then(|| Idx::from_usize(i + 1)))
            .collect();
        let occupied = vec![0u64; bitmap_words(capacity)].into_boxed_slice();
        let free_head = (capacity > 0).then(|| Idx::from_usize(0));

        trace!(capacity, "node arena initialized");

        Self {
            slots,
            free_next,
            occupied,
            free_head,
            len: 0,
        }
    }

    /// Stores `value` in a free slot and returns its index.
    ///
    /// The slot's link fields are cleared before the index is handed out.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::PoolExhausted`] if no slot is free. `value` is
    /// dropped in this case.
    #[inline]
    pub fn allocate(&mut self, value: T) -> Result<Idx, ArenaError> {
        let Some(index) = self.free_head else {
            debug!(capacity = self.capacity(), "no free node available");
            return Err(ArenaError::PoolExhausted {
                capacity: self.capacity(),
            });
        };

        let i = index.as_usize();
        self.free_head = self.free_next[i].take();

        let slot = &mut self.slots[i];
        *slot = value;
        slot.clear_links();

        self.set_occupied(i);
        self.len += 1;

        Ok(index)
    }

    /// Frees the slot at `index` and returns the value it held.
    ///
    /// The slot is reset to `T::default()` and pushed onto the free list, so
    /// it is the next one handed out by [`allocate`](Self::allocate).
    ///
    /// # Errors
    ///
    /// - [`ArenaError::InvalidIndex`] if `index` is outside `[0, capacity)`.
    /// - [`ArenaError::DoubleFree`] if the slot is not allocated.
    #[inline]
    pub fn deallocate(&mut self, index: Idx) -> Result<T, ArenaError> {
        let i = index.as_usize();
        if i >= self.capacity() {
            debug!(index = i, capacity = self.capacity(), "index out of bounds in deallocation");
            return Err(ArenaError::InvalidIndex {
                index: i,
                capacity: self.capacity(),
            });
        }
        if !self.is_occupied(i) {
            debug!(index = i, "node is already deallocated");
            return Err(ArenaError::DoubleFree { index: i });
        }

        let value = mem::take(&mut self.slots[i]);
        self.set_vacant(i);

        self.free_next[i] = self.free_head;
        self.free_head = Some(index);
        self.len -= 1;

        Ok(value)
    }

    /// Frees every slot, dropping all stored values.
    ///
    /// The free list is rebuilt in construction order, so the next
    /// allocation returns index 0 again.
    pub fn clear(&mut self) {
        let capacity = self.capacity();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            *slot = T::default();
            self.free_next[i] = (i + 1 < capacity).then(|| Idx::from_usize(i + 1));
        }
        self.occupied.fill(0);
        self.free_head = (capacity > 0).then(|| Idx::from_usize(0));
        self.len = 0;
    }
}

impl<T, Idx: Index> NodeArena<T, Idx> {
    /// Returns the fixed number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of allocated slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of free slots.
    #[inline]
    pub fn free_len(&self) -> usize {
        self.capacity() - self.len
    }

    /// Returns `true` if no slots are allocated.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if every slot is allocated.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.free_head.is_none()
    }

    /// Returns `true` if `index` is in range and currently allocated.
    #[inline]
    pub fn is_allocated(&self, index: Idx) -> bool {
        let i = index.as_usize();
        i < self.capacity() && self.is_occupied(i)
    }

    /// Returns a reference to the value at `index`, if allocated.
    #[inline]
    pub fn get(&self, index: Idx) -> Option<&T> {
        if !self.is_allocated(index) {
            return None;
        }
        Some(&self.slots[index.as_usize()])
    }

    /// Returns a mutable reference to the value at `index`, if allocated.
    #[inline]
    pub fn get_mut(&mut self, index: Idx) -> Option<&mut T> {
        if !self.is_allocated(index) {
            return None;
        }
        Some(&mut self.slots[index.as_usize()])
    }

    /// Returns the index the next allocation will use, if any.
    #[inline]
    pub fn free_head(&self) -> Option<Idx> {
        self.free_head
    }

    /// Returns an iterator over the free list, starting at its head.
    ///
    /// The order is the order in which future allocations hand out indices.
    #[inline]
    pub fn free_indices(&self) -> FreeIndices<'_, Idx> {
        FreeIndices {
            free_next: &self.free_next,
            current: self.free_head,
            remaining: self.free_len(),
        }
    }

    /// Returns an iterator over allocated slots in index order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, Idx> {
        Iter {
            arena: self,
            position: 0,
            remaining: self.len,
        }
    }

    /// Checks the free-list and occupancy invariants.
    ///
    /// Verifies that the free list is acyclic, visits exactly the
    /// unallocated slots, and that `len + free_len == capacity`. O(capacity).
    ///
    /// # Panics
    ///
    /// Panics with a description of the first violation found.
    pub fn assert_invariants(&self) {
        let capacity = self.capacity();
        let occupied = (0..capacity).filter(|&i| self.is_occupied(i)).count();
        assert_eq!(self.len, occupied, "len does not match occupancy bitmap");

        let mut seen = vec![false; capacity];
        let mut free = 0usize;
        let mut current = self.free_head;
        while let Some(idx) = current {
            let i = idx.as_usize();
            assert!(i < capacity, "free list holds out-of-range index {i}");
            assert!(!self.is_occupied(i), "free list holds allocated slot {i}");
            assert!(!seen[i], "free list revisits slot {i}");
            seen[i] = true;
            free += 1;
            current = self.free_next[i];
        }

        assert_eq!(
            occupied + free,
            capacity,
            "allocated + free-list length must equal capacity"
        );

        for i in 0..capacity {
            if self.is_occupied(i) {
                assert!(
                    self.free_next[i].is_none(),
                    "allocated slot {i} has a free-list link"
                );
            }
        }
    }

    #[inline]
    fn is_occupied(&self, i: usize) -> bool {
        self.occupied[i / 64] & (1 << (i % 64)) != 0
    }

    #[inline]
    fn set_occupied(&mut self, i: usize) {
        self.occupied[i / 64] |= 1 << (i % 64);
    }

    #[inline]
    fn set_vacant(&mut self, i: usize) {
        self.occupied[i / 64] &= !(1 << (i % 64));
    }
}

/// Indexes an allocated slot.
///
/// # Panics
///
/// Panics if `index` is out of range or not allocated.
impl<T, Idx: Index> core::ops::Index<Idx> for NodeArena<T, Idx> {
    type Output = T;

    #[inline]
    fn index(&self, index: Idx) -> &T {
        self.get(index).expect("invalid node index")
    }
}

impl<T, Idx: Index> core::ops::IndexMut<Idx> for NodeArena<T, Idx> {
    #[inline]
    fn index_mut(&mut self, index: Idx) -> &mut T {
        self.get_mut(index).expect("invalid node index")
    }
}

/// Iterator over the free list. See [`NodeArena::free_indices`].
#[derive(Debug, Clone)]
pub struct FreeIndices<'a, Idx: Index> {
    free_next: &'a [Option<Idx>],
    current: Option<Idx>,
    remaining: usize,
}

impl<Idx: Index> Iterator for FreeIndices<'_, Idx> {
    type Item = Idx;

    #[inline]
    fn next(&mut self) -> Option<Idx> {
        // A corrupted (cyclic) list stops after `free_len` steps.
        if self.remaining == 0 {
            return None;
        }
        let idx = self.current?;
        self.current = self.free_next[idx.as_usize()];
        self.remaining -= 1;
        Some(idx)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

/// Iterator over allocated slots. See [`NodeArena::iter`].
#[derive(Debug)]
pub struct Iter<'a, T, Idx: Index> {
    arena: &'a NodeArena<T, Idx>,
    position: usize,
    remaining: usize,
}

impl<'a, T, Idx: Index> Iterator for Iter<'a, T, Idx> {
    type Item = (Idx, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 && self.position < self.arena.capacity() {
            let i = self.position;
            self.position += 1;
            if self.arena.is_occupied(i) {
                self.remaining -= 1;
                return Some((Idx::from_usize(i), &self.arena.slots[i]));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, Idx: Index> ExactSizeIterator for Iter<'_, T, Idx> {}

#[inline]
const fn bitmap_words(capacity: usize) -> usize {
    capacity.div_ceil(64)
}
