//! Doubly-linked list over a node arena.
//!
//! Each node is a `(value, prev, next)` triple in the list's private
//! [`NodeArena`]. For every node `n`, `next[n] = m` implies `prev[m] = n`;
//! the head has no `prev` and the tail has no `next`.
//!
//! # Example
//!
//! ```
//! use nodepool_collections::DoublyLinkedList;
//!
//! let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(10);
//!
//! list.append(1.1).unwrap();
//! list.append(2.2).unwrap();
//! list.append(3.3).unwrap();
//! list.prepend(0.0).unwrap();
//!
//! let anchor = list.search(1.1).unwrap();
//! list.insert_after(anchor, 1.5).unwrap();
//!
//! list.delete(2.2).unwrap();
//! assert_eq!(list.traverse(), [0.0, 1.1, 1.5, 3.3]);
//! ```

use std::mem;

use nodepool::{ArenaError, Index, NodeArena, PoolNode};
use tracing::debug;

use crate::{Error, Numeric};

/// Arena type backing a [`DoublyLinkedList`].
pub type ListArena<V, Idx = u32> = NodeArena<ListNode<V, Idx>, Idx>;

/// A node in the linked list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListNode<V, Idx: Index = u32> {
    value: V,
    prev: Option<Idx>,
    next: Option<Idx>,
}

impl<V, Idx: Index> ListNode<V, Idx> {
    /// Creates an unlinked node.
    #[inline]
    pub fn new(value: V) -> Self {
        Self {
            value,
            prev: None,
            next: None,
        }
    }

    /// Returns the node's value.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns the previous node's index.
    #[inline]
    pub fn prev(&self) -> Option<Idx> {
        self.prev
    }

    /// Returns the next node's index.
    #[inline]
    pub fn next(&self) -> Option<Idx> {
        self.next
    }
}

impl<V: Default, Idx: Index> Default for ListNode<V, Idx> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: Default, Idx: Index> PoolNode for ListNode<V, Idx> {
    #[inline]
    fn clear_links(&mut self) {
        self.prev = None;
        self.next = None;
    }
}

/// A doubly-linked list whose nodes live in a fixed-capacity arena.
///
/// The list tracks head, tail, and length. Indices returned by insert
/// operations stay valid until that node is removed.
///
/// # Type Parameters
///
/// - `V`: Value type (default `f64`)
/// - `Idx`: Index type (default `u32`)
#[derive(Debug, Clone)]
pub struct DoublyLinkedList<V = f64, Idx: Index = u32> {
    arena: ListArena<V, Idx>,
    head: Option<Idx>,
    tail: Option<Idx>,
    len: usize,
}

impl<V: Numeric, Idx: Index> DoublyLinkedList<V, Idx> {
    /// Creates an empty list with room for `capacity` nodes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds `Idx::MAX_CAPACITY`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_arena(NodeArena::with_capacity(capacity))
    }

    /// Creates an empty list over `arena`.
    ///
    /// Any nodes already allocated in `arena` are discarded.
    pub fn from_arena(mut arena: ListArena<V, Idx>) -> Self {
        arena.clear();
        Self {
            arena,
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Returns the number of elements in the list.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the node capacity of the backing arena.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Returns the head node's index, or `None` if empty.
    #[inline]
    pub fn front_index(&self) -> Option<Idx> {
        self.head
    }

    /// Returns the tail node's index, or `None` if empty.
    #[inline]
    pub fn back_index(&self) -> Option<Idx> {
        self.tail
    }

    /// Returns the front value.
    #[inline]
    pub fn front(&self) -> Option<V> {
        self.head.map(|idx| self.arena[idx].value)
    }

    /// Returns the back value.
    #[inline]
    pub fn back(&self) -> Option<V> {
        self.tail.map(|idx| self.arena[idx].value)
    }

    /// Returns the node at `index`, if allocated.
    #[inline]
    pub fn node(&self, index: Idx) -> Option<&ListNode<V, Idx>> {
        self.arena.get(index)
    }

    /// Returns the value at `index`, if allocated.
    #[inline]
    pub fn get(&self, index: Idx) -> Option<V> {
        self.arena.get(index).map(|node| node.value)
    }

    /// Returns the index of the node after `index`.
    ///
    /// Returns `None` if `index` is the tail or invalid.
    #[inline]
    pub fn next_index(&self, index: Idx) -> Option<Idx> {
        self.arena.get(index)?.next
    }

    /// Returns the index of the node before `index`.
    ///
    /// Returns `None` if `index` is the head or invalid.
    #[inline]
    pub fn prev_index(&self, index: Idx) -> Option<Idx> {
        self.arena.get(index)?.prev
    }

    // ========================================================================
    // Insert operations
    // ========================================================================

    /// Pushes a value to the back of the list.
    ///
    /// Returns the index of the inserted node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Arena`] with `PoolExhausted` if the arena is full.
    #[inline]
    pub fn append(&mut self, value: V) -> Result<Idx, Error> {
        let idx = self.arena.allocate(ListNode::new(value))?;

        match self.tail {
            Some(tail) => {
                self.arena[idx].prev = Some(tail);
                self.arena[tail].next = Some(idx);
            }
            None => self.head = Some(idx),
        }

        self.tail = Some(idx);
        self.len += 1;
        Ok(idx)
    }

    /// Pushes a value to the front of the list.
    ///
    /// Returns the index of the inserted node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Arena`] with `PoolExhausted` if the arena is full.
    #[inline]
    pub fn prepend(&mut self, value: V) -> Result<Idx, Error> {
        let idx = self.arena.allocate(ListNode::new(value))?;

        match self.head {
            Some(head) => {
                self.arena[idx].next = Some(head);
                self.arena[head].prev = Some(idx);
            }
            None => self.tail = Some(idx),
        }

        self.head = Some(idx);
        self.len += 1;
        Ok(idx)
    }

    /// Inserts a value directly after the node at `anchor`.
    ///
    /// Returns the index of the inserted node. If `anchor` was the tail, the
    /// new node becomes the tail.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::InvalidIndex`] if `anchor` is out of range or not
    ///   allocated. Nothing is allocated in this case.
    /// - [`ArenaError::PoolExhausted`] if the arena is full.
    pub fn insert_after(&mut self, anchor: Idx, value: V) -> Result<Idx, Error> {
        if !self.arena.is_allocated(anchor) {
            debug!(index = anchor.as_usize(), "invalid node index for insertion");
            return Err(ArenaError::InvalidIndex {
                index: anchor.as_usize(),
                capacity: self.arena.capacity(),
            }
            .into());
        }

        let idx = self.arena.allocate(ListNode::new(value))?;
        let next = self.arena[anchor].next;

        let node = &mut self.arena[idx];
        node.prev = Some(anchor);
        node.next = next;

        self.arena[anchor].next = Some(idx);
        match next {
            Some(next) => self.arena[next].prev = Some(idx),
            None => self.tail = Some(idx),
        }

        self.len += 1;
        Ok(idx)
    }

    // ========================================================================
    // Search and remove
    // ========================================================================

    /// Returns the index of the first node, from the front, equal to `value`.
    pub fn search(&self, value: V) -> Option<Idx> {
        let mut current = self.head;
        while let Some(idx) = current {
            let node = &self.arena[idx];
            if node.value == value {
                return Some(idx);
            }
            current = node.next;
        }
        None
    }

    /// Returns `true` if any node equals `value`.
    #[inline]
    pub fn contains(&self, value: V) -> bool {
        self.search(value).is_some()
    }

    /// Removes the first node, from the front, equal to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no node matches. The list is left
    /// unchanged.
    pub fn delete(&mut self, value: V) -> Result<(), Error> {
        let Some(idx) = self.search(value) else {
            debug!(?value, "value not found");
            return Err(Error::NotFound);
        };

        self.unlink(idx);
        self.arena.deallocate(idx)?;
        Ok(())
    }

    /// Removes and returns the front value.
    ///
    /// Returns `None` if the list is empty.
    pub fn pop_front(&mut self) -> Option<V> {
        let head = self.head?;
        self.unlink(head);
        self.arena.deallocate(head).ok().map(|node| node.value)
    }

    /// Removes and returns the back value.
    ///
    /// Returns `None` if the list is empty.
    pub fn pop_back(&mut self) -> Option<V> {
        let tail = self.tail?;
        self.unlink(tail);
        self.arena.deallocate(tail).ok().map(|node| node.value)
    }

    /// Detaches an allocated node from its neighbours without freeing it.
    fn unlink(&mut self, idx: Idx) {
        let ListNode { prev, next, .. } = self.arena[idx];

        match prev {
            Some(prev) => self.arena[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.arena[next].prev = prev,
            None => self.tail = prev,
        }

        self.arena[idx].clear_links();
        self.len -= 1;
    }

    // ========================================================================
    // Bulk operations
    // ========================================================================

    /// Reverses the list in place.
    ///
    /// Swaps every node's links and the head/tail. No node moves, so every
    /// index stays valid.
    pub fn reverse(&mut self) {
        let mut current = self.head;
        while let Some(idx) = current {
            let node = &mut self.arena[idx];
            mem::swap(&mut node.prev, &mut node.next);
            // Old `next` now lives in `prev`
            current = node.prev;
        }
        mem::swap(&mut self.head, &mut self.tail);
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Returns all values, front to back.
    pub fn traverse(&self) -> Vec<V> {
        self.iter().copied().collect()
    }

    /// Returns an iterator over values, front to back.
    ///
    /// Double-ended: `rev()` walks the `prev` links from the tail.
    #[inline]
    pub fn iter(&self) -> Iter<'_, V, Idx> {
        Iter {
            arena: &self.arena,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    /// Checks link symmetry, endpoint, length, and arena invariants.
    ///
    /// O(n). Intended for tests.
    ///
    /// # Panics
    ///
    /// Panics with a description of the first violation found.
    pub fn assert_invariants(&self) {
        self.arena.assert_invariants();

        assert_eq!(
            self.head.is_none(),
            self.tail.is_none(),
            "head and tail must be empty together"
        );
        assert_eq!(self.head.is_none(), self.len == 0, "empty list must have len 0");

        let mut forward = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(idx) = current {
            let i = idx.as_usize();
            assert!(forward < self.len, "forward walk longer than len");
            assert!(self.arena.is_allocated(idx), "list links to free slot {i}");
            let node = &self.arena[idx];
            assert_eq!(node.prev, prev, "prev link of {i} does not mirror next link");
            prev = Some(idx);
            current = node.next;
            forward += 1;
        }
        assert_eq!(prev, self.tail, "forward walk must end at tail");
        assert_eq!(forward, self.len, "forward walk length must equal len");

        let mut backward = 0usize;
        let mut next = None;
        let mut current = self.tail;
        while let Some(idx) = current {
            let i = idx.as_usize();
            assert!(backward < self.len, "backward walk longer than len");
            let node = &self.arena[idx];
            assert_eq!(node.next, next, "next link of {i} does not mirror prev link");
            next = Some(idx);
            current = node.prev;
            backward += 1;
        }
        assert_eq!(next, self.head, "backward walk must end at head");
        assert_eq!(backward, self.len, "backward walk length must equal len");

        assert_eq!(
            self.arena.len(),
            self.len,
            "arena holds nodes not linked into the list"
        );
    }
}

impl<V: Numeric, Idx: Index> Default for DoublyLinkedList<V, Idx> {
    /// An empty list with capacity 0; every insert fails.
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<'a, V: Numeric, Idx: Index> IntoIterator for &'a DoublyLinkedList<V, Idx> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V, Idx>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over list values. See [`DoublyLinkedList::iter`].
pub struct Iter<'a, V, Idx: Index> {
    arena: &'a ListArena<V, Idx>,
    front: Option<Idx>,
    back: Option<Idx>,
    remaining: usize,
}

impl<'a, V, Idx: Index> Iterator for Iter<'a, V, Idx> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.front?;
        let arena = self.arena;
        let node = &arena[idx];
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, V, Idx: Index> DoubleEndedIterator for Iter<'a, V, Idx> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a V> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.back?;
        let arena = self.arena;
        let node = &arena[idx];
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<V, Idx: Index> ExactSizeIterator for Iter<'_, V, Idx> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_list_is_empty() {
        let list: DoublyLinkedList = DoublyLinkedList::with_capacity(16);
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.front_index().is_none());
        assert!(list.back_index().is_none());
        assert_eq!(list.front(), None);
        list.assert_invariants();
    }

    #[test]
    fn append_single() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(16);

        let a = list.append(1.0).unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list.front_index(), Some(a));
        assert_eq!(list.back_index(), Some(a));
        assert_eq!(list.get(a), Some(1.0));
        list.assert_invariants();
    }

    #[test]
    fn append_multiple() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(16);

        let a = list.append(1.0).unwrap();
        let b = list.append(2.0).unwrap();
        let c = list.append(3.0).unwrap();

        assert_eq!(list.front_index(), Some(a));
        assert_eq!(list.back_index(), Some(c));
        assert_eq!(list.next_index(a), Some(b));
        assert_eq!(list.prev_index(c), Some(b));
        assert_eq!(list.traverse(), [1.0, 2.0, 3.0]);
        list.assert_invariants();
    }

    #[test]
    fn prepend_multiple() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(16);

        let a = list.prepend(1.0).unwrap();
        list.prepend(2.0).unwrap();
        let c = list.prepend(3.0).unwrap();

        assert_eq!(list.front_index(), Some(c));
        assert_eq!(list.back_index(), Some(a));
        assert_eq!(list.traverse(), [3.0, 2.0, 1.0]);
        list.assert_invariants();
    }

    #[test]
    fn insert_after_middle() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(16);
        let a = list.append(1.0).unwrap();
        let c = list.append(3.0).unwrap();

        let b = list.insert_after(a, 2.0).unwrap();

        assert_eq!(list.next_index(a), Some(b));
        assert_eq!(list.prev_index(c), Some(b));
        assert_eq!(list.back_index(), Some(c));
        assert_eq!(list.traverse(), [1.0, 2.0, 3.0]);
        list.assert_invariants();
    }

    #[test]
    fn insert_after_tail_moves_tail() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(16);
        let a = list.append(1.0).unwrap();

        let b = list.insert_after(a, 2.0).unwrap();

        assert_eq!(list.back_index(), Some(b));
        assert_eq!(list.back(), Some(2.0));
        list.assert_invariants();
    }

    #[test]
    fn insert_after_invalid_anchor() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(4);
        let a = list.append(1.0).unwrap();

        // Unallocated slot
        assert_eq!(
            list.insert_after(2, 5.0),
            Err(Error::Arena(ArenaError::InvalidIndex {
                index: 2,
                capacity: 4
            }))
        );
        // Out of range
        assert_eq!(
            list.insert_after(9, 5.0),
            Err(Error::Arena(ArenaError::InvalidIndex {
                index: 9,
                capacity: 4
            }))
        );

        // Freed anchor
        list.delete(1.0).unwrap();
        assert!(list.insert_after(a, 5.0).is_err());

        assert!(list.is_empty());
        list.assert_invariants();
    }

    #[test]
    fn insert_after_full_arena() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(1);
        let a = list.append(1.0).unwrap();

        assert_eq!(
            list.insert_after(a, 2.0),
            Err(Error::Arena(ArenaError::PoolExhausted { capacity: 1 }))
        );
        assert_eq!(list.traverse(), [1.0]);
        list.assert_invariants();
    }

    #[test]
    fn search_returns_first_match() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(8);
        list.append(1.0).unwrap();
        let first = list.append(2.0).unwrap();
        list.append(2.0).unwrap();

        assert_eq!(list.search(2.0), Some(first));
        assert_eq!(list.search(4.0), None);
        assert!(list.contains(1.0));
    }

    #[test]
    fn delete_head_middle_tail() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(8);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            list.append(v).unwrap();
        }

        list.delete(1.0).unwrap();
        assert_eq!(list.front(), Some(2.0));
        list.assert_invariants();

        list.delete(3.0).unwrap();
        assert_eq!(list.traverse(), [2.0, 4.0, 5.0]);
        list.assert_invariants();

        list.delete(5.0).unwrap();
        assert_eq!(list.back(), Some(4.0));
        assert_eq!(list.traverse(), [2.0, 4.0]);
        list.assert_invariants();
    }

    #[test]
    fn delete_only_node_empties_list() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(2);
        list.append(7.0).unwrap();
        list.delete(7.0).unwrap();

        assert!(list.is_empty());
        assert_eq!(list.front_index(), None);
        assert_eq!(list.back_index(), None);
        list.assert_invariants();
    }

    #[test]
    fn delete_first_duplicate_only() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(8);
        list.append(2.0).unwrap();
        list.append(1.0).unwrap();
        let second = list.append(2.0).unwrap();

        list.delete(2.0).unwrap();

        assert_eq!(list.traverse(), [1.0, 2.0]);
        assert_eq!(list.search(2.0), Some(second));
    }

    #[test]
    fn delete_missing_value() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(4);
        list.append(1.0).unwrap();

        assert_eq!(list.delete(9.0), Err(Error::NotFound));
        assert_eq!(list.traverse(), [1.0]);
        list.assert_invariants();
    }

    #[test]
    fn pop_front_and_back() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(8);
        list.append(1.0).unwrap();
        list.append(2.0).unwrap();
        list.append(3.0).unwrap();

        assert_eq!(list.pop_front(), Some(1.0));
        assert_eq!(list.pop_back(), Some(3.0));
        assert_eq!(list.pop_back(), Some(2.0));
        assert_eq!(list.pop_front(), None);
        assert_eq!(list.pop_back(), None);
        list.assert_invariants();
    }

    #[test]
    fn storage_reuse_after_delete() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(2);
        list.append(1.0).unwrap();
        let b = list.append(2.0).unwrap();

        assert!(list.append(3.0).is_err());

        list.delete(2.0).unwrap();
        assert_eq!(list.append(3.0).unwrap(), b);
        assert_eq!(list.traverse(), [1.0, 3.0]);
        list.assert_invariants();
    }

    #[test]
    fn reverse_swaps_order_and_keeps_indices() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(8);
        let a = list.append(1.0).unwrap();
        list.append(2.0).unwrap();
        let c = list.append(3.0).unwrap();

        list.reverse();

        assert_eq!(list.traverse(), [3.0, 2.0, 1.0]);
        assert_eq!(list.front_index(), Some(c));
        assert_eq!(list.back_index(), Some(a));
        assert_eq!(list.get(a), Some(1.0));
        list.assert_invariants();
    }

    #[test]
    fn reverse_empty_and_single() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(2);
        list.reverse();
        list.assert_invariants();

        list.append(1.0).unwrap();
        list.reverse();
        assert_eq!(list.traverse(), [1.0]);
        list.assert_invariants();
    }

    #[test]
    fn iter_rev() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(8);
        for v in [1.0, 2.0, 3.0] {
            list.append(v).unwrap();
        }

        let values: Vec<f64> = list.iter().rev().copied().collect();
        assert_eq!(values, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn iter_double_ended() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(8);
        for v in [1.0, 2.0, 3.0, 4.0] {
            list.append(v).unwrap();
        }

        let mut iter = list.iter();
        assert_eq!(iter.next(), Some(&1.0));
        assert_eq!(iter.next_back(), Some(&4.0));
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.next(), Some(&2.0));
        assert_eq!(iter.next_back(), Some(&3.0));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn clear_frees_every_node() {
        let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(4);
        list.append(1.0).unwrap();
        list.append(2.0).unwrap();

        list.clear();

        assert!(list.is_empty());
        assert_eq!(list.append(3.0).unwrap(), 0);
        list.assert_invariants();
    }

    #[test]
    fn integer_values() {
        let mut list: DoublyLinkedList<i32, u8> = DoublyLinkedList::with_capacity(256);
        for v in 0..256 {
            list.append(v).unwrap();
        }
        assert!(list.append(256).is_err());
        list.delete(128).unwrap();
        assert_eq!(list.len(), 255);
        list.assert_invariants();
    }
}
