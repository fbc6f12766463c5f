//! Unbalanced binary search tree over a node arena.
//!
//! Each node is a `(key, left, right)` triple in the tree's private
//! [`NodeArena`]. Keys in a node's left subtree are strictly less than its
//! key; keys in its right subtree are greater than or equal to it, so
//! duplicates always land to the right of the first equal key.
//!
//! # Example
//!
//! ```
//! use nodepool_collections::BinarySearchTree;
//!
//! let mut tree: BinarySearchTree = BinarySearchTree::with_capacity(20);
//! for key in [50.0, 30.0, 70.0, 20.0, 40.0, 60.0, 80.0] {
//!     tree.insert(key).unwrap();
//! }
//! assert_eq!(tree.traverse(), [20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0]);
//!
//! tree.delete(30.0).unwrap();
//! assert_eq!(tree.traverse(), [20.0, 40.0, 50.0, 60.0, 70.0, 80.0]);
//! ```
//!
//! # Node Identity
//!
//! Deleting a node with two children copies the in-order successor's key
//! into that node and frees the successor's slot instead. The index that
//! held the deleted key stays allocated and now holds the successor's key:
//!
//! ```
//! use nodepool_collections::BinarySearchTree;
//!
//! let mut tree: BinarySearchTree = BinarySearchTree::with_capacity(8);
//! let root = tree.insert(50.0).unwrap();
//! tree.insert(30.0).unwrap();
//! let successor = tree.insert(70.0).unwrap();
//!
//! tree.delete(50.0).unwrap();
//! assert_eq!(tree.get(root), Some(70.0));
//! assert_eq!(tree.get(successor), None);
//! ```

use nodepool::{Index, NodeArena, PoolNode};
use tracing::debug;

use crate::{Error, Numeric};

/// Arena type backing a [`BinarySearchTree`].
pub type TreeArena<K, Idx = u32> = NodeArena<TreeNode<K, Idx>, Idx>;

/// A node in the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeNode<K, Idx: Index = u32> {
    key: K,
    left: Option<Idx>,
    right: Option<Idx>,
}

impl<K, Idx: Index> TreeNode<K, Idx> {
    /// Creates an unlinked node.
    #[inline]
    pub fn new(key: K) -> Self {
        Self {
            key,
            left: None,
            right: None,
        }
    }

    /// Returns the node's key.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the left child's index.
    #[inline]
    pub fn left(&self) -> Option<Idx> {
        self.left
    }

    /// Returns the right child's index.
    #[inline]
    pub fn right(&self) -> Option<Idx> {
        self.right
    }
}

impl<K: Default, Idx: Index> Default for TreeNode<K, Idx> {
    fn default() -> Self {
        Self::new(K::default())
    }
}

impl<K: Default, Idx: Index> PoolNode for TreeNode<K, Idx> {
    #[inline]
    fn clear_links(&mut self) {
        self.left = None;
        self.right = None;
    }
}

/// Which child slot of a parent holds a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// A binary search tree whose nodes live in a fixed-capacity arena.
///
/// Not self-balancing: operations are O(height), and sorted input degrades
/// the tree to a list.
///
/// # Type Parameters
///
/// - `K`: Key type (default `f64`)
/// - `Idx`: Index type (default `u32`)
#[derive(Debug, Clone)]
pub struct BinarySearchTree<K = f64, Idx: Index = u32> {
    arena: TreeArena<K, Idx>,
    root: Option<Idx>,
    len: usize,
}

impl<K: Numeric, Idx: Index> BinarySearchTree<K, Idx> {
    /// Creates an empty tree with room for `capacity` nodes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds `Idx::MAX_CAPACITY`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_arena(NodeArena::with_capacity(capacity))
    }

    /// Creates an empty tree over `arena`.
    ///
    /// Any nodes already allocated in `arena` are discarded.
    pub fn from_arena(mut arena: TreeArena<K, Idx>) -> Self {
        arena.clear();
        Self {
            arena,
            root: None,
            len: 0,
        }
    }

    /// Returns the number of keys in the tree.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no keys.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the node capacity of the backing arena.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Returns the root node's index, or `None` if empty.
    #[inline]
    pub fn root(&self) -> Option<Idx> {
        self.root
    }

    /// Returns the node at `index`, if allocated.
    #[inline]
    pub fn node(&self, index: Idx) -> Option<&TreeNode<K, Idx>> {
        self.arena.get(index)
    }

    /// Returns the key at `index`, if allocated.
    #[inline]
    pub fn get(&self, index: Idx) -> Option<K> {
        self.arena.get(index).map(|node| node.key)
    }

    /// Inserts `key` and returns the index of its new node.
    ///
    /// A key equal to an existing one is placed in that node's right
    /// subtree; nothing is ever replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Arena`] with `PoolExhausted` if the arena is full.
    pub fn insert(&mut self, key: K) -> Result<Idx, Error> {
        let new = self.arena.allocate(TreeNode::new(key))?;

        let Some(mut current) = self.root else {
            self.root = Some(new);
            self.len += 1;
            return Ok(new);
        };

        loop {
            let node = &mut self.arena[current];
            let child = if key < node.key {
                &mut node.left
            } else {
                &mut node.right
            };
            match *child {
                Some(next) => current = next,
                None => {
                    *child = Some(new);
                    break;
                }
            }
        }

        self.len += 1;
        Ok(new)
    }

    /// Returns the index of the first node on the search path whose key
    /// equals `key`.
    pub fn search(&self, key: K) -> Option<Idx> {
        let mut current = self.root;
        while let Some(idx) = current {
            let node = &self.arena[idx];
            if node.key == key {
                return Some(idx);
            }
            current = if key < node.key { node.left } else { node.right };
        }
        None
    }

    /// Returns `true` if the tree holds `key`.
    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.search(key).is_some()
    }

    /// Removes one occurrence of `key`, the one [`search`](Self::search)
    /// would return.
    ///
    /// A node with two children keeps its index and takes its in-order
    /// successor's key; the successor's slot is the one freed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if `key` is absent. The tree is left
    /// unchanged.
    pub fn delete(&mut self, key: K) -> Result<(), Error> {
        let Some((target, parent)) = self.find_with_parent(key) else {
            debug!(?key, "key not found");
            return Err(Error::KeyNotFound);
        };

        let TreeNode { left, right, .. } = self.arena[target];
        let removed = match (left, right) {
            (Some(_), Some(right)) => {
                let mut successor_parent = (target, Side::Right);
                let mut successor = right;
                while let Some(next) = self.arena[successor].left {
                    successor_parent = (successor, Side::Left);
                    successor = next;
                }

                let TreeNode {
                    key: successor_key,
                    right: successor_right,
                    ..
                } = self.arena[successor];
                self.arena[target].key = successor_key;

                // Successor has no left child: leaf or single right child.
                self.set_child(Some(successor_parent), successor_right);
                successor
            }
            (left, right) => {
                self.set_child(parent, left.or(right));
                target
            }
        };

        self.arena.deallocate(removed)?;
        self.len -= 1;
        Ok(())
    }

    /// Returns the smallest key.
    pub fn min(&self) -> Option<K> {
        let mut idx = self.root?;
        while let Some(left) = self.arena[idx].left {
            idx = left;
        }
        Some(self.arena[idx].key)
    }

    /// Returns the largest key.
    pub fn max(&self) -> Option<K> {
        let mut idx = self.root?;
        while let Some(right) = self.arena[idx].right {
            idx = right;
        }
        Some(self.arena[idx].key)
    }

    /// Returns all keys in non-decreasing order.
    ///
    /// Recursive in-order walk (left, self, right). Recursion depth equals
    /// the tree height; prefer [`iter`](Self::iter) for degenerate trees.
    pub fn traverse(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len);
        self.in_order(self.root, &mut keys);
        keys
    }

    fn in_order(&self, node: Option<Idx>, out: &mut Vec<K>) {
        if let Some(idx) = node {
            let node = &self.arena[idx];
            self.in_order(node.left, out);
            out.push(node.key);
            self.in_order(node.right, out);
        }
    }

    /// Returns an in-order iterator over the keys.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, Idx> {
        let mut iter = Iter {
            arena: &self.arena,
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.push_left_spine(self.root);
        iter
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }

    /// Checks the ordering, reachability, and arena invariants.
    ///
    /// O(n). Intended for tests.
    ///
    /// # Panics
    ///
    /// Panics with a description of the first violation found.
    pub fn assert_invariants(&self) {
        self.arena.assert_invariants();

        let mut visited = vec![false; self.arena.capacity()];
        let reachable = self.check_subtree(self.root, None, None, &mut visited);

        assert_eq!(reachable, self.len, "reachable node count must equal len");
        assert_eq!(
            self.arena.len(),
            self.len,
            "arena holds nodes not reachable from root"
        );
    }

    /// Returns the node count of the subtree, checking `lower <= key < upper`.
    fn check_subtree(
        &self,
        node: Option<Idx>,
        lower: Option<K>,
        upper: Option<K>,
        visited: &mut [bool],
    ) -> usize {
        let Some(idx) = node else {
            return 0;
        };
        let i = idx.as_usize();
        assert!(self.arena.is_allocated(idx), "tree links to free slot {i}");
        assert!(!visited[i], "node {i} is reachable twice");
        visited[i] = true;

        let TreeNode { key, left, right } = self.arena[idx];
        if let Some(lower) = lower {
            assert!(key >= lower, "key {key:?} at {i} is below bound {lower:?}");
        }
        if let Some(upper) = upper {
            assert!(key < upper, "key {key:?} at {i} is not below bound {upper:?}");
        }

        1 + self.check_subtree(left, lower, Some(key), visited)
            + self.check_subtree(right, Some(key), upper, visited)
    }

    /// Walks from the root to the first node holding `key`, returning it
    /// and the parent slot that links to it.
    fn find_with_parent(&self, key: K) -> Option<(Idx, Option<(Idx, Side)>)> {
        let mut parent = None;
        let mut current = self.root;
        while let Some(idx) = current {
            let node = &self.arena[idx];
            if node.key == key {
                return Some((idx, parent));
            }
            if key < node.key {
                parent = Some((idx, Side::Left));
                current = node.left;
            } else {
                parent = Some((idx, Side::Right));
                current = node.right;
            }
        }
        None
    }

    /// Points the parent slot (or the root, when `parent` is `None`) at `child`.
    fn set_child(&mut self, parent: Option<(Idx, Side)>, child: Option<Idx>) {
        match parent {
            None => self.root = child,
            Some((idx, Side::Left)) => self.arena[idx].left = child,
            Some((idx, Side::Right)) => self.arena[idx].right = child,
        }
    }
}

impl<K: Numeric, Idx: Index> Default for BinarySearchTree<K, Idx> {
    /// An empty tree with capacity 0; every insert fails.
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<'a, K: Numeric, Idx: Index> IntoIterator for &'a BinarySearchTree<K, Idx> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, Idx>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over tree keys.
///
/// Holds an explicit stack of pending ancestors instead of recursing.
pub struct Iter<'a, K, Idx: Index> {
    arena: &'a TreeArena<K, Idx>,
    stack: Vec<Idx>,
    remaining: usize,
}

impl<K, Idx: Index> Iter<'_, K, Idx> {
    fn push_left_spine(&mut self, mut current: Option<Idx>) {
        let arena = self.arena;
        while let Some(idx) = current {
            self.stack.push(idx);
            current = arena[idx].left;
        }
    }
}

impl<'a, K, Idx: Index> Iterator for Iter<'a, K, Idx> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let idx = self.stack.pop()?;
        let arena = self.arena;
        let node = &arena[idx];
        self.push_left_spine(node.right);
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, Idx: Index> ExactSizeIterator for Iter<'_, K, Idx> {}
