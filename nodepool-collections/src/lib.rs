//! Binary search tree and doubly linked list over a fixed-capacity arena.
//!
//! Both collections own a private [`nodepool::NodeArena`] sized at
//! construction. Nodes link to each other by slot index, so no operation
//! allocates after construction and every index handed out stays valid
//! until its node is removed.
//!
//! - [`BinarySearchTree`]: unbalanced BST. Duplicates route right.
//! - [`DoublyLinkedList`]: head/tail list with O(1) insert-after-index.
//!
//! # Example
//!
//! ```
//! use nodepool_collections::{BinarySearchTree, DoublyLinkedList, Error};
//!
//! let mut tree: BinarySearchTree = BinarySearchTree::with_capacity(4);
//! tree.insert(2.0).unwrap();
//! tree.insert(1.0).unwrap();
//! assert_eq!(tree.delete(9.0), Err(Error::KeyNotFound));
//!
//! let mut list: DoublyLinkedList = DoublyLinkedList::with_capacity(4);
//! list.append(1.0).unwrap();
//! list.prepend(0.5).unwrap();
//! assert_eq!(list.traverse(), [0.5, 1.0]);
//! ```
//!
//! Errors are values, never panics. A failed operation leaves the
//! collection unchanged and emits a `debug` event through [`tracing`].

#![warn(missing_docs)]

mod error;
mod numeric;

pub mod list;
pub mod tree;

pub use error::Error;
pub use list::{DoublyLinkedList, ListArena, ListNode};
pub use numeric::Numeric;
pub use tree::{BinarySearchTree, TreeArena, TreeNode};

pub use nodepool::{ArenaError, Index};
