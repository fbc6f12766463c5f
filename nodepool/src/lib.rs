//! Fixed-capacity node arena addressed by integer index.
//!
//! Linked structures built on this crate never allocate per node. All node
//! storage is one preallocated slot array; nodes refer to each other by slot
//! index, and free slots are threaded into an intrusive free list.
//!
//! ```text
//! NodeArena     - owns every node, hands out stable indices
//! Tree / List   - hold root/head/tail indices, link nodes by index
//! ```
//!
//! # Quick Start
//!
//! ```
//! use nodepool::{ArenaError, NodeArena};
//!
//! let mut arena: NodeArena<f64> = NodeArena::with_capacity(2);
//!
//! let a = arena.allocate(1.5).unwrap();
//! let _b = arena.allocate(2.5).unwrap();
//!
//! // Fixed capacity: the third allocation fails
//! assert_eq!(arena.allocate(3.5), Err(ArenaError::PoolExhausted { capacity: 2 }));
//!
//! // Freed slots are reused LIFO
//! arena.deallocate(a).unwrap();
//! assert_eq!(arena.allocate(4.5).unwrap(), a);
//! ```
//!
//! # Invariants
//!
//! - The unallocated slots are exactly the slots reachable from the free-list
//!   head, and the free list is acyclic.
//! - `len() + free_len() == capacity()` at all times.
//! - A failed operation leaves the arena unchanged.
//!
//! [`NodeArena::assert_invariants`] checks all of the above.
//!
//! # Logging
//!
//! Failed operations emit `debug` events through [`tracing`]. No subscriber
//! is installed by this crate.

#![warn(missing_docs)]

mod arena;
mod builder;
mod error;
mod index;
mod node;

pub use arena::{FreeIndices, Iter, NodeArena};
pub use builder::ArenaBuilder;
pub use error::{ArenaError, BuildError};
pub use index::Index;
pub use node::PoolNode;
