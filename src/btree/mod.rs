//! # B+Tree Index Implementation
//!
//! This module implements a disk-backed B+tree over fixed-size blocks.
//! Every node occupies one block; all persistence goes through the
//! [`BlockDevice`](crate::block::BlockDevice) trait, addressed by block
//! index.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │           BTreeIndex (tree.rs)             │
//! │  attach / detach / lookup / insert /       │
//! │  update / display / sanity_check           │
//! ├─────────────────────┬──────────────────────┤
//! │  Node codec         │  Superblock manager  │
//! │  (node.rs)          │  + free-list         │
//! │  header + packed    │  allocator           │
//! │  slot layout        │  (superblock.rs)     │
//! ├─────────────────────┴──────────────────────┤
//! │         BlockDevice (block module)         │
//! └────────────────────────────────────────────┘
//! ```
//!
//! ## Device Layout
//!
//! `attach(initblock, create=true)` formats the device:
//!
//! ```text
//! Block initblock      Superblock (key/value widths, root, free list)
//! Block initblock + 1  Root node, initially empty
//! Blocks +2 .. N-1     Free-list chain threaded through the blocks
//! ```
//!
//! Keys and values are fixed-width byte strings, ordered lexicographically.
//! Interior nodes interleave child pointers with separator keys; leaves
//! hold packed key/value pairs behind a leading next-leaf link. Deletion
//! is not implemented.

mod node;
mod superblock;
mod tree;

pub use node::{Node, NodeHeader, NodeType, NODE_HEADER_SIZE, PTR_SIZE};
pub use superblock::Superblock;
pub use tree::{BTreeIndex, DisplayMode};
