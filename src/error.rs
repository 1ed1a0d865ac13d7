//! # Error Types
//!
//! A single error enumeration shared by every fallible operation in the
//! crate. The engine distinguishes expected outcomes (`NotFound`,
//! `Conflict`, `NoSpace`) from structural violations found by the sanity
//! checker (`BadConfig`) and from outright corruption (`BadLayout`,
//! `Insane`). Device I/O failures are propagated as-is.
//!
//! The only error ever recovered internally is `NotFound` returned by the
//! pre-insert existence check; everything else surfaces to the caller.

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Lookup or update of a key that is not in the tree, or a descent that
    /// reached a terminal empty subtree.
    #[error("key not found")]
    NotFound,

    /// Insert of a key that already exists.
    #[error("key already exists")]
    Conflict,

    /// The free list is empty; the device has no blocks left to allocate.
    #[error("no free blocks left on device")]
    NoSpace,

    /// In-node insertion into a node that is already at capacity. Callers
    /// split full nodes before inserting, so this is a defensive check.
    #[error("node is full: {num_keys} keys at capacity {capacity}")]
    NoRoom { num_keys: u32, capacity: u32 },

    /// Slot accessor called past the live slot range of a node.
    #[error("slot index {index} out of range (num_keys={num_keys})")]
    OutOfRange { index: usize, num_keys: u32 },

    /// Typed accessor used against the wrong node type, e.g. a value read
    /// on an interior node.
    #[error("operation not valid for node type {found:#04x}")]
    WrongNodeType { found: u8 },

    /// A deserialized block whose node type tag is not a known case.
    #[error("unknown node type tag {tag:#04x} in block {block}")]
    BadLayout { block: u32, tag: u8 },

    /// Reserved operations (Delete).
    #[error("operation not implemented")]
    Unimplemented,

    /// A structural invariant does not hold (sanity check failures,
    /// mis-sized keys or values, unusable device geometry).
    #[error("invariant violation: {0}")]
    BadConfig(String),

    /// States that cannot be reached through any legal mutation sequence,
    /// e.g. a traversal arriving at the superblock or an unallocated block.
    #[error("corrupt tree state: {0}")]
    Insane(String),

    /// Block read/write failure propagated from the block device.
    #[error("block device I/O error: {0}")]
    Io(#[from] std::io::Error),
}
