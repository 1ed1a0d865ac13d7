//! # oakdb - Disk-Backed B+Tree Key/Value Index
//!
//! oakdb is an ordered key/value index stored as a B+tree of fixed-size
//! blocks behind a block-addressable device interface. It offers point
//! lookup, insertion, in-place update, depth-first display, and a
//! structural sanity check over fixed-width keys and values.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             BTreeIndex (btree/)             │
//! │   lookup / insert / update / display /      │
//! │   sanity_check over node + superblock       │
//! ├─────────────────────────────────────────────┤
//! │          BlockDevice trait (block/)         │
//! │   read / write whole blocks by index,       │
//! │   allocation notifications                  │
//! ├──────────────────────┬──────────────────────┤
//! │  MmapDevice          │  MemDevice           │
//! │  (memory-mapped      │  (heap-backed, for   │
//! │   device file)       │   tests and benches) │
//! └──────────────────────┴──────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use oakdb::{BTreeIndex, MmapDevice};
//!
//! # fn main() -> oakdb::Result<()> {
//! let mut dev = MmapDevice::create("index.blk", 4096, 1024)?;
//! let mut tree = BTreeIndex::new(16, 64, &mut dev, true);
//! tree.attach(0, true)?;
//!
//! tree.insert(&[0u8; 16], &[0u8; 64])?;
//! let _value = tree.lookup(&[0u8; 16])?;
//! tree.detach()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Scope
//!
//! The engine is single-threaded and not crash-safe: writes reach the
//! device in mutation order and durability is whatever the device
//! provides. Deletion and range scans are not implemented; keys are unique
//! and fixed-width.
//!
//! ## Module Overview
//!
//! - [`block`]: the block device interface and its two implementations
//! - [`btree`]: node codec, superblock + free-list allocator, tree engine
//! - [`error`]: the crate-wide error enumeration

pub mod block;
pub mod btree;
pub mod error;

pub use block::{BlockDevice, MemDevice, MmapDevice};
pub use btree::{BTreeIndex, DisplayMode};
pub use error::{Error, Result};
