//! # Block Device Layer
//!
//! The tree engine never addresses memory or files directly; all
//! persistence goes through the [`BlockDevice`] trait, which exposes a
//! fixed-size, block-addressable store. A device is nothing more than
//! `num_blocks` blocks of `block_size` bytes, read and written whole by
//! index.
//!
//! ## Contract
//!
//! - `write` followed by `read` of the same block observes the written
//!   bytes.
//! - Writes are issued in the order the engine mutates nodes (child before
//!   parent during splits); the device provides whatever ordering and
//!   durability it provides. The engine makes no crash-safety promise.
//! - `notify_allocate_block` / `notify_deallocate_block` are hints fired by
//!   the free-list allocator so a caching device can track block liveness.
//!   The default implementations do nothing.
//!
//! ## Implementations
//!
//! - [`MemDevice`]: a contiguous heap buffer, used by unit tests and
//!   benchmarks.
//! - [`MmapDevice`]: a memory-mapped file, the persistent backend.
//!
//! The trait is also forwarded through `parking_lot` write guards so a
//! device shared behind an `RwLock` can be handed to the engine without an
//! adapter.

mod mem;
mod mmap;

pub use mem::MemDevice;
pub use mmap::MmapDevice;

use std::io;

use crate::error::{Error, Result};

pub trait BlockDevice {
    fn block_size(&self) -> usize;

    fn num_blocks(&self) -> u32;

    /// Reads block `block` into `buf`. `buf` must be exactly `block_size`
    /// bytes.
    fn read(&self, block: u32, buf: &mut [u8]) -> Result<()>;

    /// Writes `buf` to block `block`. `buf` must be exactly `block_size`
    /// bytes.
    fn write(&mut self, block: u32, buf: &[u8]) -> Result<()>;

    fn notify_allocate_block(&mut self, _block: u32) {}

    fn notify_deallocate_block(&mut self, _block: u32) {}
}

impl<D: BlockDevice> BlockDevice for parking_lot::RwLockWriteGuard<'_, D> {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn num_blocks(&self) -> u32 {
        (**self).num_blocks()
    }

    fn read(&self, block: u32, buf: &mut [u8]) -> Result<()> {
        (**self).read(block, buf)
    }

    fn write(&mut self, block: u32, buf: &[u8]) -> Result<()> {
        (**self).write(block, buf)
    }

    fn notify_allocate_block(&mut self, block: u32) {
        (**self).notify_allocate_block(block)
    }

    fn notify_deallocate_block(&mut self, block: u32) {
        (**self).notify_deallocate_block(block)
    }
}

pub(crate) fn block_out_of_bounds(block: u32, num_blocks: u32) -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("block {} out of bounds (num_blocks={})", block, num_blocks),
    ))
}

pub(crate) fn bad_buffer_len(len: usize, block_size: usize) -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("buffer length {} != block size {}", len, block_size),
    ))
}
