//! Heap-backed block device.
//!
//! `MemDevice` keeps the whole device in one contiguous allocation, block
//! `i` at byte offset `i * block_size`. It exists for unit tests and
//! benchmarks where durability is irrelevant but block semantics must match
//! the file-backed device exactly.

use crate::block::{bad_buffer_len, block_out_of_bounds, BlockDevice};
use crate::error::Result;

#[derive(Debug)]
pub struct MemDevice {
    block_size: usize,
    num_blocks: u32,
    data: Vec<u8>,
}

impl MemDevice {
    pub fn new(block_size: usize, num_blocks: u32) -> Self {
        Self {
            block_size,
            num_blocks,
            data: vec![0u8; block_size * num_blocks as usize],
        }
    }

    fn block_range(&self, block: u32) -> std::ops::Range<usize> {
        let start = block as usize * self.block_size;
        start..start + self.block_size
    }
}

impl BlockDevice for MemDevice {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn num_blocks(&self) -> u32 {
        self.num_blocks
    }

    fn read(&self, block: u32, buf: &mut [u8]) -> Result<()> {
        if block >= self.num_blocks {
            return Err(block_out_of_bounds(block, self.num_blocks));
        }
        if buf.len() != self.block_size {
            return Err(bad_buffer_len(buf.len(), self.block_size));
        }
        buf.copy_from_slice(&self.data[self.block_range(block)]);
        Ok(())
    }

    fn write(&mut self, block: u32, buf: &[u8]) -> Result<()> {
        if block >= self.num_blocks {
            return Err(block_out_of_bounds(block, self.num_blocks));
        }
        if buf.len() != self.block_size {
            return Err(bad_buffer_len(buf.len(), self.block_size));
        }
        let range = self.block_range(block);
        self.data[range].copy_from_slice(buf);
        Ok(())
    }
}
