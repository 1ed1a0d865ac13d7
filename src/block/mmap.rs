//! # Memory-Mapped Block Device
//!
//! `MmapDevice` maps a device file directly into the process address space
//! and serves block reads and writes as bounds-checked slice copies. The OS
//! page cache does the buffering; `sync` flushes dirty pages when the
//! caller wants durability.
//!
//! ## File Format
//!
//! The file is simply concatenated blocks:
//!
//! ```text
//! Offset 0:              Block 0
//! Offset block_size:     Block 1
//! Offset 2*block_size:   Block 2
//! ...
//! ```
//!
//! The format carries no magic number or version tag, so the block size
//! cannot be discovered from the file. `open` takes it from the caller and
//! only checks that the file length is a whole number of blocks.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use log::debug;
use memmap2::MmapMut;

use crate::block::{bad_buffer_len, block_out_of_bounds, BlockDevice};
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct MmapDevice {
    mmap: MmapMut,
    block_size: usize,
    num_blocks: u32,
}

impl MmapDevice {
    /// Creates (or truncates) a device file of `num_blocks` zeroed blocks.
    pub fn create<P: AsRef<Path>>(path: P, block_size: usize, num_blocks: u32) -> Result<Self> {
        let path = path.as_ref();

        if block_size == 0 || num_blocks == 0 {
            return Err(Error::BadConfig(format!(
                "device geometry must be nonzero: block_size={}, num_blocks={}",
                block_size, num_blocks
            )));
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        let file_size = num_blocks as u64 * block_size as u64;
        file.set_len(file_size)?;

        // SAFETY: MmapMut::map_mut is unsafe because memory-mapped files can
        // be modified externally, leading to undefined behavior. This is
        // safe because:
        // 1. We just created this file with exclusive access (truncate=true)
        // 2. The file size is set to a valid multiple of block_size
        // 3. The mmap lifetime is tied to MmapDevice, preventing
        //    use-after-unmap
        // 4. All access goes through read()/write() which bounds-check the
        //    block index
        let mmap = unsafe { MmapMut::map_mut(&file)? };

        debug!(
            "created device file '{}': {} blocks of {} bytes",
            path.display(),
            num_blocks,
            block_size
        );

        Ok(Self {
            mmap,
            block_size,
            num_blocks,
        })
    }

    /// Opens an existing device file. The format is not self-identifying,
    /// so the caller supplies the block size; the block count is derived
    /// from the file length.
    pub fn open<P: AsRef<Path>>(path: P, block_size: usize) -> Result<Self> {
        let path = path.as_ref();

        if block_size == 0 {
            return Err(Error::BadConfig("block size must be nonzero".to_string()));
        }

        let file = OpenOptions::new().read(true).write(true).open(path)?;

        let file_size = file.metadata()?.len();
        if file_size == 0 || file_size % block_size as u64 != 0 {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "device file '{}' size {} is not a positive multiple of block size {}",
                    path.display(),
                    file_size,
                    block_size
                ),
            )));
        }

        let num_blocks = (file_size / block_size as u64) as u32;

        // SAFETY: MmapMut::map_mut is unsafe because memory-mapped files can
        // be modified externally. This is safe because:
        // 1. The file is opened with read+write access and device files are
        //    not meant to be shared with external writers
        // 2. The file length was validated as a whole number of blocks
        // 3. The mmap lifetime is tied to MmapDevice, preventing
        //    use-after-unmap
        // 4. All access goes through read()/write() which bounds-check the
        //    block index
        let mmap = unsafe { MmapMut::map_mut(&file)? };

        Ok(Self {
            mmap,
            block_size,
            num_blocks,
        })
    }

    /// Flushes dirty pages to the backing file.
    pub fn sync(&self) -> Result<()> {
        self.mmap.flush()?;
        Ok(())
    }

    fn block_range(&self, block: u32) -> std::ops::Range<usize> {
        let start = block as usize * self.block_size;
        start..start + self.block_size
    }
}

impl BlockDevice for MmapDevice {
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
        buf.copy_from_slice(&self.mmap[self.block_range(block)]);
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
        self.mmap[range].copy_from_slice(buf);
        Ok(())
    }
}
