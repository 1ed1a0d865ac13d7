//! # Superblock and Free-List Management
//!
//! The superblock is one reserved block (conventionally block 0) holding
//! the tree's metadata in an ordinary [`NodeHeader`] typed `Superblock`:
//! key and value widths, the current root block, the head of the free
//! list, and the live key count. The rest of the block is unused.
//!
//! ## Free List
//!
//! Unallocated blocks form a singly linked list threaded through the
//! `free_list` field of the blocks themselves:
//!
//! ```text
//! superblock.free_list ──> [block 5] ──> [block 9] ──> [block 3] ──> 0
//! ```
//!
//! Allocation pops the head; deallocation rewrites the block as
//! `Unallocated` and pushes it. Every mutation persists the superblock
//! before notifying the device, so the on-disk head never references an
//! allocated block. A head of 0 means the device is out of blocks: block 0
//! is always the superblock, so 0 doubles as the list terminator.
//!
//! ## Formatting
//!
//! `Superblock::format` lays out a fresh device: the superblock at
//! `initblock`, an empty root at `initblock + 1`, and every remaining
//! block chained onto the free list in ascending order.
//!
//! The superblock is cached in memory for the lifetime of an attached
//! tree and persisted on every allocator mutation and on detach.

use log::{debug, trace};

use crate::block::BlockDevice;
use crate::btree::node::{Node, NodeType, NODE_HEADER_SIZE, PTR_SIZE};
use crate::error::{Error, Result};

/// Nodes smaller than this cannot split without producing an empty
/// sibling: a leaf split keeps ⌈(n+1)/2⌉ keys and an interior split
/// consumes the middle key, so both need at least three slots.
const MIN_SLOTS: usize = 3;

#[derive(Debug)]
pub struct Superblock {
    block: u32,
    node: Node,
}

impl Superblock {
    /// Formats `device` for a fresh tree and returns the cached
    /// superblock.
    pub fn format<D: BlockDevice>(
        device: &mut D,
        initblock: u32,
        key_size: u32,
        value_size: u32,
    ) -> Result<Self> {
        let block_size = device.block_size();
        let num_blocks = device.num_blocks();

        if key_size == 0 || value_size == 0 {
            return Err(Error::BadConfig(format!(
                "key and value sizes must be nonzero: key_size={}, value_size={}",
                key_size, value_size
            )));
        }
        if num_blocks < initblock + 2 {
            return Err(Error::BadConfig(format!(
                "device too small: {} blocks, need at least {} for superblock and root",
                num_blocks,
                initblock + 2
            )));
        }
        if block_size < NODE_HEADER_SIZE + PTR_SIZE {
            return Err(Error::BadConfig(format!(
                "block size {} cannot hold a node header",
                block_size
            )));
        }

        let probe = Node::new(NodeType::Leaf, key_size, value_size, block_size);
        if probe.slots_as_leaf() < MIN_SLOTS || probe.slots_as_interior() < MIN_SLOTS {
            return Err(Error::BadConfig(format!(
                "geometry leaves too few slots per node: {} as leaf, {} as interior (minimum {})",
                probe.slots_as_leaf(),
                probe.slots_as_interior(),
                MIN_SLOTS
            )));
        }

        let root_block = initblock + 1;
        let free_head = if initblock + 2 < num_blocks {
            initblock + 2
        } else {
            0
        };

        let mut sb = Node::new(NodeType::Superblock, key_size, value_size, block_size);
        sb.set_root_block(root_block);
        sb.set_free_list(free_head);
        device.notify_allocate_block(initblock);
        sb.write_to(device, initblock)?;

        let mut root = Node::new(NodeType::Root, key_size, value_size, block_size);
        root.set_root_block(root_block);
        root.set_free_list(free_head);
        device.notify_allocate_block(root_block);
        root.write_to(device, root_block)?;

        for i in initblock + 2..num_blocks {
            let mut free = Node::new(NodeType::Unallocated, key_size, value_size, block_size);
            free.set_root_block(root_block);
            free.set_free_list(if i + 1 == num_blocks { 0 } else { i + 1 });
            free.write_to(device, i)?;
        }

        debug!(
            "formatted device: superblock at {}, root at {}, {} blocks free",
            initblock,
            root_block,
            num_blocks - initblock - 2
        );

        Ok(Self {
            block: initblock,
            node: sb,
        })
    }

    /// Mounts an already formatted device by reading the superblock. The
    /// on-disk geometry is authoritative.
    pub fn open<D: BlockDevice>(device: &D, initblock: u32) -> Result<Self> {
        let node = Node::read_from(device, initblock)?;
        if node.node_type() != NodeType::Superblock {
            return Err(Error::Insane(format!(
                "block {} is typed {:?}, not a superblock",
                initblock,
                node.node_type()
            )));
        }
        Ok(Self {
            block: initblock,
            node,
        })
    }

    pub fn persist<D: BlockDevice>(&self, device: &mut D) -> Result<()> {
        self.node.write_to(device, self.block)
    }

    pub fn key_size(&self) -> u32 {
        self.node.key_size() as u32
    }

    pub fn value_size(&self) -> u32 {
        self.node.value_size() as u32
    }

    pub fn root_block(&self) -> u32 {
        self.node.root_block()
    }

    pub fn set_root_block(&mut self, block: u32) {
        self.node.set_root_block(block);
    }

    pub fn free_list_head(&self) -> u32 {
        self.node.free_list()
    }

    /// Live keys in the tree. Maintained by the engine on successful
    /// inserts; hits disk whenever the superblock is persisted.
    pub fn num_keys(&self) -> u32 {
        self.node.num_keys()
    }

    pub fn set_num_keys(&mut self, count: u32) {
        self.node.set_num_keys(count);
    }

    /// Pops the free-list head. The popped block must still read as
    /// `Unallocated`; anything else means the list and the tree disagree
    /// about block ownership.
    pub fn allocate<D: BlockDevice>(&mut self, device: &mut D) -> Result<u32> {
        let head = self.node.free_list();
        if head == 0 {
            return Err(Error::NoSpace);
        }

        let free = Node::read_from(device, head)?;
        if free.node_type() != NodeType::Unallocated {
            return Err(Error::Insane(format!(
                "free-list head {} is typed {:?}, not unallocated",
                head,
                free.node_type()
            )));
        }

        self.node.set_free_list(free.free_list());
        self.persist(device)?;
        device.notify_allocate_block(head);
        trace!("allocated block {}", head);
        Ok(head)
    }

    /// Returns `block` to the free list, rewriting it as `Unallocated`.
    pub fn deallocate<D: BlockDevice>(&mut self, device: &mut D, block: u32) -> Result<()> {
        let mut node = Node::read_from(device, block)?;
        if node.node_type() == NodeType::Unallocated {
            return Err(Error::Insane(format!("double free of block {}", block)));
        }

        node.set_node_type(NodeType::Unallocated);
        node.set_free_list(self.node.free_list());
        node.write_to(device, block)?;

        self.node.set_free_list(block);
        self.persist(device)?;
        device.notify_deallocate_block(block);
        trace!("deallocated block {}", block);
        Ok(())
    }

    /// Walks the free list, verifying every chained block reads as
    /// `Unallocated` and that the chain terminates within `num_blocks`
    /// hops (a longer walk means a cycle).
    pub fn free_block_count<D: BlockDevice>(&self, device: &D) -> Result<u32> {
        let limit = device.num_blocks();
        let mut count = 0u32;
        let mut current = self.node.free_list();

        while current != 0 {
            if count >= limit {
                return Err(Error::Insane("free list contains a cycle".to_string()));
            }
            let node = Node::read_from(device, current)?;
            if node.node_type() != NodeType::Unallocated {
                return Err(Error::BadConfig(format!(
                    "free-list block {} is typed {:?}, not unallocated",
                    current,
                    node.node_type()
                )));
            }
            count += 1;
            current = node.free_list();
        }

        Ok(count)
    }
}
