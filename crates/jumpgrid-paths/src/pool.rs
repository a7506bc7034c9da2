//! Block-allocated storage for search nodes.
//!
//! Nodes live in blocks of [`NODE_BLOCK_SIZE`] consecutive ids. A block is
//! attached the first time any of its ids is generated and detached by
//! [`NodePool::clear`], which keeps the block memory for reuse.

use std::ops::{Index, IndexMut};

use jumpgrid_core::PaddedId;

use crate::node::{NodeRef, SearchNode};

const LOG2_BLOCK_SIZE: u32 = 6;
/// Number of nodes per block.
pub const NODE_BLOCK_SIZE: usize = 1 << LOG2_BLOCK_SIZE;
const BLOCK_MASK: u32 = NODE_BLOCK_SIZE as u32 - 1;
const NO_SLAB: u32 = u32::MAX;

/// Arena of [`SearchNode`]s keyed by grid id.
#[derive(Debug, Default)]
pub struct NodePool {
    /// Block number → slab index, or `NO_SLAB`.
    blocks: Vec<u32>,
    slabs: Vec<Box<[SearchNode]>>,
    slabs_in_use: usize,
}

impl NodePool {
    /// A pool for ids below `id_space`. Larger ids are accepted and grow the
    /// block table.
    pub fn new(id_space: u32) -> Self {
        let nblocks = (id_space as usize).div_ceil(NODE_BLOCK_SIZE);
        Self {
            blocks: vec![NO_SLAB; nblocks],
            slabs: Vec::new(),
            slabs_in_use: 0,
        }
    }

    /// The node for `id`, allocating its block on first use.
    pub fn generate(&mut self, id: PaddedId) -> NodeRef {
        let block = (id >> LOG2_BLOCK_SIZE) as usize;
        if block >= self.blocks.len() {
            self.blocks.resize(block + 1, NO_SLAB);
        }
        let mut slab = self.blocks[block];
        if slab == NO_SLAB {
            slab = self.attach(block);
        }
        NodeRef(slab << LOG2_BLOCK_SIZE | (id & BLOCK_MASK))
    }

    /// The node for `id` if its block is attached.
    pub fn get(&self, id: PaddedId) -> Option<NodeRef> {
        let slab = *self.blocks.get((id >> LOG2_BLOCK_SIZE) as usize)?;
        (slab != NO_SLAB).then(|| NodeRef(slab << LOG2_BLOCK_SIZE | (id & BLOCK_MASK)))
    }

    fn attach(&mut self, block: usize) -> u32 {
        let first = (block as u32) << LOG2_BLOCK_SIZE;
        let slab = self.slabs_in_use;
        if slab == self.slabs.len() {
            self.slabs
                .push((0..NODE_BLOCK_SIZE as u32).map(|i| SearchNode::new(first + i)).collect());
        } else {
            for (i, n) in self.slabs[slab].iter_mut().enumerate() {
                *n = SearchNode::new(first + i as u32);
            }
        }
        self.slabs_in_use += 1;
        self.blocks[block] = slab as u32;
        slab as u32
    }

    /// Detach every block. Outstanding [`NodeRef`]s become invalid.
    pub fn clear(&mut self) {
        self.blocks.fill(NO_SLAB);
        self.slabs_in_use = 0;
    }

    /// Number of attached blocks.
    pub fn blocks_in_use(&self) -> usize {
        self.slabs_in_use
    }

    /// Approximate heap footprint in bytes.
    pub fn mem(&self) -> usize {
        self.blocks.capacity() * size_of::<u32>()
            + self.slabs.len() * NODE_BLOCK_SIZE * size_of::<SearchNode>()
    }
}

impl Index<NodeRef> for NodePool {
    type Output = SearchNode;

    #[inline]
    fn index(&self, r: NodeRef) -> &SearchNode {
        &self.slabs[(r.0 >> LOG2_BLOCK_SIZE) as usize][(r.0 & BLOCK_MASK) as usize]
    }
}

impl IndexMut<NodeRef> for NodePool {
    #[inline]
    fn index_mut(&mut self, r: NodeRef) -> &mut SearchNode {
        &mut self.slabs[(r.0 >> LOG2_BLOCK_SIZE) as usize][(r.0 & BLOCK_MASK) as usize]
    }
}
