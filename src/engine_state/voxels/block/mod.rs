//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, and the block value
//! stored in chunk grids.

use block_side::BlockSide;
use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage and serialization of block data.
pub type BlockTypeSize = u8;

/// Maps each block type to its texture atlas tile for each face.
///
/// The outer array is indexed by `BlockType` as a `usize`.
/// The inner array contains 6 tile indices, one for each face in the order:
/// [Front, Back, Bottom, Top, Left, Right]
pub static BLOCK_TYPE_TO_TEXTURE_INDICES: [[u16; 6]; BlockType::COUNT] = [
    [0, 0, 0, 0, 0, 0], // AIR (never meshed)
    [1, 1, 2, 0, 1, 1], // GRASS (top: 0, bottom: 2, sides: 1)
    [2, 2, 2, 2, 2, 2], // DIRT
    [3, 3, 3, 3, 3, 3], // STONE
    [4, 4, 4, 4, 4, 4], // WOOD
    [5, 5, 5, 5, 5, 5], // LEAVES
    [6, 6, 6, 6, 6, 6], // WATER
];

/// Represents a single voxel block in the world.
///
/// A block has no identity beyond its position in the owning chunk's grid; it
/// is an immutable value holding its type.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute ensures a consistent memory layout so block
/// arrays can be handed to the GPU or written out as raw bytes.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// The block's type. Unknown encodings read as `AIR`.
    pub fn block_type(&self) -> BlockType {
        BlockType::from_int(self.block_type).unwrap_or(BlockType::AIR)
    }

    /// See [`BlockType::is_solid`].
    pub fn is_solid(&self) -> bool {
        self.block_type().is_solid()
    }

    /// See [`BlockType::is_opaque`].
    pub fn is_opaque(&self) -> bool {
        self.block_type().is_opaque()
    }

    /// Gets the atlas tile used for one face of this block.
    pub fn texture_index(&self, side: BlockSide) -> u16 {
        BLOCK_TYPE_TO_TEXTURE_INDICES[self.block_type() as usize][side as usize]
    }
}

impl From<BlockType> for Block {
    fn from(block_type: BlockType) -> Self {
        Block::new(block_type)
    }
}

/// Whether an optional block (as returned by world queries) is solid.
pub fn is_solid(block: Option<Block>) -> bool {
    block.is_some_and(|b| b.is_solid())
}

/// Whether an optional block (as returned by world queries) is opaque.
pub fn is_opaque(block: Option<Block>) -> bool {
    block.is_some_and(|b| b.is_opaque())
}
