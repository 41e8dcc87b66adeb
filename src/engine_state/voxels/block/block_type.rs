//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world and the
//! per-type properties the mesher, physics and fluid engine depend on.

use num_derive::FromPrimitive;

use super::BlockTypeSize;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminants are stable: they are the values written by the world
/// persistence layer and the row indices of the texture atlas table. The
/// `FromPrimitive` derive converts stored integers back into the enum.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space. Never solid, never opaque.
    AIR = 0,

    /// Surface block with distinct top, side and bottom textures.
    GRASS = 1,

    /// Subsurface filler between the grass layer and bedrock.
    DIRT = 2,

    /// Bottom layer of every column.
    STONE = 3,

    /// Tree trunks.
    WOOD = 4,

    /// Tree canopies. Solid but see-through.
    LEAVES = 5,

    /// Fluid. Not solid, but opaque for face culling.
    WATER = 6,
}

impl BlockType {
    /// Number of block types, including `AIR`.
    pub const COUNT: usize = 7;

    /// Converts a stored integer back into a block type.
    ///
    /// # Returns
    /// `None` if the value does not name a block type.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(btype)
    }

    /// Whether the block stops movement and rays.
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockType::AIR | BlockType::WATER)
    }

    /// Whether the block hides the face of a neighbour pressed against it.
    ///
    /// Water counts as opaque so submerged faces and the internal faces of a
    /// body of water are not emitted.
    pub fn is_opaque(self) -> bool {
        !matches!(self, BlockType::AIR | BlockType::LEAVES)
    }

    /// Whether this is a fluid handled by the fluid engine.
    pub fn is_fluid(self) -> bool {
        self == BlockType::WATER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solidity_and_opacity() {
        assert!(!BlockType::AIR.is_solid());
        assert!(!BlockType::WATER.is_solid());
        assert!(BlockType::LEAVES.is_solid());
        assert!(BlockType::STONE.is_solid());

        assert!(!BlockType::AIR.is_opaque());
        assert!(!BlockType::LEAVES.is_opaque());
        assert!(BlockType::WATER.is_opaque());
        assert!(BlockType::GRASS.is_opaque());
    }

    #[test]
    fn integer_round_trip() {
        for value in 0..BlockType::COUNT as u8 {
            let block_type = BlockType::from_int(value).unwrap();
            assert_eq!(block_type as u8, value);
        }
        assert_eq!(BlockType::from_int(BlockType::COUNT as u8), None);
    }
}
