//! # Chunk Iteration Module
//!
//! This module provides an iterator over all non-air blocks in a chunk, used
//! by the mesher and by persistence statistics.

use cgmath::Point3;

use crate::engine_state::voxels::block::Block;

use super::Chunk;

/// An iterator over all non-air blocks in a chunk.
///
/// Yields each block with its chunk-local position, in storage order
/// (x, then z, then y), skipping air.
pub struct ChunkBlockIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk,
    /// Next storage index to inspect
    current_offset: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    /// Creates a new `ChunkBlockIterator` for the given chunk.
    pub fn new(chunk_ref: &'a Chunk) -> Self {
        ChunkBlockIterator {
            chunk_ref,
            current_offset: 0,
        }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<i32>, Block);

    fn next(&mut self) -> Option<Self::Item> {
        let blocks = self.chunk_ref.raw_blocks();
        while self.current_offset < blocks.len() {
            let offset = self.current_offset;
            self.current_offset += 1;
            if let Some(block) = blocks[offset] {
                return Some((Chunk::coordinates(offset), block));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::{block::block_type::BlockType, chunk::ChunkPosition};

    #[test]
    fn yields_only_non_air_blocks_in_order() {
        let mut chunk = Chunk::empty(ChunkPosition::new(0, 0));
        chunk.set_block(3, 10, 2, Some(Block::new(BlockType::WOOD)));
        chunk.set_block(1, 0, 0, Some(Block::new(BlockType::STONE)));

        let found: Vec<_> = chunk.iter_blocks().collect();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, Point3::new(1, 0, 0));
        assert_eq!(found[1].0, Point3::new(3, 10, 2));
        assert_eq!(found[1].1.block_type(), BlockType::WOOD);
    }
}
