//! # Chunk Creation Module
//!
//! This module provides a builder that fills a chunk sequentially in storage
//! order (x, then z, then y). Terrain generation pushes one block at a time;
//! the persistence layer pushes whole runs of identical blocks.

use crate::engine_state::voxels::block::{block_type::BlockType, Block};

use super::{Chunk, ChunkPosition, CHUNK_SIZE};

/// A builder for creating and populating chunks in storage order.
///
/// The builder keeps a cursor into the chunk's dense block vector. Pushes past
/// the end of the chunk are counted but discarded, so callers can detect
/// malformed input through [`ChunkCreationIterator::overflowed`].
pub struct ChunkCreationIterator {
    /// The position of the chunk being created
    position: ChunkPosition,
    /// Dense block storage, filled up to `cursor`
    blocks: Vec<Option<Block>>,
    /// Number of blocks pushed so far, including discarded ones
    cursor: usize,
}

impl ChunkCreationIterator {
    /// Creates a new builder for a chunk at the given position.
    pub fn new(position: ChunkPosition) -> Self {
        ChunkCreationIterator {
            position,
            blocks: Vec::with_capacity(CHUNK_SIZE),
            cursor: 0,
        }
    }

    /// Adds a block at the current position and advances the cursor.
    pub fn push_block_type(&mut self, block_type: BlockType) {
        self.push_run(block_type, 1);
    }

    /// Adds `count` copies of a block, advancing the cursor by `count`.
    pub fn push_run(&mut self, block_type: BlockType, count: usize) {
        let block = (block_type != BlockType::AIR).then(|| Block::new(block_type));
        let room = CHUNK_SIZE - self.blocks.len();
        self.blocks
            .extend(std::iter::repeat(block).take(count.min(room)));
        self.cursor += count;
    }

    /// Number of blocks pushed so far.
    pub fn pushed(&self) -> usize {
        self.cursor
    }

    /// Whether more blocks were pushed than the chunk holds.
    pub fn overflowed(&self) -> bool {
        self.cursor > CHUNK_SIZE
    }

    /// Finalizes the chunk. Cells that were never pushed are air.
    pub fn return_chunk(mut self) -> Chunk {
        self.blocks.resize(CHUNK_SIZE, None);
        Chunk::from_blocks(self.position, self.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_fill_in_storage_order() {
        let mut cci = ChunkCreationIterator::new(ChunkPosition::new(0, 0));
        cci.push_run(BlockType::STONE, 16 * 16);
        cci.push_block_type(BlockType::DIRT);
        let chunk = cci.return_chunk();

        assert_eq!(chunk.block_type_at(15, 0, 15), BlockType::STONE);
        assert_eq!(chunk.block_type_at(0, 1, 0), BlockType::DIRT);
        assert_eq!(chunk.block_type_at(1, 1, 0), BlockType::AIR);
    }

    #[test]
    fn overflow_is_detected_and_truncated() {
        let mut cci = ChunkCreationIterator::new(ChunkPosition::new(0, 0));
        cci.push_run(BlockType::DIRT, CHUNK_SIZE + 3);
        assert!(cci.overflowed());
        let chunk = cci.return_chunk();
        assert_eq!(chunk.raw_blocks().len(), CHUNK_SIZE);
    }
}
