//! # World Persistence
//!
//! Saves and loads the loaded chunks of a world as JSON. Each chunk is keyed by
//! its `ChunkPosition` and stores its blocks run-length encoded in storage
//! order, which keeps mostly-air and mostly-stone chunks small.

use std::{
    collections::HashSet,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

use super::{
    block::{block_type::BlockType, BlockTypeSize},
    chunk::{chunk_creation::ChunkCreationIterator, Chunk, ChunkPosition, CHUNK_SIZE},
    world::World,
};

/// Bumped whenever the on-disk layout changes.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// One chunk's blocks as `(block type, run length)` pairs in storage order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkData {
    pub position: ChunkPosition,
    pub runs: Vec<(BlockTypeSize, u32)>,
}

/// Serializable world data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldData {
    pub version: u32,
    pub seed: u32,
    pub chunks: Vec<ChunkData>,
}

impl ChunkData {
    pub fn from_chunk(chunk: &Chunk) -> Self {
        let mut runs: Vec<(BlockTypeSize, u32)> = Vec::new();
        for block in chunk.raw_blocks() {
            let id = block.map_or(BlockType::AIR as BlockTypeSize, |b| b.block_type);
            match runs.last_mut() {
                Some((last, count)) if *last == id => *count += 1,
                _ => runs.push((id, 1)),
            }
        }
        ChunkData {
            position: chunk.position,
            runs,
        }
    }

    /// Decodes the runs back into a chunk.
    ///
    /// Fails on unknown block ids and on runs that do not add up to exactly
    /// one chunk.
    pub fn into_chunk(self) -> Result<Chunk, EngineError> {
        let mut cci = ChunkCreationIterator::new(self.position);
        for (id, count) in self.runs {
            let block_type = BlockType::from_int(id).ok_or_else(|| {
                EngineError::InvalidSave(format!(
                    "unknown block id {} in chunk ({}, {})",
                    id, self.position.x, self.position.z
                ))
            })?;
            cci.push_run(block_type, count as usize);
        }
        if cci.pushed() != CHUNK_SIZE {
            return Err(EngineError::InvalidSave(format!(
                "chunk ({}, {}) holds {} blocks, expected {}",
                self.position.x,
                self.position.z,
                cci.pushed(),
                CHUNK_SIZE
            )));
        }
        Ok(cci.return_chunk())
    }
}

impl WorldData {
    pub fn from_world(world: &World) -> Self {
        let mut chunks: Vec<ChunkData> = world.chunks().map(ChunkData::from_chunk).collect();
        chunks.sort_by_key(|c| c.position);
        WorldData {
            version: SAVE_FORMAT_VERSION,
            seed: world.generator().seed(),
            chunks,
        }
    }

    /// Decodes every chunk, rejecting unknown versions and duplicate positions.
    pub fn into_chunks(self) -> Result<Vec<Chunk>, EngineError> {
        if self.version != SAVE_FORMAT_VERSION {
            return Err(EngineError::InvalidSave(format!(
                "unsupported save version {}",
                self.version
            )));
        }
        let mut seen = HashSet::new();
        self.chunks
            .into_iter()
            .map(|data| {
                if !seen.insert(data.position) {
                    return Err(EngineError::InvalidSave(format!(
                        "duplicate chunk ({}, {})",
                        data.position.x, data.position.z
                    )));
                }
                data.into_chunk()
            })
            .collect()
    }
}

/// Saves every loaded chunk of the world to a JSON file.
pub fn save_world<P: AsRef<Path>>(world: &World, path: P) -> Result<(), EngineError> {
    let data = WorldData::from_world(world);
    let writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer(writer, &data)?;
    info!(
        "World saved to {} ({} chunks)",
        path.as_ref().display(),
        data.chunks.len()
    );
    Ok(())
}

/// Loads the chunks stored in a save file.
///
/// The chunks come back dirty and without meshes; hand them to
/// [`World::restore_chunks`].
pub fn load_world<P: AsRef<Path>>(path: P) -> Result<Vec<Chunk>, EngineError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let data: WorldData = serde_json::from_reader(reader)?;
    let chunks = data.into_chunks()?;
    info!(
        "World loaded from {} ({} chunks)",
        path.as_ref().display(),
        chunks.len()
    );
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::Block;

    #[test]
    fn runs_compress_uniform_layers() {
        let mut chunk = Chunk::empty(ChunkPosition::new(3, -4));
        chunk.set_block(0, 0, 0, Some(Block::new(BlockType::STONE)));
        chunk.set_block(1, 0, 0, Some(Block::new(BlockType::STONE)));
        let data = ChunkData::from_chunk(&chunk);
        assert_eq!(
            data.runs,
            vec![(BlockType::STONE as u8, 2), (BlockType::AIR as u8, CHUNK_SIZE as u32 - 2)]
        );

        let decoded = data.into_chunk().unwrap();
        assert_eq!(decoded.raw_blocks(), chunk.raw_blocks());
        assert_eq!(decoded.position, ChunkPosition::new(3, -4));
    }

    #[test]
    fn unknown_block_ids_are_rejected() {
        let data = ChunkData {
            position: ChunkPosition::new(0, 0),
            runs: vec![(200, CHUNK_SIZE as u32)],
        };
        assert!(matches!(data.into_chunk(), Err(EngineError::InvalidSave(_))));
    }

    #[test]
    fn short_or_long_chunks_are_rejected() {
        for count in [10, CHUNK_SIZE as u32 + 1] {
            let data = ChunkData {
                position: ChunkPosition::new(0, 0),
                runs: vec![(0, count)],
            };
            assert!(matches!(data.into_chunk(), Err(EngineError::InvalidSave(_))));
        }
    }

    #[test]
    fn duplicate_positions_are_rejected() {
        let chunk = ChunkData {
            position: ChunkPosition::new(1, 1),
            runs: vec![(0, CHUNK_SIZE as u32)],
        };
        let data = WorldData {
            version: SAVE_FORMAT_VERSION,
            seed: 0,
            chunks: vec![chunk.clone(), chunk],
        };
        assert!(matches!(data.into_chunks(), Err(EngineError::InvalidSave(_))));
    }
}
