//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size column of
//! `CHUNK_WIDTH x CHUNK_HEIGHT x CHUNK_DEPTH` optional blocks, the unit of
//! loading, generation and meshing.
//!
//! ## Storage
//!
//! Blocks are stored densely in a single vector in row-major order (x, then z,
//! then y), so a horizontal slice of the chunk is contiguous. Air is stored as
//! `None`. Every accessor takes signed local coordinates and treats anything
//! outside the chunk as "no block" rather than panicking.
//!
//! ## Render state
//!
//! A chunk also owns at most one cached mesh and one render handle. Both are
//! opaque to the voxel code: the mesher fills the former, the rendering
//! collaborator hands out the latter.

use cgmath::Point3;

use crate::engine_state::rendering::{ChunkMesh, RenderHandle};

use super::block::{block_type::BlockType, Block};

pub mod chunk_creation;
pub mod chunk_iteration;
pub mod chunk_position;

pub use chunk_position::{to_chunk_local, ChunkPosition};

/// Chunk extent along X in blocks.
pub const CHUNK_WIDTH: i32 = 16;
/// Chunk extent along Y in blocks. The world is a single chunk tall.
pub const CHUNK_HEIGHT: i32 = 256;
/// Chunk extent along Z in blocks.
pub const CHUNK_DEPTH: i32 = 16;
/// The number of blocks in one horizontal slice of a chunk.
pub const CHUNK_PLANE_SIZE: usize = (CHUNK_WIDTH * CHUNK_DEPTH) as usize;
/// The total number of blocks in a chunk.
pub const CHUNK_SIZE: usize = CHUNK_PLANE_SIZE * CHUNK_HEIGHT as usize;

/// A fixed-size column of voxel blocks.
#[derive(Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: ChunkPosition,

    /// Dense block storage, `None` for air. See [`Chunk::index`] for the layout.
    blocks: Vec<Option<Block>>,

    /// Set by every mutation, cleared once a mesh has been rebuilt.
    dirty: bool,

    /// The last mesh built for this chunk, if it had any visible faces.
    mesh: Option<ChunkMesh>,

    /// Handle to the uploaded mesh, owned by the rendering collaborator.
    render_handle: Option<RenderHandle>,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    ///
    /// A new chunk starts dirty so the first mesh pass picks it up.
    pub fn empty(position: ChunkPosition) -> Self {
        Chunk {
            position,
            blocks: vec![None; CHUNK_SIZE],
            dirty: true,
            mesh: None,
            render_handle: None,
        }
    }

    pub(crate) fn from_blocks(position: ChunkPosition, blocks: Vec<Option<Block>>) -> Self {
        debug_assert_eq!(blocks.len(), CHUNK_SIZE);
        Chunk {
            position,
            blocks,
            dirty: true,
            mesh: None,
            render_handle: None,
        }
    }

    /// Whether chunk-local coordinates name a cell inside this chunk.
    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_WIDTH).contains(&x) && (0..CHUNK_HEIGHT).contains(&y) && (0..CHUNK_DEPTH).contains(&z)
    }

    /// Storage index for in-bounds local coordinates.
    fn index(x: i32, y: i32, z: i32) -> usize {
        x as usize + CHUNK_WIDTH as usize * z as usize + CHUNK_PLANE_SIZE * y as usize
    }

    /// Local coordinates for a storage index.
    pub(crate) fn coordinates(index: usize) -> Point3<i32> {
        let y = index / CHUNK_PLANE_SIZE;
        let rest = index % CHUNK_PLANE_SIZE;
        Point3::new(
            (rest % CHUNK_WIDTH as usize) as i32,
            y as i32,
            (rest / CHUNK_WIDTH as usize) as i32,
        )
    }

    /// Gets the block at the specified chunk-local coordinates.
    ///
    /// # Returns
    /// The block, or `None` for air and for coordinates outside the chunk.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        if !Self::in_bounds(x, y, z) {
            return None;
        }
        self.blocks[Self::index(x, y, z)]
    }

    /// Replaces the block at the specified chunk-local coordinates and marks the chunk dirty.
    ///
    /// Setting an `AIR` block stores `None`.
    ///
    /// # Returns
    /// `false` (and no change) if the coordinates are outside the chunk.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: Option<Block>) -> bool {
        if !Self::in_bounds(x, y, z) {
            return false;
        }
        let block = block.filter(|b| b.block_type() != BlockType::AIR);
        self.blocks[Self::index(x, y, z)] = block;
        self.dirty = true;
        true
    }

    /// Convenience accessor for the type at local coordinates, `AIR` when absent.
    pub fn block_type_at(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.get_block(x, y, z)
            .map_or(BlockType::AIR, |b| b.block_type())
    }

    /// Raw storage in index order, used by iteration and persistence.
    pub(crate) fn raw_blocks(&self) -> &[Option<Block>] {
        &self.blocks
    }

    /// Whether the chunk changed since its mesh was last rebuilt.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// The cached mesh, if the last rebuild emitted any faces.
    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// Installs a freshly built mesh in place of the previous one.
    pub fn set_mesh(&mut self, mesh: Option<ChunkMesh>) {
        self.mesh = mesh;
    }

    pub fn render_handle(&self) -> Option<RenderHandle> {
        self.render_handle
    }

    /// Stores a new render handle, returning the one it replaces.
    pub fn replace_render_handle(&mut self, handle: Option<RenderHandle>) -> Option<RenderHandle> {
        std::mem::replace(&mut self.render_handle, handle)
    }

    /// Drops the mesh and hands back the render handle so the owner can release it.
    pub fn release_render_state(&mut self) -> Option<RenderHandle> {
        self.mesh = None;
        self.render_handle.take()
    }

    /// Iterates over every non-air block with its local position.
    pub fn iter_blocks(&self) -> chunk_iteration::ChunkBlockIterator<'_> {
        chunk_iteration::ChunkBlockIterator::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_accessors_are_rejected() {
        let mut chunk = Chunk::empty(ChunkPosition::new(0, 0));
        let stone = Some(Block::new(BlockType::STONE));
        for (x, y, z) in [(-1, 0, 0), (16, 0, 0), (0, -1, 0), (0, 256, 0), (0, 0, 16)] {
            assert_eq!(chunk.get_block(x, y, z), None);
            assert!(!chunk.set_block(x, y, z, stone));
        }
    }

    #[test]
    fn set_then_get_and_dirty_flag() {
        let mut chunk = Chunk::empty(ChunkPosition::new(2, -1));
        chunk.clear_dirty();
        assert!(chunk.set_block(15, 255, 15, Some(Block::new(BlockType::WOOD))));
        assert!(chunk.is_dirty());
        assert_eq!(chunk.block_type_at(15, 255, 15), BlockType::WOOD);

        chunk.set_block(15, 255, 15, Some(Block::new(BlockType::AIR)));
        assert_eq!(chunk.get_block(15, 255, 15), None);
    }

    #[test]
    fn index_and_coordinates_agree() {
        for (x, y, z) in [(0, 0, 0), (15, 0, 0), (0, 0, 15), (3, 200, 9), (15, 255, 15)] {
            let index = Chunk::index(x, y, z);
            assert_eq!(Chunk::coordinates(index), Point3::new(x, y, z));
        }
    }
}
