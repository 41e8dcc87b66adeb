//! The rendering collaborator seam.
//!
//! The engine never talks to a graphics API directly. It hands finished chunk
//! meshes to a [`ChunkRenderer`], keeps the returned [`RenderHandle`] on the
//! chunk, and gives the handle back when the chunk is remeshed or unloaded.

use std::collections::HashMap;

use cgmath::Point3;
use log::{debug, trace};

use crate::{
    engine_state::voxels::{block::block_side::BlockSide, chunk::ChunkPosition},
    error::EngineError,
};

use super::mesh::ChunkMesh;

/// Opaque handle to a mesh uploaded by a [`ChunkRenderer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u64);

/// The block the player is aiming at, for outline highlighting.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Highlight {
    pub block_position: Point3<i32>,
    pub face: BlockSide,
}

/// Receives chunk geometry for GPU upload and drawing.
pub trait ChunkRenderer {
    /// Uploads a chunk's mesh and returns a handle that identifies it.
    fn upload(&mut self, position: ChunkPosition, mesh: &ChunkMesh) -> Result<RenderHandle, EngineError>;

    /// Frees everything associated with a previously uploaded mesh.
    fn release(&mut self, handle: RenderHandle);

    /// Updates the aim-target outline. `None` hides it.
    fn set_highlight(&mut self, _highlight: Option<Highlight>) {}
}

/// Bookkeeping for one uploaded mesh in a [`HeadlessRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadedMesh {
    pub position: ChunkPosition,
    pub vertex_count: usize,
    pub index_count: usize,
    /// Size of the position, UV and index buffers together.
    pub byte_size: usize,
}

/// A renderer with no GPU behind it.
///
/// It records what would be resident on the GPU, which makes it useful for the
/// headless binary and for tests that check handles are released.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    next_handle: u64,
    resident: HashMap<RenderHandle, UploadedMesh>,
    highlight: Option<Highlight>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of meshes currently uploaded.
    pub fn resident_count(&self) -> usize {
        self.resident.len()
    }

    pub fn resident(&self, handle: RenderHandle) -> Option<&UploadedMesh> {
        self.resident.get(&handle)
    }

    /// Total vertices across all uploaded meshes.
    pub fn resident_vertices(&self) -> usize {
        self.resident.values().map(|m| m.vertex_count).sum()
    }

    pub fn highlight(&self) -> Option<Highlight> {
        self.highlight
    }
}

impl ChunkRenderer for HeadlessRenderer {
    fn upload(&mut self, position: ChunkPosition, mesh: &ChunkMesh) -> Result<RenderHandle, EngineError> {
        if mesh.indices.len() % 3 != 0 {
            return Err(EngineError::Render(format!(
                "mesh for chunk ({}, {}) has {} indices, not a triangle list",
                position.x,
                position.z,
                mesh.indices.len()
            )));
        }
        let handle = RenderHandle(self.next_handle);
        self.next_handle += 1;
        self.resident.insert(
            handle,
            UploadedMesh {
                position,
                vertex_count: mesh.vertex_count(),
                index_count: mesh.indices.len(),
                byte_size: mesh.position_bytes().len()
                    + mesh.uv_bytes().len()
                    + mesh.index_bytes().len(),
            },
        );
        trace!("Uploaded chunk ({}, {}) as {:?}", position.x, position.z, handle);
        Ok(handle)
    }

    fn release(&mut self, handle: RenderHandle) {
        if self.resident.remove(&handle).is_none() {
            debug!("Release of unknown render handle {:?}", handle);
        }
    }

    fn set_highlight(&mut self, highlight: Option<Highlight>) {
        self.highlight = highlight;
    }
}
