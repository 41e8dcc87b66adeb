//! Mesh data structures and face-culled mesh building.
//!
//! This module converts a chunk's blocks into flat, GPU-friendly buffers. A
//! face is emitted only when the neighbouring cell across it is absent or not
//! opaque; neighbours outside the chunk are looked up through the world so
//! faces on chunk borders are culled against the adjacent chunk.

use log::debug;
use web_time::Instant;

use crate::engine_state::{
    rendering::texture::tile_uv,
    voxels::{
        block::{block_side::BlockSide, is_opaque},
        chunk::{Chunk, CHUNK_HEIGHT},
        world::World,
    },
};

use super::face::Face;

/// Renderable geometry for one chunk.
///
/// Buffers are flat and typed: three floats per vertex position, two per UV,
/// and six indices (two triangles) per face.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChunkMesh {
    /// Vertex positions in world space, `[x, y, z]` per vertex.
    pub positions: Vec<f32>,
    /// Atlas texture coordinates, `[u, v]` per vertex.
    pub uvs: Vec<f32>,
    /// Triangle list indices into the vertex buffers.
    pub indices: Vec<u32>,
}

impl ChunkMesh {
    /// Builds the mesh for `chunk`, using `world` to look across chunk borders.
    ///
    /// # Returns
    /// `None` if no face is visible, so empty chunks carry no mesh at all.
    pub fn build(chunk: &Chunk, world: &World) -> Option<ChunkMesh> {
        let start = Instant::now();
        let (origin_x, origin_z) = chunk.position.origin();
        let mut mesh = ChunkMesh::default();

        for (local, block) in chunk.iter_blocks() {
            for side in BlockSide::all() {
                let [dx, dy, dz] = side.offset();
                let (nx, ny, nz) = (local.x + dx, local.y + dy, local.z + dz);

                let neighbor = if Chunk::in_bounds(nx, ny, nz) {
                    chunk.get_block(nx, ny, nz)
                } else if !(0..CHUNK_HEIGHT).contains(&ny) {
                    None
                } else {
                    world.get_block(origin_x + nx, ny, origin_z + nz)
                };

                if !is_opaque(neighbor) {
                    mesh.push_face(&Face::new(
                        origin_x + local.x,
                        local.y,
                        origin_z + local.z,
                        block,
                        side,
                    ));
                }
            }
        }

        debug!(
            "Meshed chunk ({}, {}): {} faces in {:?}",
            chunk.position.x,
            chunk.position.z,
            mesh.face_count(),
            start.elapsed()
        );

        if mesh.indices.is_empty() {
            None
        } else {
            Some(mesh)
        }
    }

    /// Appends one quad: four vertices and the six indices of its two triangles.
    fn push_face(&mut self, face: &Face) {
        let base = self.vertex_count() as u32;
        let uv = tile_uv(face.block.texture_index(face.block_side));

        for corner in face.corners() {
            self.positions
                .extend_from_slice(&[corner.x as f32, corner.y as f32, corner.z as f32]);
        }
        // ll, lr, ul, ur
        self.uvs.extend_from_slice(&[
            uv.u0, uv.v1, uv.u1, uv.v1, uv.u0, uv.v0, uv.u1, uv.v0,
        ]);
        self.indices
            .extend_from_slice(&Self::generate_face_indices(base));
    }

    /// Index data for a face whose first vertex is `base`.
    ///
    /// Produces two triangles `(ll, lr, ur)` and `(ll, ur, ul)`.
    pub fn generate_face_indices(base: u32) -> [u32; 6] {
        [base, base + 1, base + 3, base, base + 3, base + 2]
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn face_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Position buffer as raw bytes, ready for upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// UV buffer as raw bytes, ready for upload.
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Index buffer as raw bytes, ready for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
