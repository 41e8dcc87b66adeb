//! Mesh generation for voxel rendering.
//!
//! This module provides the conversion from chunk block data into flat
//! position, UV and index buffers with hidden faces culled.
//!
//! # Architecture
//! - [`ChunkMesh`]: The output buffers plus the face-culled builder
//! - [`Face`]: A single quad of a voxel with its corners and texture source

mod face;
mod mesh;

pub use face::Face;
pub use mesh::*;
