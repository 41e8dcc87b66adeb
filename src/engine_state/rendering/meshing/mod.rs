//! Chunk mesh generation and the hand-off to the renderer.
//!
//! # Architecture
//! - `mesh/`: Face geometry and the face-culled [`ChunkMesh`] builder
//! - `renderer`: The [`ChunkRenderer`] trait the engine submits meshes to,
//!   plus a headless implementation

mod mesh;
mod renderer;

// Re-export the mesh module's public interface for external use
pub use mesh::*;

// Re-export the renderer module's public interface for external use
pub use renderer::*;
