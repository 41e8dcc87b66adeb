//! # Rendering
//!
//! Everything the engine needs to produce drawable data: chunk meshes, atlas
//! texture coordinates, and the [`ChunkRenderer`] seam through which meshes
//! reach an actual graphics backend.

pub mod meshing;
pub mod texture;

pub use meshing::{
    ChunkMesh, ChunkRenderer, Face, HeadlessRenderer, Highlight, RenderHandle, UploadedMesh,
};
