//! # Engine Errors
//!
//! World queries never fail: an unloaded chunk or an out-of-range coordinate is
//! simply "no block". The only fallible paths are the edges of the engine:
//! reading configuration, saving and loading the world, and handing meshes to
//! the rendering collaborator.

use thiserror::Error;

/// Errors produced at the boundaries of the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Reading or writing a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration or save file was not valid JSON for the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A save file parsed but describes a chunk that cannot exist.
    #[error("invalid save data: {0}")]
    InvalidSave(String),

    /// The rendering collaborator rejected a mesh.
    #[error("render error: {0}")]
    Render(String),
}
