//! # Voxel Engine Core
//!
//! This module contains the core voxel engine functionality, providing the foundation
//! for representing, generating and simulating a voxel-based world.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Defines individual voxel types and their solidity/opacity
//! * **Chunk**: Fixed-size 16x256x16 columns of blocks, the unit of loading and meshing
//! * **Generation**: Noise terrain and seeded tree placement for new chunks
//! * **World**: Coordinates chunks and provides a unified interface for the entire voxel space
//! * **Fluid**: Level-based water propagation over the block grid
//! * **Persistence**: Saving and restoring chunk block data
//!
//! ## Data Flow
//!
//! 1. The world streams chunks in and out around the player, generating new ones
//! 2. Block edits route through the world to the owning chunk and mark it dirty
//! 3. Dirty chunks are re-meshed in a single rebuild pass
//! 4. Rebuilt meshes are handed to the renderer

pub mod block;
pub mod chunk;
pub mod fluid;
pub mod generation;
pub mod persistence;
pub mod world;
