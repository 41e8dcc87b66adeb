//! # World Generation
//!
//! This module fills newly streamed chunks. Generation is a pure function of
//! the world seed and the chunk position: regenerating a chunk after it was
//! evicted reproduces exactly the same blocks.
//!
//! ## Terrain
//!
//! Column heights come from a few octaves of 2D Perlin noise sampled at global
//! block coordinates, so columns line up seamlessly across chunk borders. Each
//! column is stone at the world floor, dirt up to one block below the surface,
//! and a single grass block on top.
//!
//! ## Trees
//!
//! Trees are placed after terrain with an RNG seeded from the chunk position;
//! see [`trees`].

use log::trace;
use noise::{NoiseFn, Perlin};

use crate::config::GenerationMethod;

use super::{
    block::block_type::BlockType,
    chunk::{chunk_creation::ChunkCreationIterator, Chunk, ChunkPosition, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH},
};

pub mod trees;

/// Mean surface height of generated terrain.
pub const BASE_TERRAIN_HEIGHT: f64 = 64.0;
/// Maximum distance of the surface above or below the mean.
pub const TERRAIN_HEIGHT_VARIATION: f64 = 18.0;
/// Scaling factor applied to block coordinates for the first noise octave.
pub const PERLIN_SCALE_FACTOR: f64 = 0.01;
/// Number of noise octaves summed for the height field.
pub const TERRAIN_OCTAVES: usize = 4;
/// Surface height of `GenerationMethod::Flat` worlds.
pub const FLAT_TERRAIN_HEIGHT: i32 = 64;

/// Procedural chunk generator.
pub struct WorldGenerator {
    seed: u32,
    method: GenerationMethod,
    perlin: Perlin,
}

impl WorldGenerator {
    pub fn new(seed: u32, method: GenerationMethod) -> Self {
        WorldGenerator {
            seed,
            method,
            perlin: Perlin::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Surface height of the column at global `(x, z)`: the first air cell above ground.
    ///
    /// Always at least 2, so every column has its stone floor and a grass top.
    pub fn terrain_height(&self, x: i32, z: i32) -> i32 {
        match self.method {
            GenerationMethod::Empty => 0,
            GenerationMethod::Flat => FLAT_TERRAIN_HEIGHT,
            GenerationMethod::Terrain => {
                let mut amplitude = 1.0;
                let mut frequency = PERLIN_SCALE_FACTOR;
                let mut total = 0.0;
                let mut norm = 0.0;
                for _ in 0..TERRAIN_OCTAVES {
                    total += self.perlin.get([x as f64 * frequency, z as f64 * frequency]) * amplitude;
                    norm += amplitude;
                    amplitude *= 0.5;
                    frequency *= 2.0;
                }
                let height = BASE_TERRAIN_HEIGHT + (total / norm) * TERRAIN_HEIGHT_VARIATION;
                (height.round() as i32).clamp(2, CHUNK_HEIGHT - 1)
            }
        }
    }

    /// Generates a complete chunk: base terrain, then trees.
    pub fn generate_chunk(&self, position: ChunkPosition) -> Chunk {
        let mut chunk = self.generate_base_terrain(position);
        if self.method == GenerationMethod::Terrain {
            let planted = self.generate_trees(&mut chunk);
            trace!("Chunk ({}, {}) planted {} trees", position.x, position.z, planted);
        }
        chunk
    }

    /// Fills a chunk with the layered terrain column for every local `(x, z)`.
    ///
    /// For each `y`: `0` is stone, below `height - 1` is dirt, below `height`
    /// is grass, and everything above is air.
    pub fn generate_base_terrain(&self, position: ChunkPosition) -> Chunk {
        let mut cci = ChunkCreationIterator::new(position);
        if self.method == GenerationMethod::Empty {
            return cci.return_chunk();
        }

        let (origin_x, origin_z) = position.origin();
        let mut heights = [[0i32; CHUNK_WIDTH as usize]; CHUNK_DEPTH as usize];
        for (k, row) in heights.iter_mut().enumerate() {
            for (i, height) in row.iter_mut().enumerate() {
                *height = self.terrain_height(origin_x + i as i32, origin_z + k as i32);
            }
        }
        let top = heights.iter().flatten().copied().max().unwrap_or(0);

        for j in 0..top {
            for row in &heights {
                for &height in row {
                    cci.push_block_type(Self::layer_at(j, height));
                }
            }
        }

        cci.return_chunk()
    }

    /// The block type of layer `y` in a column whose surface is at `height`.
    pub fn layer_at(y: i32, height: i32) -> BlockType {
        if y == 0 {
            BlockType::STONE
        } else if y < height - 1 {
            BlockType::DIRT
        } else if y < height {
            BlockType::GRASS
        } else {
            BlockType::AIR
        }
    }

    /// Seed for the tree RNG of one chunk, mixing the world seed with the chunk position.
    pub(crate) fn chunk_seed(&self, position: ChunkPosition) -> u64 {
        (position.x as i64 as u64)
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (position.z as i64 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
            ^ u64::from(self.seed).rotate_left(32)
    }

    /// Places trees into a terrain chunk.
    ///
    /// # Returns
    /// Number of trees planted.
    pub fn generate_trees(&self, chunk: &mut Chunk) -> usize {
        let mut rng = fastrand::Rng::with_seed(self.chunk_seed(chunk.position));
        let (origin_x, origin_z) = chunk.position.origin();
        trees::plant_trees(chunk, &mut rng, |x, z| {
            self.terrain_height(origin_x + x, origin_z + z)
        })
    }
}
