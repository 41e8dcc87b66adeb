//! # World Module
//!
//! This module provides the `World` struct which manages the collection of
//! loaded chunks. It serves as the central coordinator for chunk streaming,
//! global block access, dirty-chunk tracking and world events.
//!
//! ## Architecture
//!
//! The world uses sparse storage: only chunks inside the render distance of the
//! player are kept in memory, keyed by [`ChunkPosition`]. The load region is a
//! square (Chebyshev distance), both when generating the initial world and when
//! streaming as the player moves.
//!
//! ## Absence is air
//!
//! Every block lookup is total. A coordinate in an unloaded chunk, or above or
//! below the world, reads as `None`. The mesher, the physics and the raycaster
//! all rely on this to treat the edge of the loaded world as open space.
//!
//! ## Events
//!
//! Block edits and chunk loads are recorded as [`WorldEvent`]s in a queue that
//! the owner drains with [`World::drain_events`], rather than invoking
//! callbacks in the middle of an edit.

use std::collections::{HashMap, HashSet, VecDeque};

use cgmath::Point3;
use log::{debug, info};

use crate::{config::GameConfig, engine_state::rendering::{ChunkMesh, RenderHandle}};

use super::{
    block::{block_type::BlockType, Block},
    chunk::{to_chunk_local, Chunk, ChunkPosition, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH},
    fluid::FluidState,
    generation::WorldGenerator,
};

/// Something that happened to the world since the events were last drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldEvent {
    /// A block was replaced. `None` means air.
    BlockChanged {
        position: Point3<i32>,
        old: Option<Block>,
        new: Option<Block>,
    },
    /// A chunk was generated or restored and is now loaded.
    ChunkLoaded(ChunkPosition),
    /// A chunk left the render distance and was dropped.
    ChunkUnloaded(ChunkPosition),
}

/// A chunk dropped by streaming, with the render handle its owner must release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictedChunk {
    pub position: ChunkPosition,
    pub render_handle: Option<RenderHandle>,
}

/// What one streaming update changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamingUpdate {
    /// Chunks generated this update. Their meshes are already built.
    pub loaded: Vec<ChunkPosition>,
    /// Chunks dropped this update.
    pub evicted: Vec<EvictedChunk>,
}

impl StreamingUpdate {
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty() && self.evicted.is_empty()
    }
}

/// Represents a voxel world composed of chunk columns.
///
/// # Examples
///
/// ```
/// use voxel_world::config::{GameConfig, GenerationMethod};
/// use voxel_world::engine_state::voxels::{block::{Block, block_type::BlockType}, world::World};
///
/// let config = GameConfig { render_distance: 1, generation: GenerationMethod::Flat, ..Default::default() };
/// let mut world = World::new(&config);
/// world.generate_initial_world(0.0, 0.0);
/// assert_eq!(world.chunk_count(), 9);
///
/// world.set_block(3, 100, 3, Some(Block::new(BlockType::WOOD)));
/// assert_eq!(world.get_block(3, 100, 3), Some(Block::new(BlockType::WOOD)));
/// ```
pub struct World {
    /// A mapping from chunk coordinates to chunk data.
    chunks: HashMap<ChunkPosition, Chunk>,

    /// Radius in chunks of the square load region.
    render_distance: i32,

    /// Fills newly streamed chunks.
    generator: WorldGenerator,

    /// Chunks whose block data changed since their mesh was last rebuilt.
    dirty_chunks: HashSet<ChunkPosition>,

    /// Pending events, oldest first.
    events: VecDeque<WorldEvent>,

    /// The chunk the last streaming pass was centred on.
    center_chunk: Option<ChunkPosition>,

    /// Water levels and the pending fluid queue.
    pub(crate) fluids: FluidState,
}

impl World {
    /// Creates a new world with no chunks loaded.
    pub fn new(config: &GameConfig) -> Self {
        World {
            chunks: HashMap::new(),
            render_distance: config.render_distance.max(0),
            generator: WorldGenerator::new(config.seed, config.generation),
            dirty_chunks: HashSet::new(),
            events: VecDeque::new(),
            center_chunk: None,
            fluids: FluidState::new(config.fluid.max_water_blocks),
        }
    }

    pub fn render_distance(&self) -> i32 {
        self.render_distance
    }

    pub fn generator(&self) -> &WorldGenerator {
        &self.generator
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn contains_chunk(&self, position: ChunkPosition) -> bool {
        self.chunks.contains_key(&position)
    }

    pub fn get_chunk(&self, position: ChunkPosition) -> Option<&Chunk> {
        self.chunks.get(&position)
    }

    pub fn get_chunk_mut(&mut self, position: ChunkPosition) -> Option<&mut Chunk> {
        self.chunks.get_mut(&position)
    }

    /// Positions of every loaded chunk, in no particular order.
    pub fn loaded_positions(&self) -> impl Iterator<Item = ChunkPosition> + '_ {
        self.chunks.keys().copied()
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Inserts a chunk under its own position, replacing any chunk already there.
    ///
    /// The chunk and its loaded horizontal neighbours are marked dirty so their
    /// shared border faces are re-culled. Fires a `ChunkLoaded` event.
    ///
    /// # Returns
    /// The replaced chunk, whose render handle the caller should release.
    pub fn insert_chunk(&mut self, mut chunk: Chunk) -> Option<Chunk> {
        let position = chunk.position;
        chunk.mark_dirty();
        let replaced = self.chunks.insert(position, chunk);
        self.dirty_chunks.insert(position);
        for neighbor in position.neighbors() {
            self.mark_dirty(neighbor);
        }
        self.events.push_back(WorldEvent::ChunkLoaded(position));
        replaced
    }

    /// Inserts chunks read back from a save, replacing loaded chunks at the same positions.
    ///
    /// Water levels recorded for replaced chunks are dropped.
    ///
    /// # Returns
    /// Render handles of the replaced chunks, for the owner to release.
    pub fn restore_chunks(&mut self, chunks: impl IntoIterator<Item = Chunk>) -> Vec<RenderHandle> {
        let mut handles = Vec::new();
        let mut restored = 0;
        for chunk in chunks {
            let position = chunk.position;
            self.fluids.forget_chunk(position);
            if let Some(mut replaced) = self.insert_chunk(chunk) {
                handles.extend(replaced.release_render_state());
            }
            restored += 1;
        }
        info!("Restored {} chunks ({} replaced)", restored, handles.len());
        handles
    }

    /// Removes a chunk along with its dirty mark and fluid state.
    pub fn remove_chunk(&mut self, position: ChunkPosition) -> Option<Chunk> {
        let chunk = self.chunks.remove(&position)?;
        self.dirty_chunks.remove(&position);
        self.fluids.forget_chunk(position);
        self.events.push_back(WorldEvent::ChunkUnloaded(position));
        Some(chunk)
    }

    /// Gets the block at global coordinates.
    ///
    /// # Returns
    /// The block, or `None` for air, unloaded chunks and heights outside the world.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        let (chunk_position, lx, ly, lz) = to_chunk_local(x, y, z);
        self.chunks
            .get(&chunk_position)
            .and_then(|chunk| chunk.get_block(lx, ly, lz))
    }

    /// The type of the block at global coordinates, `AIR` when absent.
    pub fn block_type_at(&self, x: i32, y: i32, z: i32) -> BlockType {
        self.get_block(x, y, z)
            .map_or(BlockType::AIR, |b| b.block_type())
    }

    /// Whether the chunk owning global column `(x, z)` is loaded.
    pub fn is_loaded(&self, x: i32, z: i32) -> bool {
        self.chunks.contains_key(&ChunkPosition::from_block(x, z))
    }

    /// Sets the block at global coordinates.
    ///
    /// Does nothing if the owning chunk is not loaded or `y` is outside the
    /// world. Otherwise marks the chunk dirty (and the neighbouring chunk when
    /// the block sits on a border), updates fluid bookkeeping, and fires a
    /// `BlockChanged` event with the old and new blocks.
    ///
    /// # Returns
    /// Whether the edit was applied.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: Option<Block>) -> bool {
        let (chunk_position, lx, ly, lz) = to_chunk_local(x, y, z);
        let Some(chunk) = self.chunks.get_mut(&chunk_position) else {
            return false;
        };
        let old = chunk.get_block(lx, ly, lz);
        if !chunk.set_block(lx, ly, lz, block) {
            return false;
        }
        let new = chunk.get_block(lx, ly, lz);

        self.dirty_chunks.insert(chunk_position);
        if lx == 0 {
            self.mark_dirty(ChunkPosition::new(chunk_position.x - 1, chunk_position.z));
        } else if lx == CHUNK_WIDTH - 1 {
            self.mark_dirty(ChunkPosition::new(chunk_position.x + 1, chunk_position.z));
        }
        if lz == 0 {
            self.mark_dirty(ChunkPosition::new(chunk_position.x, chunk_position.z - 1));
        } else if lz == CHUNK_DEPTH - 1 {
            self.mark_dirty(ChunkPosition::new(chunk_position.x, chunk_position.z + 1));
        }

        let position = Point3::new(x, y, z);
        let was_water = old.is_some_and(|b| b.block_type().is_fluid());
        let is_water = new.is_some_and(|b| b.block_type().is_fluid());
        if is_water {
            self.fluids.enqueue(position);
        } else if was_water {
            self.fluids.clear_level(position);
        }
        if new.is_none() {
            self.wake_fluids_around(position);
        }

        self.events.push_back(WorldEvent::BlockChanged { position, old, new });
        true
    }

    /// Marks a loaded chunk as needing a mesh rebuild. Unloaded positions are ignored.
    pub fn mark_dirty(&mut self, position: ChunkPosition) {
        if let Some(chunk) = self.chunks.get_mut(&position) {
            chunk.mark_dirty();
            self.dirty_chunks.insert(position);
        }
    }

    pub fn dirty_chunks(&self) -> &HashSet<ChunkPosition> {
        &self.dirty_chunks
    }

    /// Takes every event recorded since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        self.events.drain(..).collect()
    }

    /// Height of the first air cell above the topmost solid block in column `(x, z)`.
    ///
    /// # Returns
    /// `None` if the column is unloaded or holds no solid block.
    pub fn surface_height(&self, x: i32, z: i32) -> Option<i32> {
        let (chunk_position, lx, _, lz) = to_chunk_local(x, 0, z);
        let chunk = self.chunks.get(&chunk_position)?;
        (0..CHUNK_HEIGHT)
            .rev()
            .find(|y| chunk.block_type_at(lx, *y, lz).is_solid())
            .map(|y| y + 1)
    }

    /// Loads every chunk within render distance of a world-space point.
    ///
    /// Chunks already present are kept. Fires a `ChunkLoaded` event per new
    /// chunk. Meshes are left to the next [`World::rebuild_dirty_meshes`] pass.
    ///
    /// # Returns
    /// Number of chunks generated.
    pub fn generate_initial_world(&mut self, center_x: f32, center_z: f32) -> usize {
        let center = ChunkPosition::from_world(center_x, center_z);
        self.center_chunk = Some(center);

        let mut generated = 0;
        for position in center.square_around(self.render_distance) {
            if !self.contains_chunk(position) {
                let chunk = self.generator.generate_chunk(position);
                self.insert_chunk(chunk);
                generated += 1;
            }
        }

        info!(
            "Generated initial world around chunk ({}, {}): {} chunks",
            center.x, center.z, generated
        );
        generated
    }

    /// Streams chunks around the player's world-space position.
    ///
    /// Does nothing while the player stays in the same chunk. Otherwise evicts
    /// every chunk farther than the render distance (Chebyshev) from the new
    /// centre, generates every missing chunk inside it, and builds meshes for
    /// the new chunks straight away.
    pub fn update_world_generation(&mut self, player_x: f32, player_z: f32) -> StreamingUpdate {
        let center = ChunkPosition::from_world(player_x, player_z);
        if self.center_chunk == Some(center) {
            return StreamingUpdate::default();
        }
        self.center_chunk = Some(center);

        let mut update = StreamingUpdate::default();

        let far: Vec<ChunkPosition> = self
            .chunks
            .keys()
            .filter(|position| position.chebyshev_distance(&center) > self.render_distance)
            .copied()
            .collect();
        for position in far {
            if let Some(mut chunk) = self.remove_chunk(position) {
                update.evicted.push(EvictedChunk {
                    position,
                    render_handle: chunk.release_render_state(),
                });
            }
        }

        for position in center.square_around(self.render_distance) {
            if !self.contains_chunk(position) {
                let chunk = self.generator.generate_chunk(position);
                self.insert_chunk(chunk);
                update.loaded.push(position);
            }
        }
        for position in &update.loaded {
            self.rebuild_chunk_mesh(*position);
        }

        debug!(
            "Streaming around ({}, {}): loaded {}, evicted {}",
            center.x,
            center.z,
            update.loaded.len(),
            update.evicted.len()
        );
        update
    }

    /// Rebuilds the mesh of one loaded chunk and clears its dirty state.
    ///
    /// The previous mesh is dropped before the new one is built.
    ///
    /// # Returns
    /// `false` if the chunk is not loaded.
    pub fn rebuild_chunk_mesh(&mut self, position: ChunkPosition) -> bool {
        match self.chunks.get_mut(&position) {
            Some(chunk) => chunk.set_mesh(None),
            None => {
                self.dirty_chunks.remove(&position);
                return false;
            }
        }

        let mesh = match self.chunks.get(&position) {
            Some(chunk) => ChunkMesh::build(chunk, self),
            None => return false,
        };

        if let Some(chunk) = self.chunks.get_mut(&position) {
            chunk.set_mesh(mesh);
            chunk.clear_dirty();
        }
        self.dirty_chunks.remove(&position);
        true
    }

    /// Rebuilds the mesh of every dirty chunk.
    ///
    /// A chunk leaves the dirty set only after its mesh has been rebuilt.
    ///
    /// # Returns
    /// The rebuilt chunk positions, sorted, for upload to the renderer.
    pub fn rebuild_dirty_meshes(&mut self) -> Vec<ChunkPosition> {
        let mut pending: Vec<ChunkPosition> = self.dirty_chunks.iter().copied().collect();
        pending.sort();
        pending
            .into_iter()
            .filter(|position| self.rebuild_chunk_mesh(*position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationMethod;

    fn empty_world(render_distance: i32) -> World {
        World::new(&GameConfig {
            render_distance,
            generation: GenerationMethod::Empty,
            ..Default::default()
        })
    }

    #[test]
    fn unloaded_reads_are_absent() {
        let world = empty_world(1);
        for (x, y, z) in [(0, 0, 0), (-100, 50, 3), (i32::MAX, 0, i32::MIN), (5, -1, 5)] {
            assert_eq!(world.get_block(x, y, z), None);
        }
    }

    #[test]
    fn set_block_round_trips_and_fires_event() {
        let mut world = empty_world(1);
        world.generate_initial_world(0.0, 0.0);
        world.drain_events();

        let stone = Some(Block::new(BlockType::STONE));
        assert!(world.set_block(-5, 40, 17, stone));
        assert_eq!(world.get_block(-5, 40, 17), stone);
        assert!(world.dirty_chunks().contains(&ChunkPosition::new(-1, 1)));

        let events = world.drain_events();
        assert_eq!(
            events,
            vec![WorldEvent::BlockChanged {
                position: Point3::new(-5, 40, 17),
                old: None,
                new: stone,
            }]
        );
    }

    #[test]
    fn set_block_on_unloaded_chunk_is_a_no_op() {
        let mut world = empty_world(0);
        world.generate_initial_world(0.0, 0.0);
        world.drain_events();
        assert!(!world.set_block(40, 10, 40, Some(Block::new(BlockType::DIRT))));
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn border_edit_dirties_neighbor_chunk() {
        let mut world = empty_world(1);
        world.generate_initial_world(0.0, 0.0);
        world.rebuild_dirty_meshes();
        assert!(world.dirty_chunks().is_empty());

        world.set_block(15, 10, 4, Some(Block::new(BlockType::DIRT)));
        assert!(world.dirty_chunks().contains(&ChunkPosition::new(0, 0)));
        assert!(world.dirty_chunks().contains(&ChunkPosition::new(1, 0)));
    }

    #[test]
    fn rebuild_clears_dirty_set() {
        let mut world = empty_world(1);
        world.generate_initial_world(0.0, 0.0);
        assert_eq!(world.dirty_chunks().len(), 9);
        let rebuilt = world.rebuild_dirty_meshes();
        assert_eq!(rebuilt.len(), 9);
        assert!(world.dirty_chunks().is_empty());
        assert!(world.chunks().all(|c| !c.is_dirty() && c.mesh().is_none()));
    }

    #[test]
    fn streaming_is_a_no_op_within_the_same_chunk() {
        let mut world = empty_world(1);
        world.generate_initial_world(0.0, 0.0);
        let update = world.update_world_generation(15.9, 0.1);
        assert!(update.is_empty());
    }
}
