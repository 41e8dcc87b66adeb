//! # Fluid Engine
//!
//! Water is simulated as a cellular automaton over the block grid. Each water
//! cell carries a level in `1..=MAX_WATER_LEVEL`, a proxy for head pressure,
//! stored sparsely: a water block with no entry is at full level.
//!
//! Cells waiting to propagate sit in a queue owned by the world. Each processed
//! cell spawns new water according to these priorities:
//!
//! 1. Fall into an empty cell directly below, one level lower.
//! 2. Stop once the level is exhausted (1 or less).
//! 3. Drop into a neighbouring hole (empty cell over an empty cell), one level lower.
//! 4. Spread into up to two empty neighbours, three levels lower.
//!
//! A spawned cell is always strictly lower than the cell that spawned it, so
//! propagation terminates. A column falling through open space ends at a
//! level-1 cell, which stays where it is even with empty space below it.
//! Water levels are scoped to their chunk and are dropped when it is evicted.

use std::collections::{HashMap, VecDeque};

use cgmath::Point3;
use log::trace;

use super::{
    block::{block_type::BlockType, Block},
    chunk::{ChunkPosition, CHUNK_HEIGHT},
    world::World,
};

/// Level of a source block, and of any water block without a recorded level.
pub const MAX_WATER_LEVEL: u8 = 8;

/// Level lost when water flows down or over a drop.
const FALL_LEVEL_LOSS: u8 = 1;
/// Level lost when water spreads sideways.
const SPREAD_LEVEL_LOSS: u8 = 3;
/// Most neighbours a cell spreads into per update.
const MAX_LATERAL_SPREAD: usize = 2;

const HORIZONTAL_NEIGHBORS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Water levels and pending fluid updates of one world.
#[derive(Debug, Default)]
pub struct FluidState {
    levels: HashMap<Point3<i32>, u8>,
    queue: VecDeque<Point3<i32>>,
    max_water_blocks: usize,
}

impl FluidState {
    pub fn new(max_water_blocks: usize) -> Self {
        FluidState {
            levels: HashMap::new(),
            queue: VecDeque::new(),
            max_water_blocks,
        }
    }

    pub(crate) fn enqueue(&mut self, position: Point3<i32>) {
        self.queue.push_back(position);
    }

    pub(crate) fn clear_level(&mut self, position: Point3<i32>) {
        self.levels.remove(&position);
    }

    /// Drops every level and queued cell belonging to an evicted chunk.
    pub(crate) fn forget_chunk(&mut self, chunk: ChunkPosition) {
        let outside = |p: &Point3<i32>| ChunkPosition::from_block(p.x, p.z) != chunk;
        self.levels.retain(|p, _| outside(p));
        self.queue.retain(outside);
    }

    /// Number of cells waiting to be processed.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of water cells with a recorded level.
    pub fn tracked(&self) -> usize {
        self.levels.len()
    }

    fn at_capacity(&self) -> bool {
        self.levels.len() >= self.max_water_blocks
    }
}

impl World {
    /// The water level at a position, [`MAX_WATER_LEVEL`] when untracked.
    pub fn water_level(&self, x: i32, y: i32, z: i32) -> u8 {
        self.fluids
            .levels
            .get(&Point3::new(x, y, z))
            .copied()
            .unwrap_or(MAX_WATER_LEVEL)
    }

    pub fn fluids(&self) -> &FluidState {
        &self.fluids
    }

    /// Places a full-level water source and queues it.
    ///
    /// # Returns
    /// Whether the owning chunk was loaded.
    pub fn add_water_source(&mut self, x: i32, y: i32, z: i32) -> bool {
        self.fluids.clear_level(Point3::new(x, y, z));
        self.set_block(x, y, z, Some(Block::new(BlockType::WATER)))
    }

    /// Queues the water cells around a newly opened cell so they can flow into it.
    pub(crate) fn wake_fluids_around(&mut self, position: Point3<i32>) {
        let above = Point3::new(position.x, position.y + 1, position.z);
        let candidates = std::iter::once(above).chain(
            HORIZONTAL_NEIGHBORS
                .iter()
                .map(|(dx, dz)| Point3::new(position.x + dx, position.y, position.z + dz)),
        );
        for p in candidates {
            if self.block_type_at(p.x, p.y, p.z) == BlockType::WATER {
                self.fluids.enqueue(p);
            }
        }
    }

    /// Whether a cell can receive water: loaded, inside the world, and empty.
    fn is_open(&self, x: i32, y: i32, z: i32) -> bool {
        (0..CHUNK_HEIGHT).contains(&y) && self.is_loaded(x, z) && self.get_block(x, y, z).is_none()
    }

    /// Writes a water block with an explicit level. The write queues the cell.
    fn spawn_water(&mut self, position: Point3<i32>, level: u8) {
        let level = level.max(1);
        self.fluids.levels.insert(position, level);
        if !self.set_block(position.x, position.y, position.z, Some(Block::new(BlockType::WATER))) {
            self.fluids.levels.remove(&position);
            return;
        }
        trace!(
            "Water spawned at ({}, {}, {}) level {}",
            position.x,
            position.y,
            position.z,
            level
        );
    }

    /// Runs one propagation step for the water cell at a position.
    ///
    /// Non-water cells are ignored.
    pub fn process_fluid_block(&mut self, x: i32, y: i32, z: i32) {
        if self.block_type_at(x, y, z) != BlockType::WATER {
            return;
        }
        let level = self.water_level(x, y, z);
        if level >= MAX_WATER_LEVEL && self.fluids.at_capacity() {
            return;
        }

        if self.is_open(x, y - 1, z) {
            if level > 1 {
                self.spawn_water(Point3::new(x, y - 1, z), level - FALL_LEVEL_LOSS);
            }
            return;
        }

        if level <= 1 {
            return;
        }

        for (dx, dz) in HORIZONTAL_NEIGHBORS {
            let (nx, nz) = (x + dx, z + dz);
            if self.is_open(nx, y, nz) && self.is_open(nx, y - 1, nz) {
                self.spawn_water(Point3::new(nx, y, nz), level.saturating_sub(FALL_LEVEL_LOSS));
                return;
            }
        }

        let mut spread = 0;
        for (dx, dz) in HORIZONTAL_NEIGHBORS {
            if spread == MAX_LATERAL_SPREAD {
                break;
            }
            let (nx, nz) = (x + dx, z + dz);
            if self.is_open(nx, y, nz) {
                self.spawn_water(Point3::new(nx, y, nz), level.saturating_sub(SPREAD_LEVEL_LOSS));
                spread += 1;
            }
        }
    }

    /// Processes up to `budget` queued fluid cells, oldest first.
    ///
    /// # Returns
    /// Number of cells processed.
    pub fn step_fluids(&mut self, budget: usize) -> usize {
        let mut processed = 0;
        while processed < budget {
            let Some(position) = self.fluids.queue.pop_front() else {
                break;
            };
            self.process_fluid_block(position.x, position.y, position.z);
            processed += 1;
        }
        processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, GenerationMethod};

    fn empty_world() -> World {
        let mut world = World::new(&GameConfig {
            render_distance: 1,
            generation: GenerationMethod::Empty,
            ..Default::default()
        });
        world.generate_initial_world(0.0, 0.0);
        world
    }

    fn floor(world: &mut World, y: i32) {
        for x in -3..=3 {
            for z in -3..=3 {
                world.set_block(x, y, z, Some(Block::new(BlockType::STONE)));
            }
        }
    }

    #[test]
    fn untracked_water_is_full_level() {
        let world = empty_world();
        assert_eq!(world.water_level(1, 2, 3), MAX_WATER_LEVEL);
    }

    #[test]
    fn water_falls_before_spreading() {
        let mut world = empty_world();
        floor(&mut world, 10);
        world.add_water_source(0, 20, 0);
        world.step_fluids(1);

        assert_eq!(world.block_type_at(0, 19, 0), BlockType::WATER);
        assert_eq!(world.water_level(0, 19, 0), MAX_WATER_LEVEL - 1);
        for (dx, dz) in HORIZONTAL_NEIGHBORS {
            assert_eq!(world.block_type_at(dx, 20, dz), BlockType::AIR);
        }
    }

    #[test]
    fn water_spreads_into_two_neighbors_on_a_floor() {
        let mut world = empty_world();
        floor(&mut world, 10);
        world.add_water_source(0, 11, 0);
        world.step_fluids(1);

        let spread: Vec<_> = HORIZONTAL_NEIGHBORS
            .iter()
            .filter(|(dx, dz)| world.block_type_at(*dx, 11, *dz) == BlockType::WATER)
            .collect();
        assert_eq!(spread.len(), 2);
        for (dx, dz) in spread {
            assert_eq!(world.water_level(*dx, 11, *dz), MAX_WATER_LEVEL - SPREAD_LEVEL_LOSS);
        }
    }

    #[test]
    fn water_prefers_a_drop_hole() {
        let mut world = empty_world();
        floor(&mut world, 10);
        world.set_block(0, 10, -1, None);
        world.add_water_source(0, 11, 0);
        world.step_fluids(1);

        assert_eq!(world.block_type_at(0, 11, -1), BlockType::WATER);
        assert_eq!(world.water_level(0, 11, -1), MAX_WATER_LEVEL - 1);
        assert_eq!(world.block_type_at(1, 11, 0), BlockType::AIR);
    }

    #[test]
    fn exhausted_water_stops() {
        let mut world = empty_world();
        floor(&mut world, 10);
        world.add_water_source(0, 11, 0);
        world.fluids.levels.insert(Point3::new(0, 11, 0), 1);
        world.step_fluids(8);
        assert_eq!(world.block_type_at(1, 11, 0), BlockType::AIR);
        assert_eq!(world.fluids().pending(), 0);
    }

    #[test]
    fn full_level_spawns_throttled_at_capacity() {
        let mut world = World::new(&GameConfig {
            render_distance: 0,
            generation: GenerationMethod::Empty,
            fluid: crate::config::FluidConfig {
                max_water_blocks: 0,
                updates_per_tick: 64,
            },
            ..Default::default()
        });
        world.generate_initial_world(0.0, 0.0);
        world.add_water_source(4, 30, 4);
        world.step_fluids(4);
        assert_eq!(world.block_type_at(4, 29, 4), BlockType::AIR);
    }

    #[test]
    fn partial_level_water_flows_at_capacity() {
        let mut world = World::new(&GameConfig {
            render_distance: 0,
            generation: GenerationMethod::Empty,
            fluid: crate::config::FluidConfig {
                max_water_blocks: 0,
                updates_per_tick: 64,
            },
            ..Default::default()
        });
        world.generate_initial_world(0.0, 0.0);
        for x in 0..16 {
            for z in 0..16 {
                world.set_block(x, 10, z, Some(Block::new(BlockType::STONE)));
            }
        }
        world.add_water_source(4, 11, 4);
        world.fluids.levels.insert(Point3::new(4, 11, 4), 4);
        world.step_fluids(1);

        assert_eq!(world.block_type_at(5, 11, 4), BlockType::WATER);
        assert_eq!(world.block_type_at(3, 11, 4), BlockType::WATER);
        assert_eq!(world.water_level(5, 11, 4), 1);
        assert_eq!(world.block_type_at(4, 11, 5), BlockType::AIR);
    }

    #[test]
    fn removed_water_forgets_level() {
        let mut world = empty_world();
        floor(&mut world, 10);
        world.add_water_source(0, 11, 0);
        world.step_fluids(1);
        let (dx, dz) = HORIZONTAL_NEIGHBORS
            .into_iter()
            .find(|(dx, dz)| world.block_type_at(*dx, 11, *dz) == BlockType::WATER)
            .unwrap();
        world.set_block(dx, 11, dz, None);
        assert_eq!(world.water_level(dx, 11, dz), MAX_WATER_LEVEL);
    }

    #[test]
    fn opening_a_cell_wakes_adjacent_water() {
        let mut world = empty_world();
        floor(&mut world, 10);
        world.add_water_source(0, 11, 0);
        world.fluids.levels.insert(Point3::new(0, 11, 0), 1);
        world.step_fluids(8);
        assert_eq!(world.fluids().pending(), 0);

        world.set_block(0, 10, 0, None);
        assert_eq!(world.fluids().pending(), 1);
    }

    #[test]
    fn evicted_chunk_levels_are_discarded() {
        let mut world = empty_world();
        world.fluids.levels.insert(Point3::new(20, 5, 3), 4);
        world.fluids.levels.insert(Point3::new(2, 5, 3), 4);
        world.remove_chunk(ChunkPosition::new(1, 0));
        assert_eq!(world.fluids().tracked(), 1);
        assert_eq!(world.water_level(2, 5, 3), 4);
    }
}
