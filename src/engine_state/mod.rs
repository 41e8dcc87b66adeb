//! # Engine State Module
//!
//! The core engine module that manages the state and functionality of the voxel engine.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - Handles camera orientation and input intake
//! * `physics` - Player collision, gravity and block ray casting
//! * `rendering` - Chunk meshing and the renderer seam
//! * `voxels` - Handles voxel data, chunks, world generation and fluids
//!
//! ## Architecture
//!
//! `EngineState` owns one `World` and passes it by reference to every consumer
//! (mesher, physics, raycaster). Each fixed-timestep tick runs the whole update
//! synchronously in this order:
//!
//! 1. Input intake and camera rotation
//! 2. Player movement and physics
//! 3. Chunk streaming around the player, with meshes for new chunks uploaded
//! 4. Aim ray cast and block interaction
//! 5. Fluid propagation
//! 6. Dirty chunk remeshing and upload
//!
//! The renderer only ever sees finished meshes and the aim highlight.

use std::path::Path;

use camera_state::CameraState;
use cgmath::Vector3;
use log::{debug, info, warn};
use physics::{Aabb, Player, RayCast};
use rendering::{ChunkRenderer, Highlight};
use voxels::{
    block::{block_type::BlockType, Block},
    chunk::ChunkPosition,
    persistence,
    world::{World, WorldEvent},
};

use crate::{config::GameConfig, error::EngineError};

pub mod camera_state;
pub mod physics;
pub mod rendering;
pub mod voxels;

/// Block types the player can place, in hotbar order.
pub const HOTBAR: [BlockType; 6] = [
    BlockType::GRASS,
    BlockType::DIRT,
    BlockType::STONE,
    BlockType::WOOD,
    BlockType::LEAVES,
    BlockType::WATER,
];

/// The player's placeable blocks and which one is selected.
#[derive(Debug, Clone)]
pub struct Inventory {
    slots: Vec<BlockType>,
    selected: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            slots: HOTBAR.to_vec(),
            selected: 0,
        }
    }
}

impl Inventory {
    pub fn slots(&self) -> &[BlockType] {
        &self.slots
    }

    pub fn selected_slot(&self) -> usize {
        self.selected
    }

    pub fn selected_block(&self) -> BlockType {
        self.slots[self.selected]
    }

    /// Selects a hotbar slot. Out-of-range slots are ignored.
    ///
    /// # Returns
    /// Whether the selection changed.
    pub fn select(&mut self, slot: usize) -> bool {
        if slot >= self.slots.len() || slot == self.selected {
            return false;
        }
        self.selected = slot;
        true
    }
}

/// What changed in one engine tick.
#[derive(Debug, Default)]
pub struct TickReport {
    /// World events drained this tick, oldest first.
    pub events: Vec<WorldEvent>,
    /// Chunks whose meshes were rebuilt.
    pub remeshed: usize,
    /// Fluid cells processed.
    pub fluid_updates: usize,
}

/// The main state container for the voxel engine
///
/// This struct maintains the world, the player and the renderer, and
/// coordinates their interactions one fixed tick at a time.
///
/// # Examples
///
/// ```
/// use voxel_world::config::{GameConfig, GenerationMethod};
/// use voxel_world::engine_state::{EngineState, PlayerAction};
/// use voxel_world::engine_state::rendering::HeadlessRenderer;
///
/// let config = GameConfig { render_distance: 1, generation: GenerationMethod::Flat, ..Default::default() };
/// let mut engine = EngineState::new(config, HeadlessRenderer::new());
///
/// // Main game loop
/// for _ in 0..10 {
///     engine.tick(&PlayerAction::default());
/// }
/// assert!(engine.player.is_grounded());
/// ```
pub struct EngineState<R: ChunkRenderer> {
    config: GameConfig,
    /// The voxel world containing all chunk data
    pub world: World,
    /// The player's body
    pub player: Player,
    /// Camera state managing orientation and input
    pub camera_state: CameraState,
    /// Result of the last aim ray cast
    pub ray_cast: RayCast,
    /// Placeable blocks and the selected slot
    pub inventory: Inventory,
    /// Receives chunk meshes and the aim highlight
    renderer: R,
    ticks: u64,
}

impl<R: ChunkRenderer> EngineState<R> {
    /// Creates a new engine state with all subsystems initialized
    ///
    /// Generates the chunks around the configured spawn, moves the spawn onto
    /// the terrain surface, and uploads the initial meshes.
    pub fn new(config: GameConfig, renderer: R) -> Self {
        let mut world = World::new(&config);
        let mut player = Player::new(&config.player);
        world.generate_initial_world(player.position.x, player.position.z);

        let spawn = player.spawn();
        if let Some(surface) = world.surface_height(spawn.x.floor() as i32, spawn.z.floor() as i32) {
            player.set_spawn(Vector3::new(spawn.x, surface as f32 + player.height(), spawn.z));
            player.respawn();
        }

        let camera_state = CameraState::new(player.eye_position());
        let ray_cast = RayCast::new(config.max_ray_distance);

        let mut engine = Self {
            config,
            world,
            player,
            camera_state,
            ray_cast,
            inventory: Inventory::default(),
            renderer,
            ticks: 0,
        };
        engine.remesh_dirty_chunks();
        engine.world.drain_events();
        engine
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs one fixed-timestep update.
    pub fn tick(&mut self, actions: &PlayerAction) -> TickReport {
        let dt = self.config.tick_seconds();
        self.ticks += 1;

        if let Some(slot) = actions.select_slot {
            if self.inventory.select(slot) {
                debug!("Selected {:?}", self.inventory.selected_block());
            }
        }

        self.camera_state.intake_actions(actions);
        let intent = self.camera_state.update(dt);
        self.player.tick(&self.world, intent, dt);
        self.camera_state.follow(self.player.eye_position());

        self.stream_chunks();

        self.ray_cast
            .perform_ray_cast(&self.camera_state.camera, &self.world);
        let mut edited = false;
        if actions.break_block {
            edited |= self.break_target();
        }
        if actions.place_block {
            edited |= self.place_target();
        }
        if edited {
            self.ray_cast
                .perform_ray_cast(&self.camera_state.camera, &self.world);
        }
        self.renderer.set_highlight(self.highlight());

        let fluid_updates = self.world.step_fluids(self.config.fluid.updates_per_tick);
        let remeshed = self.remesh_dirty_chunks();

        TickReport {
            events: self.world.drain_events(),
            remeshed,
            fluid_updates,
        }
    }

    /// The block outline to draw, from the last ray cast.
    pub fn highlight(&self) -> Option<Highlight> {
        Some(Highlight {
            block_position: self.ray_cast.block_position()?,
            face: self.ray_cast.hit_face()?,
        })
    }

    /// Streams chunks around the player, releasing evicted meshes and uploading new ones.
    fn stream_chunks(&mut self) {
        let update = self
            .world
            .update_world_generation(self.player.position.x, self.player.position.z);
        for evicted in update.evicted {
            if let Some(handle) = evicted.render_handle {
                self.renderer.release(handle);
            }
        }
        for position in update.loaded {
            self.upload_chunk_mesh(position);
        }
    }

    /// Rebuilds every dirty chunk and re-uploads its mesh.
    fn remesh_dirty_chunks(&mut self) -> usize {
        let rebuilt = self.world.rebuild_dirty_meshes();
        for position in &rebuilt {
            self.upload_chunk_mesh(*position);
        }
        rebuilt.len()
    }

    /// Hands a chunk's current mesh to the renderer, releasing the mesh it replaces.
    ///
    /// A failed upload leaves the chunk dirty so the next rebuild pass retries it.
    fn upload_chunk_mesh(&mut self, position: ChunkPosition) {
        let Some(chunk) = self.world.get_chunk_mut(position) else {
            return;
        };
        let mut failed = false;
        let handle = match chunk.mesh() {
            Some(mesh) => match self.renderer.upload(position, mesh) {
                Ok(handle) => Some(handle),
                Err(err) => {
                    warn!("Upload of chunk ({}, {}) failed: {}", position.x, position.z, err);
                    failed = true;
                    None
                }
            },
            None => None,
        };
        if let Some(old) = chunk.replace_render_handle(handle) {
            self.renderer.release(old);
        }
        if failed {
            self.world.mark_dirty(position);
        }
    }

    /// Removes the block under the crosshair.
    fn break_target(&mut self) -> bool {
        let Some(target) = self.ray_cast.block_position() else {
            return false;
        };
        self.world.set_block(target.x, target.y, target.z, None)
    }

    /// Places the selected block against the struck face.
    ///
    /// Refused when the cell is occupied or would overlap the player.
    fn place_target(&mut self) -> bool {
        let Some(target) = self.ray_cast.placement_position() else {
            return false;
        };
        if self
            .world
            .get_block(target.x, target.y, target.z)
            .is_some_and(|b| !b.block_type().is_fluid())
        {
            return false;
        }
        let block_type = self.inventory.selected_block();
        if block_type.is_solid()
            && self
                .player
                .aabb()
                .intersects(&Aabb::block(target.x, target.y, target.z))
        {
            return false;
        }
        if block_type == BlockType::WATER {
            self.world.add_water_source(target.x, target.y, target.z)
        } else {
            self.world
                .set_block(target.x, target.y, target.z, Some(Block::new(block_type)))
        }
    }

    /// Saves every loaded chunk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), EngineError> {
        persistence::save_world(&self.world, path)
    }

    /// Restores chunks from a save, replacing the loaded ones and re-uploading meshes.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), EngineError> {
        let chunks = persistence::load_world(path)?;
        for handle in self.world.restore_chunks(chunks) {
            self.renderer.release(handle);
        }
        let remeshed = self.remesh_dirty_chunks();
        info!("Remeshed {} chunks after load", remeshed);
        Ok(())
    }
}

/// Represents player actions for one tick
///
/// This struct contains flags for the actions a player can trigger, such as
/// movement, camera control, and block interaction.
#[derive(Debug, Default, Clone)]
pub struct PlayerAction {
    /// Movement actions - true while the key is held
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,

    /// View rotation - mouse delta, if the mouse moved
    pub rotate_view: Option<(f64, f64)>,

    /// Block interaction - only trigger on press, not hold
    pub break_block: bool,
    pub place_block: bool,
    pub select_slot: Option<usize>,
}
