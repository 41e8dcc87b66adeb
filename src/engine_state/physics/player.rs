//! # Player Physics
//!
//! The player is an axis-aligned box hanging from its position point: the
//! point is the top centre of the box and the feet are `height` below it.
//!
//! Each tick runs walking input (with wall sliding), gravity or swimming, then
//! the per-tick physics pass: water forces, ground detection, collision
//! push-out along the axis of least overlap, and a final seam check beneath the
//! feet. Blocks that are unloaded read as air, so the edge of the loaded world
//! is open space.

use cgmath::{InnerSpace, Point3, Vector3};
use log::info;

use crate::{
    config::PlayerConfig,
    engine_state::voxels::{
        block::{block_type::BlockType, is_solid},
        fluid::MAX_WATER_LEVEL,
        world::World,
    },
};

use super::aabb::Aabb;

/// Largest gap between the feet and a block top that still counts as standing on it.
const GROUND_EPSILON: f32 = 0.05;
/// Tolerance of the final check directly beneath the feet.
const SEAM_EPSILON: f32 = 0.01;
/// Footprint shrink used when probing neighbouring blocks for support.
const EDGE_MARGIN: f32 = 0.05;
/// Extra distance added to downward push-outs.
const DOWNWARD_PUSH_BIAS: f32 = 0.001;
/// Gap left below a ceiling after bumping into it.
const CEILING_GAP: f32 = 0.001;
/// Below this height the player is returned to spawn.
pub const RESPAWN_DEPTH: f32 = -64.0;
/// Distance from the position point down to the eyes.
pub const EYE_OFFSET: f32 = 0.18;

/// Velocity damping per second in full-level water.
const WATER_RESISTANCE: f32 = 4.0;
/// Downward acceleration in full-level water.
const WATER_SINK_ACCELERATION: f32 = 3.0;
/// Fastest sinking speed in water.
const WATER_TERMINAL_VELOCITY: f32 = 2.0;
/// Acceleration per level of difference toward lower neighbouring water.
const WATER_CURRENT_STRENGTH: f32 = 1.5;
/// Acceleration toward each open neighbour of a water cell.
const WATER_OPENING_NUDGE: f32 = 0.5;
/// Upward speed while swimming.
const SWIM_SPEED: f32 = 3.0;
/// Walking speed multiplier in water.
const WATER_WALK_FACTOR: f32 = 0.5;

/// Walking and jumping requested for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementIntent {
    /// Horizontal direction to walk in; zero when standing still.
    pub wish_direction: Vector3<f32>,
    pub jump: bool,
}

impl Default for MovementIntent {
    fn default() -> Self {
        Self {
            wish_direction: Vector3::new(0.0, 0.0, 0.0),
            jump: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    /// Top centre of the player's box.
    pub position: Vector3<f32>,
    pub velocity: Vector3<f32>,
    grounded: bool,
    in_water: bool,
    spawn: Vector3<f32>,
    width: f32,
    height: f32,
    walk_speed: f32,
    jump_velocity: f32,
    gravity: f32,
    terminal_velocity: f32,
}

impl Player {
    pub fn new(config: &PlayerConfig) -> Self {
        let spawn = Vector3::from(config.spawn);
        Self {
            position: spawn,
            velocity: Vector3::new(0.0, 0.0, 0.0),
            grounded: false,
            in_water: false,
            spawn,
            width: config.width,
            height: config.height,
            walk_speed: config.walk_speed,
            jump_velocity: config.jump_velocity,
            gravity: config.gravity,
            terminal_velocity: config.terminal_velocity,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_in_water(&self) -> bool {
        self.in_water
    }

    pub fn spawn(&self) -> Vector3<f32> {
        self.spawn
    }

    pub fn set_spawn(&mut self, spawn: Vector3<f32>) {
        self.spawn = spawn;
    }

    pub fn respawn(&mut self) {
        self.position = self.spawn;
        self.velocity = Vector3::new(0.0, 0.0, 0.0);
        self.grounded = false;
        self.in_water = false;
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn feet_y(&self) -> f32 {
        self.position.y - self.height
    }

    pub fn eye_position(&self) -> Point3<f32> {
        Point3::new(self.position.x, self.position.y - EYE_OFFSET, self.position.z)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::hanging_from(self.position, self.width, self.height)
    }

    fn aabb_at(&self, position: Vector3<f32>) -> Aabb {
        Aabb::hanging_from(position, self.width, self.height)
    }

    /// Whether the player's box would overlap no solid block at `position`.
    pub fn is_position_valid(&self, world: &World, position: Vector3<f32>) -> bool {
        let aabb = self.aabb_at(position);
        let (min, max) = aabb.cell_range(0);
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    if is_solid(world.get_block(x, y, z)) && aabb.intersects(&Aabb::block(x, y, z)) {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Whether moving by `delta` would keep the player out of solid blocks.
    pub fn can_move(&self, world: &World, delta: Vector3<f32>) -> bool {
        self.is_position_valid(world, self.position + delta)
    }

    pub fn can_move_up(&self, world: &World, amount: f32) -> bool {
        self.can_move(world, Vector3::new(0.0, amount, 0.0))
    }

    /// Moves horizontally by `delta`, sliding along walls when the full move is blocked.
    ///
    /// # Returns
    /// Whether the player moved at all.
    pub fn try_move(&mut self, world: &World, delta: Vector3<f32>) -> bool {
        if self.can_move(world, delta) {
            self.position += delta;
            return true;
        }
        let mut moved = false;
        for axis_delta in [Vector3::new(delta.x, 0.0, 0.0), Vector3::new(0.0, 0.0, delta.z)] {
            if axis_delta.magnitude2() > 0.0 && self.can_move(world, axis_delta) {
                self.position += axis_delta;
                moved = true;
            }
        }
        moved
    }

    /// Applies vertical velocity, stopping on floors and ceilings.
    fn move_vertically(&mut self, world: &World, dy: f32) {
        if dy == 0.0 {
            return;
        }
        if self.can_move(world, Vector3::new(0.0, dy, 0.0)) {
            self.position.y += dy;
            return;
        }
        if dy < 0.0 {
            let feet = self.feet_y() + dy;
            self.position.y = feet.floor() + 1.0 + self.height;
            self.grounded = true;
        } else {
            self.position.y = (self.position.y + dy).floor() - CEILING_GAP;
        }
        self.velocity.y = 0.0;
    }

    /// Runs one full tick: input, gravity, physics, respawn.
    pub fn tick(&mut self, world: &World, intent: MovementIntent, dt: f32) {
        let mut wish = Vector3::new(intent.wish_direction.x, 0.0, intent.wish_direction.z);
        if wish.magnitude2() > 0.0 {
            wish = wish.normalize();
            let speed = if self.in_water {
                self.walk_speed * WATER_WALK_FACTOR
            } else {
                self.walk_speed
            };
            self.try_move(world, wish * speed * dt);
        }

        if self.in_water {
            if intent.jump {
                self.velocity.y = SWIM_SPEED;
            }
        } else {
            if intent.jump && self.grounded {
                self.velocity.y = self.jump_velocity;
                self.grounded = false;
            }
            if !self.grounded || self.velocity.y > 0.0 {
                self.velocity.y = (self.velocity.y - self.gravity * dt).max(-self.terminal_velocity);
                let dy = self.velocity.y * dt;
                self.move_vertically(world, dy);
            }
        }

        self.update(world, dt);

        if self.grounded && self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        }
        if self.position.y < RESPAWN_DEPTH {
            info!("Player fell out of the world, respawning");
            self.respawn();
        }
    }

    /// The physics pass: water forces, ground detection, collision resolution, seam check.
    pub fn update(&mut self, world: &World, dt: f32) {
        let cell = Point3::new(
            self.position.x.floor() as i32,
            self.position.y.floor() as i32,
            self.position.z.floor() as i32,
        );
        self.in_water = world.block_type_at(cell.x, cell.y, cell.z) == BlockType::WATER;
        if self.in_water {
            self.apply_water_physics(world, cell, dt);
        }

        self.grounded = false;
        self.detect_ground(world);
        self.resolve_collisions(world);
        if !self.grounded {
            self.check_seam_below(world);
        }
    }

    /// Damping, sinking and current inside water, integrated into position.
    fn apply_water_physics(&mut self, world: &World, cell: Point3<i32>, dt: f32) {
        let intensity = f32::from(world.water_level(cell.x, cell.y, cell.z)) / f32::from(MAX_WATER_LEVEL);

        self.velocity *= (1.0 - WATER_RESISTANCE * intensity * dt).max(0.0);
        self.velocity.y = (self.velocity.y - WATER_SINK_ACCELERATION * intensity * dt)
            .max(-WATER_TERMINAL_VELOCITY);

        let current = water_current(world, cell);
        self.velocity.x += current.x * dt;
        self.velocity.z += current.z * dt;

        let delta = self.velocity * dt;
        self.try_move(world, Vector3::new(delta.x, 0.0, delta.z));
        self.move_vertically(world, delta.y);
    }

    fn snap_feet_to(&mut self, top: f32) {
        self.position.y = top + self.height;
        self.grounded = true;
    }

    /// Snaps onto a block top just beneath the feet, or onto an edge the footprint overlaps.
    fn detect_ground(&mut self, world: &World) {
        if self.velocity.y > 0.0 {
            return;
        }
        let feet = self.feet_y();
        let bx = self.position.x.floor() as i32;
        let by = (feet - GROUND_EPSILON).floor() as i32;
        let bz = self.position.z.floor() as i32;
        let top = (by + 1) as f32;
        if (feet - top).abs() >= GROUND_EPSILON {
            return;
        }

        if is_solid(world.get_block(bx, by, bz)) {
            self.snap_feet_to(top);
            return;
        }

        let half = self.width / 2.0 - EDGE_MARGIN;
        let (min_x, max_x) = (self.position.x - half, self.position.x + half);
        let (min_z, max_z) = (self.position.z - half, self.position.z + half);
        for dz in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dz == 0 {
                    continue;
                }
                let (nx, nz) = (bx + dx, bz + dz);
                let overlaps = min_x < (nx + 1) as f32
                    && max_x > nx as f32
                    && min_z < (nz + 1) as f32
                    && max_z > nz as f32;
                if overlaps && is_solid(world.get_block(nx, by, nz)) {
                    self.snap_feet_to(top);
                    return;
                }
            }
        }
    }

    /// Pushes the player out of every solid block it overlaps.
    ///
    /// # Returns
    /// The total displacement applied.
    pub fn resolve_collisions(&mut self, world: &World) -> Vector3<f32> {
        let start = self.position;
        let (min, max) = self.aabb().cell_range(1);
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    if !is_solid(world.get_block(x, y, z)) {
                        continue;
                    }
                    let block = Aabb::block(x, y, z);
                    let aabb = self.aabb();
                    if !aabb.intersects(&block) {
                        continue;
                    }

                    let overlap = aabb.overlap(&block);
                    let overlap = [overlap.x, overlap.y, overlap.z];
                    let mut axis = 0;
                    if overlap[1] < overlap[axis] {
                        axis = 1;
                    }
                    if overlap[2] < overlap[axis] {
                        axis = 2;
                    }

                    let sign = if aabb.center()[axis] >= block.center()[axis] { 1.0 } else { -1.0 };
                    let mut push = overlap[axis] * sign;
                    if axis == 1 && sign < 0.0 {
                        push -= DOWNWARD_PUSH_BIAS;
                    }
                    self.position[axis] += push;
                    self.velocity[axis] = 0.0;
                    if axis == 1 && sign > 0.0 {
                        self.grounded = true;
                    }
                }
            }
        }
        self.position - start
    }

    /// Catches the feet sitting exactly on a block seam that the other checks missed.
    fn check_seam_below(&mut self, world: &World) {
        if self.velocity.y > 0.0 {
            return;
        }
        let feet = self.feet_y();
        let by = (feet - SEAM_EPSILON).floor() as i32;
        let top = (by + 1) as f32;
        let below = world.get_block(self.position.x.floor() as i32, by, self.position.z.floor() as i32);
        if is_solid(below) && (feet - top).abs() <= SEAM_EPSILON {
            self.snap_feet_to(top);
        }
    }
}

/// Lateral push on a body in the water cell: toward lower neighbouring water and out of openings.
pub fn water_current(world: &World, cell: Point3<i32>) -> Vector3<f32> {
    let here = i32::from(world.water_level(cell.x, cell.y, cell.z));
    let mut current = Vector3::new(0.0, 0.0, 0.0);
    for (dx, dz) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
        let (nx, nz) = (cell.x + dx, cell.z + dz);
        let direction = Vector3::new(dx as f32, 0.0, dz as f32);
        match world.block_type_at(nx, cell.y, nz) {
            BlockType::WATER => {
                let drop = here - i32::from(world.water_level(nx, cell.y, nz));
                if drop > 0 {
                    current += direction * drop as f32 * WATER_CURRENT_STRENGTH;
                }
            }
            block_type if !block_type.is_solid() => current += direction * WATER_OPENING_NUDGE,
            _ => {}
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{GameConfig, GenerationMethod},
        engine_state::voxels::block::Block,
    };

    fn world_with(blocks: &[(i32, i32, i32, BlockType)]) -> World {
        let mut world = World::new(&GameConfig {
            render_distance: 1,
            generation: GenerationMethod::Empty,
            ..Default::default()
        });
        world.generate_initial_world(0.0, 0.0);
        for &(x, y, z, block_type) in blocks {
            world.set_block(x, y, z, Some(Block::new(block_type)));
        }
        world
    }

    fn player_at(x: f32, y: f32, z: f32) -> Player {
        let mut player = Player::new(&PlayerConfig::default());
        player.position = Vector3::new(x, y, z);
        player
    }

    fn floor(y: i32) -> Vec<(i32, i32, i32, BlockType)> {
        let mut blocks = Vec::new();
        for x in -4..=4 {
            for z in -4..=4 {
                blocks.push((x, y, z, BlockType::STONE));
            }
        }
        blocks
    }

    #[test]
    fn collision_pushes_up_along_y_only() {
        let world = world_with(&[(0, 10, 0, BlockType::STONE)]);
        let mut player = player_at(0.5, 10.9 + 1.8, 0.5);
        let displacement = player.resolve_collisions(&world);
        assert!((displacement.y - 0.1).abs() < 1e-4);
        assert_eq!(displacement.x, 0.0);
        assert_eq!(displacement.z, 0.0);
        assert!(player.is_grounded());
        assert!((player.feet_y() - 11.0).abs() < 1e-4);
    }

    #[test]
    fn standing_on_a_block_is_grounded_without_moving() {
        let world = world_with(&floor(10));
        let mut player = player_at(0.5, 11.0 + 1.8, 0.5);
        let before = player.position;
        player.update(&world, 1.0 / 60.0);
        assert!(player.is_grounded());
        assert!((player.position - before).magnitude() < 1e-4);
    }

    #[test]
    fn edge_support_counts_as_ground() {
        let world = world_with(&[(1, 10, 0, BlockType::STONE)]);
        // Footprint [0.5, 1.1] hangs over the block at x = 1.
        let mut player = player_at(0.8, 11.02 + 1.8, 0.5);
        player.update(&world, 1.0 / 60.0);
        assert!(player.is_grounded());
        assert!((player.feet_y() - 11.0).abs() < 1e-4);
    }

    #[test]
    fn falling_player_lands_on_floor() {
        let world = world_with(&floor(10));
        let mut player = player_at(0.5, 20.0, 0.5);
        for _ in 0..240 {
            player.tick(&world, MovementIntent::default(), 1.0 / 60.0);
        }
        assert!(player.is_grounded());
        assert!((player.feet_y() - 11.0).abs() < 1e-3);
        assert_eq!(player.velocity.y, 0.0);
    }

    #[test]
    fn walls_block_movement_and_allow_sliding() {
        let mut blocks = floor(10);
        for y in 11..=13 {
            for z in -4..=4 {
                blocks.push((2, y, z, BlockType::STONE));
            }
        }
        let world = world_with(&blocks);
        let mut player = player_at(1.5, 11.0 + 1.8, 0.5);
        assert!(!player.can_move(&world, Vector3::new(0.5, 0.0, 0.0)));
        assert!(player.try_move(&world, Vector3::new(0.5, 0.0, 0.5)));
        assert!((player.position.x - 1.5).abs() < 1e-6);
        assert!((player.position.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ceiling_blocks_upward_movement() {
        let mut blocks = floor(10);
        blocks.push((0, 13, 0, BlockType::STONE));
        let world = world_with(&blocks);
        let player = player_at(0.5, 11.0 + 1.8, 0.5);
        assert!(player.can_move_up(&world, 0.1));
        assert!(!player.can_move_up(&world, 0.3));
        assert!(player.is_position_valid(&world, player.position));
    }

    #[test]
    fn jump_leaves_the_ground() {
        let world = world_with(&floor(10));
        let mut player = player_at(0.5, 11.0 + 1.8, 0.5);
        player.update(&world, 1.0 / 60.0);
        let intent = MovementIntent {
            jump: true,
            ..Default::default()
        };
        player.tick(&world, intent, 1.0 / 60.0);
        assert!(player.feet_y() > 11.0);
        assert!(!player.is_grounded());
    }

    #[test]
    fn falling_out_of_the_world_respawns() {
        let world = world_with(&[]);
        let mut player = player_at(0.5, RESPAWN_DEPTH + 0.1, 0.5);
        player.velocity.y = -40.0;
        player.tick(&world, MovementIntent::default(), 1.0 / 60.0);
        assert_eq!(player.position, player.spawn());
    }

    #[test]
    fn water_slows_and_reports_immersion() {
        let mut blocks = floor(10);
        for y in 11..=14 {
            blocks.push((0, y, 0, BlockType::WATER));
        }
        let world = world_with(&blocks);
        let mut player = player_at(0.5, 13.5, 0.5);
        player.velocity = Vector3::new(0.0, -10.0, 0.0);
        player.update(&world, 1.0 / 60.0);
        assert!(player.is_in_water());
        assert!(player.velocity.y >= -WATER_TERMINAL_VELOCITY);
    }

    #[test]
    fn current_flows_toward_lower_water_and_openings() {
        let mut world = world_with(&floor(10));
        world.set_block(0, 11, 0, Some(Block::new(BlockType::WATER)));
        world.set_block(-1, 11, 0, Some(Block::new(BlockType::STONE)));
        world.set_block(0, 11, 1, Some(Block::new(BlockType::STONE)));
        world.set_block(0, 11, -1, Some(Block::new(BlockType::STONE)));
        // Only +X is open.
        let current = water_current(&world, Point3::new(0, 11, 0));
        assert!(current.x > 0.0);
        assert_eq!(current.z, 0.0);
    }
}
