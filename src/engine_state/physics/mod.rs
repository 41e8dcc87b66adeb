//! # Physics
//!
//! Everything that moves through or aims into the voxel grid:
//!
//! * `aabb` - Axis-aligned boxes for bodies and blocks
//! * `raycast` - DDA traversal resolving the block under the crosshair
//! * `player` - The player's box, gravity, water and collision response
//!
//! All queries go through [`World::get_block`](super::voxels::world::World::get_block),
//! so unloaded chunks behave as empty space.

pub mod aabb;
pub mod player;
pub mod raycast;

pub use aabb::Aabb;
pub use player::{MovementIntent, Player};
pub use raycast::RayCast;
