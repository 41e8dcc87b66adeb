//! # Ray Casting
//!
//! Resolves what the camera is aiming at by walking the voxel grid with a 3D
//! DDA: the ray advances one cell boundary at a time, always across the axis
//! whose next boundary is nearest, until it enters a solid block or runs past
//! the maximum distance.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::engine_state::{
    camera_state::camera::Camera,
    voxels::{block::block_side::BlockSide, world::World},
};

/// The result of the last cast plus the state needed to run the next one.
///
/// Each call to [`RayCast::perform`] overwrites the previous result.
#[derive(Debug, Clone)]
pub struct RayCast {
    max_distance: f32,
    hit: bool,
    block_position: Point3<i32>,
    hit_face: Option<BlockSide>,
    distance: f32,
}

impl RayCast {
    pub fn new(max_distance: f32) -> Self {
        Self {
            max_distance,
            hit: false,
            block_position: Point3::new(0, 0, 0),
            hit_face: None,
            distance: 0.0,
        }
    }

    pub fn has_hit(&self) -> bool {
        self.hit
    }

    /// The struck block, if the last cast hit one.
    pub fn block_position(&self) -> Option<Point3<i32>> {
        self.hit.then_some(self.block_position)
    }

    /// The face of the struck block that the ray entered through.
    pub fn hit_face(&self) -> Option<BlockSide> {
        if self.hit {
            self.hit_face
        } else {
            None
        }
    }

    /// Distance along the ray to the struck face.
    pub fn distance(&self) -> Option<f32> {
        self.hit.then_some(self.distance)
    }

    /// The empty cell in front of the struck face, where a placed block goes.
    pub fn placement_position(&self) -> Option<Point3<i32>> {
        let position = self.block_position()?;
        let [dx, dy, dz] = self.hit_face()?.offset();
        Some(Point3::new(position.x + dx, position.y + dy, position.z + dz))
    }

    /// Casts from the camera's position along its forward vector.
    pub fn perform_ray_cast(&mut self, camera: &Camera, world: &World) -> bool {
        self.perform(camera.position, camera.forward(), world)
    }

    fn record_hit(&mut self, block_position: Point3<i32>, face: BlockSide, distance: f32) -> bool {
        self.hit = true;
        self.block_position = block_position;
        self.hit_face = Some(face);
        self.distance = distance;
        true
    }

    /// Casts a ray and records the first solid block it enters.
    ///
    /// A non-finite origin misses. A start inside a solid block is an
    /// immediate hit, and otherwise a zero or non-finite direction misses.
    ///
    /// # Arguments
    /// * `origin` - Start of the ray in world space
    /// * `direction` - Direction of the ray; normalized here if it is not already
    /// * `world` - Blocks to test against; unloaded space is empty
    ///
    /// # Returns
    /// Whether a block was hit.
    pub fn perform(&mut self, origin: Point3<f32>, direction: Vector3<f32>, world: &World) -> bool {
        self.hit = false;
        self.hit_face = None;
        self.distance = 0.0;

        if !(origin.x.is_finite() && origin.y.is_finite() && origin.z.is_finite()) {
            return false;
        }
        let mut cell = [
            origin.x.floor() as i32,
            origin.y.floor() as i32,
            origin.z.floor() as i32,
        ];

        if world.get_block(cell[0], cell[1], cell[2]).is_some_and(|b| b.is_solid()) {
            // Embedded in a block: report the face looking back along the dominant axis.
            let dir = [direction.x, direction.y, direction.z].map(|d| if d.is_finite() { d } else { 0.0 });
            let axis = (0..3)
                .max_by(|a, b| dir[*a].abs().total_cmp(&dir[*b].abs()))
                .unwrap_or(2);
            let face = BlockSide::facing(axis, if dir[axis] > 0.0 { -1 } else { 1 });
            return self.record_hit(Point3::from(cell), face, 0.0);
        }

        let finite = direction.x.is_finite() && direction.y.is_finite() && direction.z.is_finite();
        if !finite || direction.magnitude2() == 0.0 {
            return false;
        }
        let direction = direction.normalize();
        let origin = [origin.x, origin.y, origin.z];
        let dir = [direction.x, direction.y, direction.z];

        let mut step = [0i32; 3];
        let mut t_delta = [f32::INFINITY; 3];
        let mut t_max = [f32::INFINITY; 3];
        for axis in 0..3 {
            step[axis] = if dir[axis] > 0.0 { 1 } else { -1 };
            if dir[axis] != 0.0 {
                t_delta[axis] = (1.0 / dir[axis]).abs();
                let boundary = if step[axis] > 0 {
                    (cell[axis] + 1) as f32
                } else {
                    cell[axis] as f32
                };
                t_max[axis] = (boundary - origin[axis]) / dir[axis];
            }
        }

        loop {
            let mut axis = 0;
            if t_max[1] < t_max[axis] {
                axis = 1;
            }
            if t_max[2] < t_max[axis] {
                axis = 2;
            }

            let distance = t_max[axis];
            if !(distance <= self.max_distance) {
                return false;
            }
            cell[axis] += step[axis];
            t_max[axis] += t_delta[axis];

            if world.get_block(cell[0], cell[1], cell[2]).is_some_and(|b| b.is_solid()) {
                let face = BlockSide::facing(axis, -step[axis]);
                return self.record_hit(Point3::from(cell), face, distance);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{GameConfig, GenerationMethod},
        engine_state::voxels::block::{block_type::BlockType, Block},
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

    #[test]
    fn hits_face_toward_the_ray() {
        let world = world_with(&[(3, 10, 0, BlockType::STONE)]);
        let mut ray = RayCast::new(6.0);
        assert!(ray.perform(Point3::new(0.5, 10.5, 0.5), Vector3::new(1.0, 0.0, 0.0), &world));
        assert_eq!(ray.block_position(), Some(Point3::new(3, 10, 0)));
        assert_eq!(ray.hit_face(), Some(BlockSide::LEFT));
        assert_eq!(ray.placement_position(), Some(Point3::new(2, 10, 0)));
        assert!((ray.distance().unwrap() - 2.5).abs() < 1e-5);
    }

    #[test]
    fn looking_down_hits_top_face() {
        let world = world_with(&[(0, 5, 0, BlockType::DIRT)]);
        let mut ray = RayCast::new(6.0);
        assert!(ray.perform(Point3::new(0.5, 8.2, 0.5), Vector3::new(0.0, -1.0, 0.0), &world));
        assert_eq!(ray.hit_face(), Some(BlockSide::TOP));
    }

    #[test]
    fn water_and_leaves_follow_solidity() {
        let world = world_with(&[(0, 10, -1, BlockType::WATER), (0, 10, -2, BlockType::LEAVES)]);
        let mut ray = RayCast::new(6.0);
        assert!(ray.perform(Point3::new(0.5, 10.5, 0.5), Vector3::new(0.0, 0.0, -1.0), &world));
        assert_eq!(ray.block_position(), Some(Point3::new(0, 10, -2)));
    }

    #[test]
    fn embedded_start_is_an_immediate_hit() {
        let world = world_with(&[(0, 10, 0, BlockType::STONE)]);
        let mut ray = RayCast::new(6.0);
        assert!(ray.perform(Point3::new(0.5, 10.5, 0.5), Vector3::new(0.0, 0.0, -1.0), &world));
        assert_eq!(ray.block_position(), Some(Point3::new(0, 10, 0)));
        assert_eq!(ray.distance(), Some(0.0));
        assert_eq!(ray.hit_face(), Some(BlockSide::BACK));
    }

    #[test]
    fn miss_clears_previous_hit() {
        let mut world = world_with(&[(0, 10, -3, BlockType::STONE)]);
        let mut ray = RayCast::new(6.0);
        let origin = Point3::new(0.5, 10.5, 0.5);
        assert!(ray.perform(origin, Vector3::new(0.0, 0.0, -1.0), &world));

        world.set_block(0, 10, -3, None);
        assert!(!ray.perform(origin, Vector3::new(0.0, 0.0, -1.0), &world));
        assert!(!ray.has_hit());
        assert_eq!(ray.block_position(), None);
        assert_eq!(ray.hit_face(), None);
    }

    #[test]
    fn embedded_start_wins_over_zero_direction() {
        let world = world_with(&[(0, 10, 0, BlockType::STONE)]);
        let mut ray = RayCast::new(6.0);
        assert!(ray.perform(Point3::new(0.5, 10.5, 0.5), Vector3::new(0.0, 0.0, 0.0), &world));
        assert_eq!(ray.block_position(), Some(Point3::new(0, 10, 0)));
        assert_eq!(ray.distance(), Some(0.0));
    }

    #[test]
    fn non_finite_direction_misses() {
        let world = world_with(&[(-5, 10, 0, BlockType::STONE)]);
        let mut ray = RayCast::new(6.0);
        let origin = Point3::new(0.5, 10.5, 0.5);
        for direction in [
            Vector3::new(f32::NAN, 0.0, 0.0),
            Vector3::new(-1.0, f32::NAN, 0.0),
            Vector3::new(f32::NEG_INFINITY, 0.0, 0.0),
        ] {
            assert!(!ray.perform(origin, direction, &world));
            assert_eq!(ray.block_position(), None);
            assert_eq!(ray.distance(), None);
        }
    }

    #[test]
    fn non_finite_origin_misses() {
        let world = world_with(&[(0, 0, 0, BlockType::STONE)]);
        let mut ray = RayCast::new(6.0);
        assert!(!ray.perform(Point3::new(f32::NAN, 0.5, 0.5), Vector3::new(0.0, 0.0, -1.0), &world));
    }

    #[test]
    fn zero_direction_never_hits() {
        let world = world_with(&[(0, 10, -1, BlockType::STONE)]);
        let mut ray = RayCast::new(6.0);
        assert!(!ray.perform(Point3::new(0.5, 10.5, 0.5), Vector3::new(0.0, 0.0, 0.0), &world));
    }
}
