use cgmath::{Point3, Vector3};

/// An axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// The unit cube occupied by the block at integer coordinates; its top face is at `y + 1`.
    pub fn block(x: i32, y: i32, z: i32) -> Self {
        let min = Vector3::new(x as f32, y as f32, z as f32);
        Self {
            min,
            max: min + Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// The box of a body whose reference point sits at the top centre.
    ///
    /// Horizontally centred on `position`, extending `height` downward from it.
    pub fn hanging_from(position: Vector3<f32>, width: f32, height: f32) -> Self {
        let half = width / 2.0;
        Self {
            min: Vector3::new(position.x - half, position.y - height, position.z - half),
            max: Vector3::new(position.x + half, position.y, position.z + half),
        }
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) / 2.0
    }

    pub fn translated(&self, offset: Vector3<f32>) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Strict intersection: boxes that only share a face do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Penetration depth along each axis. Only meaningful when the boxes intersect.
    pub fn overlap(&self, other: &Aabb) -> Vector3<f32> {
        Vector3::new(
            self.max.x.min(other.max.x) - self.min.x.max(other.min.x),
            self.max.y.min(other.max.y) - self.min.y.max(other.min.y),
            self.max.z.min(other.max.z) - self.min.z.max(other.min.z),
        )
    }

    /// Inclusive range of block cells the box touches, grown by `margin` cells on every side.
    pub fn cell_range(&self, margin: i32) -> (Point3<i32>, Point3<i32>) {
        (
            Point3::new(
                self.min.x.floor() as i32 - margin,
                self.min.y.floor() as i32 - margin,
                self.min.z.floor() as i32 - margin,
            ),
            Point3::new(
                self.max.x.floor() as i32 + margin,
                self.max.y.floor() as i32 + margin,
                self.max.z.floor() as i32 + margin,
            ),
        )
    }
}
