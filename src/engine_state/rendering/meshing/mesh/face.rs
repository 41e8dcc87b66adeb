use cgmath::Point3;

use crate::engine_state::voxels::block::{block_side::BlockSide, Block};

/// Unit-cube corner offsets for each side, in `[ll, lr, ul, ur]` order.
///
/// Corners are laid out so that `ll -> lr -> ur` and `ll -> ur -> ul` wind
/// counter-clockwise when the face is seen from outside the block.
const SIDE_CORNERS: [[[i32; 3]; 4]; 6] = [
    // FRONT (-Z)
    [[1, 0, 0], [0, 0, 0], [1, 1, 0], [0, 1, 0]],
    // BACK (+Z)
    [[0, 0, 1], [1, 0, 1], [0, 1, 1], [1, 1, 1]],
    // BOTTOM (-Y)
    [[0, 0, 0], [1, 0, 0], [0, 0, 1], [1, 0, 1]],
    // TOP (+Y)
    [[0, 1, 1], [1, 1, 1], [0, 1, 0], [1, 1, 0]],
    // LEFT (-X)
    [[0, 0, 0], [0, 0, 1], [0, 1, 0], [0, 1, 1]],
    // RIGHT (+X)
    [[1, 0, 1], [1, 0, 0], [1, 1, 1], [1, 1, 0]],
];

/// Represents a single quad face of a voxel in the mesh.
///
/// A face is defined by four corner points (lower-left, lower-right, upper-left,
/// upper-right) in global block coordinates, plus the block and side it came
/// from for texture lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner of the face
    pub ll: Point3<i32>,
    /// Lower-right corner of the face
    pub lr: Point3<i32>,
    /// Upper-left corner of the face
    pub ul: Point3<i32>,
    /// Upper-right corner of the face
    pub ur: Point3<i32>,
    /// The block this face belongs to, used for texture mapping
    pub block: Block,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face on `block_side` of the block at global coordinates `(i, j, k)`.
    pub fn new(i: i32, j: i32, k: i32, block: Block, block_side: BlockSide) -> Self {
        let corners = SIDE_CORNERS[block_side as usize];
        let corner = |c: [i32; 3]| Point3::new(i + c[0], j + c[1], k + c[2]);
        Face {
            ll: corner(corners[0]),
            lr: corner(corners[1]),
            ul: corner(corners[2]),
            ur: corner(corners[3]),
            block,
            block_side,
        }
    }

    /// Corners in vertex emission order.
    pub fn corners(&self) -> [Point3<i32>; 4] {
        [self.ll, self.lr, self.ul, self.ur]
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Vector3};

    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn to_vec(p: Point3<i32>) -> Vector3<f32> {
        Vector3::new(p.x as f32, p.y as f32, p.z as f32)
    }

    #[test]
    fn winding_faces_outward() {
        for side in BlockSide::all() {
            let face = Face::new(0, 0, 0, Block::new(BlockType::STONE), side);
            let [ll, lr, ul, ur] = face.corners().map(to_vec);
            let offset = side.offset();
            let normal = Vector3::new(offset[0] as f32, offset[1] as f32, offset[2] as f32);

            let first = (lr - ll).cross(ur - ll);
            let second = (ur - ll).cross(ul - ll);
            assert!(first.dot(normal) > 0.0, "{side:?} first triangle");
            assert!(second.dot(normal) > 0.0, "{side:?} second triangle");
        }
    }

    #[test]
    fn faces_lie_on_the_touching_plane() {
        for side in BlockSide::all() {
            let face = Face::new(4, 5, 6, Block::new(BlockType::DIRT), side);
            let offset = side.offset();
            let axis = offset.iter().position(|v| *v != 0).unwrap();
            let base = [4, 5, 6][axis];
            let plane = if offset[axis] > 0 { base + 1 } else { base };
            for corner in face.corners() {
                assert_eq!([corner.x, corner.y, corner.z][axis], plane);
            }
        }
    }
}
