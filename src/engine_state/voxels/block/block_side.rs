//! # Block Side Module
//!
//! This module defines the six faces of a voxel block as a pure data table:
//! each face has a fixed neighbour offset and an opposite face.

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a unique integer value so it can index the
/// per-face tables (neighbour offsets, texture tiles, quad corners).
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing negative Z)
    FRONT = 0,

    /// The back face (facing positive Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

/// Unit offset to the neighbouring cell across each face, indexed by `BlockSide`.
const SIDE_OFFSETS: [[i32; 3]; 6] = [
    [0, 0, -1],
    [0, 0, 1],
    [0, -1, 0],
    [0, 1, 0],
    [-1, 0, 0],
    [1, 0, 0],
];

const OPPOSITE_SIDES: [BlockSide; 6] = [
    BlockSide::BACK,
    BlockSide::FRONT,
    BlockSide::TOP,
    BlockSide::BOTTOM,
    BlockSide::RIGHT,
    BlockSide::LEFT,
];

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The `(dx, dy, dz)` step from a block to the neighbour this face touches.
    pub fn offset(self) -> [i32; 3] {
        SIDE_OFFSETS[self as usize]
    }

    /// The face pointing the other way along the same axis.
    pub fn opposite(self) -> BlockSide {
        OPPOSITE_SIDES[self as usize]
    }

    /// The face whose outward normal points along `axis` (0 = X, 1 = Y, 2 = Z)
    /// in the direction of `sign`.
    pub fn facing(axis: usize, sign: i32) -> BlockSide {
        match (axis, sign >= 0) {
            (0, true) => BlockSide::RIGHT,
            (0, false) => BlockSide::LEFT,
            (1, true) => BlockSide::TOP,
            (1, false) => BlockSide::BOTTOM,
            (_, true) => BlockSide::BACK,
            (_, false) => BlockSide::FRONT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_faces_cancel_offsets() {
        for side in BlockSide::all() {
            let a = side.offset();
            let b = side.opposite().offset();
            assert_eq!([a[0] + b[0], a[1] + b[1], a[2] + b[2]], [0, 0, 0]);
            assert_eq!(side.opposite().opposite(), side);
        }
    }

    #[test]
    fn facing_matches_offsets() {
        for side in BlockSide::all() {
            let offset = side.offset();
            let axis = offset.iter().position(|v| *v != 0).unwrap();
            assert_eq!(BlockSide::facing(axis, offset[axis]), side);
        }
    }
}
