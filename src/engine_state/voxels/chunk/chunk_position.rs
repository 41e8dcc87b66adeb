//! # Chunk Position Module
//!
//! Chunk coordinates and the mapping between global block coordinates and
//! (chunk, local) pairs. The vertical axis is never chunked: a chunk is a full
//! column of `CHUNK_HEIGHT` blocks, so only X and Z are divided.

use serde::{Deserialize, Serialize};

use super::{CHUNK_DEPTH, CHUNK_WIDTH};

/// The position of a chunk column in chunk coordinates (not block coordinates).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkPosition {
    pub x: i32,
    pub z: i32,
}

impl ChunkPosition {
    pub fn new(x: i32, z: i32) -> Self {
        ChunkPosition { x, z }
    }

    /// The chunk owning the global block column `(x, z)`.
    pub fn from_block(x: i32, z: i32) -> Self {
        ChunkPosition {
            x: x.div_euclid(CHUNK_WIDTH),
            z: z.div_euclid(CHUNK_DEPTH),
        }
    }

    /// The chunk containing a world-space point.
    pub fn from_world(x: f32, z: f32) -> Self {
        ChunkPosition::from_block(x.floor() as i32, z.floor() as i32)
    }

    /// Global block coordinates of this chunk's local `(0, 0)` column.
    pub fn origin(&self) -> (i32, i32) {
        (self.x * CHUNK_WIDTH, self.z * CHUNK_DEPTH)
    }

    /// Square (Chebyshev) distance in chunks: the larger of |dx| and |dz|.
    pub fn chebyshev_distance(&self, other: &ChunkPosition) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// The four horizontally adjacent chunk positions.
    pub fn neighbors(&self) -> [ChunkPosition; 4] {
        [
            ChunkPosition::new(self.x + 1, self.z),
            ChunkPosition::new(self.x - 1, self.z),
            ChunkPosition::new(self.x, self.z + 1),
            ChunkPosition::new(self.x, self.z - 1),
        ]
    }

    /// Every chunk position within `radius` of this one, square region inclusive.
    pub fn square_around(self, radius: i32) -> impl Iterator<Item = ChunkPosition> {
        (-radius..=radius).flat_map(move |dx| {
            (-radius..=radius).map(move |dz| ChunkPosition::new(self.x + dx, self.z + dz))
        })
    }
}

/// Splits global block coordinates into the owning chunk and chunk-local coordinates.
///
/// Local X and Z are always in `[0, CHUNK_WIDTH)` and `[0, CHUNK_DEPTH)`; Y passes through.
pub fn to_chunk_local(x: i32, y: i32, z: i32) -> (ChunkPosition, i32, i32, i32) {
    (
        ChunkPosition::from_block(x, z),
        x.rem_euclid(CHUNK_WIDTH),
        y,
        z.rem_euclid(CHUNK_DEPTH),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_division_reassembles_coordinates() {
        for x in -70..70 {
            let (chunk, lx, _, lz) = to_chunk_local(x, 0, -x);
            assert!((0..CHUNK_WIDTH).contains(&lx));
            assert!((0..CHUNK_DEPTH).contains(&lz));
            assert_eq!(chunk.x * CHUNK_WIDTH + lx, x);
            assert_eq!(chunk.z * CHUNK_DEPTH + lz, -x);
        }
    }

    #[test]
    fn negative_coordinates_round_down() {
        assert_eq!(ChunkPosition::from_block(-1, -16), ChunkPosition::new(-1, -1));
        assert_eq!(ChunkPosition::from_block(-17, 15), ChunkPosition::new(-2, 0));
        assert_eq!(ChunkPosition::from_world(-0.5, 15.9), ChunkPosition::new(-1, 0));
    }

    #[test]
    fn square_region_size() {
        let center = ChunkPosition::new(3, -2);
        let region: Vec<_> = center.square_around(2).collect();
        assert_eq!(region.len(), 25);
        assert!(region.iter().all(|p| p.chebyshev_distance(&center) <= 2));
    }
}
