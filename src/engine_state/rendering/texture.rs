//! Texture atlas layout.
//!
//! Block faces are textured from a single square atlas of equally sized tiles.
//! The tile for each (block type, side) pair comes from
//! [`BLOCK_TYPE_TO_TEXTURE_INDICES`](crate::engine_state::voxels::block::BLOCK_TYPE_TO_TEXTURE_INDICES);
//! this module turns a tile index into normalized UV coordinates.

use log::warn;

/// Number of tiles along each edge of the atlas image.
pub const ATLAS_TILES_PER_ROW: u16 = 4;

/// Normalized UV rectangle of one atlas tile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileUv {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

/// Computes the UV rectangle of an atlas tile.
///
/// Tiles are numbered row by row from the top-left corner. An index past the
/// end of the atlas falls back to tile 0 with a warning.
pub fn tile_uv(tile: u16) -> TileUv {
    let tile = if tile >= ATLAS_TILES_PER_ROW * ATLAS_TILES_PER_ROW {
        warn!("Atlas tile {} out of range, using placeholder tile", tile);
        0
    } else {
        tile
    };
    let size = 1.0 / ATLAS_TILES_PER_ROW as f32;
    let column = (tile % ATLAS_TILES_PER_ROW) as f32;
    let row = (tile / ATLAS_TILES_PER_ROW) as f32;
    TileUv {
        u0: column * size,
        v0: row * size,
        u1: (column + 1.0) * size,
        v1: (row + 1.0) * size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_are_laid_out_row_major() {
        let uv = tile_uv(5);
        assert_eq!(uv, TileUv { u0: 0.25, v0: 0.25, u1: 0.5, v1: 0.5 });
    }

    #[test]
    fn out_of_range_tile_uses_placeholder() {
        assert_eq!(tile_uv(999), tile_uv(0));
    }
}
