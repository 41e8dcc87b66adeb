//! # Tree Placement
//!
//! Trees are planted per chunk with an RNG seeded from the chunk position, so
//! a chunk regenerated after eviction grows the same trees. A tree never
//! crosses a chunk border: the whole shape is planned first, and if any cell
//! falls outside the chunk the tree is skipped rather than partially written.

use cgmath::Point3;

use crate::engine_state::voxels::{
    block::{block_type::BlockType, Block},
    chunk::{Chunk, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH},
};

/// Upper bound on trees planted in one chunk.
pub const MAX_TREES_PER_CHUNK: usize = 8;
/// Candidate positions tried per chunk, successful or not.
pub const MAX_TREE_ATTEMPTS: usize = 10;
/// Minimum distance of a trunk from the chunk edge.
pub const TREE_MARGIN: i32 = 3;
/// Free height required above the surface before a tree is attempted.
pub const TREE_VERTICAL_ROOM: i32 = 11;
/// Half-width of the square around a trunk base that must hold no wood.
pub const TREE_SPACING: i32 = 2;

/// The tree variants the generator chooses between.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TreeArchetype {
    /// Medium trunk, rounded canopy with ragged edges.
    Oak,
    /// Tall thin trunk, narrow dense canopy.
    Birch,
    /// Short trunk, wide sparse canopy.
    Bush,
}

/// Dimensions of one archetype.
struct TreeShape {
    trunk_min: i32,
    trunk_max: i32,
    canopy_radius: i32,
    /// Canopy layers below the top of the trunk.
    canopy_below: i32,
    /// Canopy layers above the top of the trunk.
    canopy_above: i32,
    /// Leaves farther than this (Manhattan, counting only upward layers) are not placed.
    manhattan_limit: i32,
    /// Chance of dropping a leaf on the outermost shell.
    thinning: f32,
}

/// Cells of one planned tree, in chunk-local coordinates.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreePlan {
    pub trunk: Vec<Point3<i32>>,
    pub leaves: Vec<Point3<i32>>,
}

impl TreePlan {
    /// Whether every planned cell lies inside the chunk.
    pub fn fits(&self) -> bool {
        self.trunk
            .iter()
            .chain(self.leaves.iter())
            .all(|p| Chunk::in_bounds(p.x, p.y, p.z))
    }
}

impl TreeArchetype {
    pub const ALL: [TreeArchetype; 3] = [TreeArchetype::Oak, TreeArchetype::Birch, TreeArchetype::Bush];

    pub fn choose(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(..Self::ALL.len())]
    }

    fn shape(self) -> TreeShape {
        match self {
            TreeArchetype::Oak => TreeShape {
                trunk_min: 4,
                trunk_max: 6,
                canopy_radius: 2,
                canopy_below: 2,
                canopy_above: 1,
                manhattan_limit: 3,
                thinning: 0.15,
            },
            TreeArchetype::Birch => TreeShape {
                trunk_min: 5,
                trunk_max: 7,
                canopy_radius: 1,
                canopy_below: 3,
                canopy_above: 1,
                manhattan_limit: 2,
                thinning: 0.0,
            },
            TreeArchetype::Bush => TreeShape {
                trunk_min: 3,
                trunk_max: 4,
                canopy_radius: 3,
                canopy_below: 1,
                canopy_above: 2,
                manhattan_limit: 4,
                thinning: 0.3,
            },
        }
    }

    /// Plans a tree whose trunk starts at local `base` (the first air cell above grass).
    pub fn plan(self, rng: &mut fastrand::Rng, base: Point3<i32>) -> TreePlan {
        let shape = self.shape();
        let trunk_height = rng.i32(shape.trunk_min..=shape.trunk_max);
        let top = base.y + trunk_height - 1;

        let trunk = (base.y..=top)
            .map(|y| Point3::new(base.x, y, base.z))
            .collect();

        let r = shape.canopy_radius;
        let mut leaves = Vec::new();
        for dy in -shape.canopy_below..=shape.canopy_above {
            for dz in -r..=r {
                for dx in -r..=r {
                    if dx == 0 && dz == 0 && dy <= 0 {
                        continue;
                    }
                    let distance = dx.abs() + dz.abs() + dy.max(0);
                    if distance > shape.manhattan_limit {
                        continue;
                    }
                    if distance == shape.manhattan_limit && rng.f32() < shape.thinning {
                        continue;
                    }
                    leaves.push(Point3::new(base.x + dx, top + dy, base.z + dz));
                }
            }
        }

        TreePlan { trunk, leaves }
    }
}

/// Whether any wood sits in the spacing square around a trunk base.
fn spacing_clear(chunk: &Chunk, base: Point3<i32>) -> bool {
    (-TREE_SPACING..=TREE_SPACING).all(|dz| {
        (-TREE_SPACING..=TREE_SPACING)
            .all(|dx| chunk.block_type_at(base.x + dx, base.y, base.z + dz) != BlockType::WOOD)
    })
}

/// Writes a planned tree. Trunks may replace leaves; leaves only fill air.
fn write_tree(chunk: &mut Chunk, plan: &TreePlan) {
    let wood = Some(Block::new(BlockType::WOOD));
    let leaves = Some(Block::new(BlockType::LEAVES));
    for p in &plan.trunk {
        if matches!(chunk.block_type_at(p.x, p.y, p.z), BlockType::AIR | BlockType::LEAVES) {
            chunk.set_block(p.x, p.y, p.z, wood);
        }
    }
    for p in &plan.leaves {
        if chunk.get_block(p.x, p.y, p.z).is_none() {
            chunk.set_block(p.x, p.y, p.z, leaves);
        }
    }
}

/// Plants up to [`MAX_TREES_PER_CHUNK`] trees into a chunk.
///
/// # Arguments
/// * `chunk` - A chunk already holding its base terrain
/// * `rng` - The chunk's deterministic RNG
/// * `height_at` - Surface height for a local `(x, z)` column
///
/// # Returns
/// Number of trees planted.
pub fn plant_trees(
    chunk: &mut Chunk,
    rng: &mut fastrand::Rng,
    height_at: impl Fn(i32, i32) -> i32,
) -> usize {
    let target = rng.usize(5..=9).min(MAX_TREES_PER_CHUNK);
    let mut planted = 0;

    for _ in 0..MAX_TREE_ATTEMPTS {
        if planted >= target {
            break;
        }
        let x = rng.i32(TREE_MARGIN..CHUNK_WIDTH - TREE_MARGIN);
        let z = rng.i32(TREE_MARGIN..CHUNK_DEPTH - TREE_MARGIN);
        let archetype = TreeArchetype::choose(rng);

        let height = height_at(x, z);
        if chunk.block_type_at(x, height - 1, z) != BlockType::GRASS {
            continue;
        }
        if height + TREE_VERTICAL_ROOM >= CHUNK_HEIGHT {
            continue;
        }
        let base = Point3::new(x, height, z);
        if !spacing_clear(chunk, base) {
            continue;
        }

        let plan = archetype.plan(rng, base);
        if !plan.fits() {
            continue;
        }
        write_tree(chunk, &plan);
        planted += 1;
    }

    planted
}
