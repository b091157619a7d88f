//! Sphere enumeration over the voxel lattice.
//!
//! Collision checks for a spherical robot need every voxel near the robot's
//! center. [`sphere_around_point`] walks the cube of integer offsets that
//! bounds the sphere in voxel units, keeps the offsets inside it, and groups
//! the resulting global indices by block so a layer can fetch each block once.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use crate::index::{BlockIndex, GridIndex, VoxelIndex, block_and_voxel_index, grid_index_from_point};

/// Voxel indices grouped by the block that contains them.
pub type HierarchicalIndexMap = HashMap<BlockIndex, Vec<VoxelIndex>>;

/// Enumerates the voxels within `radius` of `center`.
///
/// Membership is decided in voxel units around the grid index containing
/// `center`: an integer offset `o` is included when `|o| <= radius / voxel_size`.
/// The center voxel is always included, even for a zero radius. A voxel
/// size that is not positive and finite yields an empty map.
///
/// Blocks are not checked for allocation here; the caller skips blocks its
/// layer does not hold.
///
/// # Example
///
/// ```
/// use cf_field::{GridIndex, sphere_around_point};
/// use nalgebra::Point3;
///
/// let map = sphere_around_point(0.1, 16, &Point3::new(0.05, 0.05, 0.05), 0.1);
/// let count: usize = map.values().map(Vec::len).sum();
/// // Center plus its six face neighbours.
/// assert_eq!(count, 7);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn sphere_around_point(
    voxel_size: f64,
    voxels_per_side: i32,
    center: &Point3<f64>,
    radius: f64,
) -> HierarchicalIndexMap {
    let mut block_voxel_list = HierarchicalIndexMap::new();
    if !(voxel_size.is_finite() && voxel_size > 0.0) {
        return block_voxel_list;
    }
    let voxels_per_side = voxels_per_side.max(1);

    let center_index = grid_index_from_point(center, 1.0 / voxel_size);
    let radius_in_voxels = radius.max(0.0) / voxel_size;
    // Bounded by the radius; the cast only saturates for absurd radii.
    let extent = radius_in_voxels.floor() as i32;

    for dz in -extent..=extent {
        for dy in -extent..=extent {
            for dx in -extent..=extent {
                let offset = Vector3::new(f64::from(dx), f64::from(dy), f64::from(dz));
                if offset.norm() > radius_in_voxels {
                    continue;
                }
                let Some(global) = center_index.checked_add(GridIndex::new(dx, dy, dz)) else {
                    continue;
                };
                let (block, voxel) = block_and_voxel_index(global, voxels_per_side);
                block_voxel_list.entry(block).or_default().push(voxel);
            }
        }
    }

    block_voxel_list
}
