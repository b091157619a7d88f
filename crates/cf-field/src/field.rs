//! Read-only field interfaces consumed by collision checking.
//!
//! Collision checkers never touch a [`Layer`] directly. They go through one
//! of two traits, so any map that can answer these queries (a live mapping
//! backend, a submap collection, a test fixture) can stand in for the
//! in-memory layers of this crate.
//!
//! - [`SignedDistanceField`]: every known voxel stores a full Euclidean
//!   signed distance. Absence means "outside the mapped region".
//! - [`WeightedDistanceField`]: voxels store a truncated distance plus an
//!   observation weight. Absence or zero weight means "not yet seen".

use nalgebra::Point3;

use crate::index::{BlockIndex, GridIndex, VoxelIndex};
use crate::interpolate::Interpolator;
use crate::layer::Layer;
use crate::sphere::{HierarchicalIndexMap, sphere_around_point};
use crate::voxel::{EsdfVoxel, TsdfVoxel};

/// A field storing the signed distance to the nearest obstacle.
///
/// Implementations must support concurrent reads when shared across threads.
pub trait SignedDistanceField {
    /// Edge length of a voxel in world units.
    fn voxel_size(&self) -> f64;

    /// Distance at a world-space point, or `None` where the field has no data.
    fn distance_at_point(&self, point: &Point3<f64>, interpolate: bool) -> Option<f64>;

    /// Distance stored at a global voxel index, or `None` if the voxel is
    /// missing or holds no data.
    ///
    /// Must agree with a non-interpolated [`distance_at_point`] at the
    /// voxel's lattice point.
    ///
    /// [`distance_at_point`]: SignedDistanceField::distance_at_point
    fn distance_at_index(&self, index: GridIndex) -> Option<f64>;
}

/// Result of a block-local voxel lookup in a weighted field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoxelLookup {
    /// The containing block is not allocated.
    Unallocated,
    /// The block exists but the voxel index falls outside it.
    InvalidIndex,
    /// The stored voxel.
    Voxel(TsdfVoxel),
}

/// A field of truncated distances with per-voxel observation weights.
///
/// Implementations must support concurrent reads when shared across threads.
pub trait WeightedDistanceField {
    /// Edge length of a voxel in world units.
    fn voxel_size(&self) -> f64;

    /// Voxels within `radius` of `center`, grouped by block.
    fn sphere_around_point(&self, center: &Point3<f64>, radius: f64) -> HierarchicalIndexMap;

    /// Looks up a voxel by block and block-local index.
    fn lookup(&self, block: BlockIndex, voxel: VoxelIndex) -> VoxelLookup;
}

impl SignedDistanceField for Layer<EsdfVoxel> {
    fn voxel_size(&self) -> f64 {
        Layer::voxel_size(self)
    }

    fn distance_at_point(&self, point: &Point3<f64>, interpolate: bool) -> Option<f64> {
        Interpolator::new(self).distance(point, interpolate)
    }

    fn distance_at_index(&self, index: GridIndex) -> Option<f64> {
        self.voxel_by_global_index(index)
            .filter(|voxel| voxel.observed)
            .map(|voxel| f64::from(voxel.distance))
    }
}

impl WeightedDistanceField for Layer<TsdfVoxel> {
    fn voxel_size(&self) -> f64 {
        Layer::voxel_size(self)
    }

    fn sphere_around_point(&self, center: &Point3<f64>, radius: f64) -> HierarchicalIndexMap {
        sphere_around_point(Layer::voxel_size(self), self.voxels_per_side(), center, radius)
    }

    fn lookup(&self, block: BlockIndex, voxel: VoxelIndex) -> VoxelLookup {
        let Some(block) = self.block(block) else {
            return VoxelLookup::Unallocated;
        };
        block
            .voxel(voxel)
            .map_or(VoxelLookup::InvalidIndex, |v| VoxelLookup::Voxel(*v))
    }
}
