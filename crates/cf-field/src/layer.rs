//! Block-sparse voxel layers.

use std::collections::HashMap;

use nalgebra::Point3;
use tracing::trace;

use crate::block::Block;
use crate::error::FieldError;
use crate::index::{
    BlockIndex, GridIndex, VoxelIndex, block_and_voxel_index, grid_index_from_point,
};

/// Largest block edge accepted by [`Layer::try_new`].
pub const MAX_VOXELS_PER_SIDE: usize = 256;

/// Voxels per block edge used by [`Layer::new`] callers that don't care.
pub const DEFAULT_VOXELS_PER_SIDE: usize = 16;

/// Voxel size [`Layer::new`] falls back to when given zero or a non-finite size.
pub const DEFAULT_VOXEL_SIZE: f64 = 0.1;

/// A sparse 3D field made of dense voxel blocks.
///
/// Only blocks that have been allocated hold data. Lookups into an
/// unallocated block return `None`, which callers interpret according to
/// their own policy (free, unknown or occupied).
///
/// # Example
///
/// ```
/// use cf_field::{EsdfVoxel, GridIndex, Layer};
/// use nalgebra::Point3;
///
/// let mut layer: Layer<EsdfVoxel> = Layer::new(0.1, 8);
/// layer.set_voxel(GridIndex::new(10, 0, 0), EsdfVoxel::observed(0.0));
///
/// assert_eq!(layer.num_blocks(), 1);
/// let voxel = layer.voxel_at_point(&Point3::new(1.0, 0.0, 0.0)).unwrap();
/// assert!(voxel.observed);
/// ```
#[derive(Debug, Clone)]
pub struct Layer<V> {
    voxel_size: f64,
    inv_voxel_size: f64,
    voxels_per_side: i32,
    blocks: HashMap<BlockIndex, Block<V>>,
}

impl<V: Default + Clone> Layer<V> {
    /// Creates an empty layer.
    ///
    /// Out-of-range arguments are corrected rather than rejected. A
    /// negative voxel size is negated, and zero, NaN or infinite sizes fall
    /// back to [`DEFAULT_VOXEL_SIZE`]. `voxels_per_side` is clamped to
    /// `1..=MAX_VOXELS_PER_SIDE`. Use [`Layer::try_new`] for untrusted input.
    #[must_use]
    pub fn new(voxel_size: f64, voxels_per_side: usize) -> Self {
        let voxel_size = if voxel_size.is_finite() && voxel_size != 0.0 {
            voxel_size.abs()
        } else {
            DEFAULT_VOXEL_SIZE
        };
        let voxels_per_side = voxels_per_side.clamp(1, MAX_VOXELS_PER_SIDE);
        Self {
            voxel_size,
            inv_voxel_size: 1.0 / voxel_size,
            voxels_per_side: i32::try_from(voxels_per_side).unwrap_or(1),
            blocks: HashMap::new(),
        }
    }

    /// Creates an empty layer, validating its geometry.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidVoxelSize`] if `voxel_size` is not
    /// positive and finite, [`FieldError::InvalidVoxelsPerSide`] if
    /// `voxels_per_side` is zero, and [`FieldError::VoxelsPerSideOverflow`]
    /// if it exceeds [`MAX_VOXELS_PER_SIDE`].
    pub fn try_new(voxel_size: f64, voxels_per_side: usize) -> Result<Self, FieldError> {
        if voxel_size <= 0.0 || !voxel_size.is_finite() {
            return Err(FieldError::InvalidVoxelSize(voxel_size));
        }
        if voxels_per_side == 0 {
            return Err(FieldError::InvalidVoxelsPerSide(voxels_per_side));
        }
        if voxels_per_side > MAX_VOXELS_PER_SIDE {
            return Err(FieldError::VoxelsPerSideOverflow(voxels_per_side));
        }
        Ok(Self::new(voxel_size, voxels_per_side))
    }

    /// Allocates the block at `index` if needed and returns it.
    pub fn allocate_block(&mut self, index: BlockIndex) -> &mut Block<V> {
        let voxels_per_side = self.voxels_per_side;
        self.blocks.entry(index).or_insert_with(|| {
            trace!(?index, "allocating block");
            Block::new(voxels_per_side)
        })
    }

    /// Writes a voxel by global index, allocating its block if needed.
    pub fn set_voxel(&mut self, global: GridIndex, value: V) {
        let (block_index, voxel_index) = block_and_voxel_index(global, self.voxels_per_side);
        if let Some(slot) = self.allocate_block(block_index).voxel_mut(voxel_index) {
            *slot = value;
        }
    }
}

impl<V> Layer<V> {
    /// Edge length of a voxel in world units.
    #[must_use]
    pub const fn voxel_size(&self) -> f64 {
        self.voxel_size
    }

    /// Inverse of the voxel size.
    #[must_use]
    pub const fn inv_voxel_size(&self) -> f64 {
        self.inv_voxel_size
    }

    /// Number of voxels along each block edge.
    #[must_use]
    pub const fn voxels_per_side(&self) -> i32 {
        self.voxels_per_side
    }

    /// Edge length of a block in world units.
    #[must_use]
    pub fn block_size(&self) -> f64 {
        self.voxel_size * f64::from(self.voxels_per_side)
    }

    /// Number of allocated blocks.
    #[must_use]
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the block at `index`, if allocated.
    #[must_use]
    pub fn block(&self, index: BlockIndex) -> Option<&Block<V>> {
        self.blocks.get(&index)
    }

    /// Returns the voxel at a block and block-local index.
    #[must_use]
    pub fn voxel(&self, block: BlockIndex, voxel: VoxelIndex) -> Option<&V> {
        self.block(block).and_then(|b| b.voxel(voxel))
    }

    /// Returns the voxel at a global index, if its block is allocated.
    #[must_use]
    pub fn voxel_by_global_index(&self, global: GridIndex) -> Option<&V> {
        let (block, voxel) = block_and_voxel_index(global, self.voxels_per_side);
        self.voxel(block, voxel)
    }

    /// Returns the global index of the voxel containing `point`.
    #[must_use]
    pub fn grid_index_at(&self, point: &Point3<f64>) -> GridIndex {
        grid_index_from_point(point, self.inv_voxel_size)
    }

    /// Returns the voxel containing `point`, if its block is allocated.
    #[must_use]
    pub fn voxel_at_point(&self, point: &Point3<f64>) -> Option<&V> {
        self.voxel_by_global_index(self.grid_index_at(point))
    }

    /// Iterates over allocated block indices.
    pub fn block_indices(&self) -> impl Iterator<Item = &BlockIndex> {
        self.blocks.keys()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::voxel::{EsdfVoxel, TsdfVoxel};
    use approx::assert_relative_eq;

    #[test]
    fn test_try_new_rejects_bad_geometry() {
        assert!(matches!(
            Layer::<TsdfVoxel>::try_new(-0.1, 8),
            Err(FieldError::InvalidVoxelSize(_))
        ));
        assert!(matches!(
            Layer::<TsdfVoxel>::try_new(f64::NAN, 8),
            Err(FieldError::InvalidVoxelSize(_))
        ));
        assert!(matches!(
            Layer::<TsdfVoxel>::try_new(0.1, 0),
            Err(FieldError::InvalidVoxelsPerSide(0))
        ));
        assert!(matches!(
            Layer::<TsdfVoxel>::try_new(0.1, MAX_VOXELS_PER_SIDE + 1),
            Err(FieldError::VoxelsPerSideOverflow(_))
        ));
        assert!(Layer::<TsdfVoxel>::try_new(0.1, 8).is_ok());
    }

    #[test]
    fn test_new_clamps() {
        let layer: Layer<TsdfVoxel> = Layer::new(-0.2, 0);
        assert_eq!(layer.voxel_size(), 0.2);
        assert_eq!(layer.voxels_per_side(), 1);
    }

    #[test]
    fn test_new_replaces_unusable_voxel_size() {
        for voxel_size in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0] {
            let layer: Layer<TsdfVoxel> = Layer::new(voxel_size, 8);
            assert_eq!(layer.voxel_size(), DEFAULT_VOXEL_SIZE, "voxel size {voxel_size}");
            assert_relative_eq!(layer.inv_voxel_size(), 10.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_block_size() {
        let layer: Layer<TsdfVoxel> = Layer::new(0.1, 16);
        assert_relative_eq!(layer.block_size(), 1.6, epsilon = 1e-12);
    }

    #[test]
    fn test_set_and_get_by_global_index() {
        let mut layer: Layer<EsdfVoxel> = Layer::new(0.1, 8);
        layer.set_voxel(GridIndex::new(-1, 9, 0), EsdfVoxel::observed(2.0));

        assert_eq!(layer.num_blocks(), 1);
        let voxel = layer.voxel_by_global_index(GridIndex::new(-1, 9, 0)).unwrap();
        assert_eq!(voxel.distance, 2.0);
        assert!(layer.block(GridIndex::new(-1, 1, 0)).is_some());

        // Same block, untouched voxel: allocated but unobserved.
        let other = layer.voxel_by_global_index(GridIndex::new(-2, 9, 0)).unwrap();
        assert!(!other.observed);

        // Different block: unallocated.
        assert!(layer.voxel_by_global_index(GridIndex::new(0, 0, 0)).is_none());
    }

    #[test]
    fn test_voxel_at_point_uses_floor() {
        let mut layer: Layer<EsdfVoxel> = Layer::new(0.1, 8);
        layer.set_voxel(GridIndex::new(-1, 0, 0), EsdfVoxel::observed(1.0));
        assert!(layer.voxel_at_point(&Point3::new(-0.05, 0.05, 0.05)).is_some());
        assert!(layer.voxel_at_point(&Point3::new(-0.05, 0.05, -0.05)).is_none());
    }

    #[test]
    fn test_allocate_block_is_idempotent() {
        let mut layer: Layer<TsdfVoxel> = Layer::new(0.1, 4);
        layer.allocate_block(BlockIndex::new(1, 1, 1));
        layer.allocate_block(BlockIndex::new(1, 1, 1));
        assert_eq!(layer.num_blocks(), 1);
        assert_eq!(layer.block_indices().count(), 1);
    }
}
