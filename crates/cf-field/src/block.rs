//! Dense cubes of voxels.

use crate::index::VoxelIndex;

/// A dense cube of `voxels_per_side³` voxels.
///
/// Voxels are stored in x-fastest order. Blocks are the unit of allocation in
/// a [`Layer`](crate::Layer): a block either exists with all its voxels, or the
/// whole region is unallocated.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block<V> {
    voxels_per_side: i32,
    voxels: Vec<V>,
}

impl<V: Default + Clone> Block<V> {
    /// Creates a block filled with default voxels.
    ///
    /// A non-positive `voxels_per_side` yields an empty block in which no
    /// voxel index is valid.
    #[must_use]
    pub fn new(voxels_per_side: i32) -> Self {
        let side = usize::try_from(voxels_per_side).unwrap_or(0);
        Self {
            voxels_per_side: voxels_per_side.max(0),
            voxels: vec![V::default(); side * side * side],
        }
    }
}

impl<V> Block<V> {
    /// Number of voxels along each edge.
    #[must_use]
    pub const fn voxels_per_side(&self) -> i32 {
        self.voxels_per_side
    }

    /// Total number of voxels in the block.
    #[must_use]
    pub fn num_voxels(&self) -> usize {
        self.voxels.len()
    }

    /// Returns `true` if the index addresses a voxel inside this block.
    #[must_use]
    pub const fn is_valid_voxel_index(&self, index: VoxelIndex) -> bool {
        let n = self.voxels_per_side;
        index.x >= 0 && index.x < n && index.y >= 0 && index.y < n && index.z >= 0 && index.z < n
    }

    fn linear_index(&self, index: VoxelIndex) -> Option<usize> {
        if !self.is_valid_voxel_index(index) {
            return None;
        }
        let n = usize::try_from(self.voxels_per_side).ok()?;
        let x = usize::try_from(index.x).ok()?;
        let y = usize::try_from(index.y).ok()?;
        let z = usize::try_from(index.z).ok()?;
        Some(x + n * (y + n * z))
    }

    /// Returns the voxel at a block-local index.
    #[must_use]
    pub fn voxel(&self, index: VoxelIndex) -> Option<&V> {
        self.linear_index(index).and_then(|i| self.voxels.get(i))
    }

    /// Returns the voxel at a block-local index mutably.
    pub fn voxel_mut(&mut self, index: VoxelIndex) -> Option<&mut V> {
        self.linear_index(index).and_then(|i| self.voxels.get_mut(i))
    }

    /// Iterates over all voxels in storage order.
    pub fn voxels(&self) -> impl Iterator<Item = &V> {
        self.voxels.iter()
    }
}
