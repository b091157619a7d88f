//! Integer indices into the voxel lattice.
//!
//! Three index spaces share one representation:
//!
//! - **Global** ([`GridIndex`]): a voxel anywhere in the lattice.
//! - **Block** ([`BlockIndex`]): a block of `voxels_per_side³` voxels.
//! - **Voxel** ([`VoxelIndex`]): a voxel relative to its block, each axis in
//!   `0..voxels_per_side`.
//!
//! Conversions between world space and the lattice go through `voxel_size`:
//! `index = floor(position / voxel_size)` and `position = index * voxel_size`.

use nalgebra::{Point3, Vector3};

/// Tolerance added before flooring so that `index * voxel_size` maps back to `index`.
pub const COORDINATE_EPSILON: f64 = 1e-6;

/// A discrete 3D index into the voxel lattice.
///
/// # Example
///
/// ```
/// use cf_field::GridIndex;
///
/// let index = GridIndex::new(10, -2, 3);
/// assert_eq!(index.as_array(), [10, -2, 3]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridIndex {
    /// X index.
    pub x: i32,
    /// Y index.
    pub y: i32,
    /// Z index.
    pub z: i32,
}

/// Index of a block in block space.
pub type BlockIndex = GridIndex;

/// Index of a voxel relative to the corner of its block.
pub type VoxelIndex = GridIndex;

impl GridIndex {
    /// Creates a new index.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The index (0, 0, 0).
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0, 0, 0)
    }

    /// Returns the index as an array.
    #[must_use]
    pub const fn as_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    /// Converts to a floating-point vector without scaling.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(f64::from(self.x), f64::from(self.y), f64::from(self.z))
    }

    /// Manhattan distance to another index.
    ///
    /// ```
    /// use cf_field::GridIndex;
    ///
    /// let a = GridIndex::new(0, 0, 0);
    /// let b = GridIndex::new(3, -4, 5);
    /// assert_eq!(a.manhattan_distance(b), 12);
    /// ```
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dz = self.z.abs_diff(other.z);
        dx.saturating_add(dy).saturating_add(dz)
    }

    /// Adds an offset, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(other.x)?,
            self.y.checked_add(other.y)?,
            self.z.checked_add(other.z)?,
        ))
    }

    /// Returns `true` if two indices share a face.
    #[must_use]
    pub const fn is_face_adjacent(self, other: Self) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl From<[i32; 3]> for GridIndex {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<GridIndex> for [i32; 3] {
    fn from(index: GridIndex) -> Self {
        index.as_array()
    }
}

impl std::ops::Add for GridIndex {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(
            self.x.wrapping_add(other.x),
            self.y.wrapping_add(other.y),
            self.z.wrapping_add(other.z),
        )
    }
}

impl std::ops::Sub for GridIndex {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(
            self.x.wrapping_sub(other.x),
            self.y.wrapping_sub(other.y),
            self.z.wrapping_sub(other.z),
        )
    }
}

/// Converts a world-space point to the index of the voxel containing it.
///
/// ```
/// use cf_field::{GridIndex, grid_index_from_point};
/// use nalgebra::Point3;
///
/// let index = grid_index_from_point(&Point3::new(1.0, -0.05, 0.25), 10.0);
/// assert_eq!(index, GridIndex::new(10, -1, 2));
/// ```
#[must_use]
pub fn grid_index_from_point(point: &Point3<f64>, inv_voxel_size: f64) -> GridIndex {
    grid_index_from_scaled_point(&Point3::from(point.coords * inv_voxel_size))
}

/// Converts a point already expressed in voxel units to its containing index.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn grid_index_from_scaled_point(scaled: &Point3<f64>) -> GridIndex {
    // Truncation is intentional: continuous voxel units to discrete indices.
    GridIndex::new(
        (scaled.x + COORDINATE_EPSILON).floor() as i32,
        (scaled.y + COORDINATE_EPSILON).floor() as i32,
        (scaled.z + COORDINATE_EPSILON).floor() as i32,
    )
}

/// Converts an index to its lattice point, `index * voxel_size`.
#[must_use]
pub fn point_from_grid_index(index: GridIndex, voxel_size: f64) -> Point3<f64> {
    Point3::from(index.to_vector() * voxel_size)
}

/// Converts an index to the world-space center of its voxel.
#[must_use]
pub fn center_point_from_grid_index(index: GridIndex, voxel_size: f64) -> Point3<f64> {
    Point3::from((index.to_vector() + Vector3::repeat(0.5)) * voxel_size)
}

/// Splits a global index into its block index and block-local voxel index.
///
/// Uses floor division so negative indices land in the correct block.
///
/// ```
/// use cf_field::{GridIndex, block_and_voxel_index};
///
/// let (block, voxel) = block_and_voxel_index(GridIndex::new(17, -1, 0), 16);
/// assert_eq!(block, GridIndex::new(1, -1, 0));
/// assert_eq!(voxel, GridIndex::new(1, 15, 0));
/// ```
#[must_use]
pub const fn block_and_voxel_index(
    global: GridIndex,
    voxels_per_side: i32,
) -> (BlockIndex, VoxelIndex) {
    let block = GridIndex::new(
        global.x.div_euclid(voxels_per_side),
        global.y.div_euclid(voxels_per_side),
        global.z.div_euclid(voxels_per_side),
    );
    let voxel = GridIndex::new(
        global.x.rem_euclid(voxels_per_side),
        global.y.rem_euclid(voxels_per_side),
        global.z.rem_euclid(voxels_per_side),
    );
    (block, voxel)
}

/// Recombines a block index and block-local voxel index into a global index.
#[must_use]
pub const fn global_index(block: BlockIndex, voxel: VoxelIndex, voxels_per_side: i32) -> GridIndex {
    GridIndex::new(
        block.x.wrapping_mul(voxels_per_side).wrapping_add(voxel.x),
        block.y.wrapping_mul(voxels_per_side).wrapping_add(voxel.y),
        block.z.wrapping_mul(voxels_per_side).wrapping_add(voxel.z),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_round_trip_on_lattice() {
        let voxel_size = 0.1;
        for i in -25..25 {
            let index = GridIndex::new(i, 2 * i, -i);
            let point = point_from_grid_index(index, voxel_size);
            assert_eq!(grid_index_from_point(&point, 1.0 / voxel_size), index);
        }
    }

    #[test]
    fn test_negative_points_floor() {
        let index = grid_index_from_point(&Point3::new(-0.15, -0.25, -0.35), 10.0);
        assert_eq!(index, GridIndex::new(-2, -3, -4));
    }

    #[test]
    fn test_center_point() {
        let center = center_point_from_grid_index(GridIndex::new(0, 1, -1), 0.1);
        assert_relative_eq!(center.x, 0.05, epsilon = 1e-12);
        assert_relative_eq!(center.y, 0.15, epsilon = 1e-12);
        assert_relative_eq!(center.z, -0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_block_split_and_recombine() {
        for global in [
            GridIndex::new(0, 0, 0),
            GridIndex::new(15, 16, 17),
            GridIndex::new(-1, -16, -17),
            GridIndex::new(33, -40, 7),
        ] {
            let (block, voxel) = block_and_voxel_index(global, 16);
            assert!((0..16).contains(&voxel.x));
            assert!((0..16).contains(&voxel.y));
            assert!((0..16).contains(&voxel.z));
            assert_eq!(global_index(block, voxel, 16), global);
        }
    }

    #[test]
    fn test_face_adjacency() {
        let a = GridIndex::new(1, 1, 1);
        assert!(a.is_face_adjacent(GridIndex::new(1, 2, 1)));
        assert!(!a.is_face_adjacent(GridIndex::new(2, 2, 1)));
        assert!(!a.is_face_adjacent(a));
    }

    #[test]
    fn test_checked_add_overflow() {
        let index = GridIndex::new(i32::MAX, 0, 0);
        assert_eq!(index.checked_add(GridIndex::new(1, 0, 0)), None);
        assert_eq!(
            GridIndex::new(1, 2, 3).checked_add(GridIndex::new(1, 1, 1)),
            Some(GridIndex::new(2, 3, 4))
        );
    }

    #[test]
    fn test_operators() {
        let a = GridIndex::new(1, 2, 3);
        let b = GridIndex::new(4, 5, 6);
        assert_eq!(a + b, GridIndex::new(5, 7, 9));
        assert_eq!(b - a, GridIndex::new(3, 3, 3));
        let array: [i32; 3] = a.into();
        assert_eq!(GridIndex::from(array), a);
    }
}
