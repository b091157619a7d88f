//! Grid traversal along a line segment.
//!
//! This module enumerates every voxel a segment passes through using the
//! DDA (Digital Differential Analyzer) algorithm of Amanatides & Woo. At each
//! step the traversal crosses whichever voxel boundary is nearest along the
//! segment, so consecutive voxels always share a face.
//!
//! Unlike an open-ended ray walk, a [`SegmentTraversal`] knows its end voxel
//! up front and counts the boundary crossings left on each axis. It therefore
//! yields exactly `manhattan(start, end) + 1` voxels and terminates on the end
//! voxel even when floating-point drift would make a pure `t`-based walk
//! overshoot.
//!
//! # Example
//!
//! ```
//! use cf_field::{GridIndex, cast_ray};
//! use nalgebra::Point3;
//!
//! // Endpoints are given in voxel units (world position / voxel size).
//! let cells: Vec<_> = cast_ray(&Point3::new(0.5, 0.5, 0.5), &Point3::new(3.5, 0.5, 0.5)).collect();
//! assert_eq!(cells.len(), 4);
//! assert_eq!(cells[0], GridIndex::new(0, 0, 0));
//! assert_eq!(cells[3], GridIndex::new(3, 0, 0));
//! ```

use nalgebra::Point3;

use crate::index::{GridIndex, grid_index_from_scaled_point};

/// Segment extents below this (in voxel units) are treated as zero on that axis.
const RAY_TOLERANCE: f64 = 1e-6;

/// Parametric placeholder for axes the segment barely moves along.
///
/// Larger than any real crossing (which lies in `0..=1`), so such an axis only
/// steps once the others are exhausted.
const DEGENERATE_T: f64 = 2.0;

/// Creates a traversal over the voxels between two points in voxel units.
///
/// Both endpoints are scaled world positions, i.e. `position / voxel_size`.
/// The start voxel is yielded first and the end voxel last; both are included.
#[must_use]
pub fn cast_ray(start_scaled: &Point3<f64>, end_scaled: &Point3<f64>) -> SegmentTraversal {
    SegmentTraversal::new(start_scaled, end_scaled)
}

/// An iterator over the voxels crossed by a segment.
///
/// Yields [`GridIndex`] values in order from the start voxel to the end voxel.
#[derive(Debug, Clone)]
pub struct SegmentTraversal {
    /// Current voxel.
    current: GridIndex,
    /// Step direction per axis (-1, 0 or 1).
    step: [i32; 3],
    /// Parametric distance to the next boundary per axis.
    t_max: [f64; 3],
    /// Parametric distance between boundaries per axis.
    t_delta: [f64; 3],
    /// Boundary crossings still to make per axis.
    remaining: [u32; 3],
    /// Whether the start voxel has been yielded.
    started: bool,
}

impl SegmentTraversal {
    fn new(start_scaled: &Point3<f64>, end_scaled: &Point3<f64>) -> Self {
        let start_index = grid_index_from_scaled_point(start_scaled);
        let end_index = grid_index_from_scaled_point(end_scaled);
        let ray = end_scaled - start_scaled;

        let start = start_index.as_array();
        let end = end_index.as_array();
        let origin = [start_scaled.x, start_scaled.y, start_scaled.z];
        let dir = [ray.x, ray.y, ray.z];

        let mut step = [0i32; 3];
        let mut t_max = [f64::INFINITY; 3];
        let mut t_delta = [f64::INFINITY; 3];
        let mut remaining = [0u32; 3];

        for i in 0..3 {
            remaining[i] = start[i].abs_diff(end[i]);
            if remaining[i] == 0 {
                continue;
            }
            step[i] = if end[i] > start[i] { 1 } else { -1 };

            if dir[i].abs() < RAY_TOLERANCE {
                t_max[i] = DEGENERATE_T;
                t_delta[i] = DEGENERATE_T;
                continue;
            }

            // Offset of the start point inside its voxel.
            let shifted = origin[i] - f64::from(start[i]);
            let boundary = if step[i] > 0 { 1.0 } else { 0.0 };
            t_max[i] = (boundary - shifted) / dir[i];
            t_delta[i] = (1.0 / dir[i]).abs();
        }

        Self {
            current: start_index,
            step,
            t_max,
            t_delta,
            remaining,
            started: false,
        }
    }

    fn remaining_steps(&self) -> usize {
        self.remaining
            .iter()
            .map(|&r| usize::try_from(r).unwrap_or(usize::MAX))
            .fold(0usize, usize::saturating_add)
    }
}

impl Iterator for SegmentTraversal {
    type Item = GridIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            return Some(self.current);
        }

        // Nearest boundary among axes that still have crossings left.
        let axis = (0..3)
            .filter(|&i| self.remaining[i] > 0)
            .min_by(|&a, &b| self.t_max[a].total_cmp(&self.t_max[b]))?;

        match axis {
            0 => self.current.x = self.current.x.wrapping_add(self.step[0]),
            1 => self.current.y = self.current.y.wrapping_add(self.step[1]),
            _ => self.current.z = self.current.z.wrapping_add(self.step[2]),
        }
        self.t_max[axis] += self.t_delta[axis];
        self.remaining[axis] -= 1;

        Some(self.current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = if self.started {
            self.remaining_steps()
        } else {
            self.remaining_steps().saturating_add(1)
        };
        (left, Some(left))
    }
}

impl ExactSizeIterator for SegmentTraversal {}

impl std::iter::FusedIterator for SegmentTraversal {}
