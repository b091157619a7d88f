//! Distance lookups on ESDF layers, with optional trilinear interpolation.

use nalgebra::Point3;

use crate::index::GridIndex;
use crate::layer::Layer;
use crate::voxel::EsdfVoxel;

/// Reads distances out of an ESDF layer at arbitrary points.
///
/// Only observed voxels contribute. A lookup fails (returns `None`) when the
/// voxels it needs are unallocated or unobserved.
///
/// # Example
///
/// ```
/// use cf_field::{EsdfVoxel, GridIndex, Interpolator, Layer};
/// use nalgebra::Point3;
///
/// let mut layer: Layer<EsdfVoxel> = Layer::new(1.0, 8);
/// layer.set_voxel(GridIndex::new(0, 0, 0), EsdfVoxel::observed(0.5));
///
/// let interpolator = Interpolator::new(&layer);
/// assert_eq!(interpolator.distance(&Point3::new(0.5, 0.5, 0.5), false), Some(0.5));
/// assert_eq!(interpolator.distance(&Point3::new(1.5, 0.5, 0.5), false), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Interpolator<'a> {
    layer: &'a Layer<EsdfVoxel>,
}

impl<'a> Interpolator<'a> {
    /// Creates an interpolator over `layer`.
    #[must_use]
    pub const fn new(layer: &'a Layer<EsdfVoxel>) -> Self {
        Self { layer }
    }

    /// Returns the distance at `point`.
    ///
    /// With `interpolate` unset this is the distance stored in the voxel
    /// containing `point`. With it set, the distance is blended trilinearly
    /// from the eight voxel centers surrounding `point`.
    #[must_use]
    pub fn distance(&self, point: &Point3<f64>, interpolate: bool) -> Option<f64> {
        if interpolate {
            self.trilinear_distance(point)
        } else {
            self.nearest_distance(point)
        }
    }

    fn observed_distance(&self, index: GridIndex) -> Option<f64> {
        self.layer
            .voxel_by_global_index(index)
            .filter(|voxel| voxel.observed)
            .map(|voxel| f64::from(voxel.distance))
    }

    fn nearest_distance(&self, point: &Point3<f64>) -> Option<f64> {
        self.observed_distance(self.layer.grid_index_at(point))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn trilinear_distance(&self, point: &Point3<f64>) -> Option<f64> {
        // Voxel centers sit at (index + 0.5) * voxel_size; shift so the
        // lower-corner center lands on an integer.
        let scaled = point.coords * self.layer.inv_voxel_size();
        let shifted = scaled.map(|c| c - 0.5);
        let base_f = shifted.map(f64::floor);
        let frac = shifted - base_f;
        let base = GridIndex::new(base_f.x as i32, base_f.y as i32, base_f.z as i32);

        let mut distance = 0.0;
        for dz in 0..2 {
            for dy in 0..2 {
                for dx in 0..2 {
                    let index = base.checked_add(GridIndex::new(dx, dy, dz))?;
                    let weight = axis_weight(frac.x, dx) * axis_weight(frac.y, dy) * axis_weight(frac.z, dz);
                    distance += weight * self.observed_distance(index)?;
                }
            }
        }
        Some(distance)
    }
}

fn axis_weight(frac: f64, corner: i32) -> f64 {
    if corner == 0 { 1.0 - frac } else { frac }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::index::center_point_from_grid_index;
    use approx::assert_relative_eq;

    /// A layer whose distance is the x coordinate of each voxel center.
    fn linear_layer() -> Layer<EsdfVoxel> {
        let mut layer = Layer::new(0.5, 8);
        for z in -2..6 {
            for y in -2..6 {
                for x in -2..6 {
                    let index = GridIndex::new(x, y, z);
                    let center = center_point_from_grid_index(index, 0.5);
                    #[allow(clippy::cast_possible_truncation)]
                    let distance = center.x as f32;
                    layer.set_voxel(index, EsdfVoxel::observed(distance));
                }
            }
        }
        layer
    }

    #[test]
    fn test_nearest_returns_containing_voxel() {
        let layer = linear_layer();
        let interpolator = Interpolator::new(&layer);
        let d = interpolator.distance(&Point3::new(1.1, 0.3, 0.3), false).unwrap();
        assert_relative_eq!(d, 1.25, epsilon = 1e-6);
    }

    #[test]
    fn test_trilinear_reproduces_linear_field() {
        let layer = linear_layer();
        let interpolator = Interpolator::new(&layer);
        for x in [0.3, 0.81, 1.1, 1.77] {
            let d = interpolator
                .distance(&Point3::new(x, 0.9, 1.3), true)
                .unwrap();
            assert_relative_eq!(d, x, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_unobserved_voxel_fails_lookup() {
        let mut layer: Layer<EsdfVoxel> = Layer::new(1.0, 4);
        layer.allocate_block(GridIndex::origin());
        let interpolator = Interpolator::new(&layer);
        assert_eq!(interpolator.distance(&Point3::new(0.5, 0.5, 0.5), false), None);
    }

    #[test]
    fn test_trilinear_needs_all_neighbours() {
        let mut layer: Layer<EsdfVoxel> = Layer::new(1.0, 4);
        layer.set_voxel(GridIndex::origin(), EsdfVoxel::observed(1.0));
        let interpolator = Interpolator::new(&layer);
        // Nearest lookup succeeds, interpolation lacks seven neighbours.
        assert!(interpolator.distance(&Point3::new(0.9, 0.9, 0.9), false).is_some());
        assert!(interpolator.distance(&Point3::new(0.9, 0.9, 0.9), true).is_none());
    }
}
