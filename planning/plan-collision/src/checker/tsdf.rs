//! Sphere scan over a weighted distance field.

use cf_field::{VoxelLookup, WeightedDistanceField};
use nalgebra::Point3;
use tracing::debug;

use super::{ValidityChecker, check_radius};
use crate::bounds::StateBounds;
use crate::config::CheckerConfig;
use crate::error::{CollisionError, check_voxel_size};

/// Validity checker over a TSDF-style field.
///
/// Every voxel within the robot radius of the query is inspected. An
/// observed voxel with a non-positive distance is a collision. An
/// unobserved voxel (weight below the configured epsilon, or an index its
/// block cannot hold) is a collision only when unknown space is treated as
/// occupied. Voxels in blocks the field never allocated are skipped.
///
/// # Example
///
/// ```
/// use cf_field::{GridIndex, Layer, TsdfVoxel};
/// use plan_collision::{CheckerConfig, TsdfValidityChecker, ValidityChecker};
/// use nalgebra::Point3;
///
/// let mut layer: Layer<TsdfVoxel> = Layer::new(0.1, 8);
/// layer.set_voxel(GridIndex::new(5, 0, 0), TsdfVoxel::new(-0.02, 1.0));
///
/// let checker = TsdfValidityChecker::new(&layer, &CheckerConfig::new(0.2)).unwrap();
/// assert!(!checker.is_valid(&Point3::new(0.5, 0.0, 0.0)));
/// assert!(checker.is_valid(&Point3::new(0.05, 0.0, 0.0)));
/// ```
pub struct TsdfValidityChecker<'a, F: ?Sized> {
    field: &'a F,
    robot_radius: f64,
    voxel_size: f64,
    weight_epsilon: f32,
    treat_unknown_as_occupied: bool,
    bounds: StateBounds,
}

impl<'a, F: WeightedDistanceField + ?Sized> TsdfValidityChecker<'a, F> {
    /// Creates a checker over `field`.
    ///
    /// # Errors
    ///
    /// Returns an error if the robot radius is negative or non-finite, the
    /// field's voxel size is unusable, or the configuration is invalid.
    pub fn new(field: &'a F, config: &CheckerConfig) -> Result<Self, CollisionError> {
        let robot_radius = check_radius(config.robot_radius())?;
        let voxel_size = check_voxel_size(field.voxel_size())?;
        CollisionError::from_issues(config.validate())?;

        debug!(
            robot_radius,
            voxel_size,
            treat_unknown_as_occupied = config.treat_unknown_as_occupied(),
            "Created TSDF validity checker"
        );

        #[allow(clippy::cast_possible_truncation)]
        let weight_epsilon = config.weight_epsilon() as f32;

        Ok(Self {
            field,
            robot_radius,
            voxel_size,
            weight_epsilon,
            treat_unknown_as_occupied: config.treat_unknown_as_occupied(),
            bounds: *config.bounds(),
        })
    }

    /// Returns whether unobserved voxels count as occupied.
    #[must_use]
    pub const fn treat_unknown_as_occupied(&self) -> bool {
        self.treat_unknown_as_occupied
    }

    /// Sets whether unobserved voxels count as occupied.
    pub fn set_treat_unknown_as_occupied(&mut self, occupied: bool) {
        self.treat_unknown_as_occupied = occupied;
    }
}

impl<F: WeightedDistanceField + Sync + ?Sized> ValidityChecker for TsdfValidityChecker<'_, F> {
    fn bounds(&self) -> &StateBounds {
        &self.bounds
    }

    fn robot_radius(&self) -> f64 {
        self.robot_radius
    }

    fn voxel_size(&self) -> f64 {
        self.voxel_size
    }

    fn check_collision_with_robot(&self, position: &Point3<f64>) -> bool {
        let sphere = self.field.sphere_around_point(position, self.robot_radius);

        for (&block, voxels) in &sphere {
            for &voxel in voxels {
                match self.field.lookup(block, voxel) {
                    // Every voxel of this block is missing.
                    VoxelLookup::Unallocated => break,
                    VoxelLookup::InvalidIndex => {
                        if self.treat_unknown_as_occupied {
                            return true;
                        }
                    }
                    VoxelLookup::Voxel(v) if !v.is_observed(self.weight_epsilon) => {
                        if self.treat_unknown_as_occupied {
                            return true;
                        }
                    }
                    VoxelLookup::Voxel(v) => {
                        if v.distance <= 0.0 {
                            return true;
                        }
                    }
                }
            }
        }

        false
    }
}
