//! Distance threshold over a Euclidean signed distance field.

use cf_field::{GridIndex, SignedDistanceField};
use nalgebra::Point3;
use tracing::debug;

use super::{ClearanceChecker, ValidityChecker, check_radius, within_radius};
use crate::bounds::StateBounds;
use crate::config::CheckerConfig;
use crate::error::{CollisionError, check_voxel_size};

/// Validity checker over an ESDF.
///
/// The robot collides wherever the field's distance is at most the robot
/// radius. A position where the field has no data collides too: absence in
/// an ESDF means outside the mapped region, so unknown space is never
/// optimistic here.
///
/// # Example
///
/// ```
/// use cf_field::{EsdfVoxel, GridIndex, Layer};
/// use plan_collision::{CheckerConfig, EsdfValidityChecker, ValidityChecker};
/// use nalgebra::Point3;
///
/// let mut layer: Layer<EsdfVoxel> = Layer::new(0.1, 8);
/// layer.set_voxel(GridIndex::new(2, 0, 0), EsdfVoxel::observed(0.5));
/// layer.set_voxel(GridIndex::new(3, 0, 0), EsdfVoxel::observed(0.2));
///
/// let checker = EsdfValidityChecker::new(&layer, &CheckerConfig::new(0.3)).unwrap();
/// assert!(checker.is_valid(&Point3::new(0.2, 0.0, 0.0)));
/// assert!(!checker.is_valid(&Point3::new(0.3, 0.0, 0.0)));
/// // Unmapped space is a collision.
/// assert!(!checker.is_valid(&Point3::new(5.0, 5.0, 5.0)));
/// ```
pub struct EsdfValidityChecker<'a, F: ?Sized> {
    field: &'a F,
    robot_radius: f64,
    voxel_size: f64,
    interpolate: bool,
    bounds: StateBounds,
}

impl<'a, F: SignedDistanceField + ?Sized> EsdfValidityChecker<'a, F> {
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
            interpolate = config.interpolate(),
            "Created ESDF validity checker"
        );

        Ok(Self {
            field,
            robot_radius,
            voxel_size,
            interpolate: config.interpolate(),
            bounds: *config.bounds(),
        })
    }

    /// Returns whether point lookups interpolate.
    #[must_use]
    pub const fn interpolate(&self) -> bool {
        self.interpolate
    }
}

impl<F: SignedDistanceField + Sync + ?Sized> ValidityChecker for EsdfValidityChecker<'_, F> {
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
        self.field
            .distance_at_point(position, self.interpolate)
            .is_none_or(|distance| within_radius(distance, self.robot_radius))
    }

    /// Reads the voxel directly, without interpolation.
    fn check_collision_with_robot_at_voxel(&self, index: GridIndex) -> bool {
        self.field
            .distance_at_index(index)
            .is_none_or(|distance| within_radius(distance, self.robot_radius))
    }
}

impl<F: SignedDistanceField + Sync + ?Sized> ClearanceChecker for EsdfValidityChecker<'_, F> {
    fn remaining_distance_to_collision(&self, position: &Point3<f64>) -> f64 {
        self.field
            .distance_at_point(position, self.interpolate)
            .map_or(f64::NEG_INFINITY, |distance| distance - self.robot_radius)
    }
}
