//! Distance threshold over a caller-supplied distance function.

use nalgebra::Point3;
use tracing::debug;

use super::{ClearanceChecker, ValidityChecker, check_radius, within_radius};
use crate::bounds::StateBounds;
use crate::config::CheckerConfig;
use crate::error::{CollisionError, check_voxel_size};

/// Validity checker over an opaque distance function.
///
/// Useful when distances come from something this crate does not model,
/// such as a collection of overlapping submaps. The function owns all
/// knowledge of unknown space: whatever it returns is thresholded against
/// the robot radius, and a NaN counts as a collision.
///
/// # Example
///
/// ```
/// use plan_collision::{CheckerConfig, ClearanceChecker, DistanceFnValidityChecker, ValidityChecker};
/// use nalgebra::Point3;
///
/// // A single spherical obstacle of radius 1 at the origin.
/// let distance = |p: &Point3<f64>| p.coords.norm() - 1.0;
/// let checker = DistanceFnValidityChecker::new(distance, 0.1, &CheckerConfig::new(0.5)).unwrap();
///
/// assert!(!checker.is_valid(&Point3::new(1.4, 0.0, 0.0)));
/// assert!(checker.is_valid(&Point3::new(2.0, 0.0, 0.0)));
/// assert!((checker.remaining_distance_to_collision(&Point3::new(3.0, 0.0, 0.0)) - 1.5).abs() < 1e-12);
/// ```
pub struct DistanceFnValidityChecker<F> {
    distance: F,
    robot_radius: f64,
    voxel_size: f64,
    bounds: StateBounds,
}

impl<F: Fn(&Point3<f64>) -> f64> DistanceFnValidityChecker<F> {
    /// Creates a checker over `distance`.
    ///
    /// `voxel_size` is the resolution of the data behind the function; it
    /// sets the nominal step of motion validation and the lattice used for
    /// index queries.
    ///
    /// # Errors
    ///
    /// Returns an error if the robot radius is negative or non-finite, the
    /// voxel size is unusable, or the configuration is invalid.
    pub fn new(distance: F, voxel_size: f64, config: &CheckerConfig) -> Result<Self, CollisionError> {
        let robot_radius = check_radius(config.robot_radius())?;
        let voxel_size = check_voxel_size(voxel_size)?;
        CollisionError::from_issues(config.validate())?;

        debug!(robot_radius, voxel_size, "Created distance function validity checker");

        Ok(Self {
            distance,
            robot_radius,
            voxel_size,
            bounds: *config.bounds(),
        })
    }

    /// Evaluates the wrapped distance function.
    #[must_use]
    pub fn distance(&self, position: &Point3<f64>) -> f64 {
        (self.distance)(position)
    }
}

impl<F: Fn(&Point3<f64>) -> f64 + Sync> ValidityChecker for DistanceFnValidityChecker<F> {
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
        within_radius(self.distance(position), self.robot_radius)
    }
}

impl<F: Fn(&Point3<f64>) -> f64 + Sync> ClearanceChecker for DistanceFnValidityChecker<F> {
    fn remaining_distance_to_collision(&self, position: &Point3<f64>) -> f64 {
        self.distance(position) - self.robot_radius
    }
}
