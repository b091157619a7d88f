//! State validity checking.
//!
//! A [`ValidityChecker`] decides whether a robot, modelled as a sphere, can
//! sit at a position. Three strategies cover the field types a planner is
//! typically handed:
//!
//! - [`TsdfValidityChecker`] - Scans the sphere in a weighted (TSDF) field
//! - [`EsdfValidityChecker`] - Thresholds a Euclidean signed distance
//! - [`DistanceFnValidityChecker`] - Thresholds a caller-supplied distance
//!
//! Checkers that can also report how far the robot is from touching an
//! obstacle implement [`ClearanceChecker`].

mod distance_fn;
mod esdf;
mod tsdf;

pub use distance_fn::DistanceFnValidityChecker;
pub use esdf::EsdfValidityChecker;
pub use tsdf::TsdfValidityChecker;

use cf_field::{GridIndex, point_from_grid_index};
use nalgebra::Point3;

use crate::bounds::StateBounds;
use crate::error::CollisionError;

/// Point-wise collision checking for a spherical robot.
///
/// Implementations are read-only after construction and are shared across
/// planning threads, hence the `Sync` bound.
pub trait ValidityChecker: Sync {
    /// The planner's state-space bounds.
    fn bounds(&self) -> &StateBounds;

    /// Radius of the robot's bounding sphere.
    fn robot_radius(&self) -> f64;

    /// Voxel size used for grid conversions.
    fn voxel_size(&self) -> f64;

    /// Returns `true` if the robot collides at `position`.
    fn check_collision_with_robot(&self, position: &Point3<f64>) -> bool;

    /// Returns `true` if the robot collides at the lattice point of `index`.
    ///
    /// Overrides must give the same verdict as
    /// [`check_collision_with_robot`](Self::check_collision_with_robot) at
    /// `index * voxel_size`.
    fn check_collision_with_robot_at_voxel(&self, index: GridIndex) -> bool {
        self.check_collision_with_robot(&point_from_grid_index(index, self.voxel_size()))
    }

    /// Returns `true` if `state` is inside the bounds and collision-free.
    fn is_valid(&self, state: &Point3<f64>) -> bool {
        self.bounds().contains(state) && !self.check_collision_with_robot(state)
    }
}

/// A checker that can report the clearance left before collision.
pub trait ClearanceChecker: ValidityChecker {
    /// Distance the robot can move from `position` before touching an
    /// obstacle. Negative inside the inflated obstacle, `-inf` where the
    /// field has no data.
    fn remaining_distance_to_collision(&self, position: &Point3<f64>) -> f64;
}

/// Sphere-versus-distance test shared by the thresholding checkers.
///
/// A robot exactly tangent to a surface collides, and a NaN distance
/// collides.
#[inline]
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub(crate) fn within_radius(distance: f64, radius: f64) -> bool {
    !(distance > radius)
}

/// Checks a robot radius at construction.
pub(crate) fn check_radius(radius: f64) -> Result<f64, CollisionError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(radius)
    } else {
        Err(CollisionError::InvalidRobotRadius(radius))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    struct Wall {
        bounds: StateBounds,
        x: f64,
    }

    impl ValidityChecker for Wall {
        fn bounds(&self) -> &StateBounds {
            &self.bounds
        }

        fn robot_radius(&self) -> f64 {
            0.0
        }

        fn voxel_size(&self) -> f64 {
            0.5
        }

        fn check_collision_with_robot(&self, position: &Point3<f64>) -> bool {
            position.x >= self.x
        }
    }

    #[test]
    fn test_within_radius() {
        assert!(within_radius(0.3, 0.3));
        assert!(within_radius(-1.0, 0.3));
        assert!(!within_radius(0.300_001, 0.3));
        assert!(within_radius(f64::NAN, 0.3));
        assert!(within_radius(f64::NEG_INFINITY, 0.0));
    }

    #[test]
    fn test_check_radius() {
        assert_eq!(check_radius(0.0).unwrap(), 0.0);
        assert!(check_radius(-0.01).is_err());
        assert!(check_radius(f64::NAN).is_err());
    }

    #[test]
    fn test_is_valid_checks_bounds_first() {
        let wall = Wall {
            bounds: StateBounds::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0)),
            x: 10.0,
        };
        assert!(wall.is_valid(&Point3::origin()));
        assert!(!wall.is_valid(&Point3::new(2.0, 0.0, 0.0)));
        assert!(!wall.is_valid(&Point3::new(f64::NAN, 0.0, 0.0)));
    }

    #[test]
    fn test_default_voxel_check_uses_lattice_point() {
        let wall = Wall {
            bounds: StateBounds::unbounded(),
            x: 1.0,
        };
        // Index 2 sits at x = 1.0 with a voxel size of 0.5.
        assert!(wall.check_collision_with_robot_at_voxel(GridIndex::new(2, 0, 0)));
        assert!(!wall.check_collision_with_robot_at_voxel(GridIndex::new(1, 0, 0)));
    }
}
