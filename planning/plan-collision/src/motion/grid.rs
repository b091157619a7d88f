//! Motion validation by voxel traversal.

use cf_field::{GridIndex, cast_ray, point_from_grid_index};
use nalgebra::Point3;
use tracing::{debug, trace};

use super::{LastValid, MIN_SEGMENT_LENGTH, MotionValidator, MotionValidity};
use crate::checker::ValidityChecker;
use crate::config::{FractionSemantics, MotionConfig};
use crate::error::CollisionError;

/// Motion validator that checks every voxel the segment passes through.
///
/// The segment is traversed at the checker's voxel size, start cell to goal
/// cell, and each cell is checked with
/// [`ValidityChecker::check_collision_with_robot_at_voxel`]. The goal cell
/// is part of the traversal, so no separate goal check is made.
///
/// Under [`FractionSemantics::Geometric`] the lattice point of the cell
/// before the first colliding one is projected onto the segment. That
/// projection is the last valid state, and its position along the segment
/// is the fraction. If the start cell collides, or the projected state
/// itself collides, the start is reported with fraction 0. The reported
/// state always lies on the segment.
///
/// # Example
///
/// ```
/// use cf_field::{EsdfVoxel, GridIndex, Layer};
/// use plan_collision::{
///     CheckerConfig, EsdfValidityChecker, GridMotionValidator, MotionConfig, MotionValidator,
/// };
/// use nalgebra::Point3;
///
/// let mut layer: Layer<EsdfVoxel> = Layer::new(0.1, 8);
/// for x in 0..=20 {
///     let distance = if x == 10 { 0.0 } else { 5.0 };
///     layer.set_voxel(GridIndex::new(x, 0, 0), EsdfVoxel::observed(distance));
/// }
///
/// let checker = EsdfValidityChecker::new(&layer, &CheckerConfig::new(0.3)).unwrap();
/// let validator = GridMotionValidator::new(&checker, &MotionConfig::default()).unwrap();
///
/// let result = validator.check_motion_detailed(&Point3::origin(), &Point3::new(2.0, 0.0, 0.0));
/// let last = result.last_valid().unwrap();
/// assert!((last.fraction - 0.45).abs() < 1e-9);
/// ```
pub struct GridMotionValidator<'a> {
    checker: &'a dyn ValidityChecker,
    fraction: FractionSemantics,
}

impl<'a> GridMotionValidator<'a> {
    /// Creates a validator over `checker`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(checker: &'a dyn ValidityChecker, config: &MotionConfig) -> Result<Self, CollisionError> {
        CollisionError::from_issues(config.validate())?;

        debug!(
            voxel_size = checker.voxel_size(),
            fraction = ?config.fraction(),
            "Created grid motion validator"
        );

        Ok(Self {
            checker,
            fraction: config.fraction(),
        })
    }

    /// Returns the fraction semantics.
    #[must_use]
    pub const fn fraction(&self) -> FractionSemantics {
        self.fraction
    }

    /// Builds the failure report for the first colliding cell.
    #[allow(clippy::cast_precision_loss)]
    fn last_valid(
        &self,
        start: &Point3<f64>,
        goal: &Point3<f64>,
        previous: Option<GridIndex>,
        colliding: GridIndex,
        position: usize,
        count: usize,
    ) -> LastValid {
        let voxel_size = self.checker.voxel_size();
        match self.fraction {
            FractionSemantics::Geometric => {
                let stay = LastValid {
                    state: *start,
                    fraction: 0.0,
                };
                let Some(previous) = previous else {
                    return stay;
                };
                let segment = goal - start;
                let lattice = point_from_grid_index(previous, voxel_size);
                let fraction = ((lattice - start).dot(&segment) / segment.norm_squared()).clamp(0.0, 1.0);
                let state = start + segment * fraction;
                if self.checker.check_collision_with_robot(&state) {
                    return stay;
                }
                LastValid { state, fraction }
            }
            FractionSemantics::EnumerationIndex => LastValid {
                state: point_from_grid_index(colliding, voxel_size),
                fraction: (position / count) as f64,
            },
        }
    }
}

impl MotionValidator for GridMotionValidator<'_> {
    fn check_motion_detailed(&self, s1: &Point3<f64>, s2: &Point3<f64>) -> MotionValidity {
        let length = (s2 - s1).norm();
        if !length.is_finite() {
            return MotionValidity::blocked_at(*s1);
        }
        if length < MIN_SEGMENT_LENGTH {
            return if self.checker.is_valid(s1) {
                MotionValidity::Valid
            } else {
                MotionValidity::blocked_at(*s1)
            };
        }

        let inv_voxel_size = 1.0 / self.checker.voxel_size();
        let start_scaled = Point3::from(s1.coords * inv_voxel_size);
        let goal_scaled = Point3::from(s2.coords * inv_voxel_size);

        let cells = cast_ray(&start_scaled, &goal_scaled);
        let count = cells.len();
        let mut previous = None;

        for (position, index) in cells.enumerate() {
            if self.checker.check_collision_with_robot_at_voxel(index) {
                let last = self.last_valid(s1, s2, previous, index, position, count);
                trace!(
                    ?index,
                    position,
                    count,
                    fraction = last.fraction,
                    "Motion collides in grid traversal"
                );
                return MotionValidity::Invalid(last);
            }
            previous = Some(index);
        }

        MotionValidity::Valid
    }
}
