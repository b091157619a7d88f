//! Motion validation by clearance-limited marching.

use nalgebra::{Point3, Vector3};
use tracing::{debug, trace};

use super::{LastValid, MIN_SEGMENT_LENGTH, MotionValidator, MotionValidity};
use crate::checker::ClearanceChecker;
use crate::config::MotionConfig;
use crate::error::CollisionError;

/// One sampled position of a [`ClearanceMarch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchSample {
    /// Sampled position on the segment.
    pub position: Point3<f64>,
    /// Distance from the start of the segment.
    pub traveled: f64,
    /// Length of the step that reached this sample (zero for the start).
    pub step: f64,
    /// Clearance left before collision at this sample.
    pub clearance: f64,
    /// Whether the march stops here because the robot collides or touches.
    pub blocked: bool,
}

/// Iterator over the samples of an adaptive march along a segment.
///
/// Starts at the segment start and advances toward the goal by the nominal
/// step, or by the sample's clearance when that is smaller. It ends after a
/// blocked sample or once the traveled distance reaches the segment length.
/// The goal itself is not sampled.
pub struct ClearanceMarch<'a> {
    checker: &'a dyn ClearanceChecker,
    start: Point3<f64>,
    direction: Vector3<f64>,
    length: f64,
    nominal_step: f64,
    min_clearance: f64,
    traveled: f64,
    step: f64,
    done: bool,
}

impl ClearanceMarch<'_> {
    /// Total length of the segment being marched.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.length
    }

    /// Unit direction of the segment.
    #[must_use]
    pub const fn direction(&self) -> &Vector3<f64> {
        &self.direction
    }
}

impl Iterator for ClearanceMarch<'_> {
    type Item = MarchSample;

    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    fn next(&mut self) -> Option<MarchSample> {
        if self.done || self.traveled >= self.length {
            return None;
        }

        let position = self.start + self.direction * self.traveled;
        let collision = self.checker.check_collision_with_robot(&position);
        let clearance = self.checker.remaining_distance_to_collision(&position);

        let next_step = clearance.min(self.nominal_step);
        let touching = !(clearance >= self.min_clearance);
        // A step too small to move the pointer would never terminate.
        let stalled = !(self.traveled + next_step > self.traveled);
        let blocked = collision || touching || stalled;

        let sample = MarchSample {
            position,
            traveled: self.traveled,
            step: self.step,
            clearance,
            blocked,
        };

        if blocked {
            self.done = true;
        } else {
            self.traveled += next_step;
            self.step = next_step;
        }

        Some(sample)
    }
}

impl std::iter::FusedIterator for ClearanceMarch<'_> {}

/// Motion validator that samples the segment with clearance-sized steps.
///
/// Far from obstacles the march takes the nominal step (a fraction of the
/// checker's voxel size); near them each step shrinks to the clearance left
/// at the current sample, so thin obstacles cannot be stepped over. A
/// sample whose clearance falls below the configured minimum counts as a
/// collision. The goal is checked separately after the march.
///
/// On failure the last valid state is the sample before the blocked one,
/// which is the blocked sample stepped back by the step that reached it.
///
/// # Example
///
/// ```
/// use plan_collision::{
///     AdaptiveMotionValidator, CheckerConfig, DistanceFnValidityChecker, MotionConfig,
///     MotionValidator,
/// };
/// use nalgebra::Point3;
///
/// // A wall at x = 1.
/// let checker = DistanceFnValidityChecker::new(
///     |p: &Point3<f64>| 1.0 - p.x,
///     0.1,
///     &CheckerConfig::new(0.2),
/// )
/// .unwrap();
/// let validator = AdaptiveMotionValidator::new(&checker, &MotionConfig::default()).unwrap();
///
/// assert!(validator.check_motion(&Point3::origin(), &Point3::new(0.5, 0.0, 0.0)));
///
/// let result = validator.check_motion_detailed(&Point3::origin(), &Point3::new(2.0, 0.0, 0.0));
/// let last = result.last_valid().unwrap();
/// assert!(last.state.x < 0.8 && last.fraction < 0.4);
/// ```
pub struct AdaptiveMotionValidator<'a> {
    checker: &'a dyn ClearanceChecker,
    nominal_step: f64,
    min_clearance: f64,
}

impl<'a> AdaptiveMotionValidator<'a> {
    /// Creates a validator over `checker`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(checker: &'a dyn ClearanceChecker, config: &MotionConfig) -> Result<Self, CollisionError> {
        CollisionError::from_issues(config.validate())?;

        let nominal_step = config.step_ratio() * checker.voxel_size();
        debug!(
            nominal_step,
            min_clearance = config.min_clearance(),
            "Created adaptive motion validator"
        );

        Ok(Self {
            checker,
            nominal_step,
            min_clearance: config.min_clearance(),
        })
    }

    /// Returns the nominal step length.
    #[must_use]
    pub const fn nominal_step(&self) -> f64 {
        self.nominal_step
    }

    /// Returns the clearance below which the march stops.
    #[must_use]
    pub const fn min_clearance(&self) -> f64 {
        self.min_clearance
    }

    /// Returns the march from `s1` toward `s2`.
    ///
    /// Yields nothing for segments that are degenerate or non-finite.
    #[must_use]
    pub fn march(&self, s1: &Point3<f64>, s2: &Point3<f64>) -> ClearanceMarch<'a> {
        let segment = s2 - s1;
        let length = segment.norm();
        let degenerate = !(length.is_finite() && length >= MIN_SEGMENT_LENGTH);
        let direction = if degenerate { Vector3::zeros() } else { segment / length };

        ClearanceMarch {
            checker: self.checker,
            start: *s1,
            direction,
            length,
            nominal_step: self.nominal_step,
            min_clearance: self.min_clearance,
            traveled: 0.0,
            step: 0.0,
            done: degenerate,
        }
    }
}

impl MotionValidator for AdaptiveMotionValidator<'_> {
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

        let march = self.march(s1, s2);
        let direction = *march.direction();
        let mut reached = 0.0;

        for sample in march {
            if sample.blocked {
                let backstep = (sample.traveled - sample.step).max(0.0);
                let fraction = backstep / length;
                trace!(
                    traveled = sample.traveled,
                    clearance = sample.clearance,
                    fraction,
                    "Motion collides during march"
                );
                return MotionValidity::Invalid(LastValid {
                    state: s1 + direction * backstep,
                    fraction,
                });
            }
            reached = sample.traveled;
        }

        if self.checker.check_collision_with_robot(s2) {
            let fraction = reached / length;
            trace!(fraction, "Motion collides at goal");
            return MotionValidity::Invalid(LastValid {
                state: s1 + direction * reached,
                fraction,
            });
        }

        MotionValidity::Valid
    }
}
