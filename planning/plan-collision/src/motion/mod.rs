//! Motion validation along straight segments.
//!
//! A [`MotionValidator`] decides whether a robot can move in a straight line
//! between two states, and on failure reports how far it got:
//!
//! - [`GridMotionValidator`] - Checks every voxel the segment crosses
//! - [`AdaptiveMotionValidator`] - Marches with steps sized by clearance
//!
//! Validation is directional. The reported fraction is measured from the
//! first state, so `(a, b)` and `(b, a)` can report different failures for
//! the same segment.

mod adaptive;
mod grid;

pub use adaptive::{AdaptiveMotionValidator, ClearanceMarch, MarchSample};
pub use grid::GridMotionValidator;

use nalgebra::Point3;

/// Segments shorter than this are treated as a single state.
pub const MIN_SEGMENT_LENGTH: f64 = 1e-9;

/// The last state known to be valid on a failed motion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LastValid {
    /// The state itself.
    pub state: Point3<f64>,
    /// Progress along the segment before failure, in `[0, 1]`.
    pub fraction: f64,
}

/// Outcome of validating a motion.
///
/// # Example
///
/// ```
/// use plan_collision::{LastValid, MotionValidity};
/// use nalgebra::Point3;
///
/// let blocked = MotionValidity::Invalid(LastValid {
///     state: Point3::new(0.4, 0.0, 0.0),
///     fraction: 0.2,
/// });
/// assert!(!blocked.is_valid());
/// assert_eq!(blocked.last_valid().map(|l| l.fraction), Some(0.2));
/// assert!(MotionValidity::Valid.last_valid().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionValidity {
    /// The whole segment, goal included, is collision-free.
    Valid,
    /// The segment collides somewhere.
    Invalid(LastValid),
}

impl MotionValidity {
    /// Returns `true` if the motion is valid.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the last valid state of an invalid motion.
    #[must_use]
    pub const fn last_valid(&self) -> Option<&LastValid> {
        match self {
            Self::Valid => None,
            Self::Invalid(last) => Some(last),
        }
    }

    /// An invalid motion that made no progress from `start`.
    pub(crate) const fn blocked_at(start: Point3<f64>) -> Self {
        Self::Invalid(LastValid {
            state: start,
            fraction: 0.0,
        })
    }
}

/// Segment-wise collision checking.
///
/// Calls are independent and read-only, so one validator can serve many
/// planning threads.
pub trait MotionValidator: Sync {
    /// Validates the straight motion from `s1` to `s2`, reporting where it
    /// failed.
    fn check_motion_detailed(&self, s1: &Point3<f64>, s2: &Point3<f64>) -> MotionValidity;

    /// Returns `true` if the straight motion from `s1` to `s2` is valid.
    fn check_motion(&self, s1: &Point3<f64>, s2: &Point3<f64>) -> bool {
        self.check_motion_detailed(s1, s2).is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_at() {
        let validity = MotionValidity::blocked_at(Point3::new(1.0, 2.0, 3.0));
        let last = validity.last_valid().copied();
        assert_eq!(
            last,
            Some(LastValid {
                state: Point3::new(1.0, 2.0, 3.0),
                fraction: 0.0
            })
        );
    }

    #[test]
    fn test_valid_has_no_last_state() {
        assert!(MotionValidity::Valid.is_valid());
        assert_eq!(MotionValidity::Valid.last_valid(), None);
    }
}
