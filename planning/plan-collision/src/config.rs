//! Configuration types for checkers and motion validators.
//!
//! # Example
//!
//! ```
//! use plan_collision::{CheckerConfig, FractionSemantics, MotionConfig};
//!
//! let checker = CheckerConfig::new(0.3)
//!     .with_treat_unknown_as_occupied(true)
//!     .with_interpolate(true);
//! assert!(checker.validate().is_empty());
//!
//! let motion = MotionConfig::default()
//!     .with_step_ratio(0.25)
//!     .with_fraction(FractionSemantics::EnumerationIndex);
//! assert!(motion.validate().is_empty());
//! ```

use crate::bounds::StateBounds;

/// Default observation weight below which a voxel counts as unobserved.
pub const DEFAULT_WEIGHT_EPSILON: f64 = 1e-6;

/// Default clearance below which the adaptive march treats the robot as touching.
///
/// This is the smallest gap between robot and obstacle the march can resolve.
pub const DEFAULT_MIN_CLEARANCE: f64 = 1e-2;

/// Default nominal step of the adaptive march, as a fraction of the voxel size.
pub const DEFAULT_STEP_RATIO: f64 = 0.5;

/// How a motion validator reports progress along a failed segment.
///
/// # Example
///
/// ```
/// use plan_collision::FractionSemantics;
///
/// assert_eq!(FractionSemantics::default(), FractionSemantics::Geometric);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FractionSemantics {
    /// Distance from the start to the last valid position, divided by the
    /// segment length.
    ///
    /// Both validators report the same quantity under this setting, and the
    /// reported position is one that was actually found valid.
    #[default]
    Geometric,

    /// Grid traversal reports the integer quotient of the colliding cell's
    /// position in the traversal and the traversal length, and the colliding
    /// cell's lattice point as the position.
    ///
    /// The quotient truncates to zero for every cell but one past the end, so
    /// the fraction is only useful for parity with callers that expect it.
    /// The adaptive validator ignores this setting.
    EnumerationIndex,
}

/// Configuration shared by all validity checkers.
///
/// # Example
///
/// ```
/// use plan_collision::{CheckerConfig, StateBounds};
/// use nalgebra::Point3;
///
/// let config = CheckerConfig::new(0.5)
///     .with_bounds(StateBounds::new(Point3::new(-10.0, -10.0, 0.0), Point3::new(10.0, 10.0, 3.0)));
/// assert!(!config.treat_unknown_as_occupied());
/// assert!(config.validate().is_empty());
///
/// let bad = CheckerConfig::new(-1.0);
/// assert_eq!(bad.validate().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckerConfig {
    /// Radius of the robot's bounding sphere.
    robot_radius: f64,
    /// Whether unobserved voxels count as occupied.
    treat_unknown_as_occupied: bool,
    /// Whether point lookups interpolate between voxel centers.
    interpolate: bool,
    /// Observation weight below which a voxel counts as unobserved.
    weight_epsilon: f64,
    /// Planner state-space bounds.
    bounds: StateBounds,
}

impl CheckerConfig {
    /// Creates a configuration for a robot of the given radius.
    ///
    /// Defaults:
    /// - Unknown space: free
    /// - Interpolation: off
    /// - Weight epsilon: [`DEFAULT_WEIGHT_EPSILON`]
    /// - Bounds: unbounded
    #[must_use]
    pub fn new(robot_radius: f64) -> Self {
        Self {
            robot_radius,
            treat_unknown_as_occupied: false,
            interpolate: false,
            weight_epsilon: DEFAULT_WEIGHT_EPSILON,
            bounds: StateBounds::unbounded(),
        }
    }

    /// Sets the robot radius.
    #[must_use]
    pub const fn with_robot_radius(mut self, radius: f64) -> Self {
        self.robot_radius = radius;
        self
    }

    /// Sets whether unobserved voxels count as occupied.
    #[must_use]
    pub const fn with_treat_unknown_as_occupied(mut self, occupied: bool) -> Self {
        self.treat_unknown_as_occupied = occupied;
        self
    }

    /// Sets whether point lookups interpolate.
    #[must_use]
    pub const fn with_interpolate(mut self, interpolate: bool) -> Self {
        self.interpolate = interpolate;
        self
    }

    /// Sets the observation weight threshold.
    #[must_use]
    pub const fn with_weight_epsilon(mut self, epsilon: f64) -> Self {
        self.weight_epsilon = epsilon;
        self
    }

    /// Sets the planner's state-space bounds.
    #[must_use]
    pub const fn with_bounds(mut self, bounds: StateBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Returns the robot radius.
    #[must_use]
    pub const fn robot_radius(&self) -> f64 {
        self.robot_radius
    }

    /// Returns whether unobserved voxels count as occupied.
    #[must_use]
    pub const fn treat_unknown_as_occupied(&self) -> bool {
        self.treat_unknown_as_occupied
    }

    /// Returns whether point lookups interpolate.
    #[must_use]
    pub const fn interpolate(&self) -> bool {
        self.interpolate
    }

    /// Returns the observation weight threshold.
    #[must_use]
    pub const fn weight_epsilon(&self) -> f64 {
        self.weight_epsilon
    }

    /// Returns the planner's state-space bounds.
    #[must_use]
    pub const fn bounds(&self) -> &StateBounds {
        &self.bounds
    }

    /// Validates the configuration and returns any issues.
    ///
    /// The robot radius is checked separately by the checkers so that it
    /// surfaces as its own error variant.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(self.robot_radius.is_finite() && self.robot_radius >= 0.0) {
            issues.push(format!(
                "robot_radius must be finite and non-negative, got {}",
                self.robot_radius
            ));
        }
        if !(self.weight_epsilon.is_finite() && self.weight_epsilon >= 0.0) {
            issues.push(format!(
                "weight_epsilon must be finite and non-negative, got {}",
                self.weight_epsilon
            ));
        }
        let min = self.bounds.min;
        let max = self.bounds.max;
        if min.iter().chain(max.iter()).any(|c| c.is_nan()) {
            issues.push("bounds must not contain NaN".to_string());
        } else if min.x > max.x || min.y > max.y || min.z > max.z {
            issues.push(format!("bounds min {min} exceeds max {max}"));
        }

        issues
    }
}

/// Configuration for motion validators.
///
/// # Example
///
/// ```
/// use plan_collision::MotionConfig;
///
/// let config = MotionConfig::default().with_min_clearance(0.05);
/// assert!(config.validate().is_empty());
///
/// // The march needs a positive cutoff to bound its step count.
/// assert!(!MotionConfig::default().with_min_clearance(0.0).validate().is_empty());
///
/// let bad = MotionConfig::default().with_step_ratio(0.0);
/// assert!(!bad.validate().is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionConfig {
    /// Nominal adaptive step as a fraction of the voxel size.
    step_ratio: f64,
    /// Clearance below which the adaptive march stops.
    min_clearance: f64,
    /// Fraction reporting for the grid validator.
    fraction: FractionSemantics,
}

impl MotionConfig {
    /// Creates a motion configuration with default settings.
    ///
    /// Defaults:
    /// - Step ratio: [`DEFAULT_STEP_RATIO`] (half a voxel)
    /// - Minimum clearance: [`DEFAULT_MIN_CLEARANCE`]
    /// - Fraction: [`FractionSemantics::Geometric`]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            step_ratio: DEFAULT_STEP_RATIO,
            min_clearance: DEFAULT_MIN_CLEARANCE,
            fraction: FractionSemantics::Geometric,
        }
    }

    /// Sets the nominal step as a fraction of the voxel size.
    #[must_use]
    pub const fn with_step_ratio(mut self, ratio: f64) -> Self {
        self.step_ratio = ratio;
        self
    }

    /// Sets the clearance below which the adaptive march stops.
    ///
    /// Must be positive: adaptive steps never shrink below this value, so
    /// it bounds the number of samples per unit of segment length.
    #[must_use]
    pub const fn with_min_clearance(mut self, clearance: f64) -> Self {
        self.min_clearance = clearance;
        self
    }

    /// Sets the fraction semantics of the grid validator.
    #[must_use]
    pub const fn with_fraction(mut self, fraction: FractionSemantics) -> Self {
        self.fraction = fraction;
        self
    }

    /// Returns the nominal step ratio.
    #[must_use]
    pub const fn step_ratio(&self) -> f64 {
        self.step_ratio
    }

    /// Returns the minimum clearance.
    #[must_use]
    pub const fn min_clearance(&self) -> f64 {
        self.min_clearance
    }

    /// Returns the fraction semantics.
    #[must_use]
    pub const fn fraction(&self) -> FractionSemantics {
        self.fraction
    }

    /// Validates the configuration and returns any issues.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(self.step_ratio.is_finite() && self.step_ratio > 0.0) {
            issues.push(format!(
                "step_ratio must be positive and finite, got {}",
                self.step_ratio
            ));
        }
        if !(self.min_clearance.is_finite() && self.min_clearance > 0.0) {
            issues.push(format!(
                "min_clearance must be positive and finite, got {}",
                self.min_clearance
            ));
        }

        issues
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_checker_config_defaults() {
        let config = CheckerConfig::new(0.3);
        assert_eq!(config.robot_radius(), 0.3);
        assert!(!config.treat_unknown_as_occupied());
        assert!(!config.interpolate());
        assert_eq!(config.weight_epsilon(), DEFAULT_WEIGHT_EPSILON);
        assert_eq!(*config.bounds(), StateBounds::unbounded());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_checker_config_builder() {
        let config = CheckerConfig::new(0.3)
            .with_robot_radius(0.4)
            .with_treat_unknown_as_occupied(true)
            .with_interpolate(true)
            .with_weight_epsilon(0.1);
        assert_eq!(config.robot_radius(), 0.4);
        assert!(config.treat_unknown_as_occupied());
        assert!(config.interpolate());
        assert_eq!(config.weight_epsilon(), 0.1);
    }

    #[test]
    fn test_checker_config_rejects_bad_radius() {
        for radius in [-0.1, f64::NAN, f64::INFINITY] {
            let issues = CheckerConfig::new(radius).validate();
            assert_eq!(issues.len(), 1, "radius {radius}");
            assert!(issues[0].contains("robot_radius"));
        }
        assert!(CheckerConfig::new(0.0).validate().is_empty());
    }

    #[test]
    fn test_checker_config_rejects_bad_bounds() {
        let inverted = StateBounds {
            min: Point3::new(1.0, 0.0, 0.0),
            max: Point3::new(0.0, 1.0, 1.0),
        };
        let issues = CheckerConfig::new(0.1).with_bounds(inverted).validate();
        assert_eq!(issues.len(), 1);

        let nan = StateBounds {
            min: Point3::new(f64::NAN, 0.0, 0.0),
            max: Point3::new(1.0, 1.0, 1.0),
        };
        let issues = CheckerConfig::new(0.1).with_bounds(nan).validate();
        assert!(issues[0].contains("NaN"));
    }

    #[test]
    fn test_checker_config_rejects_bad_epsilon() {
        let issues = CheckerConfig::new(0.1).with_weight_epsilon(-1.0).validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("weight_epsilon"));
    }

    #[test]
    fn test_motion_config_defaults() {
        let config = MotionConfig::default();
        assert_eq!(config.step_ratio(), DEFAULT_STEP_RATIO);
        assert_eq!(config.min_clearance(), DEFAULT_MIN_CLEARANCE);
        assert_eq!(config.fraction(), FractionSemantics::Geometric);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_motion_config_validate() {
        assert_eq!(MotionConfig::new().with_step_ratio(-0.5).validate().len(), 1);
        assert_eq!(MotionConfig::new().with_step_ratio(f64::NAN).validate().len(), 1);
        assert_eq!(
            MotionConfig::new()
                .with_step_ratio(0.0)
                .with_min_clearance(-1.0)
                .validate()
                .len(),
            2
        );
    }

    #[test]
    fn test_motion_config_requires_positive_min_clearance() {
        for clearance in [0.0, -0.0, -1e-3, f64::NAN, f64::INFINITY] {
            let issues = MotionConfig::new().with_min_clearance(clearance).validate();
            assert_eq!(issues.len(), 1, "min_clearance {clearance}");
            assert!(issues[0].contains("min_clearance"));
        }
        assert!(MotionConfig::new().with_min_clearance(1e-9).validate().is_empty());
    }
}
