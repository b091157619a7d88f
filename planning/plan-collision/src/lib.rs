//! State and motion validity checking for sampling-based planners.
//!
//! This crate answers the two questions a sampling-based planner (RRT,
//! RRT*, PRM) asks of the world, for a robot modelled as a sphere:
//!
//! - Is this state valid? See [`ValidityChecker`].
//! - Is the straight motion between two states valid, and if not, how far
//!   along can the robot get? See [`MotionValidator`].
//!
//! Both are answered against a voxel distance field from `cf-field`, or an
//! arbitrary distance function.
//!
//! # Checkers
//!
//! | Checker | Field | Unknown space |
//! |---------|-------|---------------|
//! | [`TsdfValidityChecker`] | weighted truncated distances | configurable, free by default |
//! | [`EsdfValidityChecker`] | Euclidean signed distances | always a collision |
//! | [`DistanceFnValidityChecker`] | caller's function | up to the function |
//!
//! # Motion Validators
//!
//! - [`GridMotionValidator`] checks every voxel the segment crosses. Works
//!   with any checker.
//! - [`AdaptiveMotionValidator`] marches along the segment with steps sized
//!   by the remaining clearance. Needs a [`ClearanceChecker`].
//!
//! # Example
//!
//! ```
//! use cf_field::{EsdfVoxel, GridIndex, Layer};
//! use plan_collision::{
//!     CheckerConfig, EsdfValidityChecker, GridMotionValidator, MotionConfig, MotionValidator,
//!     ValidityChecker,
//! };
//! use nalgebra::Point3;
//!
//! // A corridor of free space along x with an obstacle at x = 1.
//! let mut layer: Layer<EsdfVoxel> = Layer::new(0.1, 16);
//! for x in 0..=20 {
//!     let distance = if x == 10 { 0.0 } else { 1.0 };
//!     layer.set_voxel(GridIndex::new(x, 0, 0), EsdfVoxel::observed(distance));
//! }
//!
//! let checker = EsdfValidityChecker::new(&layer, &CheckerConfig::new(0.3)).unwrap();
//! assert!(!checker.is_valid(&Point3::new(1.0, 0.0, 0.0)));
//! assert!(checker.is_valid(&Point3::new(2.0, 0.0, 0.0)));
//!
//! let validator = GridMotionValidator::new(&checker, &MotionConfig::default()).unwrap();
//! let result = validator.check_motion_detailed(&Point3::origin(), &Point3::new(2.0, 0.0, 0.0));
//! assert!(!result.is_valid());
//! ```
//!
//! # Concurrency
//!
//! Checkers and validators are read-only after construction and every
//! query takes `&self`. Both traits require `Sync`, so a single instance
//! can be shared by reference across planning threads.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod checker;
mod config;
mod error;
mod motion;

pub use bounds::StateBounds;
pub use checker::{
    ClearanceChecker, DistanceFnValidityChecker, EsdfValidityChecker, TsdfValidityChecker,
    ValidityChecker,
};
pub use config::{
    CheckerConfig, DEFAULT_MIN_CLEARANCE, DEFAULT_STEP_RATIO, DEFAULT_WEIGHT_EPSILON,
    FractionSemantics, MotionConfig,
};
pub use error::CollisionError;
pub use motion::{
    AdaptiveMotionValidator, ClearanceMarch, GridMotionValidator, LastValid, MIN_SEGMENT_LENGTH,
    MarchSample, MotionValidator, MotionValidity,
};

// Re-export nalgebra types for convenience
pub use nalgebra::Point3;
