//! Property-based tests for motion validation.
//!
//! Obstacles are random spheres behind a distance function, so the field is
//! exact and 1-Lipschitz.
//!
//! Run with: cargo test -p plan-collision -- proptest

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use nalgebra::Point3;
use plan_collision::{
    AdaptiveMotionValidator, CheckerConfig, DistanceFnValidityChecker, GridMotionValidator,
    MarchSample, MotionConfig, MotionValidator, ValidityChecker,
};
use proptest::prelude::*;

const VOXEL_SIZE: f64 = 0.1;

// =============================================================================
// Strategies
// =============================================================================

/// A point inside the test volume.
fn arb_point() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-3.0..3.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// One to four spherical obstacles.
fn arb_obstacles() -> impl Strategy<Value = Vec<(Point3<f64>, f64)>> {
    prop::collection::vec((arb_point(), 0.1..0.8f64), 1..5)
}

/// Distance to the nearest obstacle surface.
fn sphere_field(obstacles: Vec<(Point3<f64>, f64)>) -> impl Fn(&Point3<f64>) -> f64 + Sync {
    move |p: &Point3<f64>| {
        obstacles
            .iter()
            .map(|(center, radius)| (p - center).norm() - radius)
            .fold(f64::INFINITY, f64::min)
    }
}

// =============================================================================
// Adaptive march
// =============================================================================

proptest! {
    #[test]
    fn proptest_march_samples_are_at_most_nominal_apart(
        obstacles in arb_obstacles(),
        robot_radius in 0.0..0.4f64,
        a in arb_point(),
        b in arb_point(),
    ) {
        let checker = DistanceFnValidityChecker::new(
            sphere_field(obstacles),
            VOXEL_SIZE,
            &CheckerConfig::new(robot_radius),
        )
        .unwrap();
        let validator = AdaptiveMotionValidator::new(&checker, &MotionConfig::default()).unwrap();
        let nominal = validator.nominal_step();

        let samples: Vec<MarchSample> = validator.march(&a, &b).collect();
        for pair in samples.windows(2) {
            prop_assert!(pair[1].step <= nominal);
            prop_assert!((pair[1].position - pair[0].position).norm() <= nominal + 1e-9);
        }
    }

    #[test]
    fn proptest_march_steps_follow_clearance(
        obstacles in arb_obstacles(),
        robot_radius in 0.0..0.4f64,
        a in arb_point(),
        b in arb_point(),
    ) {
        let checker = DistanceFnValidityChecker::new(
            sphere_field(obstacles),
            VOXEL_SIZE,
            &CheckerConfig::new(robot_radius),
        )
        .unwrap();
        let validator = AdaptiveMotionValidator::new(&checker, &MotionConfig::default()).unwrap();
        let nominal = validator.nominal_step();

        let samples: Vec<MarchSample> = validator.march(&a, &b).collect();
        let mut taken: Vec<(f64, f64)> = samples
            .windows(2)
            .map(|pair| (pair[0].clearance, pair[1].step))
            .collect();

        // Each step is the clearance where it was taken, capped at the nominal step.
        for &(clearance, step) in &taken {
            prop_assert_eq!(step, clearance.min(nominal));
        }

        // So less clearance never means a longer step.
        taken.sort_by(|x, y| x.0.total_cmp(&y.0));
        for pair in taken.windows(2) {
            prop_assert!(pair[0].1 <= pair[1].1);
        }
    }

    #[test]
    fn proptest_failure_reports_valid_state(
        obstacles in arb_obstacles(),
        robot_radius in 0.0..0.4f64,
        a in arb_point(),
        b in arb_point(),
    ) {
        let checker = DistanceFnValidityChecker::new(
            sphere_field(obstacles),
            VOXEL_SIZE,
            &CheckerConfig::new(robot_radius),
        )
        .unwrap();
        let config = MotionConfig::default();
        let grid = GridMotionValidator::new(&checker, &config).unwrap();
        let adaptive = AdaptiveMotionValidator::new(&checker, &config).unwrap();
        let validators: [&dyn MotionValidator; 2] = [&grid, &adaptive];

        for validator in validators {
            if let Some(last) = validator.check_motion_detailed(&a, &b).last_valid() {
                prop_assert!((0.0..=1.0).contains(&last.fraction));
                if last.fraction > 0.0 {
                    prop_assert!(checker.is_valid(&last.state));
                }
            }
        }
    }
}

// =============================================================================
// Radius monotonicity and degenerate segments
// =============================================================================

proptest! {
    #[test]
    fn proptest_larger_radius_never_validates(
        obstacles in arb_obstacles(),
        small in 0.0..0.3f64,
        extra in 0.05..0.3f64,
        a in arb_point(),
        b in arb_point(),
    ) {
        let config = MotionConfig::default();
        let small_checker = DistanceFnValidityChecker::new(
            sphere_field(obstacles.clone()),
            VOXEL_SIZE,
            &CheckerConfig::new(small),
        )
        .unwrap();
        let large_checker = DistanceFnValidityChecker::new(
            sphere_field(obstacles),
            VOXEL_SIZE,
            &CheckerConfig::new(small + extra),
        )
        .unwrap();

        prop_assert!(small_checker.is_valid(&a) || !large_checker.is_valid(&a));

        let small_grid = GridMotionValidator::new(&small_checker, &config).unwrap();
        let large_grid = GridMotionValidator::new(&large_checker, &config).unwrap();
        prop_assert!(small_grid.check_motion(&a, &b) || !large_grid.check_motion(&a, &b));

        let small_adaptive = AdaptiveMotionValidator::new(&small_checker, &config).unwrap();
        let large_adaptive = AdaptiveMotionValidator::new(&large_checker, &config).unwrap();
        prop_assert!(small_adaptive.check_motion(&a, &b) || !large_adaptive.check_motion(&a, &b));
    }

    #[test]
    fn proptest_zero_length_motion_is_state_validity(
        obstacles in arb_obstacles(),
        robot_radius in 0.0..0.4f64,
        a in arb_point(),
    ) {
        let checker = DistanceFnValidityChecker::new(
            sphere_field(obstacles),
            VOXEL_SIZE,
            &CheckerConfig::new(robot_radius),
        )
        .unwrap();
        let config = MotionConfig::default();
        let grid = GridMotionValidator::new(&checker, &config).unwrap();
        let adaptive = AdaptiveMotionValidator::new(&checker, &config).unwrap();

        prop_assert_eq!(grid.check_motion(&a, &a), checker.is_valid(&a));
        prop_assert_eq!(adaptive.check_motion(&a, &a), checker.is_valid(&a));
    }
}
