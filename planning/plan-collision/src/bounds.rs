//! The planner's declared state-space bounds.

use nalgebra::Point3;

/// Axis-aligned bounds on valid robot positions, inclusive on every face.
///
/// Checked before any geometric work: a state outside the bounds is invalid
/// regardless of the map.
///
/// # Example
///
/// ```
/// use plan_collision::StateBounds;
/// use nalgebra::Point3;
///
/// let bounds = StateBounds::new(Point3::new(-1.0, -1.0, 0.0), Point3::new(1.0, 1.0, 2.0));
/// assert!(bounds.contains(&Point3::new(1.0, 0.0, 0.5)));
/// assert!(!bounds.contains(&Point3::new(1.5, 0.0, 0.5)));
/// assert!(!bounds.contains(&Point3::new(f64::NAN, 0.0, 0.5)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateBounds {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl StateBounds {
    /// Creates bounds from two corners given in any order.
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Bounds that admit every finite position.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            min: Point3::from([f64::NEG_INFINITY; 3]),
            max: Point3::from([f64::INFINITY; 3]),
        }
    }

    /// Returns `true` if `point` is finite and inside the bounds.
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        point.iter().all(|c| c.is_finite())
            && point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

impl Default for StateBounds {
    fn default() -> Self {
        Self::unbounded()
    }
}
