//! Voxel payloads stored in a [`Layer`](crate::Layer).

/// A voxel of a truncated signed distance field.
///
/// The distance is only meaningful near a surface. `weight` accumulates
/// observation confidence: a weight of zero means the voxel was never seen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TsdfVoxel {
    /// Signed distance to the nearest surface; non-positive is on or inside it.
    pub distance: f32,
    /// Observation weight.
    pub weight: f32,
}

impl TsdfVoxel {
    /// Creates an observed voxel.
    #[must_use]
    pub const fn new(distance: f32, weight: f32) -> Self {
        Self { distance, weight }
    }

    /// Returns `true` if the weight reaches `epsilon`.
    #[must_use]
    pub fn is_observed(&self, epsilon: f32) -> bool {
        self.weight >= epsilon
    }
}

/// A voxel of a Euclidean signed distance field.
///
/// Every observed voxel stores the full signed distance to the nearest
/// obstacle surface: positive in free space, non-positive inside.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EsdfVoxel {
    /// Signed distance to the nearest obstacle surface.
    pub distance: f32,
    /// Whether the distance has been computed for this voxel.
    pub observed: bool,
}

impl EsdfVoxel {
    /// Creates an observed voxel with the given distance.
    #[must_use]
    pub const fn observed(distance: f32) -> Self {
        Self {
            distance,
            observed: true,
        }
    }
}
