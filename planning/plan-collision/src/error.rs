//! Error types for building checkers and validators.
//!
//! Queries never fail: every state or motion check resolves to a definite
//! answer through the policies documented on each checker. Errors only arise
//! when a checker or validator is constructed from unusable parameters.

/// Errors that can occur while constructing a checker or validator.
///
/// # Example
///
/// ```
/// use plan_collision::CollisionError;
///
/// let error = CollisionError::InvalidRobotRadius(-0.3);
/// assert!(error.to_string().contains("robot radius"));
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CollisionError {
    /// The robot radius must be finite and non-negative.
    #[error("robot radius must be finite and non-negative, got {0}")]
    InvalidRobotRadius(f64),

    /// The voxel size must be positive and finite.
    #[error("voxel size must be positive and finite, got {0}")]
    InvalidVoxelSize(f64),

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CollisionError {
    /// Creates an invalid configuration error with the given message.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Folds the issues reported by a config's `validate()` into a result.
    pub(crate) fn from_issues(issues: Vec<String>) -> Result<(), Self> {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Self::invalid_config(issues.join("; ")))
        }
    }
}

/// Checks that a voxel size is usable.
pub(crate) fn check_voxel_size(voxel_size: f64) -> Result<f64, CollisionError> {
    if voxel_size > 0.0 && voxel_size.is_finite() {
        Ok(voxel_size)
    } else {
        Err(CollisionError::InvalidVoxelSize(voxel_size))
    }
}
