//! Error types for voxel field construction.

/// Errors that can occur while building a voxel field.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FieldError {
    /// The voxel size must be positive and finite.
    #[error("voxel size must be positive and finite, got {0}")]
    InvalidVoxelSize(f64),

    /// A block must hold at least one voxel per side.
    #[error("voxels per side must be at least 1, got {0}")]
    InvalidVoxelsPerSide(usize),

    /// The block edge length does not fit in grid index arithmetic.
    #[error("voxels per side {0} exceeds the supported index range")]
    VoxelsPerSideOverflow(usize),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_voxel_size_display() {
        let error = FieldError::InvalidVoxelSize(-0.5);
        let msg = error.to_string();
        assert!(msg.contains("voxel size"));
        assert!(msg.contains("-0.5"));
    }

    #[test]
    fn test_invalid_voxels_per_side_display() {
        let error = FieldError::InvalidVoxelsPerSide(0);
        assert!(error.to_string().contains("at least 1"));
    }

    #[test]
    fn test_overflow_display() {
        let error = FieldError::VoxelsPerSideOverflow(usize::MAX);
        assert!(error.to_string().contains("index range"));
    }
}
