//! Block-sparse voxel distance fields for collision checking.
//!
//! This crate is the spatial layer underneath planning: it stores voxelized
//! distance fields and answers the geometric queries a collision checker
//! needs, without knowing anything about robots or planners.
//!
//! - [`Layer`] - Sparse map of dense [`Block`]s of voxels
//! - [`TsdfVoxel`] / [`EsdfVoxel`] - Weighted truncated and Euclidean signed distance voxels
//! - [`GridIndex`] - Integer lattice index, also used for block and block-local indices
//! - [`sphere_around_point`] - Voxels within a radius, grouped by block
//! - [`cast_ray`] - Gap-free voxel traversal of a line segment
//! - [`Interpolator`] - Nearest or trilinear ESDF distance lookups
//! - [`SignedDistanceField`] / [`WeightedDistanceField`] - Read-only query traits
//!
//! # Coordinate Systems
//!
//! World coordinates are continuous `f64` values. Grid indices are discrete
//! `i32` values with `index = floor(position / voxel_size)` and the lattice
//! point of an index at `index * voxel_size`. Blocks hold
//! `voxels_per_side³` voxels and are addressed by floor division of the
//! global index.
//!
//! # Example
//!
//! ```
//! use cf_field::{EsdfVoxel, GridIndex, Layer, SignedDistanceField};
//! use nalgebra::Point3;
//!
//! let mut layer: Layer<EsdfVoxel> = Layer::new(0.1, 16);
//! layer.set_voxel(GridIndex::new(3, 0, 0), EsdfVoxel::observed(0.25));
//!
//! let d = layer.distance_at_point(&Point3::new(0.3, 0.0, 0.0), false);
//! assert_eq!(d, Some(0.25));
//!
//! // Outside any allocated block there is no answer.
//! assert_eq!(layer.distance_at_point(&Point3::new(9.0, 9.0, 9.0), false), None);
//! ```
//!
//! # Concurrency
//!
//! All query paths take `&self`. Layers are `Sync` whenever their voxel type
//! is, so one layer can serve many planning threads at once.

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod block;
mod error;
mod field;
mod index;
mod interpolate;
mod layer;
mod raycast;
mod sphere;
mod voxel;

pub use block::Block;
pub use error::FieldError;
pub use field::{SignedDistanceField, VoxelLookup, WeightedDistanceField};
pub use index::{
    BlockIndex, COORDINATE_EPSILON, GridIndex, VoxelIndex, block_and_voxel_index,
    center_point_from_grid_index, global_index, grid_index_from_point,
    grid_index_from_scaled_point, point_from_grid_index,
};
pub use interpolate::Interpolator;
pub use layer::{DEFAULT_VOXEL_SIZE, DEFAULT_VOXELS_PER_SIDE, Layer, MAX_VOXELS_PER_SIDE};
pub use raycast::{SegmentTraversal, cast_ray};
pub use sphere::{HierarchicalIndexMap, sphere_around_point};
pub use voxel::{EsdfVoxel, TsdfVoxel};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
