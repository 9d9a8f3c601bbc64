//! Shared types: grid dimensions and coordinates, tile identifiers, transforms.
//!
//! # Invariants
//! - Grid dimensions are validated once at construction (4..=16 per axis).
//! - A `GridCoord` produced by `GridDims` iteration is always in bounds.

pub mod grid;
pub mod types;

pub use grid::{Face, GridCoord, GridDims, GridError, MAX_GRID_AXIS, MIN_GRID_AXIS};
pub use types::{TileId, Transform, axis_angle_quat};

pub fn crate_info() -> &'static str {
    "voxscape-common v0.1.0"
}
