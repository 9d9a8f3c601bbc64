//! Scene synthesis kernel: drives the tile solver, replays its captured
//! states, and turns assignments into instance batches.
//!
//! # Invariants
//! - A generation makes at most [`MAX_ATTEMPTS`] solver attempts.
//! - Exactly one batch per catalog mesh exists for every displayed state,
//!   and old batches are destroyed before new ones are created.
//! - A failed generation leaves the displayed scene untouched.
//! - The playback cursor never decreases during timed playback and never
//!   exceeds the history length.

pub mod batches;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod lights;
pub mod playback;
pub mod transform;

pub use batches::{BatchEvent, InstanceBatchSet, InstanceRaw, SceneInstanceBatch};
pub use config::{ConfigError, SynthesisConfig};
pub use controller::{SceneEvent, SynthesisController};
pub use driver::{MAX_ATTEMPTS, RunCapture, SolverDriver};
pub use error::SynthError;
pub use lights::{PointLight, collect_point_lights};
pub use playback::{Frame, Playback, PlaybackState, TimerHandle};
pub use transform::{InstanceMap, VoxelTransformer};

pub fn crate_info() -> &'static str {
    "voxscape-kernel v0.1.0"
}
