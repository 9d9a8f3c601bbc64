//! Developer tooling: scene inspector and tile statistics.
//!
//! # Invariants
//! - Tools only read controller state.

pub mod inspector;

pub use inspector::{BatchInfo, SceneInspector, SceneSummary};

pub fn crate_info() -> &'static str {
    "voxscape-tools v0.1.0"
}
