//! Tile-placement solver: the contract the synthesis kernel drives, plus
//! implementations.
//!
//! The kernel only ever talks to [`TileSolver`]. [`WfcSolver`] is a compact
//! socket-adjacency wave function collapse used by the CLI; [`ScriptedSolver`]
//! replays a fixed success/failure script for deterministic tests.
//!
//! # Invariants
//! - `run()` always starts from a fresh wave; nothing crosses attempt boundaries.
//! - Captured states exist only when `debug_capture` is set, and only for the
//!   most recent attempt.
//! - A successful run's output assigns exactly one tile to every grid cell.

mod rng;
pub mod scripted;
mod state;
pub mod tileset;
pub mod wfc;

pub use rng::SplitMix64;
pub use scripted::{ScriptedAttempt, ScriptedSolver};
pub use state::{CapturedState, SolverParams, SolverState, TileSolver, VoxelAssignment};
pub use tileset::{Rotations, Socket, TileRule, TileSet, TileSetError};
pub use wfc::{WaveSnapshot, WfcSolver};

pub fn crate_info() -> &'static str {
    "voxscape-solver v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("solver"));
    }
}
