//! Deterministic stand-in solver.
//!
//! Plays back a fixed list of attempt outcomes so callers can exercise retry,
//! capture and playback paths without depending on random placement. The
//! produced grid is simple: ground on the floor layer, the first boundary tile
//! on the outer shell, and a rotating palette everywhere else.

use glam::{Quat, Vec3};
use voxscape_common::{GridDims, TileId};

use crate::state::{SolverParams, SolverState, TileSolver, VoxelAssignment};

/// Outcome of one scripted attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptedAttempt {
    pub succeeds: bool,
    /// Snapshots recorded during the attempt when capture is enabled.
    pub steps: usize,
}

impl ScriptedAttempt {
    pub fn success(steps: usize) -> Self {
        Self {
            succeeds: true,
            steps,
        }
    }

    pub fn failure(steps: usize) -> Self {
        Self {
            succeeds: false,
            steps,
        }
    }
}

pub struct ScriptedSolver {
    script: Vec<ScriptedAttempt>,
    palette: Vec<TileId>,
    params: Option<SolverParams>,
    /// Attempts performed since construction; indexes into `script`.
    runs: usize,
    resets: usize,
    states: Vec<SolverState>,
    output: Option<SolverState>,
}

impl ScriptedSolver {
    /// Attempts past the end of `script` fail with no steps.
    pub fn new(script: Vec<ScriptedAttempt>) -> Self {
        Self {
            script,
            palette: vec![
                TileId::from("WallStraight1"),
                TileId::from("empty"),
                TileId::from("WallCurved1"),
            ],
            params: None,
            runs: 0,
            resets: 0,
            states: Vec::new(),
            output: None,
        }
    }

    /// A solver that succeeds on its first attempt.
    pub fn always_succeeds(steps: usize) -> Self {
        Self::new(vec![ScriptedAttempt::success(steps)])
    }

    /// A solver whose first `failures` attempts contradict before one succeeds.
    pub fn succeeds_after(failures: usize, failed_steps: usize, steps: usize) -> Self {
        let mut script = vec![ScriptedAttempt::failure(failed_steps); failures];
        script.push(ScriptedAttempt::success(steps));
        Self::new(script)
    }

    /// Interior tiles cycle through `palette` instead of the default walls.
    pub fn with_palette(mut self, palette: Vec<TileId>) -> Self {
        if !palette.is_empty() {
            self.palette = palette;
        }
        self
    }

    /// Append more attempts to the script, e.g. between two generations.
    pub fn extend_script(&mut self, attempts: impl IntoIterator<Item = ScriptedAttempt>) {
        self.script.extend(attempts);
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn resets(&self) -> usize {
        self.resets
    }

    fn full_grid(&self, p: &SolverParams, attempt: usize) -> SolverState {
        let dims: GridDims = p.dims;
        dims.iter()
            .enumerate()
            .map(|(i, c)| {
                let tile = if c.z == 0 {
                    p.ground_tile.clone()
                } else if dims.is_boundary(c, p.wrap_edges) {
                    p.boundary_tiles
                        .first()
                        .cloned()
                        .unwrap_or_else(|| TileId::from("empty"))
                } else {
                    self.palette[(i + attempt) % self.palette.len()].clone()
                };
                VoxelAssignment {
                    coord: c,
                    tile,
                    orientation: Quat::from_rotation_z((i % 4) as f32 * std::f32::consts::FRAC_PI_2),
                    scale: Vec3::ONE,
                }
            })
            .collect()
    }
}

impl TileSolver for ScriptedSolver {
    type Snapshot = SolverState;

    fn reset(&mut self, params: &SolverParams) {
        self.params = Some(params.clone());
        self.resets += 1;
        self.states.clear();
        self.output = None;
    }

    fn run(&mut self) -> bool {
        self.states.clear();
        self.output = None;
        let attempt = self.runs;
        self.runs += 1;
        let Some(p) = self.params.clone() else {
            return false;
        };
        let outcome = self
            .script
            .get(attempt)
            .copied()
            .unwrap_or(ScriptedAttempt::failure(0));

        let grid = self.full_grid(&p, attempt);
        if p.debug_capture && outcome.steps > 0 {
            // Each step reveals a longer prefix of the grid; the last step is
            // the complete grid.
            let n = grid.len();
            for step in 1..=outcome.steps {
                let take = if outcome.succeeds {
                    n * step / outcome.steps
                } else {
                    (n * step / outcome.steps).min(n.saturating_sub(1))
                };
                self.states
                    .push(grid.iter().take(take).cloned().collect());
            }
        }
        if outcome.succeeds {
            self.output = Some(grid);
        }
        outcome.succeeds
    }

    fn states(&self) -> &[SolverState] {
        &self.states
    }

    fn take_states(&mut self) -> Vec<SolverState> {
        std::mem::take(&mut self.states)
    }

    fn output(&self) -> Option<SolverState> {
        self.output.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CapturedState;

    fn params(debug_capture: bool) -> SolverParams {
        SolverParams {
            name: "scripted".into(),
            seed: None,
            dims: GridDims::new(4, 4, 4).unwrap(),
            wrap_edges: false,
            ground_tile: TileId::from("ground"),
            boundary_tiles: vec![TileId::from("empty")],
            debug_capture,
        }
    }

    #[test]
    fn follows_script_then_fails() {
        let mut s = ScriptedSolver::succeeds_after(2, 3, 5);
        s.reset(&params(false));
        assert!(!s.run());
        assert!(!s.run());
        assert!(s.run());
        assert!(!s.run());
        assert_eq!(s.runs(), 4);
    }

    #[test]
    fn success_output_covers_grid() {
        let mut s = ScriptedSolver::always_succeeds(4);
        let p = params(true);
        s.reset(&p);
        assert!(s.run());
        let out = s.output().unwrap();
        assert!(out.covers(p.dims));
        assert_eq!(s.states().len(), 4);
        assert_eq!(s.states()[3].to_state(), out);
    }

    #[test]
    fn no_capture_without_debug() {
        let mut s = ScriptedSolver::always_succeeds(4);
        s.reset(&params(false));
        assert!(s.run());
        assert!(s.states().is_empty());
    }

    #[test]
    fn failed_attempt_has_no_output() {
        let mut s = ScriptedSolver::new(vec![ScriptedAttempt::failure(6)]);
        s.reset(&params(true));
        assert!(!s.run());
        assert!(s.output().is_none());
        assert_eq!(s.states().len(), 6);
    }
}
