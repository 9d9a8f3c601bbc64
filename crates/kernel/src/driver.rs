use voxscape_solver::{SolverParams, SolverState, TileSolver};

use crate::error::SynthError;

/// Ceiling on solver attempts per generation.
pub const MAX_ATTEMPTS: u32 = 15;

/// Everything a successful generation hands back.
#[derive(Debug, Clone)]
pub struct RunCapture<T> {
    /// Final assignments of the winning attempt.
    pub output: SolverState,
    /// Snapshots of the winning attempt only; empty unless capture was on.
    pub history: Vec<T>,
    /// 1-based number of the winning attempt.
    pub attempts: u32,
}

/// Bounded retry loop around an opaque [`TileSolver`].
pub struct SolverDriver<S: TileSolver> {
    solver: S,
}

impl<S: TileSolver> SolverDriver<S> {
    pub fn new(solver: S) -> Self {
        Self { solver }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut S {
        &mut self.solver
    }

    pub fn into_inner(self) -> S {
        self.solver
    }

    /// Reset the solver and run up to [`MAX_ATTEMPTS`] attempts, returning on
    /// the first success.
    ///
    /// Each `run()` starts from fresh solver state, so snapshots of a failed
    /// attempt are gone by the time the next attempt finishes.
    pub fn generate(&mut self, params: &SolverParams) -> Result<RunCapture<S::Snapshot>, SynthError> {
        let _span = tracing::info_span!(
            "generate",
            name = %params.name,
            x = params.dims.x(),
            y = params.dims.y(),
            z = params.dims.z()
        )
        .entered();

        self.solver.reset(params);
        for attempt in 1..=MAX_ATTEMPTS {
            if !self.solver.run() {
                tracing::error!(attempt, "failed to generate scene: contradiction");
                continue;
            }
            let Some(output) = self.solver.output() else {
                tracing::error!(attempt, "solver reported success without output");
                continue;
            };
            let history = if params.debug_capture {
                self.solver.take_states()
            } else {
                Vec::new()
            };
            tracing::info!(
                attempts = attempt,
                states = history.len(),
                "generated scene, recorded {} states",
                history.len()
            );
            return Ok(RunCapture {
                output,
                history,
                attempts: attempt,
            });
        }
        tracing::error!(attempts = MAX_ATTEMPTS, "giving up on generation");
        Err(SynthError::Contradiction {
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Expand a captured snapshot into assignments.
    pub fn expand(&self, snapshot: &S::Snapshot) -> SolverState {
        self.solver.transform_state(snapshot)
    }
}
