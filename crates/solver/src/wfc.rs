//! Reference wave function collapse solver over a [`TileSet`].

use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;
use voxscape_common::{Face, GridDims};

use crate::rng::SplitMix64;
use crate::state::{CapturedState, SolverParams, SolverState, TileSolver, VoxelAssignment};
use crate::tileset::TileSet;

/// Marker for a cell that has not collapsed yet in a [`WaveSnapshot`].
const UNDECIDED: u8 = u8::MAX;

/// Compact capture of the wave after one collapse step: the chosen variant per
/// cell, or undecided.
#[derive(Debug, Clone)]
pub struct WaveSnapshot {
    tiles: Arc<TileSet>,
    dims: GridDims,
    cells: Vec<u8>,
}

impl WaveSnapshot {
    /// Number of collapsed cells.
    pub fn collapsed(&self) -> usize {
        self.cells.iter().filter(|&&c| c != UNDECIDED).count()
    }
}

impl CapturedState for WaveSnapshot {
    fn to_state(&self) -> SolverState {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != UNDECIDED)
            .map(|(i, &v)| assignment(&self.tiles, self.dims, i, v as usize))
            .collect()
    }
}

/// Socket-adjacency WFC: floor layer pinned to the ground tile, outer shell
/// pinned to the boundary tiles, everything else collapsed by minimum
/// remaining options with weighted random choice.
pub struct WfcSolver {
    tiles: Arc<TileSet>,
    params: Option<SolverParams>,
    rng: SplitMix64,
    wave: Vec<u64>,
    states: Vec<WaveSnapshot>,
    solved: bool,
}

impl WfcSolver {
    pub fn new(tiles: TileSet) -> Self {
        Self {
            tiles: Arc::new(tiles),
            params: None,
            rng: SplitMix64::new(0),
            wave: Vec::new(),
            states: Vec::new(),
            solved: false,
        }
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    /// Initial domain per cell before propagation.
    fn initial_wave(&self, p: &SolverParams) -> Vec<u64> {
        let full = self.tiles.full_mask();
        let ground = self.tiles.mask_of([&p.ground_tile]);
        let boundary = self.tiles.mask_of(&p.boundary_tiles);
        p.dims
            .iter()
            .map(|c| {
                if c.z == 0 {
                    ground
                } else if p.dims.is_boundary(c, p.wrap_edges) {
                    boundary
                } else {
                    full
                }
            })
            .collect()
    }

    /// Arc-consistency propagation from the cells on `stack`.
    /// Returns false when some cell loses every option.
    fn propagate(&mut self, p: &SolverParams, mut stack: Vec<usize>) -> bool {
        while let Some(i) = stack.pop() {
            let c = p.dims.coord(i);
            for face in Face::ALL {
                let Some(n) = p.dims.neighbor(c, face, p.wrap_edges) else {
                    continue;
                };
                let j = p.dims.index(n);
                let allowed = self.tiles.allowed_across(self.wave[i], face);
                let narrowed = self.wave[j] & allowed;
                if narrowed != self.wave[j] {
                    if narrowed == 0 {
                        return false;
                    }
                    self.wave[j] = narrowed;
                    stack.push(j);
                }
            }
        }
        true
    }

    /// Undecided cell with the fewest options, ties broken at random.
    fn pick_cell(&mut self) -> Option<usize> {
        let mut best = u32::MAX;
        let mut ties = Vec::new();
        for (i, &mask) in self.wave.iter().enumerate() {
            let n = mask.count_ones();
            if n <= 1 {
                continue;
            }
            if n < best {
                best = n;
                ties.clear();
            }
            if n == best {
                ties.push(i);
            }
        }
        if ties.is_empty() {
            None
        } else {
            Some(ties[self.rng.below(ties.len())])
        }
    }

    /// Weighted choice among the variants in `mask`.
    fn pick_variant(&mut self, mask: u64) -> usize {
        let options: Vec<usize> = (0..self.tiles.variant_count())
            .filter(|v| mask & (1 << v) != 0)
            .collect();
        let total: f32 = options.iter().map(|&v| self.tiles.tile_of(v).weight).sum();
        let mut r = self.rng.next_f32() * total;
        for &v in &options {
            r -= self.tiles.tile_of(v).weight;
            if r < 0.0 {
                return v;
            }
        }
        options[options.len() - 1]
    }

    fn capture(&mut self, dims: GridDims) {
        let cells = self
            .wave
            .iter()
            .map(|&m| {
                if m.count_ones() == 1 {
                    m.trailing_zeros() as u8
                } else {
                    UNDECIDED
                }
            })
            .collect();
        self.states.push(WaveSnapshot {
            tiles: Arc::clone(&self.tiles),
            dims,
            cells,
        });
    }
}

impl TileSolver for WfcSolver {
    type Snapshot = WaveSnapshot;

    fn reset(&mut self, params: &SolverParams) {
        self.rng = match params.seed {
            Some(seed) => SplitMix64::new(seed),
            None => SplitMix64::from_clock(),
        };
        self.params = Some(params.clone());
        self.wave.clear();
        self.states.clear();
        self.solved = false;
    }

    fn run(&mut self) -> bool {
        self.states.clear();
        self.solved = false;
        let Some(p) = self.params.clone() else {
            tracing::warn!("solver run without parameters");
            return false;
        };
        let _span = tracing::debug_span!("wfc_run", name = %p.name).entered();

        self.wave = self.initial_wave(&p);
        if self.wave.contains(&0) {
            tracing::warn!(
                ground = %p.ground_tile,
                "ground or boundary tiles are missing from the tile set"
            );
            return false;
        }
        if !self.propagate(&p, (0..self.wave.len()).collect()) {
            return false;
        }
        if p.debug_capture {
            self.capture(p.dims);
        }

        while let Some(i) = self.pick_cell() {
            let v = self.pick_variant(self.wave[i]);
            self.wave[i] = 1 << v;
            if !self.propagate(&p, vec![i]) {
                tracing::trace!(cell = i, "contradiction");
                return false;
            }
            if p.debug_capture {
                self.capture(p.dims);
            }
        }

        self.solved = true;
        true
    }

    fn states(&self) -> &[WaveSnapshot] {
        &self.states
    }

    fn take_states(&mut self) -> Vec<WaveSnapshot> {
        std::mem::take(&mut self.states)
    }

    fn output(&self) -> Option<SolverState> {
        let p = self.params.as_ref()?;
        if !self.solved {
            return None;
        }
        Some(
            self.wave
                .iter()
                .enumerate()
                .map(|(i, &m)| assignment(&self.tiles, p.dims, i, m.trailing_zeros() as usize))
                .collect(),
        )
    }
}

fn assignment(tiles: &TileSet, dims: GridDims, cell: usize, variant: usize) -> VoxelAssignment {
    let v = &tiles.variants()[variant];
    VoxelAssignment {
        coord: dims.coord(cell),
        tile: tiles.tile_of(variant).id.clone(),
        orientation: Quat::from_rotation_z(f32::from(v.turns) * FRAC_PI_2),
        scale: Vec3::ONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tileset::{Rotations, TileRule};
    use voxscape_common::TileId;

    fn params(seed: u64, debug_capture: bool) -> SolverParams {
        SolverParams {
            name: "test".into(),
            seed: Some(seed),
            dims: GridDims::new(8, 8, 4).unwrap(),
            wrap_edges: false,
            ground_tile: TileId::from("ground"),
            boundary_tiles: vec![TileId::from("empty")],
            debug_capture,
        }
    }

    fn solve(p: &SolverParams) -> WfcSolver {
        let mut solver = WfcSolver::new(TileSet::castle());
        solver.reset(p);
        assert!((0..15).any(|_| solver.run()), "castle set failed 15 times");
        solver
    }

    #[test]
    fn output_covers_grid_with_ground_floor() {
        let p = params(42, false);
        let solver = solve(&p);
        let out = solver.output().unwrap();
        assert!(out.covers(p.dims));
        for a in &out {
            if a.coord.z == 0 {
                assert_eq!(a.tile.as_str(), "ground");
            }
            if p.dims.is_boundary(a.coord, false) && a.coord.z > 0 {
                assert_eq!(a.tile.as_str(), "empty");
            }
        }
        assert!(solver.states().is_empty());
    }

    #[test]
    fn same_seed_same_output() {
        let p = params(7, false);
        let a = solve(&p).output().unwrap();
        let b = solve(&p).output().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn capture_grows_monotonically_and_ends_at_output() {
        let p = params(3, true);
        let solver = solve(&p);
        let states = solver.states();
        assert!(!states.is_empty());
        for pair in states.windows(2) {
            assert!(pair[0].collapsed() < pair[1].collapsed());
        }
        let last = solver.transform_state(&states[states.len() - 1]);
        assert_eq!(last.len(), p.dims.cell_count());
        assert_eq!(last, solver.output().unwrap());
    }

    #[test]
    fn unknown_ground_tile_is_a_contradiction() {
        let mut p = params(1, true);
        p.ground_tile = TileId::from("lava");
        let mut solver = WfcSolver::new(TileSet::castle());
        solver.reset(&p);
        assert!(!solver.run());
        assert!(solver.output().is_none());
        assert!(solver.states().is_empty());
    }

    #[test]
    fn unsatisfiable_rules_contradict_every_attempt() {
        // Ground demands a socket above it that no tile offers.
        let rules = vec![
            TileRule {
                id: TileId::from("ground"),
                weight: 1.0,
                sockets: [1, 1, 1, 1, 9, 0],
                rotations: Rotations::One,
            },
            TileRule {
                id: TileId::from("empty"),
                weight: 1.0,
                sockets: [0; 6],
                rotations: Rotations::One,
            },
        ];
        let mut solver = WfcSolver::new(TileSet::new(rules).unwrap());
        solver.reset(&params(5, false));
        for _ in 0..3 {
            assert!(!solver.run());
        }
    }

    #[test]
    fn run_without_reset_fails() {
        let mut solver = WfcSolver::new(TileSet::castle());
        assert!(!solver.run());
    }

    #[test]
    fn take_states_empties_solver() {
        let p = params(11, true);
        let mut solver = solve(&p);
        let taken = solver.take_states();
        assert!(!taken.is_empty());
        assert!(solver.states().is_empty());
    }
}
