use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use voxscape_common::{GridCoord, GridDims, TileId};

/// One cell's resolved tile, orientation and scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoxelAssignment {
    pub coord: GridCoord,
    pub tile: TileId,
    pub orientation: Quat,
    pub scale: Vec3,
}

/// The grid's assignments at one solver step, in solver iteration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverState {
    assignments: Vec<VoxelAssignment>,
}

impl SolverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, assignment: VoxelAssignment) {
        self.assignments.push(assignment);
    }

    pub fn assignments(&self) -> &[VoxelAssignment] {
        &self.assignments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VoxelAssignment> {
        self.assignments.iter()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Whether every cell of `dims` is assigned exactly once and nothing lies
    /// outside the grid.
    pub fn covers(&self, dims: GridDims) -> bool {
        let mut seen = vec![false; dims.cell_count()];
        for a in &self.assignments {
            if !dims.contains(a.coord) {
                return false;
            }
            let i = dims.index(a.coord);
            if seen[i] {
                return false;
            }
            seen[i] = true;
        }
        seen.into_iter().all(|s| s)
    }
}

impl FromIterator<VoxelAssignment> for SolverState {
    fn from_iter<I: IntoIterator<Item = VoxelAssignment>>(iter: I) -> Self {
        Self {
            assignments: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SolverState {
    type Item = &'a VoxelAssignment;
    type IntoIter = std::slice::Iter<'a, VoxelAssignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}

/// Parameters a solver is constructed (or reset) with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverParams {
    pub name: String,
    /// `None` seeds from the clock.
    pub seed: Option<u64>,
    pub dims: GridDims,
    pub wrap_edges: bool,
    /// Tile that fills the floor layer (z = 0).
    pub ground_tile: TileId,
    /// Tiles allowed on the outer shell.
    pub boundary_tiles: Vec<TileId>,
    pub debug_capture: bool,
}

/// A solver-native snapshot that can be expanded into a [`SolverState`].
pub trait CapturedState {
    fn to_state(&self) -> SolverState;
}

impl CapturedState for SolverState {
    fn to_state(&self) -> SolverState {
        self.clone()
    }
}

/// Contract of the external tile-placement solver.
///
/// The solver is a black box: each `run()` is one independent attempt that
/// either finds a consistent assignment or hits a contradiction.
pub trait TileSolver {
    type Snapshot: CapturedState;

    /// Reconfigure the solver. Clears any captured states and prior output.
    fn reset(&mut self, params: &SolverParams);

    /// One attempt from a fresh internal state. `true` means every cell was
    /// assigned consistently; `false` means contradiction.
    fn run(&mut self) -> bool;

    /// Snapshots captured during the most recent attempt (debug capture only).
    fn states(&self) -> &[Self::Snapshot];

    /// Move the captured snapshots out, leaving the solver's list empty.
    fn take_states(&mut self) -> Vec<Self::Snapshot>;

    /// Final assignments of the most recent successful attempt.
    fn output(&self) -> Option<SolverState>;

    /// Expand a captured snapshot into assignments.
    fn transform_state(&self, snapshot: &Self::Snapshot) -> SolverState {
        snapshot.to_state()
    }
}
