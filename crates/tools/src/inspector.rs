use std::collections::BTreeMap;
use voxscape_assets::MeshLookup;
use voxscape_common::TileId;
use voxscape_kernel::{PlaybackState, SynthesisController};
use voxscape_solver::{SolverState, TileSolver};

/// Read-only queries against a controller for debugging and CLI output.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the displayed scene.
    pub fn summary<S: TileSolver>(controller: &SynthesisController<S>) -> SceneSummary {
        let batches = controller.batches();
        SceneSummary {
            generation: batches.generation(),
            batch_count: batches.batches().len(),
            filled_batches: batches.batches().iter().filter(|b| !b.is_empty()).count(),
            instance_count: batches.total_instances(),
            point_lights: controller.lights().len(),
            history_len: controller.history_len(),
            cursor: controller.playback().cursor(),
            playback: controller.playback().state(),
        }
    }

    /// Count assignments per tile id.
    pub fn tile_histogram(state: &SolverState) -> BTreeMap<TileId, usize> {
        let mut counts = BTreeMap::new();
        for a in state {
            *counts.entry(a.tile.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Details about the displayed batch of one mesh.
    pub fn inspect_mesh<S: TileSolver>(
        controller: &SynthesisController<S>,
        mesh: &TileId,
    ) -> Option<BatchInfo> {
        let MeshLookup::Mesh(handle) = controller.catalog().resolve(mesh) else {
            return None;
        };
        let batch = controller.batches().get(handle)?;
        let first = batch.instances().first().map(|t| t.position.to_array());
        Some(BatchInfo {
            mesh: mesh.clone(),
            instances: batch.len(),
            bytes: batch.bytes().len(),
            first_position: first,
        })
    }
}

/// Summary of the scene for the inspector.
#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub generation: u64,
    pub batch_count: usize,
    pub filled_batches: usize,
    pub instance_count: usize,
    pub point_lights: usize,
    pub history_len: usize,
    pub cursor: usize,
    pub playback: PlaybackState,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: generation={} batches={} ({} filled) instances={} lights={} history={} cursor={} playback={:?}",
            self.generation,
            self.batch_count,
            self.filled_batches,
            self.instance_count,
            self.point_lights,
            self.history_len,
            self.cursor,
            self.playback,
        )
    }
}

/// Detailed info about one mesh batch.
#[derive(Debug, Clone)]
pub struct BatchInfo {
    pub mesh: TileId,
    pub instances: usize,
    pub bytes: usize,
    pub first_position: Option<[f32; 3]>,
}

impl std::fmt::Display for BatchInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mesh {} instances={} bytes={}", self.mesh, self.instances, self.bytes)?;
        if let Some([x, y, z]) = self.first_position {
            write!(f, " first=({x:.2}, {y:.2}, {z:.2})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxscape_assets::default_catalog;
    use voxscape_kernel::SynthesisConfig;
    use voxscape_solver::ScriptedSolver;

    fn generated() -> SynthesisController<ScriptedSolver> {
        let mut c = SynthesisController::new(ScriptedSolver::always_succeeds(3), default_catalog());
        c.generate(&SynthesisConfig::default().with_debug_capture(true))
            .unwrap();
        c
    }

    #[test]
    fn summary_before_generate() {
        let c = SynthesisController::new(ScriptedSolver::always_succeeds(1), default_catalog());
        let summary = SceneInspector::summary(&c);
        assert_eq!(summary.generation, 0);
        assert_eq!(summary.batch_count, 0);
        assert_eq!(summary.playback, PlaybackState::Idle);
    }

    #[test]
    fn summary_after_generate() {
        let c = generated();
        let summary = SceneInspector::summary(&c);
        assert_eq!(summary.generation, 1);
        assert_eq!(summary.batch_count, 35);
        assert_eq!(summary.history_len, 3);
        assert!(summary.instance_count > 0);
        assert!(format!("{summary}").contains("generation=1"));
    }

    #[test]
    fn histogram_counts_every_cell() {
        let c = generated();
        let hist = SceneInspector::tile_histogram(c.output().unwrap());
        assert_eq!(hist.values().sum::<usize>(), 8 * 8 * 4);
        assert_eq!(hist[&TileId::from("ground")], 64);
    }

    #[test]
    fn inspect_ground_batch() {
        let c = generated();
        let info = SceneInspector::inspect_mesh(&c, &TileId::from("ground")).unwrap();
        assert_eq!(info.instances, 64);
        assert_eq!(info.first_position, Some(glam::Vec3::ZERO.to_array()));
        assert!(SceneInspector::inspect_mesh(&c, &TileId::from("empty")).is_none());
    }
}
