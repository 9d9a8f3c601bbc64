use glam::Vec3;
use voxscape_assets::MeshCatalog;
use voxscape_kernel::{InstanceBatchSet, PointLight, SynthesisController};
use voxscape_solver::TileSolver;

use crate::capture::CaptureRequest;
use crate::light::{LightError, LightFrame, LightMatrixBuilder, OrthoBounds};
use crate::post::PostProcessSettings;
use crate::sky::SkyLight;

/// Everything a renderer reads for one frame. Borrowed, so a renderer has no
/// way to write synthesis state.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub catalog: &'a MeshCatalog,
    pub batches: &'a InstanceBatchSet,
    pub point_lights: &'a [PointLight],
    pub light: LightFrame,
    pub sky_radiance: Vec3,
    pub post: &'a PostProcessSettings,
    /// Save this frame once presented.
    pub capture: bool,
}

/// Per-frame render settings owned by the render loop.
#[derive(Debug, Clone, Default)]
pub struct FrameSettings {
    pub sky: SkyLight,
    pub post: PostProcessSettings,
    pub bounds: OrthoBounds,
    pub capture: CaptureRequest,
}

impl FrameSettings {
    /// Assemble this frame's inputs. Light matrices are rebuilt on every call
    /// and a pending capture request is consumed.
    pub fn prepare<'a, S: TileSolver>(
        &'a mut self,
        controller: &'a SynthesisController<S>,
    ) -> Result<FrameInputs<'a>, LightError> {
        let light = LightMatrixBuilder::new(self.bounds).build(self.sky.direction)?;
        let capture = self.capture.take();
        Ok(FrameInputs {
            catalog: controller.catalog(),
            batches: controller.batches(),
            point_lights: controller.lights(),
            light,
            sky_radiance: self.sky.radiance(),
            post: &self.post,
            capture,
        })
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &FrameInputs<'_>) -> Self::Output;
}

/// Human-readable frame dump for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// List empty batches as well.
    pub show_empty: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameInputs<'_>) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene (generation={}) ===\n",
            frame.batches.generation()
        ));
        out.push_str(&format!(
            "Batches: {}  Instances: {}  Point lights: {}\n",
            frame.batches.batches().len(),
            frame.batches.total_instances(),
            frame.point_lights.len()
        ));
        let d = frame.light.direction;
        let r = frame.sky_radiance;
        out.push_str(&format!(
            "Sky: dir=({:.1}, {:.1}, {:.1}) radiance=({:.3}, {:.3}, {:.3})\n",
            d.x, d.y, d.z, r.x, r.y, r.z
        ));
        out.push_str(&format!("Post: {}\n", frame.post.enabled_passes().join(", ")));
        if frame.capture {
            out.push_str("Capture: this frame\n");
        }

        for batch in frame.batches.batches() {
            if batch.is_empty() && !self.show_empty {
                continue;
            }
            let name = frame
                .catalog
                .get(batch.mesh())
                .map_or("?", |e| e.id.as_str());
            out.push_str(&format!(
                "  {name:<24} instances={:<4} bytes={}\n",
                batch.len(),
                batch.bytes().len()
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxscape_assets::default_catalog;
    use voxscape_kernel::SynthesisConfig;
    use voxscape_solver::ScriptedSolver;

    fn controller() -> SynthesisController<ScriptedSolver> {
        SynthesisController::new(ScriptedSolver::always_succeeds(1), default_catalog())
    }

    #[test]
    fn debug_renderer_before_generate() {
        let c = controller();
        let mut settings = FrameSettings::default();
        let frame = settings.prepare(&c).unwrap();
        let out = DebugTextRenderer::new().render(&frame);

        assert!(out.contains("generation=0"));
        assert!(out.contains("Instances: 0"));
        assert!(out.contains("godray, tonemap"));
    }

    #[test]
    fn debug_renderer_lists_filled_batches() {
        let mut c = controller();
        c.generate(&SynthesisConfig::default()).unwrap();
        let mut settings = FrameSettings::default();
        let frame = settings.prepare(&c).unwrap();
        let out = DebugTextRenderer::new().render(&frame);

        assert!(out.contains("generation=1"));
        assert!(out.contains("ground"));
        assert!(!out.contains("pipeL"));

        let all = DebugTextRenderer { show_empty: true }.render(&frame);
        assert!(all.contains("pipeL"));
    }

    #[test]
    fn capture_is_consumed_by_one_frame() {
        let c = controller();
        let mut settings = FrameSettings::default();
        settings.capture.request();
        assert!(settings.prepare(&c).unwrap().capture);
        assert!(!settings.prepare(&c).unwrap().capture);
    }

    #[test]
    fn light_follows_sky_direction() {
        let c = controller();
        let mut settings = FrameSettings::default();
        settings.sky.direction = Vec3::new(-4.0, 2.0, 8.0);
        let expected = LightMatrixBuilder::default().build(settings.sky.direction).unwrap();
        assert_eq!(settings.prepare(&c).unwrap().light, expected);

        settings.sky.direction = Vec3::ZERO;
        assert!(settings.prepare(&c).is_err());
    }
}
