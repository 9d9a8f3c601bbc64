use glam::Vec3;
use voxscape_common::GridDims;
use voxscape_kernel::{Frame, SynthError, SynthesisConfig, SynthesisController, TimerHandle};
use voxscape_render::{FrameSettings, SkyLight};
use voxscape_solver::TileSolver;

use crate::action::Action;

/// Range of each light direction component.
pub const LIGHT_AXIS_LIMIT: f32 = 20.0;
/// Upper bound of the sky light intensity.
pub const MAX_INTENSITY: f32 = 10.0;

/// Control values a front end edits. Reducing an action never mutates the
/// current value; it yields a new one plus an effect to run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlState {
    pub config: SynthesisConfig,
    pub sky: SkyLight,
}

/// Side effect requested by an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Generate(SynthesisConfig),
    StepOnce,
    PlayTimed,
    StopPlayback,
    /// Replace the sky light the next frame is lit with.
    SetSky(SkyLight),
    CaptureFrame,
}

/// What running an effect produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Idle,
    Generated { attempts: u32 },
    Displayed(Frame),
    Playing(TimerHandle),
    Stopped(bool),
    SkyChanged,
    CaptureQueued,
}

impl ControlState {
    pub fn new(config: SynthesisConfig, sky: SkyLight) -> Self {
        Self { config, sky }
    }

    pub fn reduce(&self, action: Action) -> (ControlState, Effect) {
        let mut next = self.clone();
        let effect = match action {
            Action::Regenerate => Effect::Generate(self.config.clone()),
            Action::StepOnce => Effect::StepOnce,
            Action::PlayTimed => Effect::PlayTimed,
            Action::StopPlayback => Effect::StopPlayback,
            Action::SetGridSize { x, y, z } => {
                next.config = self.config.with_grid(GridDims::clamped(x, y, z));
                Effect::None
            }
            Action::ToggleDebugCapture => {
                next.config = self.config.with_debug_capture(!self.config.debug_capture);
                Effect::None
            }
            Action::ToggleSkyColor => {
                next.sky = self.sky.toggled();
                Effect::SetSky(next.sky)
            }
            Action::SetLightDirection(direction) => {
                next.sky.direction = direction.clamp(Vec3::splat(-LIGHT_AXIS_LIMIT), Vec3::splat(LIGHT_AXIS_LIMIT));
                Effect::SetSky(next.sky)
            }
            Action::SetLightIntensity(intensity) => {
                next.sky.intensity = intensity.clamp(0.0, MAX_INTENSITY);
                Effect::SetSky(next.sky)
            }
            Action::RequestCapture => Effect::CaptureFrame,
            Action::Noop => Effect::None,
        };
        (next, effect)
    }
}

/// Run an effect against the controller and the frame settings.
pub fn dispatch<S: TileSolver>(
    effect: Effect,
    controller: &mut SynthesisController<S>,
    frame: &mut FrameSettings,
) -> Result<Outcome, SynthError> {
    let outcome = match effect {
        Effect::None => Outcome::Idle,
        Effect::Generate(config) => Outcome::Generated {
            attempts: controller.generate(&config)?,
        },
        Effect::StepOnce => controller.step_once().map_or(Outcome::Idle, Outcome::Displayed),
        Effect::PlayTimed => controller.play_timed().map_or(Outcome::Idle, Outcome::Playing),
        Effect::StopPlayback => Outcome::Stopped(controller.cancel_playback()),
        Effect::SetSky(sky) => {
            frame.sky = sky;
            Outcome::SkyChanged
        }
        Effect::CaptureFrame => {
            frame.capture.request();
            Outcome::CaptureQueued
        }
    };
    tracing::debug!(?outcome, "dispatched control effect");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxscape_assets::default_catalog;
    use voxscape_render::MOONLIGHT;
    use voxscape_solver::ScriptedSolver;

    #[test]
    fn grid_size_is_clamped() {
        let (next, effect) = ControlState::default().reduce(Action::SetGridSize { x: 2, y: 40, z: 9 });
        assert_eq!(effect, Effect::None);
        assert_eq!(next.config.grid, GridDims::new(4, 16, 9).unwrap());
    }

    #[test]
    fn reduce_leaves_input_untouched() {
        let state = ControlState::default();
        let (next, _) = state.reduce(Action::ToggleDebugCapture);
        assert!(!state.config.debug_capture);
        assert!(next.config.debug_capture);
    }

    #[test]
    fn sky_controls() {
        let state = ControlState::default();
        let (next, effect) = state.reduce(Action::ToggleSkyColor);
        assert_eq!(next.sky.color, MOONLIGHT);
        assert_eq!(effect, Effect::SetSky(next.sky));
        let (next, _) = next.reduce(Action::SetLightIntensity(50.0));
        assert_eq!(next.sky.intensity, MAX_INTENSITY);
        let (next, _) = next.reduce(Action::SetLightDirection(Vec3::new(-30.0, 3.0, 25.0)));
        assert_eq!(next.sky.direction, Vec3::new(-20.0, 3.0, 20.0));
    }

    #[test]
    fn sky_controls_reach_the_next_frame() {
        let mut c = SynthesisController::new(ScriptedSolver::always_succeeds(1), default_catalog());
        let mut frame = FrameSettings::default();
        let state = ControlState::new(SynthesisConfig::default(), frame.sky);

        let (state, effect) = state.reduce(Action::SetLightDirection(Vec3::new(-4.0, 2.0, 8.0)));
        assert_eq!(dispatch(effect, &mut c, &mut frame).unwrap(), Outcome::SkyChanged);
        let (state, effect) = state.reduce(Action::ToggleSkyColor);
        dispatch(effect, &mut c, &mut frame).unwrap();
        let (_, effect) = state.reduce(Action::SetLightIntensity(2.0));
        dispatch(effect, &mut c, &mut frame).unwrap();

        let inputs = frame.prepare(&c).unwrap();
        assert_eq!(inputs.light.direction, Vec3::new(-4.0, 2.0, 8.0));
        let [r, g, b] = MOONLIGHT;
        let expected = Vec3::new(f32::from(r), f32::from(g), f32::from(b)) * 2.0 / 255.0;
        assert!(inputs.sky_radiance.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn regenerate_carries_current_config() {
        let (state, _) = ControlState::default().reduce(Action::SetGridSize { x: 5, y: 6, z: 7 });
        let (_, effect) = state.reduce(Action::Regenerate);
        assert_eq!(effect, Effect::Generate(state.config.clone()));
    }

    #[test]
    fn dispatch_drives_controller() {
        let mut controller =
            SynthesisController::new(ScriptedSolver::always_succeeds(2), default_catalog());
        let mut frame = FrameSettings::default();
        let (state, _) = ControlState::default().reduce(Action::ToggleDebugCapture);

        let (_, effect) = state.reduce(Action::Regenerate);
        let out = dispatch(effect, &mut controller, &mut frame).unwrap();
        assert_eq!(out, Outcome::Generated { attempts: 1 });

        let out = dispatch(Effect::StepOnce, &mut controller, &mut frame).unwrap();
        assert_eq!(out, Outcome::Displayed(Frame::History(0)));

        assert!(matches!(
            dispatch(Effect::PlayTimed, &mut controller, &mut frame).unwrap(),
            Outcome::Playing(_)
        ));
        assert_eq!(
            dispatch(Effect::StopPlayback, &mut controller, &mut frame).unwrap(),
            Outcome::Stopped(true)
        );

        dispatch(Effect::CaptureFrame, &mut controller, &mut frame).unwrap();
        assert!(frame.capture.is_pending());
    }
}
