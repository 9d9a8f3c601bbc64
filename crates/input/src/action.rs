use glam::Vec3;

/// A high-level control request. Front ends (GUI panel, CLI, key bindings)
/// produce actions; they never touch the controller directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Run the solver again with the current config.
    Regenerate,
    /// Show the next captured state.
    StepOnce,
    /// Play captured states back at the configured period.
    PlayTimed,
    /// Stop timed playback where it is.
    StopPlayback,
    /// Resize the grid; each axis is clamped to 4..=16.
    SetGridSize { x: u32, y: u32, z: u32 },
    ToggleDebugCapture,
    ToggleSkyColor,
    SetLightDirection(Vec3),
    SetLightIntensity(f32),
    /// Save the next presented frame.
    RequestCapture,
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}
