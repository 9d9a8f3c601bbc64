//! Rendering adapter: everything the GPU pipeline reads each frame.
//!
//! # Invariants
//! - Renderers receive borrowed [`FrameInputs`] and cannot mutate synthesis
//!   state.
//! - Light matrices are a pure function of direction and bounds, rebuilt
//!   every frame.
//!
//! The pipeline itself (G-buffer, shadow map, post passes) lives outside
//! this crate; [`DebugTextRenderer`] stands in for it in the CLI and tests.

mod capture;
mod light;
mod post;
mod renderer;
mod sky;

pub use capture::CaptureRequest;
pub use light::{LightError, LightFrame, LightMatrixBuilder, OrthoBounds, VIEWPORT_TRANSFORM};
pub use post::{BloomSettings, DofSettings, GodRaySettings, PostProcessSettings};
pub use renderer::{DebugTextRenderer, FrameInputs, FrameSettings, Renderer};
pub use sky::{MOONLIGHT, SkyLight, WHITE};

pub fn crate_info() -> &'static str {
    "voxscape-render v0.1.0"
}
