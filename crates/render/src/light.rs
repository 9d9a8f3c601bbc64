use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Maps clip space `[-1, 1]³` to texture space `[0, 1]³`.
pub const VIEWPORT_TRANSFORM: Mat4 = Mat4::from_cols_array(&[
    0.5, 0.0, 0.0, 0.0, //
    0.0, 0.5, 0.0, 0.0, //
    0.0, 0.0, 0.5, 0.0, //
    0.5, 0.5, 0.5, 1.0,
]);

/// Orthographic volume of the shadow map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthoBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrthoBounds {
    fn default() -> Self {
        Self {
            left: -150.0,
            right: 150.0,
            bottom: -150.0,
            top: 150.0,
            near: -500.0,
            far: 200.0,
        }
    }
}

impl OrthoBounds {
    pub fn projection(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LightError {
    #[error("light direction {0} has no usable length")]
    DegenerateDirection(Vec3),
}

/// Light-space matrices for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightFrame {
    pub direction: Vec3,
    pub bounds: OrthoBounds,
    pub view_projection: Mat4,
    /// `VIEWPORT_TRANSFORM · view_projection`, for shadow map lookups.
    pub viewport_projection: Mat4,
}

/// Builds light-space matrices from a light direction and fixed bounds.
///
/// Pure: identical inputs give bit-identical matrices. Nothing is cached, so
/// callers rebuild every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LightMatrixBuilder {
    pub bounds: OrthoBounds,
}

impl LightMatrixBuilder {
    pub fn new(bounds: OrthoBounds) -> Self {
        Self { bounds }
    }

    /// The light sits at `direction` looking at the origin with +Z up.
    pub fn build(&self, direction: Vec3) -> Result<LightFrame, LightError> {
        if !direction.is_finite() || direction.length_squared() <= f32::EPSILON {
            tracing::warn!(?direction, "degenerate light direction");
            return Err(LightError::DegenerateDirection(direction));
        }
        // +Z up is undefined when looking straight along Z.
        let up = if direction.normalize().z.abs() > 0.999 {
            tracing::warn!(?direction, "light direction parallel to +Z, using +Y as up");
            Vec3::Y
        } else {
            Vec3::Z
        };
        let view = Mat4::look_at_rh(direction, Vec3::ZERO, up);
        let view_projection = self.bounds.projection() * view;
        Ok(LightFrame {
            direction,
            bounds: self.bounds,
            view_projection,
            viewport_projection: VIEWPORT_TRANSFORM * view_projection,
        })
    }
}
