use glam::Vec3;
use serde::{Deserialize, Serialize};

pub const WHITE: [u8; 3] = [255, 255, 255];
pub const MOONLIGHT: [u8; 3] = [68, 77, 175];

/// Directional sky light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyLight {
    pub color: [u8; 3],
    pub intensity: f32,
    /// Points from the origin toward the light.
    pub direction: Vec3,
}

impl Default for SkyLight {
    fn default() -> Self {
        Self {
            color: WHITE,
            intensity: 1.5,
            direction: Vec3::new(12.0, 6.0, 10.0),
        }
    }
}

impl SkyLight {
    /// Swap between white daylight and moonlight. Any custom colour goes to
    /// moonlight.
    pub fn toggled(&self) -> Self {
        let color = if self.color == MOONLIGHT { WHITE } else { MOONLIGHT };
        Self { color, ..*self }
    }

    /// Linear radiance handed to the lighting pass.
    pub fn radiance(&self) -> Vec3 {
        let [r, g, b] = self.color;
        Vec3::new(f32::from(r), f32::from(g), f32::from(b)) * self.intensity / 255.0
    }
}
