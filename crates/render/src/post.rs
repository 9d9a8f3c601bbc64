use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GodRaySettings {
    pub enabled: bool,
    pub blend: f32,
    pub iterations: u32,
    pub density: f32,
    pub weight: f32,
    pub decay: f32,
    pub exposure: f32,
}

impl Default for GodRaySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            blend: 1.0,
            iterations: 4,
            density: 1.0,
            weight: 0.75,
            decay: 0.75,
            exposure: 1.0,
        }
    }
}

/// Depth of field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DofSettings {
    pub enabled: bool,
    pub focal_length: f32,
    pub in_focus_plane_size: f32,
    pub blend: f32,
}

impl Default for DofSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            focal_length: 20.0,
            in_focus_plane_size: 15.0,
            blend: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    pub enabled: bool,
    pub blend: f32,
    pub iterations: u32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            blend: 1.0,
            iterations: 1,
        }
    }
}

/// Post-process configuration passed through to the renderer each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessSettings {
    pub godray: GodRaySettings,
    pub dof: DofSettings,
    pub tonemap: bool,
    pub bloom: BloomSettings,
    /// Name of the stylization pass; `"none"` disables it.
    pub artistic: String,
}

impl Default for PostProcessSettings {
    fn default() -> Self {
        Self {
            godray: GodRaySettings::default(),
            dof: DofSettings::default(),
            tonemap: true,
            bloom: BloomSettings::default(),
            artistic: "none".into(),
        }
    }
}

impl PostProcessSettings {
    /// Names of the enabled passes, in pipeline order.
    pub fn enabled_passes(&self) -> Vec<&'static str> {
        let mut passes = Vec::new();
        if self.godray.enabled {
            passes.push("godray");
        }
        if self.dof.enabled {
            passes.push("dof");
        }
        if self.bloom.enabled {
            passes.push("bloom");
        }
        if self.artistic != "none" {
            passes.push("artistic");
        }
        if self.tonemap {
            passes.push("tonemap");
        }
        passes
    }
}
