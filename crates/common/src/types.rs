use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a tile type as named by the solver's tile set.
///
/// Tile ids double as mesh ids in the catalog; a tile without a catalog entry
/// (e.g. `empty`) simply has no geometry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub String);

impl TileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TileId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl Borrow<str> for TileId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Placement of one mesh instance: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Model matrix in scale → rotate → translate order.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Build a rotation of `angle` radians about `axis`.
///
/// The axis is normalized first; a zero axis yields the identity rotation.
/// Assignments coming from the solver already carry their orientation, so
/// this is only needed by callers that synthesize a rotation themselves.
pub fn axis_angle_quat(axis: Vec3, angle: f32) -> Quat {
    match axis.try_normalize() {
        Some(axis) => Quat::from_axis_angle(axis, angle),
        None => Quat::IDENTITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn model_matrix_translates() {
        let t = Transform {
            position: Vec3::new(2.0, 4.0, 6.0),
            ..Transform::default()
        };
        let p = t.model_matrix().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn axis_angle_quarter_turn_about_z() {
        let q = axis_angle_quat(Vec3::Z, FRAC_PI_2);
        let v = q * Vec3::X;
        assert!((v - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn axis_angle_normalizes_axis() {
        let a = axis_angle_quat(Vec3::new(0.0, 0.0, 5.0), 1.0);
        let b = axis_angle_quat(Vec3::Z, 1.0);
        assert!(a.abs_diff_eq(b, 1e-6));
    }

    #[test]
    fn axis_angle_zero_axis_is_identity() {
        assert_eq!(axis_angle_quat(Vec3::ZERO, 1.0), Quat::IDENTITY);
    }

    #[test]
    fn tile_id_borrows_as_str() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(TileId::from("ground"), 1);
        assert_eq!(map.get("ground"), Some(&1));
        assert_eq!(TileId::new("wall").to_string(), "wall");
    }
}
