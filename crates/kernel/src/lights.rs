use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use voxscape_assets::{MeshCatalog, PointLightSpec};

use crate::transform::InstanceMap;

/// A point light placed in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub range: f32,
    pub attenuation: Vec3,
}

impl PointLight {
    pub fn from_spec(position: Vec3, spec: &PointLightSpec) -> Self {
        let grey = |v: f32| Vec4::new(v, v, v, 1.0);
        Self {
            position,
            ambient: grey(spec.ambient),
            diffuse: grey(spec.diffuse),
            specular: grey(spec.specular),
            range: spec.range,
            attenuation: Vec3::from_array(spec.attenuation),
        }
    }
}

/// One light per instance of every emitting mesh, in catalog then instance
/// order.
pub fn collect_point_lights(catalog: &MeshCatalog, instances: &InstanceMap) -> Vec<PointLight> {
    catalog
        .emitters()
        .flat_map(|(handle, spec)| {
            instances
                .get(&handle)
                .into_iter()
                .flatten()
                .map(move |t| PointLight::from_spec(t.position, spec))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxscape_assets::{MeshLookup, default_catalog};
    use voxscape_common::{TileId, Transform};

    fn handle(catalog: &MeshCatalog, id: &str) -> voxscape_assets::MeshHandle {
        match catalog.resolve(&TileId::from(id)) {
            MeshLookup::Mesh(h) => h,
            MeshLookup::NoGeometry => panic!("{id} missing"),
        }
    }

    #[test]
    fn gates_emit_one_light_each() {
        let catalog = default_catalog();
        let mut map = InstanceMap::new();
        let at = |x: f32| Transform {
            position: Vec3::new(x, 0.0, 2.0),
            ..Transform::default()
        };
        map.insert(handle(&catalog, "WallGate1"), vec![at(2.0), at(6.0)]);
        map.insert(handle(&catalog, "ground"), vec![at(0.0)]);

        let lights = collect_point_lights(&catalog, &map);
        assert_eq!(lights.len(), 2);
        assert_eq!(lights[1].position, Vec3::new(6.0, 0.0, 2.0));
        assert_eq!(lights[0].diffuse, Vec4::new(15.0, 15.0, 15.0, 1.0));
        assert_eq!(lights[0].attenuation, Vec3::new(1.0, 1.0, 4.0));
    }

    #[test]
    fn no_emitters_no_lights() {
        let catalog = default_catalog();
        let mut map = InstanceMap::new();
        map.insert(handle(&catalog, "ground"), vec![Transform::default()]);
        assert!(collect_point_lights(&catalog, &map).is_empty());
    }
}
