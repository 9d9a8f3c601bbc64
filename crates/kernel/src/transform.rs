use std::collections::BTreeMap;
use voxscape_assets::{MeshCatalog, MeshHandle, MeshLookup};
use voxscape_common::Transform;
use voxscape_solver::SolverState;

/// Per-mesh instance transforms, in assignment order within each mesh.
pub type InstanceMap = BTreeMap<MeshHandle, Vec<Transform>>;

/// Turns grid assignments into positioned mesh instances.
///
/// Pure: the same state always yields the same map with the same ordering.
#[derive(Debug, Clone, Copy)]
pub struct VoxelTransformer<'a> {
    catalog: &'a MeshCatalog,
    cell_size: f32,
}

impl<'a> VoxelTransformer<'a> {
    pub fn new(catalog: &'a MeshCatalog, cell_size: f32) -> Self {
        Self { catalog, cell_size }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn transform(&self, state: &SolverState) -> InstanceMap {
        let mut out = InstanceMap::new();
        for a in state {
            match self.catalog.resolve(&a.tile) {
                MeshLookup::Mesh(handle) => out.entry(handle).or_default().push(Transform {
                    position: a.coord.as_vec3() * self.cell_size,
                    rotation: a.orientation,
                    scale: a.scale,
                }),
                MeshLookup::NoGeometry => {
                    tracing::trace!(tile = %a.tile, "tile has no geometry");
                }
            }
        }
        out
    }
}
