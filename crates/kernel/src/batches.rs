use bytemuck::{Pod, Zeroable};
use voxscape_assets::{MeshCatalog, MeshHandle};
use voxscape_common::Transform;

use crate::transform::InstanceMap;

/// Per-instance vertex data: model matrix columns.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl InstanceRaw {
    pub fn from_transform(t: &Transform) -> Self {
        Self {
            model: t.model_matrix().to_cols_array_2d(),
        }
    }
}

/// Instances of one catalog mesh for the displayed state.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneInstanceBatch {
    mesh: MeshHandle,
    instances: Vec<Transform>,
    /// Packed [`InstanceRaw`] bytes; `None` until finalized.
    packed: Option<Vec<u8>>,
}

impl SceneInstanceBatch {
    pub fn new(mesh: MeshHandle) -> Self {
        Self {
            mesh,
            instances: Vec::new(),
            packed: None,
        }
    }

    pub fn mesh(&self) -> MeshHandle {
        self.mesh
    }

    pub fn instances(&self) -> &[Transform] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn is_finalized(&self) -> bool {
        self.packed.is_some()
    }

    /// Packed instance buffer; empty until finalized.
    pub fn bytes(&self) -> &[u8] {
        self.packed.as_deref().unwrap_or(&[])
    }

    fn finalize(&mut self) {
        let raw: Vec<InstanceRaw> = self.instances.iter().map(InstanceRaw::from_transform).collect();
        self.packed = Some(bytemuck::cast_slice(&raw).to_vec());
    }
}

/// Batch lifecycle record of the most recent rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchEvent {
    Destroyed { generation: u64, mesh: MeshHandle },
    Created { generation: u64, mesh: MeshHandle },
    Finalized {
        generation: u64,
        mesh: MeshHandle,
        instances: usize,
    },
}

/// The displayed batch set: exactly one batch per catalog mesh.
#[derive(Debug, Clone, Default)]
pub struct InstanceBatchSet {
    batches: Vec<SceneInstanceBatch>,
    generation: u64,
    events: Vec<BatchEvent>,
}

impl InstanceBatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every batch. All existing batches are destroyed before the
    /// first replacement is created.
    ///
    /// The event log restarts with each rebuild, so it never holds more than
    /// one rebuild's worth of records.
    pub fn rebuild(&mut self, catalog: &MeshCatalog, mut instances: InstanceMap) {
        let _span = tracing::debug_span!("rebuild_batches", generation = self.generation + 1).entered();

        self.events.clear();

        for batch in self.batches.drain(..) {
            self.events.push(BatchEvent::Destroyed {
                generation: self.generation,
                mesh: batch.mesh,
            });
        }
        self.generation += 1;

        for mesh in catalog.handles() {
            let mut batch = SceneInstanceBatch::new(mesh);
            self.events.push(BatchEvent::Created {
                generation: self.generation,
                mesh,
            });
            batch.instances = instances.remove(&mesh).unwrap_or_default();
            batch.finalize();
            self.events.push(BatchEvent::Finalized {
                generation: self.generation,
                mesh,
                instances: batch.len(),
            });
            self.batches.push(batch);
        }
        tracing::debug!(
            batches = self.batches.len(),
            instances = self.total_instances(),
            "rebuilt instance batches"
        );
    }

    pub fn batches(&self) -> &[SceneInstanceBatch] {
        &self.batches
    }

    pub fn get(&self, mesh: MeshHandle) -> Option<&SceneInstanceBatch> {
        self.batches.iter().find(|b| b.mesh == mesh)
    }

    /// Number of rebuilds so far; 0 before anything was displayed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Instances across every batch.
    pub fn total_instances(&self) -> usize {
        self.batches.iter().map(SceneInstanceBatch::len).sum()
    }

    /// Lifecycle records of the last rebuild, in order.
    pub fn events(&self) -> &[BatchEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<BatchEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};
    use voxscape_assets::default_catalog;

    fn instances_for(catalog: &MeshCatalog, n: usize) -> InstanceMap {
        let mut map = InstanceMap::new();
        let first = catalog.handles().next().unwrap();
        map.insert(
            first,
            (0..n)
                .map(|i| Transform {
                    position: Vec3::new(i as f32, 0.0, 0.0),
                    ..Transform::default()
                })
                .collect(),
        );
        map
    }

    #[test]
    fn one_batch_per_catalog_mesh() {
        let catalog = default_catalog();
        let mut set = InstanceBatchSet::new();
        set.rebuild(&catalog, instances_for(&catalog, 3));
        assert_eq!(set.batches().len(), catalog.len());
        assert_eq!(set.total_instances(), 3);
        assert!(set.batches().iter().all(SceneInstanceBatch::is_finalized));
        assert_eq!(set.batches().iter().filter(|b| b.is_empty()).count(), catalog.len() - 1);
    }

    #[test]
    fn destroys_everything_before_creating() {
        let catalog = default_catalog();
        let mut set = InstanceBatchSet::new();
        set.rebuild(&catalog, InstanceMap::new());
        set.rebuild(&catalog, InstanceMap::new());

        let events = set.events();
        let first_created = events
            .iter()
            .position(|e| matches!(e, BatchEvent::Created { .. }))
            .unwrap();
        let last_destroyed = events
            .iter()
            .rposition(|e| matches!(e, BatchEvent::Destroyed { .. }))
            .unwrap();
        assert!(last_destroyed < first_created);
        assert_eq!(first_created, catalog.len());
        assert_eq!(set.generation(), 2);
    }

    #[test]
    fn event_log_holds_only_the_last_rebuild() {
        let catalog = default_catalog();
        let mut set = InstanceBatchSet::new();
        for n in 0..50 {
            set.rebuild(&catalog, instances_for(&catalog, n % 4));
        }
        assert_eq!(set.generation(), 50);
        assert_eq!(set.events().len(), 3 * catalog.len());
        assert!(set.events().iter().all(|e| match *e {
            BatchEvent::Destroyed { generation, .. } => generation == 49,
            BatchEvent::Created { generation, .. } | BatchEvent::Finalized { generation, .. } => {
                generation == 50
            }
        }));
    }

    #[test]
    fn packed_bytes_hold_model_matrices() {
        let catalog = default_catalog();
        let mut set = InstanceBatchSet::new();
        set.rebuild(&catalog, instances_for(&catalog, 2));
        let batch = &set.batches()[0];
        assert_eq!(batch.bytes().len(), 2 * std::mem::size_of::<InstanceRaw>());

        let size = std::mem::size_of::<InstanceRaw>();
        let raw: InstanceRaw = bytemuck::pod_read_unaligned(&batch.bytes()[size..2 * size]);
        let m = Mat4::from_cols_array_2d(&raw.model);
        assert_eq!(m.transform_point3(Vec3::ZERO), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn empty_batches_have_no_bytes() {
        let catalog = default_catalog();
        let mut set = InstanceBatchSet::new();
        set.rebuild(&catalog, InstanceMap::new());
        assert!(set.batches().iter().all(|b| b.bytes().is_empty()));
    }
}
