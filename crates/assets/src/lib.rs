//! Mesh catalog: maps tile ids to geometry, textures and light emitters.
//!
//! The catalog is built once and then only read. Everything downstream
//! addresses meshes by [`MeshHandle`], never by raw file paths.
//!
//! # Invariants
//! - Handles are dense indices in catalog order; iteration order is stable.
//! - Ids are unique and non-empty.
//! - A tile id without an entry has no geometry; that is not an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use voxscape_common::TileId;

/// Index of a mesh in its catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u32);

impl MeshHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Albedo and emissive texture paths of a mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureSet {
    pub albedo: PathBuf,
    pub emissive: PathBuf,
}

/// Point light emitted at every instance of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLightSpec {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub range: f32,
    /// Constant, linear and quadratic attenuation.
    pub attenuation: [f32; 3],
}

impl Default for PointLightSpec {
    fn default() -> Self {
        Self {
            ambient: 0.2,
            diffuse: 15.0,
            specular: 5.0,
            range: 20.0,
            attenuation: [1.0, 1.0, 4.0],
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshEntry {
    pub id: TileId,
    pub geometry: PathBuf,
    pub textures: TextureSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<PointLightSpec>,
}

/// Result of resolving a tile id against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshLookup {
    Mesh(MeshHandle),
    NoGeometry,
}

/// Errors from catalog construction and persistence.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate mesh id: {0}")]
    Duplicate(TileId),
    #[error("mesh entry {index} has an empty id")]
    EmptyId { index: usize },
}

/// On-disk form of the catalog.
#[derive(Serialize, Deserialize)]
struct CatalogFile {
    meshes: Vec<MeshEntry>,
}

/// Validated, immutable tile → mesh table.
#[derive(Debug, Clone, Default)]
pub struct MeshCatalog {
    entries: Vec<MeshEntry>,
    index: BTreeMap<TileId, MeshHandle>,
}

impl MeshCatalog {
    pub fn new(entries: Vec<MeshEntry>) -> Result<Self, CatalogError> {
        let mut index = BTreeMap::new();
        for (i, entry) in entries.iter().enumerate() {
            if entry.id.as_str().is_empty() {
                return Err(CatalogError::EmptyId { index: i });
            }
            let handle = MeshHandle(i as u32);
            if index.insert(entry.id.clone(), handle).is_some() {
                return Err(CatalogError::Duplicate(entry.id.clone()));
            }
        }
        Ok(Self { entries, index })
    }

    /// Look up the mesh for a tile.
    pub fn resolve(&self, tile: &TileId) -> MeshLookup {
        match self.index.get(tile.as_str()) {
            Some(&handle) => MeshLookup::Mesh(handle),
            None => MeshLookup::NoGeometry,
        }
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&MeshEntry> {
        self.entries.get(handle.index())
    }

    /// Handles in catalog order.
    pub fn handles(&self) -> impl Iterator<Item = MeshHandle> + '_ {
        (0..self.entries.len()).map(|i| MeshHandle(i as u32))
    }

    pub fn entries(&self) -> &[MeshEntry] {
        &self.entries
    }

    /// Meshes that emit a point light, with their light parameters.
    pub fn emitters(&self) -> impl Iterator<Item = (MeshHandle, &PointLightSpec)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.light.as_ref().map(|l| (MeshHandle(i as u32), l)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Save the catalog to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        let file = std::fs::File::create(path)?;
        let out = CatalogFile {
            meshes: self.entries.clone(),
        };
        serde_json::to_writer_pretty(file, &out)?;
        Ok(())
    }

    /// Load and validate a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let parsed: CatalogFile = serde_json::from_reader(file)?;
        let catalog = Self::new(parsed.meshes)?;
        tracing::debug!(path = %path.display(), meshes = catalog.len(), "loaded mesh catalog");
        Ok(catalog)
    }
}

/// Shared emissive texture of the default catalog.
const DEFAULT_EMISSIVE: &str = "resources/textures/default_emissive.png";

/// Mesh ids of the default catalog paired with their resource directory.
const DEFAULT_MESHES: &[(&str, &str, &str)] = &[
    ("down", "test", "down"),
    ("line", "test", "line"),
    ("turn", "test", "turn"),
    ("up", "test", "up"),
    ("ground", "obj", "Ground"),
    ("vertical", "test", "vertical"),
    ("wall1", "test", "wall1"),
    ("gate1", "test", "gate1"),
    ("stair1", "test", "stair1"),
    ("stair2", "test", "stair2"),
    ("filler1", "test", "filler1"),
    ("platform", "test", "platform"),
    ("pipeL", "test", "pipe1"),
    ("pipeT", "test", "pipe2"),
    ("wallside1", "test", "wallside1"),
    ("wallroof1", "test", "wallroof1"),
    ("straightwall1", "test", "straightwall1"),
    ("wall_straight_1", "test", "wall_straight_1"),
    ("roof_straight_1", "test", "roof_straight_1"),
    ("roof_curved_1", "test", "roof_curved_1"),
    ("WallStraight1", "obj", "WallStraight1"),
    ("WallCurved1", "obj", "WallCurved1"),
    ("WallGate1", "obj", "WallGate1"),
    ("WallGate2", "obj", "WallGate2"),
    ("WallJunction1", "obj", "WallJunction1"),
    ("WallJunction_Tall", "obj", "WallJunction_Tall"),
    ("WallJunction_TallUpper", "obj", "WallJunction_TallUpper"),
    ("WallJunction_Middle", "obj", "WallJunction_Middle"),
    ("WallCurved_Tall", "obj", "WallCurved_Tall"),
    ("WallCurved_Middle", "obj", "WallCurved_Middle"),
    ("WallCurved_Middle2", "obj", "WallCurved_Middle2"),
    ("WallCurved_TallUpper", "obj", "WallCurved_TallUpper"),
    ("WallCurved_TallUpper1", "obj", "WallCurved_TallUpper1"),
    ("roof", "obj", "roof"),
    ("WallStraight2", "obj", "WallStraight2"),
];

/// The built-in castle catalog. `empty` has no geometry; gates carry a lamp.
pub fn default_catalog() -> MeshCatalog {
    let entries = DEFAULT_MESHES
        .iter()
        .map(|&(id, dir, file)| MeshEntry {
            id: TileId::from(id),
            geometry: PathBuf::from(format!("resources/{dir}/{file}.obj")),
            textures: TextureSet {
                albedo: PathBuf::from(format!("resources/{dir}/{file}.png")),
                emissive: PathBuf::from(DEFAULT_EMISSIVE),
            },
            light: (id == "WallGate1").then(PointLightSpec::default),
        })
        .collect();
    match MeshCatalog::new(entries) {
        Ok(catalog) => catalog,
        Err(e) => unreachable!("default catalog is malformed: {e}"),
    }
}

pub fn crate_info() -> &'static str {
    "voxscape-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> MeshEntry {
        MeshEntry {
            id: TileId::from(id),
            geometry: PathBuf::from(format!("{id}.obj")),
            textures: TextureSet {
                albedo: PathBuf::from(format!("{id}.png")),
                emissive: PathBuf::from("e.png"),
            },
            light: None,
        }
    }

    #[test]
    fn resolve_known_and_unknown() {
        let catalog = MeshCatalog::new(vec![entry("a"), entry("b")]).unwrap();
        assert_eq!(catalog.resolve(&TileId::from("b")), MeshLookup::Mesh(MeshHandle(1)));
        assert_eq!(catalog.resolve(&TileId::from("empty")), MeshLookup::NoGeometry);
    }

    #[test]
    fn rejects_duplicate_and_empty_ids() {
        assert!(matches!(
            MeshCatalog::new(vec![entry("a"), entry("a")]),
            Err(CatalogError::Duplicate(_))
        ));
        assert!(matches!(
            MeshCatalog::new(vec![entry("a"), entry("")]),
            Err(CatalogError::EmptyId { index: 1 })
        ));
    }

    #[test]
    fn handles_follow_catalog_order() {
        let catalog = MeshCatalog::new(vec![entry("z"), entry("a"), entry("m")]).unwrap();
        let ids: Vec<&str> = catalog
            .handles()
            .map(|h| catalog.get(h).unwrap().id.as_str())
            .collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[test]
    fn default_catalog_has_no_empty_mesh() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 35);
        assert_eq!(catalog.resolve(&TileId::from("empty")), MeshLookup::NoGeometry);
        assert!(matches!(
            catalog.resolve(&TileId::from("ground")),
            MeshLookup::Mesh(_)
        ));
    }

    #[test]
    fn gates_emit_light() {
        let catalog = default_catalog();
        let emitters: Vec<_> = catalog.emitters().collect();
        assert_eq!(emitters.len(), 1);
        let (handle, spec) = emitters[0];
        assert_eq!(catalog.get(handle).unwrap().id.as_str(), "WallGate1");
        assert_eq!(spec.range, 20.0);
        assert_eq!(spec.attenuation, [1.0, 1.0, 4.0]);
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let catalog = default_catalog();
        catalog.save(tmp.path()).unwrap();

        let loaded = MeshCatalog::load(tmp.path()).unwrap();
        assert_eq!(loaded.entries(), catalog.entries());
    }

    #[test]
    fn load_rejects_duplicates() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::json!({
            "meshes": [
                {"id": "a", "geometry": "a.obj", "textures": {"albedo": "a.png", "emissive": "e.png"}},
                {"id": "a", "geometry": "b.obj", "textures": {"albedo": "b.png", "emissive": "e.png"}}
            ]
        });
        std::fs::write(tmp.path(), json.to_string()).unwrap();
        assert!(matches!(
            MeshCatalog::load(tmp.path()),
            Err(CatalogError::Duplicate(_))
        ));
    }

    #[test]
    fn light_defaults_fill_missing_fields() {
        let spec: PointLightSpec = serde_json::from_str(r#"{"range": 8.0}"#).unwrap();
        assert_eq!(spec.range, 8.0);
        assert_eq!(spec.diffuse, 15.0);
    }
}
