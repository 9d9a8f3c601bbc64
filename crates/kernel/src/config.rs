use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use voxscape_common::{GridDims, GridError, TileId};
use voxscape_solver::SolverParams;

/// Errors from loading or validating a [`SynthesisConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
    #[error("cell size must be positive, got {0}")]
    NonPositiveCellSize(f32),
    #[error("playback period must be non-zero")]
    ZeroPlaybackPeriod,
    #[error("ground tile id is empty")]
    EmptyGroundTile,
    #[error("at least one boundary tile is required")]
    NoBoundaryTiles,
}

/// Parameters of one generation, passed by value into every `generate` call.
///
/// Controls never mutate a config in place; the `with_*` methods return a new
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub name: String,
    pub grid: GridDims,
    pub ground_tile: TileId,
    pub boundary_tiles: Vec<TileId>,
    pub wrap_edges: bool,
    pub debug_capture: bool,
    /// `None` seeds each generation from the clock.
    pub seed: Option<u64>,
    /// World-space edge length of one grid cell.
    pub cell_size: f32,
    pub playback_period_ms: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            name: "Test".into(),
            grid: GridDims::default(),
            ground_tile: TileId::from("ground"),
            boundary_tiles: vec![TileId::from("empty"); 3],
            wrap_edges: false,
            debug_capture: false,
            seed: None,
            cell_size: 2.0,
            playback_period_ms: 50,
        }
    }
}

impl SynthesisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size > 0.0 && self.cell_size.is_finite()) {
            return Err(ConfigError::NonPositiveCellSize(self.cell_size));
        }
        if self.playback_period_ms == 0 {
            return Err(ConfigError::ZeroPlaybackPeriod);
        }
        if self.ground_tile.as_str().is_empty() {
            return Err(ConfigError::EmptyGroundTile);
        }
        if self.boundary_tiles.is_empty() {
            return Err(ConfigError::NoBoundaryTiles);
        }
        Ok(())
    }

    /// Load and validate a config from a JSON file. Missing fields take their
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn with_grid(&self, grid: GridDims) -> Self {
        Self {
            grid,
            ..self.clone()
        }
    }

    pub fn with_seed(&self, seed: Option<u64>) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    pub fn with_debug_capture(&self, debug_capture: bool) -> Self {
        Self {
            debug_capture,
            ..self.clone()
        }
    }

    pub fn with_wrap_edges(&self, wrap_edges: bool) -> Self {
        Self {
            wrap_edges,
            ..self.clone()
        }
    }

    pub fn with_ground_tile(&self, ground_tile: TileId) -> Self {
        Self {
            ground_tile,
            ..self.clone()
        }
    }

    pub fn with_playback_period(&self, period: Duration) -> Self {
        Self {
            playback_period_ms: period.as_millis().max(1) as u64,
            ..self.clone()
        }
    }

    pub fn playback_period(&self) -> Duration {
        Duration::from_millis(self.playback_period_ms)
    }

    /// Solver parameters for one generation.
    pub fn solver_params(&self) -> SolverParams {
        SolverParams {
            name: self.name.clone(),
            seed: self.seed,
            dims: self.grid,
            wrap_edges: self.wrap_edges,
            ground_tile: self.ground_tile.clone(),
            boundary_tiles: self.boundary_tiles.clone(),
            debug_capture: self.debug_capture,
        }
    }
}
