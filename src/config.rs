use anyhow::Result;
use cavegen_world::{CaveConfig, TerrainShape};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

/// Where the generator looks for its settings when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/cavegen.toml";

/// Largest grid radius a run accepts; larger values are clamped.
pub const MAX_GRID_RADIUS: i32 = 16;

/// Settings for a headless generation run.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// World seed.
    pub seed: u64,
    /// Region size in voxels [x, y, z].
    pub region_size: [i32; 3],
    /// Minimum y of every generated region.
    pub base_y: i32,
    /// Regions generated in each lateral direction around the origin region.
    pub grid_radius: i32,
    /// Built-in terrain shape, including the sea level.
    pub terrain: TerrainShape,
    /// Cave synthesis, reconciliation and object settings.
    pub caves: CaveConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            region_size: [32, 64, 32],
            base_y: 16,
            grid_radius: 1,
            terrain: TerrainShape::default(),
            caves: CaveConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<GeneratorConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    GeneratorConfig::default()
                }
            },
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Generator config not found at {}. Using defaults",
                        path.display()
                    );
                }
                GeneratorConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}
