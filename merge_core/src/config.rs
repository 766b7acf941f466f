use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::spawn::{SpawnBand, SpawnTable, SpawnTableError};

pub const BUILTIN_GAME_CONFIG: &str = include_str!("data/game_config.json");

/// On-disk shape of the game config. Everything has a default so a partial
/// file still loads.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfigFile {
    #[serde(default = "default_cell_size_deg")]
    pub cell_size_deg: f64,
    #[serde(default = "default_interact_radius")]
    pub interact_radius: u32,
    #[serde(default = "default_win_threshold")]
    pub win_threshold: u32,
    #[serde(default = "default_world_seed")]
    pub world_seed: String,
    #[serde(default = "default_spawn_bands")]
    pub spawn_bands: Vec<SpawnBand>,
}

fn default_cell_size_deg() -> f64 {
    0.0001
}

fn default_interact_radius() -> u32 {
    3
}

fn default_win_threshold() -> u32 {
    2048
}

fn default_world_seed() -> String {
    "geomerge".to_string()
}

fn default_spawn_bands() -> Vec<SpawnBand> {
    vec![
        SpawnBand {
            upto: 0.75,
            token: None,
        },
        SpawnBand {
            upto: 0.875,
            token: Some(1),
        },
        SpawnBand {
            upto: 0.9375,
            token: Some(2),
        },
        SpawnBand {
            upto: 0.984375,
            token: Some(4),
        },
        SpawnBand {
            upto: 1.0,
            token: Some(8),
        },
    ]
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub cell_size_deg: f64,
    pub interact_radius: u32,
    pub win_threshold: u32,
    pub world_seed: String,
    pub spawn: SpawnTable,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse game config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read game config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid spawn table: {0}")]
    SpawnTable(#[from] SpawnTableError),
    #[error("cell size must be positive, got {0}")]
    CellSize(f64),
    #[error("interact radius must be at least 1, got {0}")]
    Radius(u32),
    #[error("win threshold {0} is not a power of two of at least 2")]
    WinThreshold(u32),
}

impl GameConfig {
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_GAME_CONFIG).expect("builtin game config should parse")
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let file: GameConfigFile = serde_json::from_str(data)?;
        Self::from_parts(file)
    }

    fn from_parts(file: GameConfigFile) -> Result<Self, ConfigError> {
        if !(file.cell_size_deg > 0.0) {
            return Err(ConfigError::CellSize(file.cell_size_deg));
        }
        if file.interact_radius == 0 {
            return Err(ConfigError::Radius(file.interact_radius));
        }
        if file.win_threshold < 2 || !file.win_threshold.is_power_of_two() {
            return Err(ConfigError::WinThreshold(file.win_threshold));
        }
        Ok(Self {
            cell_size_deg: file.cell_size_deg,
            interact_radius: file.interact_radius,
            win_threshold: file.win_threshold,
            world_seed: file.world_seed,
            spawn: SpawnTable::new(file.spawn_bands)?,
        })
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Load the config from `GEOMERGE_CONFIG_PATH` when set, falling back to the
/// builtin on any read or parse failure.
pub fn load_game_config_from_env() -> GameConfig {
    if let Some(path) = env::var("GEOMERGE_CONFIG_PATH").ok().map(PathBuf::from) {
        match GameConfig::from_file(&path) {
            Ok(config) => return config,
            Err(err) => {
                tracing::warn!(
                    target: "geomerge::config",
                    path = %path.display(),
                    error = %err,
                    "game_config.load_failed"
                );
            }
        }
    }
    GameConfig::builtin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_parses() {
        let config = GameConfig::builtin();
        assert_eq!(config.interact_radius, 3);
        assert_eq!(config.win_threshold, 2048);
        assert_eq!(config.cell_size_deg, 0.0001);
        assert_eq!(config.spawn.bands().len(), 5);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config = GameConfig::from_json(r#"{ "win_threshold": 16 }"#).unwrap();
        assert_eq!(config.win_threshold, 16);
        assert_eq!(config.interact_radius, 3);
        assert_eq!(config.world_seed, "geomerge");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "cell_size_deg": 0.0 }"#),
            Err(ConfigError::CellSize(_))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "interact_radius": 0 }"#),
            Err(ConfigError::Radius(0))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "win_threshold": 24 }"#),
            Err(ConfigError::WinThreshold(24))
        ));
        assert!(matches!(
            GameConfig::from_json(r#"{ "spawn_bands": [ { "upto": 0.5 } ] }"#),
            Err(ConfigError::SpawnTable(_))
        ));
    }
}
