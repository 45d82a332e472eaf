use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use loam_world::{WorldGenConfig, WorldGenParams};
use serde::{Deserialize, Serialize};

/// Streaming knobs: grid extent, worker count and the per-tick drain budget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Chunks on each side of the player's chunk; the grid is `2r+1` square.
    #[serde(default = "default_grid_radius")]
    pub grid_radius: usize,
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,
    /// Results placed per tick at most.
    #[serde(default = "default_max_launches")]
    pub max_launches_per_tick: usize,
}

fn default_grid_radius() -> usize {
    4
}
fn default_worker_threads() -> usize {
    4
}
fn default_max_launches() -> usize {
    4
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            grid_radius: default_grid_radius(),
            worker_threads: default_worker_threads(),
            max_launches_per_tick: default_max_launches(),
        }
    }
}

impl StreamConfig {
    #[inline]
    pub fn grid_side(&self) -> usize {
        2 * self.grid_radius + 1
    }
}

/// Largest accepted grid radius; keeps a typo from allocating a huge grid.
pub const MAX_GRID_RADIUS: usize = 64;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub world: WorldGenConfig,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Reads, parses and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.stream;
        let c = &self.world.chunk;
        if c.size == 0 {
            return Err(ConfigError::Invalid("chunk.size must be at least 1".into()));
        }
        if c.height == 0 {
            return Err(ConfigError::Invalid("chunk.height must be at least 1".into()));
        }
        if s.worker_threads == 0 {
            return Err(ConfigError::Invalid(
                "stream.worker_threads must be at least 1".into(),
            ));
        }
        if s.max_launches_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "stream.max_launches_per_tick must be at least 1".into(),
            ));
        }
        if s.grid_radius > MAX_GRID_RADIUS {
            return Err(ConfigError::Invalid(format!(
                "stream.grid_radius {} exceeds {MAX_GRID_RADIUS}",
                s.grid_radius
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn world_params(&self) -> WorldGenParams {
        WorldGenParams::from_config(&self.world)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [stream]
            grid_radius = 1
            [world]
            seed = 5
            [world.chunk]
            height = 48
            "#,
        )
        .unwrap();
        assert_eq!(cfg.stream.grid_radius, 1);
        assert_eq!(cfg.stream.grid_side(), 3);
        assert_eq!(cfg.stream.worker_threads, default_worker_threads());
        let p = cfg.world_params();
        assert_eq!((p.seed, p.chunk_size, p.chunk_height), (5, 16, 48));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_values_are_rejected() {
        let mut cfg = AppConfig::default();
        cfg.stream.worker_threads = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = AppConfig::default();
        cfg.stream.max_launches_per_tick = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = AppConfig::default();
        cfg.world.chunk.size = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = AppConfig::default();
        cfg.world.chunk.height = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = AppConfig::default();
        cfg.stream.grid_radius = MAX_GRID_RADIUS + 1;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut cfg = AppConfig::default();
        cfg.stream.grid_radius = 2;
        cfg.world.seed = -9;
        let text = cfg.to_toml_string().unwrap();
        let back = AppConfig::from_toml_str(&text).unwrap();
        assert_eq!(back.stream, cfg.stream);
        assert_eq!(back.world_params(), cfg.world_params());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = AppConfig::load(Path::new("/nonexistent/loam.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
