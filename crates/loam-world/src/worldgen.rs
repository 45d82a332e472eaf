use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default)]
    pub chunk: ChunkDims,
    #[serde(default)]
    pub height: Height,
    #[serde(default)]
    pub structure: Structure,
    #[serde(default)]
    pub surface: Surface,
}

fn default_seed() -> i32 {
    1337
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            chunk: ChunkDims::default(),
            height: Height::default(),
            structure: Structure::default(),
            surface: Surface::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkDims {
    #[serde(default = "default_chunk_size")]
    pub size: usize,
    #[serde(default = "default_chunk_height")]
    pub height: usize,
}
fn default_chunk_size() -> usize {
    16
}
fn default_chunk_height() -> usize {
    64
}
impl Default for ChunkDims {
    fn default() -> Self {
        Self {
            size: default_chunk_size(),
            height: default_chunk_height(),
        }
    }
}

/// Multi-octave 2D elevation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Height {
    #[serde(default = "default_height_freq")]
    pub frequency: f32,
    #[serde(default = "default_height_octaves")]
    pub octaves: u32,
    #[serde(default = "default_height_exponent")]
    pub exponent: f32,
}
fn default_height_freq() -> f32 {
    0.008
}
fn default_height_octaves() -> u32 {
    4
}
fn default_height_exponent() -> f32 {
    2.0
}
impl Default for Height {
    fn default() -> Self {
        Self {
            frequency: default_height_freq(),
            octaves: default_height_octaves(),
            exponent: default_height_exponent(),
        }
    }
}

/// 3D overhang/cave noise. `structure_rate` adds material, `unstructure_rate`
/// removes it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Structure {
    #[serde(default = "default_structure_freq")]
    pub frequency: f32,
    #[serde(default = "default_structure_rate")]
    pub structure_rate: f32,
    #[serde(default = "default_unstructure_rate")]
    pub unstructure_rate: f32,
}
fn default_structure_freq() -> f32 {
    0.03
}
fn default_structure_rate() -> f32 {
    0.5
}
fn default_unstructure_rate() -> f32 {
    0.3
}
impl Default for Structure {
    fn default() -> Self {
        Self {
            frequency: default_structure_freq(),
            structure_rate: default_structure_rate(),
            unstructure_rate: default_unstructure_rate(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Surface {
    #[serde(default = "default_water_height")]
    pub water_height: i32,
    #[serde(default = "default_snow_height")]
    pub snow_height: f32,
    #[serde(default = "default_snow_jitter")]
    pub snow_jitter: f32,
    #[serde(default = "default_snow_freq")]
    pub snow_frequency: f32,
}
fn default_water_height() -> i32 {
    10
}
fn default_snow_height() -> f32 {
    40.0
}
fn default_snow_jitter() -> f32 {
    1.0
}
fn default_snow_freq() -> f32 {
    0.002
}
impl Default for Surface {
    fn default() -> Self {
        Self {
            water_height: default_water_height(),
            snow_height: default_snow_height(),
            snow_jitter: default_snow_jitter(),
            snow_frequency: default_snow_freq(),
        }
    }
}

/// Flattened view of [`WorldGenConfig`] read by the generator hot loops.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldGenParams {
    pub seed: i32,
    pub chunk_size: usize,
    pub chunk_height: usize,
    pub height_frequency: f32,
    pub height_octaves: u32,
    pub height_exponent: f32,
    pub structure_frequency: f32,
    pub structure_rate: f32,
    pub unstructure_rate: f32,
    pub water_height: i32,
    pub snow_height: f32,
    pub snow_jitter: f32,
    pub snow_frequency: f32,
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        Self {
            seed: cfg.seed,
            chunk_size: cfg.chunk.size,
            chunk_height: cfg.chunk.height,
            height_frequency: cfg.height.frequency,
            height_octaves: cfg.height.octaves,
            height_exponent: cfg.height.exponent,
            structure_frequency: cfg.structure.frequency,
            structure_rate: cfg.structure.structure_rate,
            unstructure_rate: cfg.structure.unstructure_rate,
            water_height: cfg.surface.water_height,
            snow_height: cfg.surface.snow_height,
            snow_jitter: cfg.surface.snow_jitter,
            snow_frequency: cfg.surface.snow_frequency,
        }
    }
}

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: WorldGenConfig = toml::from_str(&s)?;
    log::info!(target: "worldgen", "loaded {} (seed {})", path.display(), cfg.seed);
    Ok(WorldGenParams::from_config(&cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tables_fall_back_to_defaults() {
        let cfg: WorldGenConfig = toml::from_str(
            r#"
            seed = 7
            [chunk]
            height = 32
            [surface]
            water_height = 4
            "#,
        )
        .unwrap();
        let p = WorldGenParams::from_config(&cfg);
        assert_eq!(p.seed, 7);
        assert_eq!(p.chunk_size, 16);
        assert_eq!(p.chunk_height, 32);
        assert_eq!(p.water_height, 4);
        assert_eq!(p.height_octaves, default_height_octaves());
        assert_eq!(p.snow_frequency, default_snow_freq());
    }

    #[test]
    fn empty_document_is_default() {
        let cfg: WorldGenConfig = toml::from_str("").unwrap();
        assert_eq!(WorldGenParams::from_config(&cfg), WorldGenParams::default());
    }
}
