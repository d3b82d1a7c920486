//! Biome classification configuration.

use serde::{Deserialize, Serialize};

/// Thresholds for the per-tile biome decision tree.
///
/// Notes:
/// - Elevation is the normalized heightmap value in `[-1, 1]`.
/// - Temperature and rainfall are normalized to `[0, 1]`.
/// - Height bands (`beach_band`, `swamp_height`, ...) are fractions of the
///   relief between sea level and the highest possible elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeConfig {
    /// Sea level in `[0, 1]`; tiles below it are ocean.
    pub sea_level: f32,
    /// Forest abundance in `[0, 1]`; higher values lower the rainfall needed for forests.
    pub forest_density: f32,

    /// Depth below sea level (elevation units) at which ocean becomes deep ocean.
    pub deep_water_depth: f32,
    /// Relative height band above sea level that forms beaches.
    pub beach_band: f32,
    /// Relative height below which hot, wet land turns to swamp.
    pub swamp_height: f32,
    /// Relative height at which land becomes mountain.
    pub mountain_height: f32,
    /// Relative height at which mountains become volcanic peaks.
    pub volcano_height: f32,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        Self {
            sea_level: 0.45,
            forest_density: 0.4,

            deep_water_depth: 0.25,
            beach_band: 0.025,
            swamp_height: 0.08,
            mountain_height: 0.72,
            volcano_height: 0.96,
        }
    }
}

impl BiomeConfig {
    /// Configuration for a given sea level and forest density, other thresholds default.
    pub fn new(sea_level: f32, forest_density: f32) -> Self {
        Self {
            sea_level,
            forest_density,
            ..Default::default()
        }
    }

    /// Minimum rainfall for temperate forest.
    pub fn forest_rainfall(&self) -> f32 {
        0.55 - 0.3 * self.forest_density.clamp(0.0, 1.0)
    }
}
