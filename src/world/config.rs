//! World generation configuration record.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by [`WorldConfig::validate`] and config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be a positive integer, got {value}")]
    InvalidDimension { field: &'static str, value: u32 },
    #[error("{field} must be within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f32 },
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("{field} must be greater than zero, got {value}")]
    NonPositiveScale { field: &'static str, value: f32 },
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parameters for one world.
///
/// Every field is optional when deserialized; missing fields take the
/// defaults below. Field names follow the external configuration record
/// (`seaLevel`, `riverCount`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldConfig {
    /// Grid width in tiles.
    pub width: u32,
    /// Grid height in tiles.
    pub height: u32,
    /// Master seed; fully determines all randomness.
    pub seed: u64,
    /// Initial diamond-square displacement magnitude.
    pub elevation_scale: f32,
    /// Frequency multiplier for the temperature noise field.
    pub temperature_scale: f32,
    /// Frequency multiplier for the rainfall noise field.
    pub rainfall_scale: f32,
    /// Land threshold on elevation mapped to `[0, 1]`.
    pub sea_level: f32,
    pub continent_count: u32,
    /// Fraction of small land regions kept as separate named islands.
    pub island_density: f32,
    pub mountain_ranges: u32,
    pub river_count: u32,
    pub lake_count: u32,
    pub forest_density: f32,
    pub cave_systems: u32,
    pub civilization_count: u32,
    pub settlement_density: f32,
    /// Probability that an eligible road edge is built.
    pub road_density: f32,
    pub mineral_richness: f32,
    pub soil_fertility: f32,
    pub water_availability: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            seed: 42,
            elevation_scale: 1.0,
            temperature_scale: 1.0,
            rainfall_scale: 1.0,
            sea_level: 0.45,
            continent_count: 3,
            island_density: 0.4,
            mountain_ranges: 3,
            river_count: 8,
            lake_count: 5,
            forest_density: 0.4,
            cave_systems: 4,
            civilization_count: 3,
            settlement_density: 0.6,
            road_density: 0.4,
            mineral_richness: 0.3,
            soil_fertility: 0.5,
            water_availability: 0.4,
        }
    }
}

impl WorldConfig {
    /// Default configuration with the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Returns a copy resized to `width × height`.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Parses a (possibly partial) JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks every invariant of the record, reporting the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::InvalidDimension { field: "width", value: self.width });
        }
        if self.height == 0 {
            return Err(ConfigError::InvalidDimension { field: "height", value: self.height });
        }

        for (field, value) in [
            ("elevationScale", self.elevation_scale),
            ("temperatureScale", self.temperature_scale),
            ("rainfallScale", self.rainfall_scale),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
            if value <= 0.0 {
                return Err(ConfigError::NonPositiveScale { field, value });
            }
        }

        for (field, value) in [
            ("seaLevel", self.sea_level),
            ("islandDensity", self.island_density),
            ("forestDensity", self.forest_density),
            ("settlementDensity", self.settlement_density),
            ("roadDensity", self.road_density),
            ("mineralRichness", self.mineral_richness),
            ("soilFertility", self.soil_fertility),
            ("waterAvailability", self.water_availability),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }

        Ok(())
    }

    /// Total number of tiles.
    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Sea level expressed in raw elevation units (`[-1, 1]`).
    pub fn sea_elevation(&self) -> f32 {
        sea_level_to_elevation(self.sea_level)
    }
}

/// Maps a `[0, 1]` sea level onto the heightmap's `[-1, 1]` range.
#[inline]
pub fn sea_level_to_elevation(sea_level: f32) -> f32 {
    sea_level.clamp(0.0, 1.0) * 2.0 - 1.0
}
