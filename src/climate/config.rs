//! Climate configuration parameters.

use serde::{Deserialize, Serialize};

/// Configuration for temperature and rainfall derivation.
///
/// Units:
/// - temperature and rainfall: normalized `[0, 1]`
/// - elevation: normalized heightmap units (`[-1, 1]`)
/// - distances: tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateConfig {
    /// Sea level in `[0, 1]`.
    pub sea_level: f32,

    // Temperature model
    pub equator_temperature: f32,
    pub pole_temperature: f32,
    /// Temperature drop between sea level and the highest peak.
    pub lapse_rate: f32,
    /// Amplitude of the temperature noise field.
    pub temperature_noise: f32,

    // Rainfall model
    pub base_rainfall: f32,
    /// Amplitude of the rainfall noise field.
    pub rainfall_noise: f32,
    /// Relative height (above sea) where orographic lift peaks.
    pub orographic_peak: f32,
    pub orographic_strength: f32,
    /// Rainfall lost on the highest peaks (rain shadow / thin air).
    pub summit_dryness: f32,
    /// Extra moisture on the coast, decaying inland.
    pub coastal_moisture: f32,
    pub coastal_decay_tiles: f32,
    /// Global aridity bias subtracted from every tile.
    pub aridity: f32,
    /// Water availability in `[0, 1]`; 0.5 is neutral.
    pub water_availability: f32,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            sea_level: 0.45,

            equator_temperature: 0.95,
            pole_temperature: 0.05,
            lapse_rate: 0.55,
            temperature_noise: 0.12,

            base_rainfall: 0.5,
            rainfall_noise: 0.3,
            orographic_peak: 0.35,
            orographic_strength: 0.2,
            summit_dryness: 0.35,
            coastal_moisture: 0.15,
            coastal_decay_tiles: 12.0,
            aridity: 0.05,
            water_availability: 0.4,
        }
    }
}

impl ClimateConfig {
    /// Default tuning for a given sea level and water availability.
    pub fn new(sea_level: f32, water_availability: f32) -> Self {
        Self {
            sea_level,
            water_availability,
            ..Default::default()
        }
    }
}
