//! Settlement placement configuration parameters.

use serde::{Deserialize, Serialize};

/// Configuration for habitability scoring, civilization founding and roads.
///
/// Units:
/// - densities and weights: normalized `[0, 1]` unless noted
/// - distances: tiles (fractions are of the shorter grid side)
/// - elevation: normalized heightmap units (`[-1, 1]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementConfig {
    pub civilization_count: u32,
    pub settlement_density: f32,
    /// Probability that an eligible road edge is built.
    pub road_density: f32,
    pub mineral_richness: f32,
    pub soil_fertility: f32,
    pub water_availability: f32,

    // Habitability
    /// Weight of the fresh-water term.
    pub water_weight: f32,
    /// Distance (tiles) over which fresh-water access decays by `1/e`.
    pub water_decay_tiles: f32,
    /// Share of the mineral value taken from a hashed jitter instead of height.
    pub mineral_jitter: f32,
    /// Score subtracted on desert, tundra, snow and volcano tiles.
    pub extreme_penalty: f32,

    // Founding
    /// Worlds with fewer eligible tiles than this found no civilizations.
    pub min_land_tiles: usize,
    /// Minimum distance between capitals, as a fraction of the shorter side.
    pub founder_separation: f32,
    /// Territory radius as a fraction of the shorter side.
    pub territory_radius: f32,
    /// Settlements per civilization at full density, capital excluded.
    pub max_settlements_per_civ: u32,
    /// Minimum distance between any two settlements of one civilization.
    pub settlement_spacing: f32,

    // Roads
    /// Cost per unit of elevation change between neighbouring tiles.
    pub slope_cost: f32,
    pub river_crossing_cost: f32,
    /// Cost of stepping onto shallow ocean.
    pub shallow_sea_cost: f32,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            civilization_count: 3,
            settlement_density: 0.6,
            road_density: 0.4,
            mineral_richness: 0.3,
            soil_fertility: 0.5,
            water_availability: 0.4,

            water_weight: 1.0,
            water_decay_tiles: 6.0,
            mineral_jitter: 0.4,
            extreme_penalty: 0.5,

            min_land_tiles: 16,
            founder_separation: 0.2,
            territory_radius: 0.15,
            max_settlements_per_civ: 12,
            settlement_spacing: 4.0,

            slope_cost: 40.0,
            river_crossing_cost: 4.0,
            shallow_sea_cost: 12.0,
        }
    }
}

impl SettlementConfig {
    /// Territory radius in tiles for a `width × height` grid.
    pub fn territory_radius_tiles(&self, width: u32, height: u32) -> f32 {
        (width.min(height) as f32 * self.territory_radius).max(self.settlement_spacing)
    }

    /// Minimum distance between capitals in tiles.
    pub fn founder_separation_tiles(&self, width: u32, height: u32) -> f32 {
        (width.min(height) as f32 * self.founder_separation).max(1.0)
    }
}
