//! Biome classification.
//!
//! A pure decision tree over normalized elevation, temperature and rainfall.
//! Each tile is classified independently, so the pass runs in parallel and
//! re-running it on the same inputs reproduces the same grid.

mod config;

pub use config::BiomeConfig;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::world::sea_level_to_elevation;

/// Biome classification. `as_u8()` is stable and used for storage/export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Biome {
    DeepOcean = 0,
    Ocean = 1,
    Beach = 2,
    Desert = 3,
    Savanna = 4,
    Grassland = 5,
    Forest = 6,
    Rainforest = 7,
    Swamp = 8,
    Taiga = 9,
    Tundra = 10,
    Snow = 11,
    Mountain = 12,
    Volcano = 13,
}

impl Biome {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_water(self) -> bool {
        matches!(self, Biome::DeepOcean | Biome::Ocean)
    }

    /// Harsh biomes penalized when scoring habitability.
    pub fn is_extreme(self) -> bool {
        matches!(self, Biome::Desert | Biome::Tundra | Biome::Snow | Biome::Volcano)
    }

    /// Base soil fertility for this biome (0..1).
    pub fn fertility(self) -> f32 {
        match self {
            Biome::DeepOcean | Biome::Ocean => 0.0,
            Biome::Beach => 0.2,
            Biome::Desert => 0.05,
            Biome::Savanna => 0.5,
            Biome::Grassland => 0.9,
            Biome::Forest => 0.7,
            Biome::Rainforest => 0.6,
            Biome::Swamp => 0.4,
            Biome::Taiga => 0.35,
            Biome::Tundra => 0.1,
            Biome::Snow => 0.0,
            Biome::Mountain => 0.15,
            Biome::Volcano => 0.3,
        }
    }

    /// Base mineral yield for this biome (0..1).
    pub fn mineral_yield(self) -> f32 {
        match self {
            Biome::Mountain => 0.9,
            Biome::Volcano => 0.8,
            Biome::Tundra | Biome::Taiga => 0.4,
            Biome::Desert => 0.35,
            Biome::Snow => 0.3,
            Biome::DeepOcean | Biome::Ocean => 0.0,
            _ => 0.15,
        }
    }

    /// RGB preview color for this biome.
    pub fn preview_rgb(self) -> [u8; 3] {
        match self {
            Biome::DeepOcean => [15, 40, 90],
            Biome::Ocean => [40, 80, 150],
            Biome::Beach => [230, 215, 160],
            Biome::Desert => [220, 205, 140],
            Biome::Savanna => [190, 190, 95],
            Biome::Grassland => [130, 180, 90],
            Biome::Forest => [40, 120, 60],
            Biome::Rainforest => [20, 140, 55],
            Biome::Swamp => [70, 100, 70],
            Biome::Taiga => [30, 80, 40],
            Biome::Tundra => [170, 190, 170],
            Biome::Snow => [240, 248, 255],
            Biome::Mountain => [140, 140, 140],
            Biome::Volcano => [110, 50, 40],
        }
    }
}

/// Classify a single tile.
pub fn classify_biome(elevation: f32, temperature: f32, rainfall: f32, cfg: &BiomeConfig) -> Biome {
    let sea = sea_level_to_elevation(cfg.sea_level);
    if elevation < sea {
        return if sea - elevation > cfg.deep_water_depth {
            Biome::DeepOcean
        } else {
            Biome::Ocean
        };
    }

    let relief = (1.0 - sea).max(f32::EPSILON);
    let rel = ((elevation - sea) / relief).clamp(0.0, 1.0);
    let t = temperature.clamp(0.0, 1.0);
    let r = rainfall.clamp(0.0, 1.0);
    let forest_rain = cfg.forest_rainfall();

    if rel >= cfg.volcano_height {
        return Biome::Volcano;
    }
    if rel >= cfg.mountain_height {
        return if t < 0.25 { Biome::Snow } else { Biome::Mountain };
    }

    // Permanent cold.
    if t < 0.15 {
        return Biome::Snow;
    }
    if t < 0.3 {
        return Biome::Tundra;
    }

    if rel < cfg.beach_band {
        return Biome::Beach;
    }
    if rel < cfg.swamp_height && t >= 0.45 && r >= 0.7 {
        return Biome::Swamp;
    }

    if t < 0.45 {
        return if r >= forest_rain - 0.1 { Biome::Taiga } else { Biome::Tundra };
    }

    if t >= 0.7 {
        if r >= forest_rain + 0.2 {
            return Biome::Rainforest;
        }
        if r >= 0.25 {
            return Biome::Savanna;
        }
        return Biome::Desert;
    }

    if r >= forest_rain {
        return Biome::Forest;
    }
    if r >= 0.2 {
        return Biome::Grassland;
    }
    Biome::Desert
}

/// Classify every tile of a grid.
///
/// # Panics
/// If the three grids do not share a shape.
pub fn classify_biomes(
    elevation: &Grid<f32>,
    temperature: &Grid<f32>,
    rainfall: &Grid<f32>,
    cfg: &BiomeConfig,
) -> Grid<Biome> {
    assert_eq!(elevation.len(), temperature.len());
    assert_eq!(elevation.len(), rainfall.len());

    let cells: Vec<Biome> = elevation
        .as_slice()
        .par_iter()
        .zip(temperature.as_slice().par_iter())
        .zip(rainfall.as_slice().par_iter())
        .map(|((&e, &t), &r)| classify_biome(e, t, r, cfg))
        .collect();

    Grid::from_vec(elevation.width(), elevation.height(), cells)
}
