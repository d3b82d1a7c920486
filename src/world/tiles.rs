//! Columnar per-tile storage.

use serde::{Deserialize, Serialize};

use crate::biomes::Biome;
use crate::grid::Grid;
use crate::hydrology::WaterFeature;

/// Every per-tile field of a world, one `Grid` column per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    /// Normalized to `[-1, 1]`.
    pub elevation: Grid<f32>,
    /// `[0, 1]`.
    pub temperature: Grid<f32>,
    /// `[0, 1]`.
    pub rainfall: Grid<f32>,
    pub biome: Grid<Biome>,
    pub land: Grid<bool>,
    pub water: Grid<WaterFeature>,
}

/// Read-only copy of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub elevation: f32,
    pub temperature: f32,
    pub rainfall: f32,
    pub biome: Biome,
    pub land: bool,
    pub water: WaterFeature,
}

impl TileGrid {
    pub fn width(&self) -> u32 {
        self.elevation.width()
    }

    pub fn height(&self) -> u32 {
        self.elevation.height()
    }

    pub fn len(&self) -> usize {
        self.elevation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevation.is_empty()
    }

    /// Copy of the cell at `(x, y)`.
    pub fn tile(&self, x: u32, y: u32) -> Tile {
        let i = self.elevation.index(x, y);
        Tile {
            elevation: self.elevation[i],
            temperature: self.temperature[i],
            rainfall: self.rainfall[i],
            biome: self.biome[i],
            land: self.land[i],
            water: self.water[i],
        }
    }

    /// Number of land tiles.
    pub fn land_count(&self) -> usize {
        self.land.iter().filter(|&&l| l).count()
    }
}
