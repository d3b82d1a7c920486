//! The finished world and the builder stages write into.

use serde::{Deserialize, Serialize};

use crate::biomes::Biome;
use crate::climate::Climate;
use crate::grid::Grid;
use crate::hydrology::{Hydrology, Lake, River};
use crate::pipeline::PipelineError;
use crate::settlements::{Civilization, Road, Settlement, Settlements};
use crate::terrain::{Cave, Landmass, Landmasses};

use super::{TileGrid, WorldConfig};

/// Complete, immutable output of one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldData {
    config: WorldConfig,
    tiles: TileGrid,
    sea_level: f32,
    continents: Vec<Landmass>,
    islands: Vec<Landmass>,
    rivers: Vec<River>,
    lakes: Vec<Lake>,
    caves: Vec<Cave>,
    civilizations: Vec<Civilization>,
    settlements: Vec<Settlement>,
    roads: Vec<Road>,
}

impl WorldData {
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn tiles(&self) -> &TileGrid {
        &self.tiles
    }

    pub fn width(&self) -> u32 {
        self.tiles.width()
    }

    pub fn height(&self) -> u32 {
        self.tiles.height()
    }

    /// Sea level in `[0, 1]`.
    pub fn sea_level(&self) -> f32 {
        self.sea_level
    }

    pub fn continents(&self) -> &[Landmass] {
        &self.continents
    }

    pub fn islands(&self) -> &[Landmass] {
        &self.islands
    }

    /// Continents followed by islands.
    pub fn landmasses(&self) -> impl Iterator<Item = &Landmass> {
        self.continents.iter().chain(self.islands.iter())
    }

    pub fn rivers(&self) -> &[River] {
        &self.rivers
    }

    pub fn lakes(&self) -> &[Lake] {
        &self.lakes
    }

    pub fn caves(&self) -> &[Cave] {
        &self.caves
    }

    pub fn civilizations(&self) -> &[Civilization] {
        &self.civilizations
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }
}

/// Partially generated world. Each stage fills one or more slots.
#[derive(Debug, Default)]
pub struct WorldBuilder {
    pub config: WorldConfig,
    pub elevation: Option<Grid<f32>>,
    pub climate: Option<Climate>,
    pub landmasses: Option<Landmasses>,
    pub hydrology: Option<Hydrology>,
    pub biomes: Option<Grid<Biome>>,
    pub caves: Option<Vec<Cave>>,
    pub settlements: Option<Settlements>,
}

/// Borrows a builder slot or reports which stage found it empty.
pub(crate) fn require<'a, T>(slot: &'a Option<T>, stage: &str, what: &str) -> Result<&'a T, PipelineError> {
    slot.as_ref().ok_or_else(|| missing(stage, what))
}

impl WorldBuilder {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Assembles the tile columns produced so far. Requires every per-tile
    /// stage to have run.
    pub fn tile_grid(&self, stage: &str) -> Result<TileGrid, PipelineError> {
        let elevation = require(&self.elevation, stage, "elevation")?;
        let climate = require(&self.climate, stage, "climate")?;
        let landmasses = require(&self.landmasses, stage, "landmasses")?;
        let hydrology = require(&self.hydrology, stage, "hydrology")?;
        let biome = require(&self.biomes, stage, "biomes")?;

        Ok(TileGrid {
            elevation: elevation.clone(),
            temperature: climate.temperature.clone(),
            rainfall: climate.rainfall.clone(),
            biome: biome.clone(),
            land: landmasses.land.clone(),
            water: hydrology.water.clone(),
        })
    }

    /// Converts the builder into the finished world.
    pub fn finish(self) -> Result<WorldData, PipelineError> {
        const STAGE: &str = "Finish";
        let tiles = self.tile_grid(STAGE)?;

        let landmasses = self.landmasses.ok_or_else(|| missing(STAGE, "landmasses"))?;
        let hydrology = self.hydrology.ok_or_else(|| missing(STAGE, "hydrology"))?;
        let caves = self.caves.ok_or_else(|| missing(STAGE, "caves"))?;
        let settlements = self.settlements.ok_or_else(|| missing(STAGE, "settlements"))?;

        Ok(WorldData {
            sea_level: self.config.sea_level,
            config: self.config,
            tiles,
            continents: landmasses.continents,
            islands: landmasses.islands,
            rivers: hydrology.rivers,
            lakes: hydrology.lakes,
            caves,
            civilizations: settlements.civilizations,
            settlements: settlements.settlements,
            roads: settlements.roads,
        })
    }
}

fn missing(stage: &str, what: &str) -> PipelineError {
    PipelineError::StageFailed(stage.to_string(), format!("missing {what}"))
}
