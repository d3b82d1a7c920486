//! Generation stage trait and pipeline orchestration.

use std::time::Instant;

use thiserror::Error;

use crate::biomes::{BiomeConfig, classify_biomes};
use crate::climate::{ClimateConfig, derive_climate};
use crate::hydrology::{HydrologyConfig, simulate_hydrology};
use crate::settlements::{SettlementConfig, place_settlements};
use crate::terrain::{attach_biomes, classify_landmasses, generate_heightmap, place_caves};
use crate::world::{WorldBuilder, WorldConfig, require};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Diamond-square elevation field.
    Heightmap,
    /// Temperature and rainfall.
    Climate,
    /// Land mask, continents and islands.
    Landmasses,
    /// Lakes and rivers.
    Hydrology,
    /// Biome classification, landmass biome sets and caves.
    Biomes,
    /// Civilizations, settlements and roads.
    Settlements,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Heightmap => "heightmap",
            StageId::Climate => "climate",
            StageId::Landmasses => "landmasses",
            StageId::Hydrology => "hydrology",
            StageId::Biomes => "biomes",
            StageId::Settlements => "settlements",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
}

/// Trait for implementing generation stages.
///
/// Each stage reads the slots earlier stages filled in the [`WorldBuilder`]
/// and fills its own.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the generation stage.
    ///
    /// # Arguments
    /// * `world` - The world under construction
    /// * `config` - World parameters
    fn execute(&self, world: &mut WorldBuilder, config: &WorldConfig) -> Result<(), PipelineError>;
}

/// Orchestrates multiple generation stages into a complete pipeline.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
    config: WorldConfig,
}

impl Pipeline {
    /// Creates a new empty pipeline with the given configuration.
    pub fn new(config: WorldConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// The standard six-stage world pipeline with default tuning.
    pub fn for_world(config: WorldConfig) -> Self {
        let mut pipeline = Self::new(config);
        pipeline
            .add_stage(HeightmapStage)
            .add_stage(ClimateStage::new(ClimateConfig::default()))
            .add_stage(LandmassStage)
            .add_stage(HydrologyStage::new(HydrologyConfig::default()))
            .add_stage(BiomeStage::new(BiomeConfig::default()))
            .add_stage(SettlementStage::new(SettlementConfig::default()));
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Executes all stages in order.
    pub fn run(&self, world: &mut WorldBuilder) -> Result<(), PipelineError> {
        self.run_with_callbacks(world, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `world` - The world under construction
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        world: &mut WorldBuilder,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            // Check dependencies
            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            let started = Instant::now();
            stage.execute(world, &self.config)?;
            completed.push(stage.id());
            tracing::debug!(
                stage = stage.id().name(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "stage finished"
            );

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Diamond-square heightmap stage.
pub struct HeightmapStage;

impl GenerationStage for HeightmapStage {
    fn id(&self) -> StageId {
        StageId::Heightmap
    }

    fn name(&self) -> &str {
        "Heightmap Generation"
    }

    fn execute(&self, world: &mut WorldBuilder, config: &WorldConfig) -> Result<(), PipelineError> {
        world.elevation = Some(generate_heightmap(
            config.width,
            config.height,
            config.seed,
            config.elevation_scale,
            config.mountain_ranges,
        ));
        Ok(())
    }
}

/// Temperature and rainfall stage.
pub struct ClimateStage {
    pub config: ClimateConfig,
}

impl ClimateStage {
    pub fn new(config: ClimateConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for ClimateStage {
    fn id(&self) -> StageId {
        StageId::Climate
    }

    fn name(&self) -> &str {
        "Climate Derivation"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heightmap]
    }

    fn execute(&self, world: &mut WorldBuilder, config: &WorldConfig) -> Result<(), PipelineError> {
        let cfg = ClimateConfig {
            sea_level: config.sea_level,
            water_availability: config.water_availability,
            ..self.config.clone()
        };
        let elevation = require(&world.elevation, self.name(), "elevation")?;
        let climate = derive_climate(elevation, config.seed, config.temperature_scale, config.rainfall_scale, &cfg);
        world.climate = Some(climate);
        Ok(())
    }
}

/// Land/sea classification stage.
pub struct LandmassStage;

impl GenerationStage for LandmassStage {
    fn id(&self) -> StageId {
        StageId::Landmasses
    }

    fn name(&self) -> &str {
        "Landmass Classification"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heightmap]
    }

    fn execute(&self, world: &mut WorldBuilder, config: &WorldConfig) -> Result<(), PipelineError> {
        let elevation = require(&world.elevation, self.name(), "elevation")?;
        let landmasses = classify_landmasses(
            elevation,
            config.sea_level,
            config.continent_count,
            config.island_density,
            config.seed,
        );
        world.landmasses = Some(landmasses);
        Ok(())
    }
}

/// Lake and river stage.
pub struct HydrologyStage {
    pub config: HydrologyConfig,
}

impl HydrologyStage {
    pub fn new(config: HydrologyConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for HydrologyStage {
    fn id(&self) -> StageId {
        StageId::Hydrology
    }

    fn name(&self) -> &str {
        "Hydrology Simulation"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heightmap, StageId::Landmasses]
    }

    fn execute(&self, world: &mut WorldBuilder, config: &WorldConfig) -> Result<(), PipelineError> {
        let cfg = HydrologyConfig {
            sea_level: config.sea_level,
            ..self.config.clone()
        };
        let elevation = require(&world.elevation, self.name(), "elevation")?;
        let landmasses = require(&world.landmasses, self.name(), "landmasses")?;
        let hydrology = simulate_hydrology(
            elevation,
            &landmasses.land,
            config.river_count,
            config.lake_count,
            config.seed,
            &cfg,
        );
        world.hydrology = Some(hydrology);
        Ok(())
    }
}

/// Biome classification stage. Also records the biomes present on each
/// landmass and places caves, both of which need the finished biome grid.
pub struct BiomeStage {
    pub config: BiomeConfig,
}

impl BiomeStage {
    pub fn new(config: BiomeConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for BiomeStage {
    fn id(&self) -> StageId {
        StageId::Biomes
    }

    fn name(&self) -> &str {
        "Biome Classification"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Climate, StageId::Landmasses, StageId::Hydrology]
    }

    fn execute(&self, world: &mut WorldBuilder, config: &WorldConfig) -> Result<(), PipelineError> {
        let cfg = BiomeConfig {
            sea_level: config.sea_level,
            forest_density: config.forest_density,
            ..self.config.clone()
        };
        let elevation = require(&world.elevation, self.name(), "elevation")?;
        let climate = require(&world.climate, self.name(), "climate")?;
        let biomes = classify_biomes(elevation, &climate.temperature, &climate.rainfall, &cfg);

        if let Some(landmasses) = world.landmasses.as_mut() {
            attach_biomes(landmasses, &biomes);
        }
        world.biomes = Some(biomes);

        let tiles = world.tile_grid(self.name())?;
        world.caves = Some(place_caves(&tiles, config.cave_systems, config.seed));
        Ok(())
    }
}

/// Civilization, settlement and road stage.
pub struct SettlementStage {
    pub config: SettlementConfig,
}

impl SettlementStage {
    pub fn new(config: SettlementConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for SettlementStage {
    fn id(&self) -> StageId {
        StageId::Settlements
    }

    fn name(&self) -> &str {
        "Settlement Placement"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Biomes, StageId::Hydrology]
    }

    fn execute(&self, world: &mut WorldBuilder, config: &WorldConfig) -> Result<(), PipelineError> {
        let cfg = SettlementConfig {
            civilization_count: config.civilization_count,
            settlement_density: config.settlement_density,
            road_density: config.road_density,
            mineral_richness: config.mineral_richness,
            soil_fertility: config.soil_fertility,
            water_availability: config.water_availability,
            ..self.config.clone()
        };
        let tiles = world.tile_grid(self.name())?;
        let hydrology = require(&world.hydrology, self.name(), "hydrology")?;
        let settlements = place_settlements(&tiles, &hydrology.lakes, &cfg, config.seed);
        world.settlements = Some(settlements);
        Ok(())
    }
}
