//! Deterministic procedural world generator.
//!
//! This crate turns a seed and a handful of scalar parameters into a
//! complete world: a diamond-square heightmap, climate, continents and
//! islands, rivers and lakes, biomes, caves, and the civilizations,
//! settlements and roads that grow on top of them. The same configuration
//! always produces the same world.

pub mod biomes;
pub mod climate;
pub mod export;
pub mod grid;
pub mod hydrology;
pub mod names;
pub mod noise;
pub mod pipeline;
pub mod seed;
pub mod settlements;
pub mod terrain;
pub mod world;

pub use biomes::{Biome, BiomeConfig};
pub use climate::ClimateConfig;
pub use grid::Grid;
pub use hydrology::{HydrologyConfig, Lake, River, WaterFeature};
pub use pipeline::{GenerationStage, Pipeline, PipelineError, StageId};
pub use settlements::{Civilization, Road, Settlement, SettlementConfig, SettlementTier};
pub use terrain::{Cave, Landmass, LandmassKind};
pub use world::{ConfigError, Tile, TileGrid, WorldBuilder, WorldConfig, WorldData, WorldGenError, generate_world};
