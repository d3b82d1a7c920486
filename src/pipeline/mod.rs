//! Pipeline module for orchestrating world generation stages.
//!
//! Provides a trait-based architecture for modular generation stages
//! that compose into the complete world generation pipeline.

mod stage;

pub use stage::{
    GenerationStage, StageId, Pipeline, PipelineError,
    HeightmapStage, ClimateStage, LandmassStage, HydrologyStage,
    BiomeStage, SettlementStage,
};
