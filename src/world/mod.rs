//! World configuration, data model and the generation entry point.

mod config;
mod data;
mod tiles;

pub use config::{ConfigError, WorldConfig, sea_level_to_elevation};
pub use data::{WorldBuilder, WorldData};
pub(crate) use data::require;
pub use tiles::{Tile, TileGrid};

use thiserror::Error;

use crate::pipeline::{Pipeline, PipelineError};

#[derive(Error, Debug)]
pub enum WorldGenError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Generates a complete world from `config`.
///
/// The configuration is validated first; generation either returns a full
/// [`WorldData`] or an error, never a partial world. Identical
/// configurations produce identical worlds.
pub fn generate_world(config: &WorldConfig) -> Result<WorldData, WorldGenError> {
    config.validate()?;
    let pipeline = Pipeline::for_world(config.clone());
    let mut builder = WorldBuilder::new(config.clone());
    pipeline.run(&mut builder)?;
    Ok(builder.finish()?)
}
