//! Export module for saving worlds to disk.
//!
//! The full dataset round-trips through JSON; 16-bit PNG heightmaps and RGB
//! biome previews are write-only views for inspection.

mod biome_map;
mod json;
mod png;

pub use biome_map::{BiomeMapOptions, export_biome_map_png, render_biome_map};
pub use json::{export_world_json, import_world_json};
pub use png::{PngExportOptions, export_height_map_png};

use thiserror::Error;

/// Errors that can occur during export or import.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
}
