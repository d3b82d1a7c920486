//! PNG export functionality for heightmaps.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};

use super::ExportError;
use crate::world::WorldData;

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Minimum height value for normalization.
    pub min_height: f32,
    /// Maximum height value for normalization.
    pub max_height: f32,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            min_height: -1.0,
            max_height: 1.0,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Creates options with the height range detected from the world.
    pub fn auto_range(world: &WorldData) -> Self {
        let (min, max) = world.tiles().elevation.range();
        Self {
            min_height: min,
            max_height: max,
            ..Default::default()
        }
    }
}

/// Exports the elevation column as a 16-bit grayscale PNG.
///
/// # Arguments
/// * `world` - The world to export
/// * `path` - Output file path
/// * `options` - Export options including height range for normalization
pub fn export_height_map_png(world: &WorldData, path: &Path, options: &PngExportOptions) -> Result<(), ExportError> {
    let min = options.min_height;
    let max = options.max_height;

    if min >= max {
        return Err(ExportError::InvalidHeightRange(min, max));
    }

    let (w, h) = (world.width(), world.height());
    let range = max - min;
    let elevation = &world.tiles().elevation;

    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(w, h);
    for y in 0..h {
        for x in 0..w {
            // Normalize to [0, 1] then scale to u16
            let normalized = ((elevation.get(x, y) - min) / range).clamp(0.0, 1.0);
            img.put_pixel(x, y, Luma([(normalized * 65535.0) as u16]));
        }
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);

    // Convert u16 slice to bytes for the encoder
    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, w, h, image::ExtendedColorType::L16)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{WorldConfig, generate_world};
    use tempfile::tempdir;

    #[test]
    fn export_height_map_smoke() {
        let world = generate_world(&WorldConfig::with_seed(1).with_size(24, 16)).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("height.png");

        export_height_map_png(&world, &path, &PngExportOptions::default()).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (24, 16));
    }

    #[test]
    fn rejects_empty_range() {
        let world = generate_world(&WorldConfig::with_seed(1).with_size(4, 4)).unwrap();
        let dir = tempdir().unwrap();
        let opts = PngExportOptions { min_height: 0.5, max_height: 0.5, ..Default::default() };
        let err = export_height_map_png(&world, &dir.path().join("x.png"), &opts).unwrap_err();
        assert!(matches!(err, ExportError::InvalidHeightRange(..)));
    }
}
