//! Biome preview map export with feature overlays.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Rgb, RgbImage};

use super::ExportError;
use crate::hydrology::WaterFeature;
use crate::settlements::SettlementTier;
use crate::world::WorldData;

/// Options for biome map export.
#[derive(Debug, Clone)]
pub struct BiomeMapOptions {
    pub compression: CompressionType,
    pub filter: FilterType,
    pub draw_rivers: bool,
    pub draw_lakes: bool,
    pub draw_roads: bool,
    pub draw_settlements: bool,
    pub river_color: [u8; 3],
    pub lake_color: [u8; 3],
    pub wetland_color: [u8; 3],
    pub road_color: [u8; 3],
    pub settlement_color: [u8; 3],
    pub capital_color: [u8; 3],
}

impl Default for BiomeMapOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
            draw_rivers: true,
            draw_lakes: true,
            draw_roads: true,
            draw_settlements: true,
            river_color: [50, 110, 220],
            lake_color: [60, 130, 200],
            wetland_color: [90, 120, 95],
            road_color: [150, 105, 60],
            settlement_color: [20, 20, 20],
            capital_color: [200, 30, 30],
        }
    }
}

/// Renders the biome preview with the enabled overlays, drawn in order:
/// lakes, rivers, roads, settlements.
pub fn render_biome_map(world: &WorldData, options: &BiomeMapOptions) -> RgbImage {
    let tiles = world.tiles();
    let (w, h) = (world.width(), world.height());
    let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(w, h);

    for y in 0..h {
        for x in 0..w {
            let i = tiles.elevation.index(x, y);
            let c = match tiles.water[i] {
                WaterFeature::Lake(_) if options.draw_lakes => options.lake_color,
                WaterFeature::Wetland if options.draw_lakes => options.wetland_color,
                WaterFeature::River(_) if options.draw_rivers => options.river_color,
                _ => tiles.biome[i].preview_rgb(),
            };
            img.put_pixel(x, y, Rgb(c));
        }
    }

    if options.draw_rivers {
        // Termini on sea or lake tiles are not tagged as river.
        for river in world.rivers() {
            for p in &river.path[..river.path.len().saturating_sub(1)] {
                img.put_pixel(p.x, p.y, Rgb(options.river_color));
            }
        }
    }

    if options.draw_roads {
        for road in world.roads() {
            for p in &road.path {
                img.put_pixel(p.x, p.y, Rgb(options.road_color));
            }
        }
    }

    if options.draw_settlements {
        for s in world.settlements() {
            let color = if s.is_capital { options.capital_color } else { options.settlement_color };
            img.put_pixel(s.position.x, s.position.y, Rgb(color));
            // Larger towns get a plus-shaped marker.
            if s.tier >= SettlementTier::Town {
                for (dx, dy) in [(0i64, -1i64), (1, 0), (0, 1), (-1, 0)] {
                    let (nx, ny) = (s.position.x as i64 + dx, s.position.y as i64 + dy);
                    if tiles.elevation.in_bounds(nx, ny) {
                        img.put_pixel(nx as u32, ny as u32, Rgb(color));
                    }
                }
            }
        }
    }

    img
}

/// Exports the biome preview map as an RGB PNG.
pub fn export_biome_map_png(world: &WorldData, path: &Path, options: &BiomeMapOptions) -> Result<(), ExportError> {
    let img = render_biome_map(world, options);

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(img.as_raw(), img.width(), img.height(), image::ExtendedColorType::Rgb8)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{WorldConfig, generate_world};
    use tempfile::tempdir;

    #[test]
    fn export_biome_map_smoke() {
        let world = generate_world(&WorldConfig::with_seed(5).with_size(40, 30)).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("biomes.png");
        export_biome_map_png(&world, &path, &BiomeMapOptions::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn capitals_are_marked() {
        let world = generate_world(&WorldConfig::with_seed(12345).with_size(64, 64)).unwrap();
        let opts = BiomeMapOptions::default();
        let img = render_biome_map(&world, &opts);
        for s in world.settlements().iter().filter(|s| s.is_capital) {
            assert_eq!(img.get_pixel(s.position.x, s.position.y).0, opts.capital_color);
        }
    }

    #[test]
    fn plain_render_uses_biome_colors() {
        let world = generate_world(&WorldConfig::with_seed(2).with_size(16, 16)).unwrap();
        let opts = BiomeMapOptions {
            draw_rivers: false,
            draw_lakes: false,
            draw_roads: false,
            draw_settlements: false,
            ..Default::default()
        };
        let img = render_biome_map(&world, &opts);
        let t = world.tiles();
        assert_eq!(img.get_pixel(3, 4).0, t.biome.get(3, 4).preview_rgb());
    }
}
