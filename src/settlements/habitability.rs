//! Per-tile habitability scoring.

use crate::grid::{Grid, distance_field};
use crate::hydrology::{Lake, WaterFeature, WaterType};
use crate::seed::{derive_seed, unit_f32};
use crate::world::TileGrid;

use super::SettlementConfig;

/// Dry land outside any lake, wetland or river course.
#[inline]
pub fn is_settleable(tiles: &TileGrid, i: usize) -> bool {
    tiles.land[i] && tiles.water[i] == WaterFeature::None
}

/// Tiles carrying fresh water: rivers and fresh lakes.
pub fn fresh_water_mask(tiles: &TileGrid, lakes: &[Lake]) -> Grid<bool> {
    tiles.water.map(|w| match *w {
        WaterFeature::River(_) => true,
        WaterFeature::Lake(l) => lakes.get(l).is_some_and(|lake| lake.water_type == WaterType::Fresh),
        _ => false,
    })
}

/// Mineral value of a tile: height blended with a hashed jitter, scaled by
/// the biome's yield.
pub fn mineral_value(tiles: &TileGrid, i: usize, jitter: f32, seed: u64) -> f32 {
    let c = tiles.elevation.coord(i);
    let height = ((tiles.elevation[i] + 1.0) * 0.5).clamp(0.0, 1.0);
    let noise = unit_f32(derive_seed(seed, "mineral", &[c.x as i64, c.y as i64]));
    let j = jitter.clamp(0.0, 1.0);
    ((1.0 - j) * height + j * noise) * tiles.biome[i].mineral_yield()
}

/// Scores every tile. Tiles that cannot hold a settlement score
/// `f32::NEG_INFINITY`.
pub fn habitability(tiles: &TileGrid, lakes: &[Lake], cfg: &SettlementConfig, seed: u64) -> Grid<f32> {
    let water_distance = distance_field(&fresh_water_mask(tiles, lakes));

    Grid::from_fn_par(tiles.width(), tiles.height(), |x, y| {
        let i = tiles.elevation.index(x, y);
        if !is_settleable(tiles, i) {
            return f32::NEG_INFINITY;
        }

        let water = match water_distance[i] {
            u32::MAX => 0.0,
            d => (-(d as f32) / cfg.water_decay_tiles.max(f32::EPSILON)).exp(),
        };
        let biome = tiles.biome[i];
        let penalty = if biome.is_extreme() { cfg.extreme_penalty } else { 0.0 };

        cfg.water_weight * cfg.water_availability * water
            + cfg.soil_fertility * biome.fertility()
            + cfg.mineral_richness * mineral_value(tiles, i, cfg.mineral_jitter, seed)
            - penalty
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::Biome;

    fn plain(w: u32, h: u32, biome: Biome) -> TileGrid {
        TileGrid {
            elevation: Grid::filled(w, h, 0.2),
            temperature: Grid::filled(w, h, 0.5),
            rainfall: Grid::filled(w, h, 0.5),
            biome: Grid::filled(w, h, biome),
            land: Grid::filled(w, h, true),
            water: Grid::filled(w, h, WaterFeature::None),
        }
    }

    #[test]
    fn water_proximity_raises_score() {
        let mut t = plain(12, 1, Biome::Grassland);
        *t.water.get_mut(0, 0) = WaterFeature::River(0);
        let cfg = SettlementConfig { mineral_richness: 0.0, ..Default::default() };
        let s = habitability(&t, &[], &cfg, 1);
        assert_eq!(s[0], f32::NEG_INFINITY);
        assert!(s[1] > s[5]);
        assert!(s[5] > s[11]);
    }

    #[test]
    fn extreme_biomes_are_penalized() {
        let cfg = SettlementConfig::default();
        let green = habitability(&plain(4, 4, Biome::Grassland), &[], &cfg, 3);
        let snow = habitability(&plain(4, 4, Biome::Snow), &[], &cfg, 3);
        assert!(green[5] > snow[5]);
    }

    #[test]
    fn salt_lakes_are_not_fresh_water() {
        use crate::hydrology::{Basin, LakeOrigin};

        let mut t = plain(4, 1, Biome::Grassland);
        *t.water.get_mut(0, 0) = WaterFeature::Lake(0);
        let mut lake = Lake::from_basin(0, "Salt".into(), Basin::new(vec![0], 0.5, &t.elevation), LakeOrigin::Basin);
        lake.water_type = WaterType::Salt;

        let mask = fresh_water_mask(&t, &[lake]);
        assert!(!mask[0]);
    }

    #[test]
    fn sea_tiles_are_unsettleable() {
        let mut t = plain(3, 3, Biome::Grassland);
        *t.land.get_mut(1, 1) = false;
        *t.water.get_mut(1, 1) = WaterFeature::Sea;
        let s = habitability(&t, &[], &SettlementConfig::default(), 0);
        assert_eq!(*s.get(1, 1), f32::NEG_INFINITY);
        assert!(s.get(0, 0).is_finite());
    }
}
