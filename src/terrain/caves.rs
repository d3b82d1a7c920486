//! Cave entrances in high terrain.

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::biomes::Biome;
use crate::grid::euclidean;
use crate::hydrology::WaterFeature;
use crate::seed::{derive_seed, unit_f32};
use crate::world::TileGrid;

/// Share of the land tiles (by elevation) counted as highland.
const HIGHLAND_FRACTION: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cave {
    pub id: usize,
    pub entrance: UVec2,
    /// Relative depth in `[0, 1]`; higher entrances lead deeper.
    pub depth: f32,
}

/// Elevation at or above which a land tile is highland, or `None` without land.
fn highland_threshold(tiles: &TileGrid) -> Option<f32> {
    let mut land: Vec<f32> = (0..tiles.len())
        .filter(|&i| tiles.land[i])
        .map(|i| tiles.elevation[i])
        .collect();
    if land.is_empty() {
        return None;
    }
    land.sort_by(f32::total_cmp);
    let k = ((land.len() - 1) as f32 * (1.0 - HIGHLAND_FRACTION)).floor() as usize;
    Some(land[k])
}

/// Places up to `cave_systems` cave entrances on mountains, volcanoes and
/// the highest land, in seeded order, keeping entrances apart.
pub fn place_caves(tiles: &TileGrid, cave_systems: u32, seed: u64) -> Vec<Cave> {
    if cave_systems == 0 {
        return Vec::new();
    }
    let Some(highland) = highland_threshold(tiles) else {
        return Vec::new();
    };

    let mut candidates: Vec<(u64, usize)> = (0..tiles.len())
        .filter(|&i| tiles.land[i] && tiles.water[i] == WaterFeature::None)
        .filter(|&i| {
            matches!(tiles.biome[i], Biome::Mountain | Biome::Volcano) || tiles.elevation[i] >= highland
        })
        .map(|i| {
            let c = tiles.elevation.coord(i);
            (derive_seed(seed, "cave", &[c.x as i64, c.y as i64]), i)
        })
        .collect();
    candidates.sort_unstable();

    let (lo, hi) = (0..tiles.len())
        .filter(|&i| tiles.land[i])
        .map(|i| tiles.elevation[i])
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), e| (lo.min(e), hi.max(e)));
    let span = (hi - lo).max(f32::EPSILON);

    let spacing = (tiles.width().min(tiles.height()) as f32 / 10.0).max(2.0);
    let mut caves: Vec<Cave> = Vec::new();
    for (hash, i) in candidates {
        if caves.len() >= cave_systems as usize {
            break;
        }
        let p = tiles.elevation.coord(i);
        if caves.iter().any(|c| euclidean(c.entrance, p) < spacing) {
            continue;
        }
        let height = (tiles.elevation[i] - lo) / span;
        caves.push(Cave {
            id: caves.len(),
            entrance: p,
            depth: (height * (0.5 + 0.5 * unit_f32(hash))).clamp(0.0, 1.0),
        });
    }

    if caves.len() < cave_systems as usize {
        tracing::debug!(requested = cave_systems, placed = caves.len(), "cave sites exhausted");
    }
    caves
}
