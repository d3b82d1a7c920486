//! Land/sea classification and connected-component landmass extraction.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::biomes::Biome;
use crate::grid::Grid;
use crate::names::{NameKind, generate_name};
use crate::world::sea_level_to_elevation;

/// Divisor applied to `total_tiles / continent_count` to obtain the minimum
/// continent area.
pub const CONTINENT_AREA_DIVISOR: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandmassKind {
    Continent,
    Island,
}

/// A maximal 4-connected land region.
///
/// The one exception is the catch-all "Scattered Isles" island: it is the
/// union of the small regions not kept individually and is generally not
/// connected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmass {
    pub id: usize,
    pub kind: LandmassKind,
    pub name: String,
    /// Flat tile indices, ascending.
    pub tiles: Vec<usize>,
    pub area: usize,
    pub elevation_min: f32,
    pub elevation_max: f32,
    /// Distinct biomes present; filled by [`attach_biomes`].
    pub biomes: BTreeSet<Biome>,
    pub centroid: Vec2,
}

impl Landmass {
    fn from_tiles(id: usize, kind: LandmassKind, name: String, mut tiles: Vec<usize>, elevation: &Grid<f32>) -> Self {
        tiles.sort_unstable();
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        let mut sum = Vec2::ZERO;
        for &i in &tiles {
            let e = elevation[i];
            lo = lo.min(e);
            hi = hi.max(e);
            sum += elevation.coord(i).as_vec2();
        }
        let area = tiles.len();
        Self {
            id,
            kind,
            name,
            tiles,
            area,
            elevation_min: lo,
            elevation_max: hi,
            biomes: BTreeSet::new(),
            centroid: sum / area.max(1) as f32,
        }
    }
}

/// Output of the landmass classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmasses {
    pub land: Grid<bool>,
    pub continents: Vec<Landmass>,
    pub islands: Vec<Landmass>,
}

impl Landmasses {
    /// All landmasses, continents first.
    pub fn iter(&self) -> impl Iterator<Item = &Landmass> {
        self.continents.iter().chain(self.islands.iter())
    }
}

/// Minimum area for a region to count as a continent.
pub fn continent_threshold(total_tiles: usize, continent_count: u32) -> usize {
    (total_tiles / (continent_count.max(1) as usize * CONTINENT_AREA_DIVISOR)).max(1)
}

/// Tile is land iff its elevation, mapped to `[0, 1]`, is at least `sea_level`.
pub fn land_mask(elevation: &Grid<f32>, sea_level: f32) -> Grid<bool> {
    let threshold = sea_level_to_elevation(sea_level);
    elevation.map(|&e| e >= threshold)
}

/// Labels 4-connected `true` regions. Returns tile lists in discovery order
/// (row-major by first tile).
pub fn connected_regions(mask: &Grid<bool>) -> Vec<Vec<usize>> {
    let mut seen = vec![false; mask.len()];
    let mut regions = Vec::new();
    let mut stack = Vec::new();

    for start in 0..mask.len() {
        if !mask[start] || seen[start] {
            continue;
        }
        seen[start] = true;
        stack.push(start);
        let mut region = Vec::new();
        while let Some(i) = stack.pop() {
            region.push(i);
            for n in mask.neighbors(i) {
                if mask[n] && !seen[n] {
                    seen[n] = true;
                    stack.push(n);
                }
            }
        }
        regions.push(region);
    }

    regions
}

/// Partitions land into continents and islands.
///
/// # Arguments
/// * `elevation` - Normalized elevation grid
/// * `sea_level` - Land threshold in `[0, 1]`
/// * `continent_count` - Target continent count, controls the size threshold
/// * `island_density` - Fraction of small regions kept as individual islands;
///   the rest are merged into one catch-all island group
/// * `seed` - Seed for landmass names
pub fn classify_landmasses(
    elevation: &Grid<f32>,
    sea_level: f32,
    continent_count: u32,
    island_density: f32,
    seed: u64,
) -> Landmasses {
    let land = land_mask(elevation, sea_level);
    let mut regions = connected_regions(&land);
    // Largest first; ties keep discovery order.
    regions.sort_by(|a, b| b.len().cmp(&a.len()).then(a[0].cmp(&b[0])));

    let threshold = continent_threshold(elevation.len(), continent_count);
    let mut large: Vec<Vec<usize>> = Vec::new();
    let mut small: Vec<Vec<usize>> = Vec::new();
    for region in regions {
        if region.len() >= threshold {
            large.push(region);
        } else {
            small.push(region);
        }
    }

    // A world with land but no continent-sized region still gets its largest
    // region promoted when it is reasonably close to the threshold.
    if large.is_empty() && !small.is_empty() && small[0].len() * 2 >= threshold {
        large.push(small.remove(0));
    }

    let keep = ((island_density.clamp(0.0, 1.0) * small.len() as f32).ceil() as usize).min(small.len());
    let merged: Vec<usize> = small.drain(keep..).flatten().collect();

    let continents: Vec<Landmass> = large
        .into_iter()
        .enumerate()
        .map(|(id, tiles)| {
            let name = generate_name(seed, NameKind::Continent, id as i64);
            Landmass::from_tiles(id, LandmassKind::Continent, name, tiles, elevation)
        })
        .collect();

    let mut islands: Vec<Landmass> = small
        .into_iter()
        .enumerate()
        .map(|(id, tiles)| {
            let name = generate_name(seed, NameKind::Island, id as i64);
            Landmass::from_tiles(id, LandmassKind::Island, name, tiles, elevation)
        })
        .collect();

    if !merged.is_empty() {
        let id = islands.len();
        islands.push(Landmass::from_tiles(
            id,
            LandmassKind::Island,
            "Scattered Isles".to_string(),
            merged,
            elevation,
        ));
    }

    tracing::debug!(
        continents = continents.len(),
        islands = islands.len(),
        threshold,
        "classified landmasses"
    );

    Landmasses { land, continents, islands }
}

/// Second pass: records the distinct biomes present on each landmass.
pub fn attach_biomes(landmasses: &mut Landmasses, biomes: &Grid<Biome>) {
    for mass in landmasses.continents.iter_mut().chain(landmasses.islands.iter_mut()) {
        mass.biomes = mass.tiles.iter().map(|&i| biomes[i]).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: u32, rows: &[&str]) -> Grid<f32> {
        let cells = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| if c == '#' { 1.0 } else { -1.0 }))
            .collect();
        Grid::from_vec(width, rows.len() as u32, cells)
    }

    #[test]
    fn regions_use_four_connectivity() {
        let e = grid(4, &["#...", ".#..", "....", "..##"]);
        let mask = land_mask(&e, 0.5);
        let regions = connected_regions(&mask);
        assert_eq!(regions.len(), 3, "diagonal neighbours must not join");
    }

    #[test]
    fn partition_covers_land_exactly() {
        let e = grid(6, &["##....", "##..#.", "......", ".#...#", "....##", "#....."]);
        let result = classify_landmasses(&e, 0.5, 1, 0.5, 7);
        let mut seen = vec![0u32; e.len()];
        for mass in result.iter() {
            for &t in &mass.tiles {
                seen[t] += 1;
            }
        }
        for i in 0..e.len() {
            let expected = if result.land[i] { 1 } else { 0 };
            assert_eq!(seen[i], expected, "tile {} covered {} times", i, seen[i]);
        }
    }

    #[test]
    fn big_region_is_continent() {
        let mut rows = vec!["########"; 6];
        rows.push("........");
        rows.push(".#......");
        let e = grid(8, &rows);
        let result = classify_landmasses(&e, 0.5, 1, 1.0, 1);
        assert_eq!(result.continents.len(), 1);
        assert_eq!(result.continents[0].area, 48);
        assert_eq!(result.islands.len(), 1);
        assert_eq!(result.islands[0].area, 1);
    }

    #[test]
    fn zero_island_density_merges_small_regions() {
        let e = grid(5, &["#.#.#", ".....", "#.#.#", ".....", "#.#.#"]);
        let result = classify_landmasses(&e, 0.5, 1, 0.0, 3);
        assert!(result.continents.is_empty());
        assert_eq!(result.islands.len(), 1);
        assert_eq!(result.islands[0].area, 9);
        assert_eq!(result.islands[0].name, "Scattered Isles");

        // The catch-all group spans several separate regions.
        let mut mask = Grid::filled(5, 5, false);
        for &i in &result.islands[0].tiles {
            mask[i] = true;
        }
        assert_eq!(connected_regions(&mask).len(), 9);
    }

    #[test]
    fn elevation_range_is_recorded() {
        let e = Grid::from_vec(3, 1, vec![0.2f32, 0.8, -1.0]);
        let result = classify_landmasses(&e, 0.5, 1, 1.0, 0);
        let mass = result.iter().next().unwrap();
        assert_eq!(mass.elevation_min, 0.2);
        assert_eq!(mass.elevation_max, 0.8);
    }

    #[test]
    fn biomes_attach_per_region() {
        let e = grid(3, &["##.", "...", "..#"]);
        let mut result = classify_landmasses(&e, 0.5, 1, 1.0, 0);
        let biomes = Grid::filled(3, 3, Biome::Grassland);
        attach_biomes(&mut result, &biomes);
        for mass in result.iter() {
            assert_eq!(mass.biomes.len(), 1);
            assert!(mass.biomes.contains(&Biome::Grassland));
        }
    }
}
