//! Closed drainage basins and the lakes that fill them.

use serde::{Deserialize, Serialize};

use super::priority_flood::priority_flood_fill;
use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaterType {
    Fresh,
    Salt,
}

/// How a lake came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LakeOrigin {
    /// One of the largest closed basins of the terrain.
    Basin,
    /// Formed where a river trace could descend no further.
    RiverTerminus,
}

/// A closed depression: tiles that would hold water before it spills.
#[derive(Debug, Clone, PartialEq)]
pub struct Basin {
    /// Flat tile indices, ascending.
    pub tiles: Vec<usize>,
    pub spill_elevation: f32,
    pub volume: f32,
}

impl Basin {
    /// Builds a basin over `tiles` filled to `spill_elevation`.
    pub fn new(mut tiles: Vec<usize>, spill_elevation: f32, elevation: &Grid<f32>) -> Self {
        tiles.sort_unstable();
        let volume = tiles.iter().map(|&i| spill_elevation - elevation[i]).sum();
        Self { tiles, spill_elevation, volume }
    }

    /// Lowest elevation inside the basin.
    pub fn floor(&self, elevation: &Grid<f32>) -> f32 {
        self.tiles.iter().map(|&i| elevation[i]).fold(f32::INFINITY, f32::min)
    }
}

/// A body of standing water.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lake {
    pub id: usize,
    pub name: String,
    /// Flat tile indices, ascending.
    pub tiles: Vec<usize>,
    /// Level at which the lake overflows.
    pub spill_elevation: f32,
    /// Sum over tiles of `spill_elevation - elevation`.
    pub volume: f32,
    pub water_type: WaterType,
    /// Rivers terminating in this lake.
    pub inflow: Vec<usize>,
    pub origin: LakeOrigin,
}

impl Lake {
    pub fn from_basin(id: usize, name: String, basin: Basin, origin: LakeOrigin) -> Self {
        Self {
            id,
            name,
            tiles: basin.tiles,
            spill_elevation: basin.spill_elevation,
            volume: basin.volume,
            water_type: WaterType::Fresh,
            inflow: Vec::new(),
            origin,
        }
    }
}

/// Finds every closed basin, largest volume first (ties by lowest tile index).
///
/// A tile is inside a basin when the Priority-Flood level exceeds its own
/// elevation. Basins are the 4-connected components of such tiles sharing the
/// same fill level.
pub fn find_basins(elevation: &Grid<f32>, sea_elevation: f32) -> Vec<Basin> {
    let filled = priority_flood_fill(elevation, sea_elevation);
    let depressed: Vec<bool> = filled.iter().zip(elevation.iter()).map(|(f, e)| f > e).collect();

    let mut seen = vec![false; elevation.len()];
    let mut basins = Vec::new();
    let mut stack = Vec::new();

    for start in 0..elevation.len() {
        if !depressed[start] || seen[start] {
            continue;
        }
        let level = filled[start];
        seen[start] = true;
        stack.push(start);
        let mut tiles = Vec::new();
        while let Some(i) = stack.pop() {
            tiles.push(i);
            for n in elevation.neighbors(i) {
                if depressed[n] && !seen[n] && filled[n] == level {
                    seen[n] = true;
                    stack.push(n);
                }
            }
        }
        basins.push(Basin::new(tiles, level, elevation));
    }

    basins.sort_by(|a, b| {
        b.volume
            .total_cmp(&a.volume)
            .then_with(|| a.tiles[0].cmp(&b.tiles[0]))
    });
    basins
}

/// Water type of a lake: salt when it is fed by no river and its floor lies
/// below sea level.
pub fn water_type(floor: f32, sea_elevation: f32, has_inflow: bool) -> WaterType {
    if floor < sea_elevation && !has_inflow {
        WaterType::Salt
    } else {
        WaterType::Fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 7x7 plain at 0.5 with two pits walled at 1.0: a 2-tile pit on the
    /// left and a 1-tile pit on the right.
    fn two_pits() -> Grid<f32> {
        let mut e = Grid::filled(7, 7, 0.5f32);
        for y in 1..=4 {
            for x in 1..=5 {
                *e.get_mut(x, y) = 1.0;
            }
        }
        *e.get_mut(2, 2) = 0.2;
        *e.get_mut(2, 3) = 0.3;
        *e.get_mut(4, 2) = 0.6;
        e
    }

    #[test]
    fn basins_are_ranked_by_volume() {
        let e = two_pits();
        let basins = find_basins(&e, -1.0);
        assert_eq!(basins.len(), 2);

        assert_eq!(basins[0].tiles, vec![e.index(2, 2), e.index(2, 3)]);
        assert!((basins[0].volume - 1.5).abs() < 1e-5);
        assert_eq!(basins[0].spill_elevation, 1.0);

        assert_eq!(basins[1].tiles, vec![e.index(4, 2)]);
        assert!((basins[1].volume - 0.4).abs() < 1e-5);
    }

    #[test]
    fn volume_matches_tile_sum() {
        let e = two_pits();
        for b in find_basins(&e, -1.0) {
            let sum: f32 = b.tiles.iter().map(|&i| b.spill_elevation - e[i]).sum();
            assert!((sum - b.volume).abs() < 1e-6);
            assert!(b.volume > 0.0);
        }
    }

    #[test]
    fn flat_world_has_no_basins() {
        let e = Grid::filled(5, 5, 0.0f32);
        assert!(find_basins(&e, -0.1).is_empty());
    }

    #[test]
    fn salt_requires_no_inflow_and_low_floor() {
        assert_eq!(water_type(-0.5, -0.1, false), WaterType::Salt);
        assert_eq!(water_type(-0.5, -0.1, true), WaterType::Fresh);
        assert_eq!(water_type(0.2, -0.1, false), WaterType::Fresh);
    }
}
