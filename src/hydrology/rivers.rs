//! River sources and steepest-descent tracing.

use std::cmp::Ordering;

use glam::UVec2;
use serde::{Deserialize, Serialize};

use super::WaterFeature;
use crate::grid::{Direction, Grid, euclidean, neighbor_4};
use crate::seed::derive_seed;

/// Water body a river system finally drains into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outlet {
    Sea,
    Lake(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct River {
    pub id: usize,
    pub name: String,
    /// Tile coordinates from source to terminus; elevation never increases.
    pub path: Vec<UVec2>,
    /// Accumulated flow at each path tile, including joined tributaries.
    pub discharge: Vec<f32>,
    /// Sum of step distances (1 per step).
    pub length: f32,
    /// Discharge at the terminus.
    pub flow_rate: f32,
    /// Rivers that join this one.
    pub tributaries: Vec<usize>,
    /// River this one flows into, if it is a tributary.
    pub parent: Option<usize>,
    /// Index into the parent's path where this river joins.
    pub join_index: Option<usize>,
    pub outlet: Outlet,
}

impl River {
    pub fn is_tributary(&self) -> bool {
        self.parent.is_some()
    }
}

/// Why a trace stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceEnd {
    Sea,
    Lake(usize),
    /// Reached a tile of an earlier river.
    Join { river: usize },
    /// No admissible neighbour, or the step limit was hit.
    DeadEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// Flat tile indices, source first. The last tile is the terminus.
    pub path: Vec<usize>,
    pub end: TraceEnd,
}

/// Candidate river sources: free land tiles at least as high as all their
/// neighbours, highest first (ties by index), spaced at least `spacing` apart.
pub fn river_sources(
    elevation: &Grid<f32>,
    land: &Grid<bool>,
    water: &Grid<WaterFeature>,
    spacing: f32,
) -> Vec<usize> {
    let mut candidates: Vec<usize> = (0..elevation.len())
        .filter(|&i| land[i] && water[i] == WaterFeature::None)
        .filter(|&i| elevation.neighbors(i).all(|n| elevation[n] <= elevation[i]))
        .collect();

    candidates.sort_by(|&a, &b| {
        elevation[b]
            .total_cmp(&elevation[a])
            .then_with(|| a.cmp(&b))
    });

    let mut accepted: Vec<usize> = Vec::new();
    for c in candidates {
        let p = elevation.coord(c);
        if accepted
            .iter()
            .all(|&a| euclidean(elevation.coord(a), p) > spacing)
        {
            accepted.push(c);
        }
    }
    accepted
}

/// The admissible neighbour with the lowest elevation, or `None`.
///
/// Admissible means unvisited and not higher than the current tile. Equal
/// candidates keep the first one in the N, E, S, W order rotated by a
/// per-tile hash.
fn lowest_neighbor(elevation: &Grid<f32>, current: usize, visited: &[bool], seed: u64) -> Option<usize> {
    let c = elevation.coord(current);
    let rotation = derive_seed(seed, "river-tie", &[c.x as i64, c.y as i64]) % 4;

    let mut best: Option<usize> = None;
    for dir in Direction::rotated(rotation as usize) {
        let Some((nx, ny)) = neighbor_4(elevation.width(), elevation.height(), c.x, c.y, dir) else {
            continue;
        };
        let n = elevation.index(nx, ny);
        if visited[n] || elevation[n] > elevation[current] {
            continue;
        }
        let better = match best {
            None => true,
            Some(b) => elevation[n].total_cmp(&elevation[b]) == Ordering::Less,
        };
        if better {
            best = Some(n);
        }
    }
    best
}

/// Follows steepest descent from `source` until it reaches water, an earlier
/// river, or cannot continue.
pub fn trace_river(
    elevation: &Grid<f32>,
    water: &Grid<WaterFeature>,
    source: usize,
    seed: u64,
    max_steps: usize,
) -> Trace {
    let mut path = vec![source];
    let mut visited = vec![false; elevation.len()];
    visited[source] = true;
    let mut current = source;

    for _ in 0..max_steps {
        let Some(next) = lowest_neighbor(elevation, current, &visited, seed) else {
            break;
        };
        path.push(next);
        visited[next] = true;
        current = next;

        let end = match water[next] {
            WaterFeature::Sea => Some(TraceEnd::Sea),
            WaterFeature::Lake(l) => Some(TraceEnd::Lake(l)),
            WaterFeature::River(r) => Some(TraceEnd::Join { river: r }),
            WaterFeature::None | WaterFeature::Wetland => None,
        };
        if let Some(end) = end {
            return Trace { path, end };
        }
    }

    Trace { path, end: TraceEnd::DeadEnd }
}

/// Per-tile discharge for a fresh river of `len` tiles.
pub fn own_discharge(len: usize, unit_flow: f32) -> Vec<f32> {
    (1..=len).map(|k| k as f32 * unit_flow).collect()
}

/// Adds a tributary's `contribution` to `parent` from `join_index` downstream,
/// then to every river further down the chain.
pub fn propagate_flow(rivers: &mut [River], parent: usize, join_index: usize, contribution: f32) {
    let mut next = Some((parent, join_index));
    while let Some((p, j)) = next {
        let river = &mut rivers[p];
        for d in &mut river.discharge[j..] {
            *d += contribution;
        }
        river.flow_rate = river.discharge.last().copied().unwrap_or(0.0);
        next = river.parent.zip(river.join_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(w: u32, h: u32) -> Grid<f32> {
        // Highest at the west edge, falling eastward.
        Grid::from_fn_par(w, h, |x, _| 1.0 - x as f32 * 0.1)
    }

    #[test]
    fn trace_descends_monotonically_to_sea() {
        let e = ramp(8, 3);
        let mut water = Grid::filled(8, 3, WaterFeature::None);
        for y in 0..3 {
            *water.get_mut(7, y) = WaterFeature::Sea;
        }

        let start = e.index(0, 1);
        let t = trace_river(&e, &water, start, 9, 100);
        assert_eq!(t.end, TraceEnd::Sea);
        assert_eq!(t.path.first(), Some(&start));
        assert_eq!(e.coord(*t.path.last().unwrap()).x, 7);
        for pair in t.path.windows(2) {
            assert!(e[pair[1]] <= e[pair[0]]);
        }
    }

    #[test]
    fn trace_stops_on_earlier_river() {
        let e = ramp(8, 3);
        let mut water = Grid::filled(8, 3, WaterFeature::None);
        *water.get_mut(3, 1) = WaterFeature::River(0);

        let t = trace_river(&e, &water, e.index(0, 1), 1, 100);
        assert_eq!(t.end, TraceEnd::Join { river: 0 });
        assert_eq!(*t.path.last().unwrap(), e.index(3, 1));
    }

    #[test]
    fn pit_is_a_dead_end() {
        let mut e = Grid::filled(5, 5, 1.0f32);
        *e.get_mut(2, 2) = 0.0;
        *e.get_mut(2, 1) = 0.5;
        let water = Grid::filled(5, 5, WaterFeature::None);

        let t = trace_river(&e, &water, e.index(2, 1), 3, 100);
        assert_eq!(t.end, TraceEnd::DeadEnd);
        assert_eq!(t.path, vec![e.index(2, 1), e.index(2, 2)]);
    }

    #[test]
    fn flat_ground_never_revisits() {
        let e = Grid::filled(4, 4, 0.5f32);
        let water = Grid::filled(4, 4, WaterFeature::None);
        let t = trace_river(&e, &water, e.index(1, 1), 17, 100);
        assert_eq!(t.end, TraceEnd::DeadEnd);
        let mut seen = vec![false; e.len()];
        for &i in &t.path {
            assert!(!seen[i], "tile {} visited twice", i);
            seen[i] = true;
        }
        assert!(t.path.len() <= e.len());
    }

    #[test]
    fn step_limit_ends_trace() {
        let e = ramp(10, 1);
        let water = Grid::filled(10, 1, WaterFeature::None);
        let t = trace_river(&e, &water, 0, 3, 2);
        assert_eq!(t.end, TraceEnd::DeadEnd);
        assert_eq!(t.path.len(), 3);
    }

    #[test]
    fn sources_are_spaced_and_sorted() {
        let mut e = Grid::filled(20, 1, 0.0f32);
        *e.get_mut(2, 0) = 0.9;
        *e.get_mut(4, 0) = 0.8;
        *e.get_mut(15, 0) = 0.7;
        let land = Grid::filled(20, 1, true);
        let water = Grid::filled(20, 1, WaterFeature::None);

        let s = river_sources(&e, &land, &water, 5.0);
        assert_eq!(s[0], 2);
        assert_eq!(s[1], 15);
        assert!(!s.contains(&4));
    }

    #[test]
    fn flow_propagates_down_the_chain() {
        let river = |id, len, parent: Option<usize>, join: Option<usize>| River {
            id,
            name: String::new(),
            path: vec![UVec2::ZERO; len],
            discharge: own_discharge(len, 1.0),
            length: (len - 1) as f32,
            flow_rate: len as f32,
            tributaries: Vec::new(),
            parent,
            join_index: join,
            outlet: Outlet::Sea,
        };
        let mut rivers = vec![river(0, 6, None, None), river(1, 4, Some(0), Some(2))];

        propagate_flow(&mut rivers, 1, 1, 2.0);
        assert_eq!(rivers[1].discharge, vec![1.0, 4.0, 5.0, 6.0]);
        assert_eq!(rivers[0].discharge, vec![1.0, 2.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(rivers[0].flow_rate, 8.0);
    }
}
