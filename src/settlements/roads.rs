//! Terrain-weighted road search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::biomes::Biome;
use crate::hydrology::WaterFeature;
use crate::world::TileGrid;

use super::SettlementConfig;

/// A built road between two settlements of one civilization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    /// Settlement indices.
    pub from: usize,
    pub to: usize,
    /// Tile coordinates from `from` to `to`.
    pub path: Vec<UVec2>,
    /// Sum of step costs along the path.
    pub cost: f32,
}

#[derive(Clone, Copy, Debug)]
struct HeapItem {
    cost: f32,
    idx: usize,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Min-heap by cost.
impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

/// Cost of stepping from tile `from` onto its neighbour `to`, or `None` when
/// `to` is impassable (deep ocean, lakes).
pub fn step_cost(tiles: &TileGrid, from: usize, to: usize, cfg: &SettlementConfig) -> Option<f32> {
    if tiles.biome[to] == Biome::DeepOcean || matches!(tiles.water[to], WaterFeature::Lake(_)) {
        return None;
    }

    let mut cost = 1.0 + cfg.slope_cost * (tiles.elevation[to] - tiles.elevation[from]).abs();
    if matches!(tiles.water[to], WaterFeature::River(_)) {
        cost += cfg.river_crossing_cost;
    }
    if !tiles.land[to] {
        cost += cfg.shallow_sea_cost;
    }
    Some(cost)
}

/// Cheapest path from `start` to `goal` (Dijkstra). Returns flat tile
/// indices and the total cost, or `None` if `goal` is unreachable.
pub fn find_path(tiles: &TileGrid, start: usize, goal: usize, cfg: &SettlementConfig) -> Option<(Vec<usize>, f32)> {
    let n = tiles.len();
    let mut dist = vec![f32::INFINITY; n];
    let mut prev = vec![usize::MAX; n];
    let mut heap = BinaryHeap::new();

    dist[start] = 0.0;
    heap.push(HeapItem { cost: 0.0, idx: start });

    while let Some(HeapItem { cost, idx }) = heap.pop() {
        if idx == goal {
            break;
        }
        if cost > dist[idx] {
            continue;
        }
        for next in tiles.elevation.neighbors(idx) {
            let Some(step) = step_cost(tiles, idx, next, cfg) else {
                continue;
            };
            let c = cost + step;
            if c < dist[next] {
                dist[next] = c;
                prev[next] = idx;
                heap.push(HeapItem { cost: c, idx: next });
            }
        }
    }

    if !dist[goal].is_finite() {
        return None;
    }

    let mut path = vec![goal];
    let mut cur = goal;
    while cur != start {
        cur = prev[cur];
        path.push(cur);
    }
    path.reverse();
    Some((path, dist[goal]))
}
