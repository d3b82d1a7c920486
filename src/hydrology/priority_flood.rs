//! Priority-Flood depression filling (Barnes et al. 2014) on a bounded grid.
//!
//! Outlets are every border tile plus every below-sea tile connected to the
//! border through other below-sea tiles (the open ocean). Enclosed below-sea
//! pockets are *not* outlets, so they fill like any other basin.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use crate::grid::Grid;

#[derive(Clone, Copy, Debug)]
struct HeapItem {
    height: f32,
    idx: usize,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem {}

// Min-heap by height via reversed ordering; index breaks ties.
impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .height
            .total_cmp(&self.height)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

/// Below-sea tiles reachable from the grid border through below-sea tiles.
pub fn open_ocean(elevation: &Grid<f32>, sea_elevation: f32) -> Grid<bool> {
    let (w, h) = (elevation.width(), elevation.height());
    let mut ocean = Grid::filled(w, h, false);
    let mut q = VecDeque::new();

    for i in 0..elevation.len() {
        let c = elevation.coord(i);
        let border = c.x == 0 || c.y == 0 || c.x + 1 == w || c.y + 1 == h;
        if border && elevation[i] < sea_elevation {
            ocean[i] = true;
            q.push_back(i);
        }
    }

    while let Some(i) = q.pop_front() {
        for n in elevation.neighbors(i) {
            if !ocean[n] && elevation[n] < sea_elevation {
                ocean[n] = true;
                q.push_back(n);
            }
        }
    }

    ocean
}

/// Returns filled heights (same shape as input) using Priority-Flood.
///
/// Every tile's filled value is the lowest level water would have to rise
/// to before spilling out to an outlet; it equals the input wherever the
/// tile already drains.
pub fn priority_flood_fill(elevation: &Grid<f32>, sea_elevation: f32) -> Grid<f32> {
    let (w, h) = (elevation.width(), elevation.height());
    let ocean = open_ocean(elevation, sea_elevation);

    let mut filled = elevation.clone();
    let mut visited = vec![false; elevation.len()];
    let mut heap = BinaryHeap::<HeapItem>::new();

    // Seed outlets
    for idx in 0..elevation.len() {
        let c = elevation.coord(idx);
        let border = c.x == 0 || c.y == 0 || c.x + 1 == w || c.y + 1 == h;
        if border || ocean[idx] {
            visited[idx] = true;
            heap.push(HeapItem { height: elevation[idx], idx });
        }
    }

    while let Some(HeapItem { height: h_cur, idx }) = heap.pop() {
        for n_idx in elevation.neighbors(idx) {
            if visited[n_idx] {
                continue;
            }
            visited[n_idx] = true;

            let new_h = filled[n_idx].max(h_cur);
            filled[n_idx] = new_h;
            heap.push(HeapItem { height: new_h, idx: n_idx });
        }
    }

    filled
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_simple_depression_to_rim() {
        let mut e = Grid::filled(5, 5, 0.0f32);
        // Rim at 2.0 around a pit at 1.0 in the centre, border at 0.0.
        for (x, y) in [(2, 1), (1, 2), (3, 2), (2, 3), (1, 1), (3, 1), (1, 3), (3, 3)] {
            *e.get_mut(x, y) = 2.0;
        }
        *e.get_mut(2, 2) = 1.0;

        let filled = priority_flood_fill(&e, -1.0);
        assert!((filled.get(2, 2) - 2.0).abs() < 1e-6);
        assert_eq!(*filled.get(0, 0), 0.0);
    }

    #[test]
    fn spill_uses_lowest_rim_tile() {
        let mut e = Grid::filled(5, 5, 0.0f32);
        for (x, y) in [(2, 1), (1, 2), (2, 3), (1, 1), (3, 1), (1, 3), (3, 3)] {
            *e.get_mut(x, y) = 2.0;
        }
        *e.get_mut(3, 2) = 1.5;
        *e.get_mut(2, 2) = 1.0;

        let filled = priority_flood_fill(&e, -1.0);
        assert!((filled.get(2, 2) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn open_ocean_excludes_enclosed_pockets() {
        let mut e = Grid::filled(5, 5, 1.0f32);
        *e.get_mut(0, 0) = -1.0;
        *e.get_mut(1, 0) = -1.0;
        *e.get_mut(2, 2) = -1.0;

        let ocean = open_ocean(&e, 0.0);
        assert!(ocean.get(0, 0));
        assert!(ocean.get(1, 0));
        assert!(!ocean.get(2, 2));

        let filled = priority_flood_fill(&e, 0.0);
        assert_eq!(*filled.get(2, 2), 1.0);
    }

    #[test]
    fn drained_terrain_is_unchanged() {
        let e = Grid::from_fn_par(6, 6, |x, y| (x + y) as f32);
        let filled = priority_flood_fill(&e, -10.0);
        assert_eq!(filled, e);
    }
}
