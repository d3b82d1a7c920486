//! Multi-source BFS distance fields.

use std::collections::VecDeque;

use super::Grid;

/// Step distance (4-connected) from every cell to the nearest source cell.
///
/// Cells unreachable from any source (or every cell, when there are no
/// sources) get `u32::MAX`.
pub fn distance_field(sources: &Grid<bool>) -> Grid<u32> {
    let mut dist = Grid::filled(sources.width(), sources.height(), u32::MAX);
    let mut q: VecDeque<usize> = VecDeque::new();

    for i in 0..sources.len() {
        if sources[i] {
            dist[i] = 0;
            q.push_back(i);
        }
    }

    while let Some(i) = q.pop_front() {
        let d = dist[i];
        let next: Vec<usize> = dist.neighbors(i).filter(|&n| dist[n] == u32::MAX).collect();
        for n in next {
            dist[n] = d.saturating_add(1);
            q.push_back(n);
        }
    }

    dist
}
