//! 4-neighbour mapping on a bounded grid.
//!
//! Hydrology (priority-flood, river tracing), flood fill and road search all
//! walk the same neighbourhood in the same fixed order, N, E, S, W, so a
//! given input always visits cells identically.

use glam::UVec2;

/// Cardinal step direction. `y` grows southward (row index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Fixed neighbour priority order.
    pub const ALL: [Direction; 4] = [Direction::North, Direction::East, Direction::South, Direction::West];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// The priority order rotated so that it starts at `ALL[offset % 4]`.
    pub fn rotated(offset: usize) -> [Direction; 4] {
        let o = offset % 4;
        [Self::ALL[o], Self::ALL[(o + 1) % 4], Self::ALL[(o + 2) % 4], Self::ALL[(o + 3) % 4]]
    }
}

/// Neighbour of `(x, y)` in direction `dir`, or `None` at the grid edge.
#[inline]
pub fn neighbor_4(width: u32, height: u32, x: u32, y: u32, dir: Direction) -> Option<(u32, u32)> {
    let (dx, dy) = dir.delta();
    let nx = x as i64 + dx as i64;
    let ny = y as i64 + dy as i64;
    if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
        None
    } else {
        Some((nx as u32, ny as u32))
    }
}

/// In-bounds neighbours of `(x, y)` in N, E, S, W order.
pub fn neighbors_4(width: u32, height: u32, x: u32, y: u32) -> impl Iterator<Item = (Direction, u32, u32)> {
    Direction::ALL
        .into_iter()
        .filter_map(move |d| neighbor_4(width, height, x, y, d).map(|(nx, ny)| (d, nx, ny)))
}

/// Manhattan distance between two cells.
#[inline]
pub fn manhattan(a: UVec2, b: UVec2) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

/// Euclidean distance between two cells.
#[inline]
pub fn euclidean(a: UVec2, b: UVec2) -> f32 {
    a.as_vec2().distance(b.as_vec2())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_clipped() {
        assert_eq!(neighbor_4(4, 4, 0, 0, Direction::North), None);
        assert_eq!(neighbor_4(4, 4, 0, 0, Direction::West), None);
        assert_eq!(neighbor_4(4, 4, 0, 0, Direction::East), Some((1, 0)));
        assert_eq!(neighbor_4(4, 4, 3, 3, Direction::South), None);
    }

    #[test]
    fn order_is_fixed() {
        let dirs: Vec<Direction> = neighbors_4(3, 3, 1, 1).map(|(d, _, _)| d).collect();
        assert_eq!(dirs, Direction::ALL.to_vec());
    }

    #[test]
    fn rotation_wraps() {
        assert_eq!(Direction::rotated(0), Direction::ALL);
        assert_eq!(Direction::rotated(5)[0], Direction::East);
        assert_eq!(Direction::rotated(3)[1], Direction::North);
    }

    #[test]
    fn single_cell_has_no_neighbors() {
        assert_eq!(neighbors_4(1, 1, 0, 0).count(), 0);
    }
}
