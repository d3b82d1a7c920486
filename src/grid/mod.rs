//! Flat row-major grid storage.
//!
//! Every per-tile field in the world (elevation, climate, biome, masks) is a
//! `Grid<T>` column of the same shape, addressed by `(x, y)` or by flat index
//! `y * width + x`.

mod distance;
mod neighbors;

pub use distance::distance_field;
pub use neighbors::{Direction, neighbor_4, neighbors_4, manhattan, euclidean};

use glam::UVec2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A dense `width × height` grid stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a grid filled with `value`.
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width as usize * height as usize],
        }
    }
}

impl<T> Grid<T> {
    /// Wraps an existing row-major vector.
    ///
    /// # Panics
    /// If `cells.len() != width * height`.
    pub fn from_vec(width: u32, height: u32, cells: Vec<T>) -> Self {
        assert_eq!(
            cells.len(),
            width as usize * height as usize,
            "grid data length does not match {}x{}",
            width,
            height
        );
        Self { width, height, cells }
    }

    /// Builds a grid by evaluating `f(x, y)` for every cell in parallel.
    pub fn from_fn_par<F>(width: u32, height: u32, f: F) -> Self
    where
        T: Send,
        F: Fn(u32, u32) -> T + Sync + Send,
    {
        let w = width.max(1);
        let cells = (0..width as usize * height as usize)
            .into_par_iter()
            .map(|i| f(i as u32 % w, i as u32 / w))
            .collect();
        Self { width, height, cells }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn coord(&self, index: usize) -> UVec2 {
        let w = self.width as usize;
        UVec2::new((index % w) as u32, (index / w) as u32)
    }

    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> &T {
        &self.cells[self.index(x, y)]
    }

    #[inline]
    pub fn get_mut(&mut self, x: u32, y: u32) -> &mut T {
        let i = self.index(x, y);
        &mut self.cells[i]
    }

    #[inline]
    pub fn at(&self, p: UVec2) -> &T {
        self.get(p.x, p.y)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    /// Flat indices of the in-bounds 4-neighbours of `index`, in N, E, S, W order.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let c = self.coord(index);
        neighbors_4(self.width, self.height, c.x, c.y).map(move |(_, x, y)| self.index(x, y))
    }

    /// Maps every cell into a new grid of the same shape.
    pub fn map<U, F: Fn(&T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.cells
    }
}

impl Grid<f32> {
    /// Returns `(min, max)` over all cells, or `(0, 0)` for an empty grid.
    pub fn range(&self) -> (f32, f32) {
        if self.cells.is_empty() {
            return (0.0, 0.0);
        }
        self.cells
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

impl<T> std::ops::Index<usize> for Grid<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.cells[index]
    }
}

impl<T> std::ops::IndexMut<usize> for Grid<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.cells[index]
    }
}
