//! Heightmap generation using diamond-square midpoint displacement.

use glam::Vec2;
use rayon::prelude::*;

use crate::grid::Grid;
use crate::seed::{derive_seed, signed_unit, unit_f32};

/// Returns the side length `2^n + 1` of the working lattice for a
/// `width × height` request.
fn lattice_side(width: u32, height: u32) -> usize {
    let span = width.max(height).saturating_sub(1).max(2) as usize;
    span.next_power_of_two() + 1
}

#[inline]
fn displacement(seed: u64, level: u32, x: usize, y: usize) -> f32 {
    signed_unit(derive_seed(seed, "heightmap", &[level as i64, x as i64, y as i64]))
}

/// Runs diamond-square on an `n × n` lattice (`n = 2^k + 1`).
///
/// Corners are drawn from `[-1, 1)`; `scale` is the first level's
/// displacement relative to them, so it sets how rugged the result is.
/// Each random offset is a pure function of `(seed, level, x, y)`, so every
/// pass within a level is evaluated in parallel without changing the result.
fn diamond_square(n: usize, seed: u64, scale: f32) -> Vec<f32> {
    let mut h = vec![0.0f32; n * n];
    let last = n - 1;

    for (i, &(x, y)) in [(0, 0), (last, 0), (0, last), (last, last)].iter().enumerate() {
        h[y * n + x] = signed_unit(derive_seed(seed, "corner", &[i as i64]));
    }

    let mut step = last;
    let mut amplitude = scale;
    let mut level = 0u32;

    while step > 1 {
        let half = step / 2;

        // Diamond: centre of each square = mean of its four corners.
        let centres: Vec<(usize, usize)> = (half..n)
            .step_by(step)
            .flat_map(|y| (half..n).step_by(step).map(move |x| (x, y)))
            .collect();
        let diamond: Vec<(usize, f32)> = centres
            .par_iter()
            .map(|&(x, y)| {
                let avg = (h[(y - half) * n + (x - half)]
                    + h[(y - half) * n + (x + half)]
                    + h[(y + half) * n + (x - half)]
                    + h[(y + half) * n + (x + half)])
                    * 0.25;
                (y * n + x, avg + displacement(seed, level, x, y) * amplitude)
            })
            .collect();
        for (i, v) in diamond {
            h[i] = v;
        }

        // Square: each edge midpoint = mean of its in-bounds diamond neighbours.
        let edges: Vec<(usize, usize)> = (0..n)
            .step_by(half)
            .flat_map(|y| {
                let start = if (y / half) % 2 == 0 { half } else { 0 };
                (start..n).step_by(step).map(move |x| (x, y))
            })
            .collect();
        let square: Vec<(usize, f32)> = edges
            .par_iter()
            .map(|&(x, y)| {
                let mut sum = 0.0f32;
                let mut count = 0.0f32;
                if y >= half {
                    sum += h[(y - half) * n + x];
                    count += 1.0;
                }
                if y + half < n {
                    sum += h[(y + half) * n + x];
                    count += 1.0;
                }
                if x >= half {
                    sum += h[y * n + (x - half)];
                    count += 1.0;
                }
                if x + half < n {
                    sum += h[y * n + (x + half)];
                    count += 1.0;
                }
                (y * n + x, sum / count + displacement(seed, level, x, y) * amplitude)
            })
            .collect();
        for (i, v) in square {
            h[i] = v;
        }

        step = half;
        amplitude *= 0.5;
        level += 1;
    }

    h
}

/// Distance from `p` to segment `ab`.
fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Adds `ranges` seeded ridge lines as a tapered uplift.
fn apply_mountain_ranges(elevation: &mut Grid<f32>, seed: u64, ranges: u32) {
    if ranges == 0 {
        return;
    }
    let (w, h) = (elevation.width(), elevation.height());
    let (lo, hi) = elevation.range();
    let relief = (hi - lo).max(f32::EPSILON);
    let half_width = (w.min(h) as f32 / 12.0).max(2.0);

    let ridges: Vec<(Vec2, Vec2, f32)> = (0..ranges as i64)
        .map(|r| {
            let at = |k: i64, extent: u32| {
                unit_f32(derive_seed(seed, "ridge", &[r, k])) * extent as f32
            };
            let a = Vec2::new(at(0, w), at(1, h));
            let b = Vec2::new(at(2, w), at(3, h));
            let strength = 0.15 + 0.2 * unit_f32(derive_seed(seed, "ridge", &[r, 4]));
            (a, b, strength * relief)
        })
        .collect();

    elevation
        .as_mut_slice()
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, v)| {
            let p = Vec2::new((i as u32 % w) as f32, (i as u32 / w) as f32);
            for &(a, b, amp) in &ridges {
                let d = segment_distance(p, a, b);
                if d < half_width {
                    let t = 1.0 - d / half_width;
                    *v += amp * t * t;
                }
            }
        });
}

/// Min-max rescales `values` into `[-1, 1]`. A flat field becomes all zeros.
pub fn normalize_signed(values: &mut Grid<f32>) {
    let (lo, hi) = values.range();
    let span = hi - lo;
    if !span.is_finite() || span <= f32::EPSILON {
        values.as_mut_slice().iter_mut().for_each(|v| *v = 0.0);
        return;
    }
    values
        .as_mut_slice()
        .par_iter_mut()
        .for_each(|v| *v = ((*v - lo) / span) * 2.0 - 1.0);
}

/// Generates a normalized elevation grid.
///
/// # Arguments
/// * `width`, `height` - Requested grid shape
/// * `seed` - Master seed
/// * `scale` - Initial displacement magnitude against unit corner heights
///   (halves each recursion level); larger values give rougher terrain
/// * `mountain_ranges` - Number of ridge uplifts to add
///
/// # Returns
/// A `width × height` grid in `[-1, 1]`. Grids with a side of 1 or less are
/// returned flat (all zeros).
pub fn generate_heightmap(width: u32, height: u32, seed: u64, scale: f32, mountain_ranges: u32) -> Grid<f32> {
    if width <= 1 || height <= 1 {
        return Grid::filled(width, height, 0.0);
    }

    let scale = if scale.is_finite() { scale.clamp(0.01, 16.0) } else { 1.0 };
    let n = lattice_side(width, height);
    let lattice = diamond_square(n, seed, scale);

    let mut elevation = Grid::from_fn_par(width, height, |x, y| lattice[y as usize * n + x as usize]);
    apply_mountain_ranges(&mut elevation, seed, mountain_ranges);
    normalize_signed(&mut elevation);
    elevation
}
