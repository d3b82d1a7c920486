//! Coherent noise for climate fields.
//!
//! Uses simdnoise for SIMD-accelerated gradient noise, layered into fBm.

mod fractal;

pub use fractal::{FractalNoiseConfig, sample_fractal_noise, sample_fractal_noise_grid};
