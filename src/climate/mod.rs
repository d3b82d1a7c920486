//! Climate derivation.
//!
//! Produces normalized temperature and rainfall fields from the elevation
//! grid plus two low-frequency noise fields. The noise seeds are the world
//! seed XOR fixed salts, so climate noise never mirrors the terrain noise.

mod config;
mod rainfall;
mod temperature;

pub use config::ClimateConfig;
pub use rainfall::{orographic, rainfall};
pub use temperature::{latitude, temperature};

use crate::grid::{Grid, distance_field};
use crate::noise::{FractalNoiseConfig, sample_fractal_noise_grid};
use crate::seed::noise_seed;
use crate::world::sea_level_to_elevation;

pub const TEMPERATURE_SALT: u64 = 0x7E3A_11C5_D00D_F00D;
pub const RAINFALL_SALT: u64 = 0x5A17_CA7E_0BAD_5EED;

/// Temperature and rainfall grids, both in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Climate {
    pub temperature: Grid<f32>,
    pub rainfall: Grid<f32>,
}

/// Height above sea level as a fraction of the relief between sea level and 1.
#[inline]
pub fn relative_height(elevation: f32, sea_elevation: f32) -> f32 {
    ((elevation - sea_elevation) / (1.0 - sea_elevation).max(f32::EPSILON)).clamp(0.0, 1.0)
}

/// Derives temperature and rainfall for every tile.
///
/// # Arguments
/// * `elevation` - Normalized elevation grid
/// * `seed` - World seed (salted per field)
/// * `temperature_scale` - Frequency multiplier for the temperature noise
/// * `rainfall_scale` - Frequency multiplier for the rainfall noise
/// * `cfg` - Model tuning
pub fn derive_climate(
    elevation: &Grid<f32>,
    seed: u64,
    temperature_scale: f32,
    rainfall_scale: f32,
    cfg: &ClimateConfig,
) -> Climate {
    let (w, h) = (elevation.width(), elevation.height());
    let sea = sea_level_to_elevation(cfg.sea_level);

    let t_noise = sample_fractal_noise_grid(
        w,
        h,
        &FractalNoiseConfig::low_frequency(noise_seed(seed ^ TEMPERATURE_SALT), temperature_scale),
    );
    let r_noise = sample_fractal_noise_grid(
        w,
        h,
        &FractalNoiseConfig::low_frequency(noise_seed(seed ^ RAINFALL_SALT), rainfall_scale),
    );

    let coast = distance_field(&elevation.map(|&e| e < sea));

    let temperature = Grid::from_fn_par(w, h, |x, y| {
        let i = elevation.index(x, y);
        let rel = relative_height(elevation[i], sea);
        temperature::temperature(latitude(y, h), rel, t_noise[i], cfg)
    });

    let rainfall = Grid::from_fn_par(w, h, |x, y| {
        let i = elevation.index(x, y);
        let rel = relative_height(elevation[i], sea);
        let d = if coast[i] == u32::MAX { f32::INFINITY } else { coast[i] as f32 };
        rainfall::rainfall(rel, d, r_noise[i], cfg)
    });

    Climate { temperature, rainfall }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::generate_heightmap;

    #[test]
    fn fields_are_normalized() {
        let e = generate_heightmap(48, 32, 11, 1.0, 1);
        let c = derive_climate(&e, 11, 1.0, 1.0, &ClimateConfig::default());
        assert_eq!(c.temperature.len(), e.len());
        assert!(c.temperature.iter().all(|&t| (0.0..=1.0).contains(&t)));
        assert!(c.rainfall.iter().all(|&r| (0.0..=1.0).contains(&r)));
    }

    #[test]
    fn derivation_is_deterministic() {
        let e = generate_heightmap(32, 32, 5, 1.0, 0);
        let a = derive_climate(&e, 5, 1.0, 1.0, &ClimateConfig::default());
        let b = derive_climate(&e, 5, 1.0, 1.0, &ClimateConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn equator_rows_are_warmer_on_flat_world() {
        let e = Grid::filled(16, 33, 0.0f32);
        let cfg = ClimateConfig { temperature_noise: 0.0, ..Default::default() };
        let c = derive_climate(&e, 1, 1.0, 1.0, &cfg);
        assert!(*c.temperature.get(3, 16) > *c.temperature.get(3, 0));
        assert!(*c.temperature.get(3, 16) > *c.temperature.get(3, 32));
    }

    #[test]
    fn single_tile_world() {
        let e = Grid::filled(1, 1, 0.0f32);
        let c = derive_climate(&e, 1, 1.0, 1.0, &ClimateConfig::default());
        assert_eq!(c.temperature.len(), 1);
        assert_eq!(c.rainfall.len(), 1);
    }
}
