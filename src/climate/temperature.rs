//! Temperature model.

use super::ClimateConfig;

/// Distance from the equator row in `[0, 1]`: 0 at the middle row, 1 at the
/// top and bottom edges.
pub fn latitude(y: u32, height: u32) -> f32 {
    let h = height.max(1) as f32;
    (((y as f32 + 0.5) / h - 0.5).abs() * 2.0).clamp(0.0, 1.0)
}

/// Temperature for a tile given its latitude, height above sea level
/// (fraction of the available relief) and a noise sample in `[-1, 1]`.
pub fn temperature(latitude: f32, relative_height: f32, noise: f32, cfg: &ClimateConfig) -> f32 {
    // Nonlinear curve gives larger polar contrast.
    let lat_w = latitude.clamp(0.0, 1.0).powf(1.15);
    let baseline = cfg.equator_temperature * (1.0 - lat_w) + cfg.pole_temperature * lat_w;

    let lapse = cfg.lapse_rate * relative_height.max(0.0);

    (baseline - lapse + cfg.temperature_noise * noise).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equator_is_warmer_than_pole() {
        let cfg = ClimateConfig::default();
        let equator = temperature(0.0, 0.0, 0.0, &cfg);
        let pole = temperature(1.0, 0.0, 0.0, &cfg);
        assert!(equator > pole);
    }

    #[test]
    fn higher_elevation_is_colder_by_lapse_rate() {
        let cfg = ClimateConfig::default();
        let t0 = temperature(0.3, 0.0, 0.0, &cfg);
        let t1 = temperature(0.3, 0.5, 0.0, &cfg);
        let expected_drop = cfg.lapse_rate * 0.5;
        assert!(
            ((t0 - t1) - expected_drop).abs() < 1e-5,
            "expected drop ~{}, got {}",
            expected_drop,
            t0 - t1
        );
    }

    #[test]
    fn latitude_is_symmetric() {
        assert_eq!(latitude(0, 10), latitude(9, 10));
        assert!(latitude(5, 11) < 1e-6);
        assert!(latitude(0, 1) < 1e-6);
    }

    #[test]
    fn output_is_clamped() {
        let cfg = ClimateConfig::default();
        assert_eq!(temperature(1.0, 1.0, -1.0, &cfg), 0.0);
        assert_eq!(temperature(0.0, 0.0, 10.0, &cfg), 1.0);
    }
}
