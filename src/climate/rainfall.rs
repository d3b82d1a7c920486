//! Rainfall model: noise + orographic lift + coastal moisture − aridity.

use super::ClimateConfig;

/// Orographic response to relative height: rises to `orographic_strength` at
/// `orographic_peak`, then falls away; the highest peaks are dried further by
/// `summit_dryness`.
pub fn orographic(relative_height: f32, cfg: &ClimateConfig) -> f32 {
    let rel = relative_height.clamp(0.0, 1.0);
    let peak = cfg.orographic_peak.max(1e-3);
    let k = rel / peak;
    let lift = cfg.orographic_strength * k * (1.0 - k).exp();
    let summit = cfg.summit_dryness * ((rel - 0.75).max(0.0) / 0.25);
    lift - summit
}

/// Rainfall for a tile.
///
/// # Arguments
/// * `relative_height` - Height above sea level as a fraction of the relief (0 at or below sea)
/// * `coast_distance` - Tiles to the nearest sea tile (`f32::INFINITY` if none)
/// * `noise` - Noise sample in `[-1, 1]`
pub fn rainfall(relative_height: f32, coast_distance: f32, noise: f32, cfg: &ClimateConfig) -> f32 {
    let coastal = if coast_distance.is_finite() {
        cfg.coastal_moisture * (-coast_distance / cfg.coastal_decay_tiles.max(1.0)).exp()
    } else {
        0.0
    };
    let availability = (cfg.water_availability.clamp(0.0, 1.0) - 0.5) * 0.3;

    (cfg.base_rainfall + cfg.rainfall_noise * noise + orographic(relative_height, cfg) + coastal
        - cfg.aridity
        + availability)
        .clamp(0.0, 1.0)
}
