//! Hydrology configuration parameters.

use serde::{Deserialize, Serialize};

/// Configuration for lake basins and river tracing.
///
/// Units:
/// - elevation: normalized heightmap units (`[-1, 1]`)
/// - distances: tiles
/// - flow: arbitrary units, `unit_flow` contributed per river tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrologyConfig {
    /// Sea level in `[0, 1]`.
    pub sea_level: f32,

    /// Minimum distance between river sources as a fraction of the shorter
    /// grid side.
    pub source_spacing_fraction: f32,
    /// Lower bound for the source spacing.
    pub min_source_spacing: f32,

    /// Trace length limit as a multiple of `width + height`.
    pub max_steps_factor: u32,

    /// Flow contributed by each tile a river passes.
    pub unit_flow: f32,
}

impl Default for HydrologyConfig {
    fn default() -> Self {
        Self {
            sea_level: 0.45,
            source_spacing_fraction: 0.125,
            min_source_spacing: 3.0,
            max_steps_factor: 4,
            unit_flow: 1.0,
        }
    }
}

impl HydrologyConfig {
    /// Default tuning for a given sea level.
    pub fn new(sea_level: f32) -> Self {
        Self {
            sea_level,
            ..Default::default()
        }
    }

    /// Minimum distance between accepted river sources on a `width × height` grid.
    pub fn source_spacing(&self, width: u32, height: u32) -> f32 {
        (width.min(height) as f32 * self.source_spacing_fraction).max(self.min_source_spacing)
    }

    /// Maximum number of steps a single trace may take.
    pub fn max_steps(&self, width: u32, height: u32) -> usize {
        (width as usize + height as usize) * self.max_steps_factor.max(1) as usize
    }
}
