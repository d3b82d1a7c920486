//! Terrain: elevation, landmasses and caves.

mod caves;
mod heightmap;
mod landmass;

pub use caves::{Cave, place_caves};
pub use heightmap::{generate_heightmap, normalize_signed};
pub use landmass::{
    CONTINENT_AREA_DIVISOR, Landmass, LandmassKind, Landmasses, attach_biomes, classify_landmasses,
    connected_regions, continent_threshold, land_mask,
};
