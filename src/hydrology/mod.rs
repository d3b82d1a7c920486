//! Hydrology: lake basins and river networks.
//!
//! Basins come from Priority-Flood depression filling; the largest become
//! lakes and the rest stay as wetland. Rivers are traced sequentially by
//! steepest descent from high sources, so later rivers can join earlier ones
//! as tributaries.

mod basins;
mod config;
mod priority_flood;
mod rivers;

pub use basins::{Basin, Lake, LakeOrigin, WaterType, find_basins, water_type};
pub use config::HydrologyConfig;
pub use priority_flood::{open_ocean, priority_flood_fill};
pub use rivers::{Outlet, River, Trace, TraceEnd, own_discharge, propagate_flow, river_sources, trace_river};

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::names::{NameKind, generate_name};
use crate::world::sea_level_to_elevation;

/// Hydrology tag of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WaterFeature {
    /// Dry land.
    #[default]
    None,
    Sea,
    Lake(usize),
    River(usize),
    /// Land inside a closed basin that did not become a lake.
    Wetland,
}

impl WaterFeature {
    /// Sea or lake water.
    pub fn is_standing_water(self) -> bool {
        matches!(self, WaterFeature::Sea | WaterFeature::Lake(_))
    }
}

/// Output of [`simulate_hydrology`].
#[derive(Debug, Clone, PartialEq)]
pub struct Hydrology {
    pub rivers: Vec<River>,
    pub lakes: Vec<Lake>,
    pub water: Grid<WaterFeature>,
}

/// Mutable state while rivers are claimed one after another.
struct Network<'a> {
    elevation: &'a Grid<f32>,
    water: Grid<WaterFeature>,
    lakes: Vec<Lake>,
    rivers: Vec<River>,
    /// Unpromoted basins, indexed by `wetland_of`.
    wetlands: Vec<Option<Basin>>,
    wetland_of: Vec<Option<usize>>,
    lake_cap: usize,
    seed: u64,
}

impl Network<'_> {
    fn add_lake(&mut self, basin: Basin, origin: LakeOrigin) -> usize {
        let id = self.lakes.len();
        for &i in &basin.tiles {
            self.water[i] = WaterFeature::Lake(id);
        }
        let name = generate_name(self.seed, NameKind::Lake, id as i64);
        self.lakes.push(Lake::from_basin(id, name, basin, origin));
        id
    }

    /// Forms a lake where a trace dead-ends, truncating the path at the lake.
    /// Returns `None` when the cap is reached or no lake can hold water there.
    fn lake_at_dead_end(&mut self, path: &mut Vec<usize>) -> Option<usize> {
        if self.lakes.len() >= self.lake_cap {
            return None;
        }

        // The trace may have entered a wetland basin before stalling.
        if let Some(k) = path.iter().position(|&i| self.water[i] == WaterFeature::Wetland) {
            if let Some(b) = self.wetland_of[path[k]] {
                let free = self.wetlands[b]
                    .as_ref()
                    .is_some_and(|basin| basin.tiles.iter().all(|&i| self.water[i] == WaterFeature::Wetland));
                if free {
                    if let Some(basin) = self.wetlands[b].take() {
                        path.truncate(k + 1);
                        return Some(self.add_lake(basin, LakeOrigin::RiverTerminus));
                    }
                }
            }
        }

        // Single-tile pond filled to its lowest neighbour.
        let t = *path.last()?;
        let spill = self
            .elevation
            .neighbors(t)
            .map(|n| self.elevation[n])
            .fold(f32::INFINITY, f32::min);
        if !spill.is_finite() || spill <= self.elevation[t] || self.water[t] != WaterFeature::None {
            return None;
        }
        let basin = Basin::new(vec![t], spill, self.elevation);
        Some(self.add_lake(basin, LakeOrigin::RiverTerminus))
    }

    /// Turns one trace into a river. Returns `false` if it was discarded.
    fn claim(&mut self, trace: Trace, unit_flow: f32) -> bool {
        let Trace { mut path, end } = trace;
        if path.len() < 2 {
            return false;
        }

        let id = self.rivers.len();
        let (outlet, parent) = match end {
            TraceEnd::Sea => (Outlet::Sea, None),
            TraceEnd::Lake(l) => (Outlet::Lake(l), None),
            TraceEnd::Join { river } => {
                let Some(&join_tile) = path.last() else {
                    return false;
                };
                let c = self.elevation.coord(join_tile);
                let Some(j) = self.rivers[river].path.iter().position(|&p| p == c) else {
                    return false;
                };
                (self.rivers[river].outlet, Some((river, j)))
            }
            TraceEnd::DeadEnd => match self.lake_at_dead_end(&mut path) {
                Some(l) => (Outlet::Lake(l), None),
                None => return false,
            },
        };

        for &i in &path[..path.len() - 1] {
            self.water[i] = WaterFeature::River(id);
        }

        let discharge = own_discharge(path.len(), unit_flow);
        let flow_rate = discharge.last().copied().unwrap_or(0.0);
        let river = River {
            id,
            name: generate_name(self.seed, NameKind::River, id as i64),
            path: path.iter().map(|&i| self.elevation.coord(i)).collect(),
            length: (path.len() - 1) as f32,
            flow_rate,
            discharge,
            tributaries: Vec::new(),
            parent: parent.map(|(p, _)| p),
            join_index: parent.map(|(_, j)| j),
            outlet,
        };

        match parent {
            Some((p, j)) => {
                // Flow from the tiles above the join.
                let contribution = river.discharge[river.discharge.len() - 2];
                self.rivers[p].tributaries.push(id);
                self.rivers.push(river);
                propagate_flow(&mut self.rivers, p, j, contribution);
            }
            None => {
                if let Outlet::Lake(l) = outlet {
                    self.lakes[l].inflow.push(id);
                }
                self.rivers.push(river);
            }
        }
        true
    }
}

/// Simulates lakes and rivers over a finished elevation field.
///
/// # Arguments
/// * `elevation` - Normalized elevation grid
/// * `land` - Land mask from the landmass classifier
/// * `river_count` - Maximum number of rivers (tributaries included)
/// * `lake_count` - Maximum number of lakes, from basins and dead ends together
/// * `seed` - World seed
/// * `cfg` - Hydrology tuning
pub fn simulate_hydrology(
    elevation: &Grid<f32>,
    land: &Grid<bool>,
    river_count: u32,
    lake_count: u32,
    seed: u64,
    cfg: &HydrologyConfig,
) -> Hydrology {
    let (w, h) = (elevation.width(), elevation.height());
    let sea = sea_level_to_elevation(cfg.sea_level);
    let lake_cap = lake_count as usize;

    let mut basins = find_basins(elevation, sea);
    let basin_total = basins.len();
    let dropped = basins.split_off(lake_cap.min(basins.len()));

    let mut water = land.map(|&l| if l { WaterFeature::None } else { WaterFeature::Sea });
    let mut wetland_of = vec![None; elevation.len()];
    for (b, basin) in dropped.iter().enumerate() {
        for &i in &basin.tiles {
            wetland_of[i] = Some(b);
            // Submerged parts of a dropped basin stay sea.
            if land[i] {
                water[i] = WaterFeature::Wetland;
            }
        }
    }

    let mut net = Network {
        elevation,
        water,
        lakes: Vec::new(),
        rivers: Vec::new(),
        wetlands: dropped.into_iter().map(Some).collect(),
        wetland_of,
        lake_cap,
        seed,
    };
    for basin in basins {
        net.add_lake(basin, LakeOrigin::Basin);
    }

    let sources = river_sources(elevation, land, &net.water, cfg.source_spacing(w, h));
    let max_steps = cfg.max_steps(w, h);
    let mut discarded = 0usize;
    for source in sources {
        if net.rivers.len() >= river_count as usize {
            break;
        }
        if net.water[source] != WaterFeature::None {
            continue;
        }
        let trace = trace_river(elevation, &net.water, source, seed, max_steps);
        if !net.claim(trace, cfg.unit_flow) {
            discarded += 1;
        }
    }

    for lake in &mut net.lakes {
        let floor = lake.tiles.iter().map(|&i| elevation[i]).fold(f32::INFINITY, f32::min);
        lake.water_type = water_type(floor, sea, !lake.inflow.is_empty());
    }

    if net.rivers.len() < river_count as usize {
        tracing::warn!(
            requested = river_count,
            traced = net.rivers.len(),
            "fewer river sources than requested"
        );
    }
    tracing::debug!(
        basins = basin_total,
        lakes = net.lakes.len(),
        rivers = net.rivers.len(),
        tributaries = net.rivers.iter().filter(|r| r.is_tributary()).count(),
        discarded,
        "hydrology simulated"
    );

    Hydrology {
        rivers: net.rivers,
        lakes: net.lakes,
        water: net.water,
    }
}
