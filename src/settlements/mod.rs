//! Civilizations, settlements and roads.
//!
//! Founders are the best-scoring habitable tiles, kept apart from each
//! other. Each civilization then fills its territory (the tiles within its
//! radius that are closer to its capital than to any other) with smaller
//! settlements, and links them with terrain-weighted roads.

mod config;
mod habitability;
mod roads;

pub use config::SettlementConfig;
pub use habitability::{fresh_water_mask, habitability, is_settleable, mineral_value};
pub use roads::{Road, find_path, step_cost};

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::grid::{Grid, euclidean};
use crate::hydrology::Lake;
use crate::names::{NameKind, generate_name};
use crate::seed::roll;
use crate::world::TileGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SettlementTier {
    Hamlet,
    Village,
    Town,
    City,
}

impl SettlementTier {
    /// Tier for a non-capital settlement scoring `ratio` of the world's best tile.
    pub fn from_score_ratio(ratio: f32) -> Self {
        if ratio >= 0.9 {
            SettlementTier::City
        } else if ratio >= 0.75 {
            SettlementTier::Town
        } else if ratio >= 0.5 {
            SettlementTier::Village
        } else {
            SettlementTier::Hamlet
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: usize,
    pub name: String,
    pub position: UVec2,
    pub tier: SettlementTier,
    /// Owning civilization index.
    pub civilization: usize,
    pub habitability: f32,
    pub is_capital: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Civilization {
    pub id: usize,
    pub name: String,
    /// Index of the founding settlement (the capital).
    pub capital: usize,
    /// Territory seed location.
    pub origin: UVec2,
    /// Habitability of the founding tile.
    pub founding_score: f32,
    /// Mean territory habitability relative to the world's best tile.
    pub territory_score: f32,
    pub territory_radius: f32,
}

/// Output of [`place_settlements`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settlements {
    pub civilizations: Vec<Civilization>,
    pub settlements: Vec<Settlement>,
    pub roads: Vec<Road>,
}

/// Settleable tiles, best score first (ties by index).
fn ranked_tiles(scores: &Grid<f32>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).filter(|&i| scores[i].is_finite()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then_with(|| a.cmp(&b)));
    order
}

/// Greedy top-score picks at least `separation` apart.
fn pick_founders(order: &[usize], scores: &Grid<f32>, count: usize, separation: f32) -> Vec<usize> {
    let mut founders: Vec<usize> = Vec::new();
    for &i in order {
        if founders.len() >= count {
            break;
        }
        let p = scores.coord(i);
        if founders.iter().all(|&f| euclidean(scores.coord(f), p) >= separation) {
            founders.push(i);
        }
    }
    founders
}

/// Index of the founder nearest to `p` (ties by lowest index).
fn nearest_founder(founders: &[usize], scores: &Grid<f32>, p: UVec2) -> Option<usize> {
    (0..founders.len()).min_by(|&a, &b| {
        euclidean(scores.coord(founders[a]), p).total_cmp(&euclidean(scores.coord(founders[b]), p))
    })
}

/// Places civilizations, their settlements and the roads between them.
///
/// # Arguments
/// * `tiles` - Finished tile grid (biomes and water features assigned)
/// * `lakes` - Lakes, for fresh-water lookup
/// * `cfg` - Counts, densities and tuning
/// * `seed` - World seed
pub fn place_settlements(tiles: &TileGrid, lakes: &[Lake], cfg: &SettlementConfig, seed: u64) -> Settlements {
    let (w, h) = (tiles.width(), tiles.height());
    let scores = habitability(tiles, lakes, cfg, seed);
    let order = ranked_tiles(&scores);

    if cfg.civilization_count == 0 || order.len() < cfg.min_land_tiles {
        tracing::debug!(settleable = order.len(), "not enough habitable land for civilizations");
        return Settlements::default();
    }

    let best = scores[order[0]];
    let founders = pick_founders(&order, &scores, cfg.civilization_count as usize, cfg.founder_separation_tiles(w, h));
    if founders.len() < cfg.civilization_count as usize {
        tracing::warn!(
            requested = cfg.civilization_count,
            founded = founders.len(),
            "fewer civilization sites than requested"
        );
    }

    let radius = cfg.territory_radius_tiles(w, h);
    let mut out = Settlements::default();

    for (c, &f) in founders.iter().enumerate() {
        let origin = scores.coord(f);
        let territory: Vec<usize> = order
            .iter()
            .copied()
            .filter(|&i| {
                let p = scores.coord(i);
                euclidean(origin, p) <= radius && nearest_founder(&founders, &scores, p) == Some(c)
            })
            .collect();

        let mean = territory.iter().map(|&i| scores[i]).sum::<f32>() / territory.len().max(1) as f32;
        let territory_score = if best > 0.0 { (mean / best).clamp(0.0, 1.0) } else { 0.0 };

        let capital = out.settlements.len();
        out.settlements.push(Settlement {
            id: capital,
            name: generate_name(seed, NameKind::Settlement, capital as i64),
            position: origin,
            tier: SettlementTier::City,
            civilization: c,
            habitability: scores[f],
            is_capital: true,
        });
        out.civilizations.push(Civilization {
            id: c,
            name: generate_name(seed, NameKind::Civilization, c as i64),
            capital,
            origin,
            founding_score: scores[f],
            territory_score,
            territory_radius: radius,
        });

        let extra = (cfg.settlement_density * cfg.max_settlements_per_civ as f32 * territory_score).round() as usize;
        let mut placed = 0;
        for &i in &territory {
            if placed >= extra {
                break;
            }
            let p = scores.coord(i);
            if out
                .settlements
                .iter()
                .any(|s| euclidean(s.position, p) < cfg.settlement_spacing)
            {
                continue;
            }
            let id = out.settlements.len();
            let ratio = if best > 0.0 { scores[i] / best } else { 0.0 };
            out.settlements.push(Settlement {
                id,
                name: generate_name(seed, NameKind::Settlement, id as i64),
                position: p,
                tier: SettlementTier::from_score_ratio(ratio),
                civilization: c,
                habitability: scores[i],
                is_capital: false,
            });
            placed += 1;
        }
    }

    for civ in &out.civilizations {
        out.roads.extend(connect_civilization(tiles, &out.settlements, civ, cfg, seed));
    }

    tracing::debug!(
        civilizations = out.civilizations.len(),
        settlements = out.settlements.len(),
        roads = out.roads.len(),
        "settlements placed"
    );
    out
}

/// Links a civilization's settlements outward from the capital: each one,
/// in order of distance, to the nearest already-linked settlement. Each edge
/// is built with probability `road_density`.
fn connect_civilization(
    tiles: &TileGrid,
    settlements: &[Settlement],
    civ: &Civilization,
    cfg: &SettlementConfig,
    seed: u64,
) -> Vec<Road> {
    let capital = settlements[civ.capital].position;
    let mut members: Vec<&Settlement> = settlements
        .iter()
        .filter(|s| s.civilization == civ.id && !s.is_capital)
        .collect();
    members.sort_by(|a, b| {
        euclidean(a.position, capital)
            .total_cmp(&euclidean(b.position, capital))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut linked = vec![civ.capital];
    let mut roads = Vec::new();
    for s in members {
        let nearest = linked.iter().copied().min_by(|&a, &b| {
            euclidean(settlements[a].position, s.position)
                .total_cmp(&euclidean(settlements[b].position, s.position))
                .then_with(|| a.cmp(&b))
        });
        linked.push(s.id);
        let Some(from) = nearest else {
            continue;
        };

        let (lo, hi) = (from.min(s.id), from.max(s.id));
        if roll(seed, "road", &[lo as i64, hi as i64]) >= cfg.road_density as f64 {
            continue;
        }

        let start = tiles.elevation.index(settlements[from].position.x, settlements[from].position.y);
        let goal = tiles.elevation.index(s.position.x, s.position.y);
        if let Some((path, cost)) = find_path(tiles, start, goal, cfg) {
            roads.push(Road {
                from,
                to: s.id,
                path: path.into_iter().map(|i| tiles.elevation.coord(i)).collect(),
                cost,
            });
        }
    }
    roads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biomes::Biome;
    use crate::hydrology::WaterFeature;

    fn plain(w: u32, h: u32) -> TileGrid {
        TileGrid {
            elevation: Grid::from_fn_par(w, h, |x, y| 0.1 + ((x * 7 + y * 13) % 17) as f32 * 0.001),
            temperature: Grid::filled(w, h, 0.5),
            rainfall: Grid::filled(w, h, 0.5),
            biome: Grid::filled(w, h, Biome::Grassland),
            land: Grid::filled(w, h, true),
            water: Grid::filled(w, h, WaterFeature::None),
        }
    }

    #[test]
    fn civilizations_are_founded_on_capitals() {
        let t = plain(60, 60);
        let cfg = SettlementConfig { civilization_count: 3, ..Default::default() };
        let s = place_settlements(&t, &[], &cfg, 8);

        assert_eq!(s.civilizations.len(), 3);
        for civ in &s.civilizations {
            let cap = &s.settlements[civ.capital];
            assert!(cap.is_capital);
            assert_eq!(cap.tier, SettlementTier::City);
            assert_eq!(cap.civilization, civ.id);
            assert_eq!(cap.position, civ.origin);
        }
    }

    #[test]
    fn settlements_are_on_settleable_tiles() {
        let mut t = plain(40, 40);
        for y in 0..40 {
            *t.water.get_mut(20, y) = WaterFeature::River(0);
        }
        let s = place_settlements(&t, &[], &SettlementConfig::default(), 2);
        assert!(!s.settlements.is_empty());
        for st in &s.settlements {
            let i = t.elevation.index(st.position.x, st.position.y);
            assert!(is_settleable(&t, i));
        }
    }

    #[test]
    fn tiny_world_has_no_civilizations() {
        let t = plain(1, 1);
        let s = place_settlements(&t, &[], &SettlementConfig::default(), 1);
        assert!(s.civilizations.is_empty());
        assert!(s.settlements.is_empty());
        assert!(s.roads.is_empty());
    }

    #[test]
    fn full_road_density_connects_every_settlement() {
        let t = plain(50, 50);
        let cfg = SettlementConfig { road_density: 1.0, civilization_count: 1, ..Default::default() };
        let s = place_settlements(&t, &[], &cfg, 4);
        assert_eq!(s.roads.len(), s.settlements.len() - 1);
        for r in &s.roads {
            assert_eq!(r.path.first(), Some(&s.settlements[r.from].position));
            assert_eq!(r.path.last(), Some(&s.settlements[r.to].position));
        }
    }

    #[test]
    fn zero_road_density_builds_nothing() {
        let t = plain(50, 50);
        let cfg = SettlementConfig { road_density: 0.0, ..Default::default() };
        assert!(place_settlements(&t, &[], &cfg, 4).roads.is_empty());
    }

    #[test]
    fn tiers_follow_score() {
        assert_eq!(SettlementTier::from_score_ratio(0.95), SettlementTier::City);
        assert_eq!(SettlementTier::from_score_ratio(0.8), SettlementTier::Town);
        assert_eq!(SettlementTier::from_score_ratio(0.6), SettlementTier::Village);
        assert_eq!(SettlementTier::from_score_ratio(0.1), SettlementTier::Hamlet);
    }
}
