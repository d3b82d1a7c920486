//! End-to-end properties of generated worlds.

use std::collections::HashSet;

use worldsmith::biomes::{BiomeConfig, classify_biomes};
use worldsmith::grid::euclidean;
use worldsmith::hydrology::{Outlet, WaterFeature};
use worldsmith::seed::derive_seed;
use worldsmith::{WorldConfig, WorldData, generate_world};

fn scenario() -> WorldConfig {
    let mut c = WorldConfig::with_seed(12345).with_size(200, 200);
    c.sea_level = 0.45;
    c.river_count = 8;
    c.lake_count = 5;
    c.civilization_count = 3;
    c
}

fn small(seed: u64) -> WorldData {
    generate_world(&WorldConfig::with_seed(seed).with_size(64, 48)).unwrap()
}

#[test]
fn same_config_same_world() {
    let config = WorldConfig::with_seed(7).with_size(80, 60);
    let a = generate_world(&config).unwrap();
    let b = generate_world(&config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn generation_is_thread_independent() {
    let config = WorldConfig::with_seed(99).with_size(48, 48);
    let here = generate_world(&config).unwrap();
    let there = std::thread::spawn(move || generate_world(&config).unwrap()).join().unwrap();
    assert_eq!(here, there);
}

#[test]
fn matches_recorded_world() {
    // Pinned output for seed 12345. Regenerate these values deliberately when
    // seed derivation or the heightmap algorithm changes.
    assert_eq!(derive_seed(12345, "heightmap", &[3, 4, 5]), 0xbed5_3c27_d520_473a);
    assert_eq!(derive_seed(0, "river-tie", &[0, 0]), 0xe012_1f5c_2edd_1ab9);
    assert_eq!(derive_seed(42, "road", &[1, 2]), 0xa689_cec1_7484_7237);

    let mut config = WorldConfig::with_seed(12345).with_size(9, 9);
    config.mountain_ranges = 0;
    let world = generate_world(&config).unwrap();
    let elevation = &world.tiles().elevation;
    let recorded = [
        (0, 0, 0x3f78_4b42u32),
        (4, 4, 0xbda9_f998),
        (8, 8, 0x3d5e_11c0),
        (2, 7, 0xbeec_f39a),
        (6, 1, 0x3d31_09c0),
        (3, 5, 0xbf0b_eb32),
    ];
    for (x, y, bits) in recorded {
        let got = *elevation.get(x, y);
        assert_eq!(got.to_bits(), bits, "elevation at ({}, {}) is {}", x, y, got);
    }
    assert_eq!(generate_world(&config).unwrap(), world);
}

#[test]
fn elevation_scale_reshapes_terrain() {
    let mut smooth = WorldConfig::with_seed(12345).with_size(48, 48);
    smooth.elevation_scale = 0.5;
    let mut rough = smooth.clone();
    rough.elevation_scale = 2.0;
    let a = generate_world(&smooth).unwrap();
    let b = generate_world(&rough).unwrap();
    assert_ne!(a.tiles().elevation, b.tiles().elevation);
}

#[test]
fn different_seeds_differ() {
    let a = small(1);
    let b = small(2);
    assert_ne!(a.tiles().elevation, b.tiles().elevation);
}

#[test]
fn landmasses_partition_land() {
    for seed in [3, 11, 12345] {
        let world = small(seed);
        let land = &world.tiles().land;
        let mut seen = HashSet::new();
        for lm in world.landmasses() {
            for &i in &lm.tiles {
                assert!(land[i], "landmass {} covers sea tile {}", lm.name, i);
                assert!(seen.insert(i), "tile {} in two landmasses", i);
            }
        }
        let land_tiles = land.iter().filter(|&&l| l).count();
        assert_eq!(seen.len(), land_tiles);
    }
}

#[test]
fn rivers_descend_and_never_revisit() {
    for seed in [5, 8, 12345] {
        let world = small(seed);
        let elevation = &world.tiles().elevation;
        for river in world.rivers() {
            assert!(river.path.len() >= 2);
            let unique: HashSet<_> = river.path.iter().collect();
            assert_eq!(unique.len(), river.path.len(), "river {} revisits a tile", river.name);

            let heights: Vec<f32> = river.path.iter().map(|p| *elevation.get(p.x, p.y)).collect();
            let checked = heights.len().saturating_sub(2);
            for i in 0..checked {
                assert!(heights[i] >= heights[i + 1], "river {} climbs at step {}", river.name, i);
            }
        }
    }
}

#[test]
fn tributary_links_are_consistent() {
    let world = generate_world(&scenario()).unwrap();
    let rivers = world.rivers();
    for (i, river) in rivers.iter().enumerate() {
        if let Some(p) = river.parent {
            assert!(p < i, "parent must be traced first");
            assert!(rivers[p].tributaries.contains(&i));
            let join = river.join_index.unwrap();
            assert_eq!(rivers[p].path[join], *river.path.last().unwrap());
        }
    }
}

#[test]
fn lake_volume_matches_tiles() {
    for seed in [4, 21, 12345] {
        let world = small(seed);
        let elevation = &world.tiles().elevation;
        for lake in world.lakes() {
            let sum: f32 = lake.tiles.iter().map(|&i| lake.spill_elevation - elevation[i]).sum();
            assert!(lake.volume > 0.0);
            assert!((lake.volume - sum).abs() <= 1e-4 * sum.max(1.0));
        }
    }
}

#[test]
fn settlements_sit_on_valid_land_inside_territory() {
    let world = generate_world(&scenario()).unwrap();
    let tiles = world.tiles();
    for s in world.settlements() {
        let t = tiles.tile(s.position.x, s.position.y);
        assert!(t.land, "{} is on water", s.name);
        assert_eq!(t.water, WaterFeature::None, "{} is on a water feature", s.name);

        let civ = &world.civilizations()[s.civilization];
        assert!(euclidean(civ.origin, s.position) <= civ.territory_radius + 1e-3);
    }
    for civ in world.civilizations() {
        let capital = &world.settlements()[civ.capital];
        assert!(capital.is_capital);
        assert_eq!(capital.position, civ.origin);
    }
}

#[test]
fn scenario_200x200() {
    let world = generate_world(&scenario()).unwrap();
    let tiles = world.tiles();
    assert_eq!((tiles.width(), tiles.height()), (200, 200));
    assert!(world.civilizations().len() <= 3);
    assert!(world.rivers().len() <= 8);
    assert!(world.lakes().len() <= 5);

    for river in world.rivers() {
        let end = river.path.last().unwrap();
        let i = tiles.elevation.index(end.x, end.y);
        match tiles.water[i] {
            WaterFeature::Sea => {}
            WaterFeature::Lake(l) => assert!(l < world.lakes().len()),
            // Tributaries end on their parent's channel.
            WaterFeature::River(p) => assert_eq!(Some(p), river.parent),
            other => panic!("river {} ends on {:?}", river.name, other),
        }
        if let Outlet::Lake(l) = river.outlet {
            assert!(l < world.lakes().len());
        }
    }
}

#[test]
fn single_tile_world_is_degenerate_but_valid() {
    let world = generate_world(&WorldConfig::with_seed(1).with_size(1, 1)).unwrap();
    assert_eq!(world.tiles().len(), 1);
    assert!(world.rivers().is_empty());
    assert!(world.lakes().is_empty());
    assert!(world.civilizations().is_empty());
    assert!(world.settlements().is_empty());
    assert!(world.roads().is_empty());
}

#[test]
fn biome_classification_is_idempotent() {
    let world = small(31);
    let t = world.tiles();
    let cfg = BiomeConfig::new(world.config().sea_level, world.config().forest_density);
    let again = classify_biomes(&t.elevation, &t.temperature, &t.rainfall, &cfg);
    assert_eq!(again, t.biome);
}

#[test]
fn roads_join_settlements_of_one_civilization() {
    let world = generate_world(&scenario()).unwrap();
    let settlements = world.settlements();
    for road in world.roads() {
        let (a, b) = (&settlements[road.from], &settlements[road.to]);
        assert_eq!(a.civilization, b.civilization);
        assert_eq!(road.path.first(), Some(&a.position));
        assert_eq!(road.path.last(), Some(&b.position));
        assert!(road.cost >= (road.path.len() - 1) as f32);
    }
}
