//! Worldsmith CLI - deterministic procedural world generator.
//!
//! Generates a world from a seed and parameters, writes the full dataset as
//! JSON and optional PNG previews.

use std::cell::Cell;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use worldsmith::export::{
    BiomeMapOptions, PngExportOptions, export_biome_map_png, export_height_map_png, export_world_json,
};
use worldsmith::hydrology::HydrologyConfig;
use worldsmith::pipeline::Pipeline;
use worldsmith::settlements::SettlementConfig;
use worldsmith::terrain::continent_threshold;
use worldsmith::{WorldBuilder, WorldConfig};

/// Deterministic procedural world generator.
#[derive(Parser)]
#[command(name = "worldsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug statistics for every stage.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new world.
    Generate {
        #[command(flatten)]
        world: WorldArgs,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "world")]
        name: String,

        /// Also export an RGB biome preview with rivers, lakes, roads and settlements.
        #[arg(long)]
        biome_map: bool,

        /// Also export a 16-bit grayscale heightmap.
        #[arg(long)]
        height_map: bool,
    },

    /// Display the resolved configuration and derived thresholds.
    Info {
        #[command(flatten)]
        world: WorldArgs,
    },
}

/// World parameters. Flags override values loaded from `--config`.
#[derive(Args)]
struct WorldArgs {
    /// JSON configuration file (camelCase keys, all optional).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid width in tiles.
    #[arg(long)]
    width: Option<u32>,

    /// Grid height in tiles.
    #[arg(long)]
    height: Option<u32>,

    /// Random seed for reproducible generation.
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long)]
    elevation_scale: Option<f32>,

    #[arg(long)]
    temperature_scale: Option<f32>,

    #[arg(long)]
    rainfall_scale: Option<f32>,

    /// Land threshold on elevation mapped to [0, 1].
    #[arg(long)]
    sea_level: Option<f32>,

    #[arg(long)]
    continent_count: Option<u32>,

    #[arg(long)]
    island_density: Option<f32>,

    #[arg(long)]
    mountain_ranges: Option<u32>,

    #[arg(long)]
    river_count: Option<u32>,

    #[arg(long)]
    lake_count: Option<u32>,

    #[arg(long)]
    forest_density: Option<f32>,

    #[arg(long)]
    cave_systems: Option<u32>,

    #[arg(long)]
    civilization_count: Option<u32>,

    #[arg(long)]
    settlement_density: Option<f32>,

    #[arg(long)]
    road_density: Option<f32>,

    #[arg(long)]
    mineral_richness: Option<f32>,

    #[arg(long)]
    soil_fertility: Option<f32>,

    #[arg(long)]
    water_availability: Option<f32>,
}

impl WorldArgs {
    /// Loads `--config` (or defaults), applies flag overrides and validates.
    fn resolve(self) -> Result<WorldConfig, worldsmith::ConfigError> {
        let mut c = match &self.config {
            Some(path) => WorldConfig::load(path)?,
            None => WorldConfig::default(),
        };

        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(if let Some(v) = self.$field { c.$field = v; })*
            };
        }
        apply!(
            width,
            height,
            seed,
            elevation_scale,
            temperature_scale,
            rainfall_scale,
            sea_level,
            continent_count,
            island_density,
            mountain_ranges,
            river_count,
            lake_count,
            forest_density,
            cave_systems,
            civilization_count,
            settlement_density,
            road_density,
            mineral_richness,
            soil_fertility,
            water_availability,
        );

        c.validate()?;
        Ok(c)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            world,
            output,
            name,
            biome_map,
            height_map,
        } => {
            let config = world.resolve().unwrap_or_else(|e| {
                tracing::error!("{}", e);
                std::process::exit(1);
            });
            run_generate(config, output, name, biome_map, height_map);
        }
        Commands::Info { world } => {
            let config = world.resolve().unwrap_or_else(|e| {
                tracing::error!("{}", e);
                std::process::exit(1);
            });
            run_info(&config);
        }
    }
}

fn run_generate(config: WorldConfig, output: PathBuf, name: String, biome_map: bool, height_map: bool) {
    println!("Worldsmith - Procedural World Generator");
    println!("=======================================");
    println!("Size: {}x{} tiles", config.width, config.height);
    println!("Seed: {}", config.seed);
    println!("Output: {}", output.display());

    let start = Instant::now();

    let pipeline = Pipeline::for_world(config.clone());
    let mut builder = WorldBuilder::new(config);
    let stage_start = Cell::new(Instant::now());
    let result = pipeline
        .run_with_callbacks(
            &mut builder,
            |name, i, total| {
                stage_start.set(Instant::now());
                tracing::info!("[{}/{}] Starting: {}", i + 1, total, name);
            },
            |name, i, total| {
                tracing::info!("[{}/{}] Completed: {} in {:.2?}", i + 1, total, name, stage_start.get().elapsed());
            },
        )
        .and_then(|()| builder.finish());

    let world = result.unwrap_or_else(|e| {
        tracing::error!("Error during generation: {}", e);
        std::process::exit(1);
    });

    println!("Generation completed in {:.2?}", start.elapsed());
    println!(
        "  {} continents, {} islands, {} rivers, {} lakes, {} caves",
        world.continents().len(),
        world.islands().len(),
        world.rivers().len(),
        world.lakes().len(),
        world.caves().len()
    );
    println!(
        "  {} civilizations, {} settlements, {} roads",
        world.civilizations().len(),
        world.settlements().len(),
        world.roads().len()
    );

    let export_start = Instant::now();
    std::fs::create_dir_all(&output).unwrap_or_else(|e| {
        tracing::error!("Error creating output directory: {}", e);
        std::process::exit(1);
    });

    let json_path = output.join(format!("{}.json", name));
    export_world_json(&world, &json_path).unwrap_or_else(|e| {
        tracing::error!("Error exporting JSON: {}", e);
        std::process::exit(1);
    });
    println!("  Exported {}", json_path.display());

    if biome_map {
        let path = output.join(format!("{}_biomes.png", name));
        export_biome_map_png(&world, &path, &BiomeMapOptions::default()).unwrap_or_else(|e| {
            tracing::error!("Error exporting biome map: {}", e);
            std::process::exit(1);
        });
        println!("  Exported {}", path.display());
    }

    if height_map {
        let path = output.join(format!("{}_height.png", name));
        export_height_map_png(&world, &path, &PngExportOptions::default()).unwrap_or_else(|e| {
            tracing::error!("Error exporting height map: {}", e);
            std::process::exit(1);
        });
        println!("  Exported {}", path.display());
    }

    println!("Export completed in {:.2?}", export_start.elapsed());
    println!("\nTotal time: {:.2?}", start.elapsed());
    println!("Done!");
}

fn run_info(config: &WorldConfig) {
    let tiles = config.tile_count();
    let (w, h) = (config.width, config.height);
    let hydrology = HydrologyConfig::new(config.sea_level);
    let settlements = SettlementConfig::default();

    println!("Worldsmith - World Configuration Info");
    println!("=====================================");
    println!();
    match serde_json::to_string_pretty(config) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::warn!("could not render configuration: {}", e),
    }
    println!();
    println!("Tiles:                 {:>10}", tiles);
    println!("Sea elevation:         {:>10.4}", config.sea_elevation());
    println!("Continent threshold:   {:>10} tiles", continent_threshold(tiles, config.continent_count));
    println!("River source spacing:  {:>10.1} tiles", hydrology.source_spacing(w, h));
    println!("River trace limit:     {:>10} steps", hydrology.max_steps(w, h));
    println!("Territory radius:      {:>10.1} tiles", settlements.territory_radius_tiles(w, h));
    println!("Capital separation:    {:>10.1} tiles", settlements.founder_separation_tiles(w, h));
}
