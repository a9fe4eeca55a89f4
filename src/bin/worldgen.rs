use clap::Parser;
use ridgeway::config::{WorldConfig, load_config, load_config_from, save_config};
use ridgeway::errors::WorldgenResult;
use ridgeway::world::{WorldLayout, validate_layout_path};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod worldgen {
    pub mod cli_utils;
    pub mod layout_builder;
}

use worldgen::cli_utils::*;
use worldgen::layout_builder::LayoutBuilder;

#[derive(Parser, Clone)]
#[command(name = "worldgen")]
#[command(about = "Generate a ridged heightmap, a route from its highest peak and camps along it")]
struct Args {
    /// TOML config to start from (defaults to the user config, then built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file path relative to the layouts/ directory (e.g. "valley.bin")
    #[arg(long)]
    output: Option<String>,

    /// Terrain preset (default, gentle, alpine, island)
    #[arg(long)]
    preset: Option<String>,

    /// Random seed for reproducible generation
    #[arg(long)]
    seed: Option<u64>,

    /// Cells per side; the heightmap has one more sample per side
    #[arg(long)]
    width: Option<u32>,

    /// World height of the tallest possible sample
    #[arg(long)]
    depth: Option<f32>,

    /// Number of noise octaves (values below 1 become 1)
    #[arg(long, allow_hyphen_values = true)]
    octaves: Option<i32>,

    /// Amplitude multiplier per octave (0.0-1.0)
    #[arg(long)]
    persistence: Option<f32>,

    /// Frequency multiplier per octave
    #[arg(long)]
    lacunarity: Option<f32>,

    /// Noise scale (higher = more features across the map)
    #[arg(long)]
    scale: Option<f32>,

    /// Edge falloff as POWER,SCALE
    #[arg(long)]
    falloff: Option<String>,

    /// Falloff radius relative to the centre-to-corner distance
    #[arg(long)]
    falloff_radius: Option<f32>,

    /// Steepness thresholds in degrees as WALKABLE,CLIMBABLE
    #[arg(long)]
    thresholds: Option<String>,

    /// Route priorities as BASE,WALK,CLIMB
    #[arg(long)]
    priorities: Option<String>,

    /// Do not scale step costs by steepness
    #[arg(long)]
    unscaled: bool,

    /// How the route treats blocked cells (detour, impassable)
    #[arg(long)]
    blocked: Option<String>,

    /// Route target (center, lowest)
    #[arg(long)]
    target: Option<String>,

    /// Number of camps to place
    #[arg(long)]
    camps: Option<u32>,

    /// Walkable route steps between camp candidates
    #[arg(long)]
    camp_distance: Option<u32>,

    /// Side of the window scored around a camp, also the tent count of the best camp
    #[arg(long)]
    camp_size: Option<u32>,

    /// Store the resulting config as the user config for later runs
    #[arg(long)]
    save_config: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn base_config(path: Option<&PathBuf>) -> WorldgenResult<WorldConfig> {
    match path {
        Some(path) => load_config_from(path),
        None => Ok(load_config()),
    }
}

fn build_config(args: &Args) -> WorldgenResult<WorldConfig> {
    let falloff = args.falloff.as_deref().map(parse_falloff).transpose()?;
    let thresholds = args.thresholds.as_deref().map(parse_thresholds).transpose()?;
    let priorities = args.priorities.as_deref().map(parse_priorities).transpose()?;
    let blocked = args.blocked.as_deref().map(parse_blocked_policy).transpose()?;
    let target = args.target.as_deref().map(parse_route_target).transpose()?;
    let octaves = args.octaves.map(validate_octaves);

    LayoutBuilder::new(base_config(args.config.as_ref())?)
        .preset(args.preset.as_deref())?
        .seed(args.seed)
        .width(args.width)
        .depth(args.depth)
        .noise(octaves, args.persistence, args.lacunarity, args.scale)
        .falloff(falloff, args.falloff_radius)
        .thresholds(thresholds)
        .priorities(priorities)
        .unscaled_costs(args.unscaled)
        .blocked_policy(blocked)
        .target(target)
        .camps(args.camps, args.camp_distance, args.camp_size)
        .build()
}

fn main() -> WorldgenResult<()> {
    init_logging();
    let args = Args::parse();

    // Validate output path early to catch obvious issues
    if let Some(output) = &args.output {
        validate_layout_path(Path::new(output))?;
    }

    let config = build_config(&args)?;
    if args.save_config {
        let path = save_config(&config)?;
        println!("Config saved to: {}", path.display());
    }

    let layout = WorldLayout::generate(&config)?;

    let saved_to = match &args.output {
        Some(output) => Some(layout.save_to_file(output)?),
        None => None,
    };

    print_layout_summary(&layout, saved_to.as_ref());
    Ok(())
}

fn print_layout_summary(layout: &WorldLayout, saved_to: Option<&PathBuf>) {
    if let Some(path) = saved_to {
        println!("Layout saved successfully to: {}", path.display());
    }

    let resolution = layout.heights.resolution();
    let (min, max) = layout.heights.min_max();
    let (walk, climb, blocked) = layout.traversal.counts();

    println!("\nLayout summary:");
    println!("  Seed: {}", layout.config.terrain.seed);
    println!("  Heightmap: {resolution}x{resolution}, heights {min:.3}..{max:.3}");
    println!("  Terrain: {walk} walk, {climb} climb, {blocked} blocked cells");
    println!(
        "  Route: {} -> {}, {} cells (raw {}), cost {}, corridor {} cells",
        layout.route.start,
        layout.route.target,
        layout.route.len(),
        layout.route.raw_path.len(),
        layout.route.cost,
        layout.route.corridor_size
    );
    println!("  Camps: {}", layout.camps.len());

    for (i, camp) in layout.camps.iter().enumerate() {
        println!(
            "    Camp {}: at={}, route step={}, area cost={}, tents={}",
            i + 1,
            camp.site.coord,
            camp.site.path_index,
            camp.site.area_cost,
            camp.tents.len()
        );
    }
}
