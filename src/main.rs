//! DhruvaPatrol - patrol route generator for VacuumTiger
//!
//! Loads an occupancy grid, builds the patrol graph, and advances the
//! patrol until every free cell has been visited or the step limit is hit.
//!
//! # Usage
//!
//! ```bash
//! dhruva-patrol --grid maps/room.txt
//! dhruva-patrol --grid maps/room.txt --config patrol.toml --seed 42 --output out/path.txt
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use dhruva_patrol::{GridGraph, OccupancyGrid, PatrolConfig, Patroller, Result, io};

/// Step limit per free cell when no `max_steps` is configured.
const DEFAULT_STEPS_PER_CELL: usize = 100;

#[derive(Parser, Debug)]
#[command(name = "dhruva-patrol", version, about = "Uniform-visitation patrol over an occupancy grid")]
struct Args {
    /// Occupancy grid file (0 = free, nonzero = blocked)
    #[arg(short, long)]
    grid: PathBuf,

    /// TOML configuration file (defaults to dhruva-patrol.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start node index (overrides config)
    #[arg(short, long)]
    start: Option<usize>,

    /// Tie-break seed (overrides config)
    #[arg(long)]
    seed: Option<u64>,

    /// Step limit (overrides config)
    #[arg(long)]
    max_steps: Option<usize>,

    /// Revisits in a row before heading for the nearest unvisited cell (overrides config)
    #[arg(long)]
    stall_limit: Option<usize>,

    /// Where to save the visited path (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("[{}] {}", e.code(), e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    info!("DhruvaPatrol v{}", env!("CARGO_PKG_VERSION"));

    let mut config = load_config(args.config.as_deref())?;
    if let Some(start) = args.start {
        config.patrol.start_node = start;
    }
    if let Some(seed) = args.seed {
        config.patrol.seed = Some(seed);
    }
    if let Some(max_steps) = args.max_steps {
        config.patrol.max_steps = Some(max_steps);
    }
    if let Some(limit) = args.stall_limit {
        config.patrol.stall_limit = Some(limit);
    }
    if let Some(output) = args.output {
        config.output.path_file = Some(output);
    }
    config.validate()?;

    info!("Loading occupancy grid from {:?}", args.grid);
    let grid = OccupancyGrid::load(&args.grid)?;
    let max_steps = config
        .patrol
        .max_steps
        .unwrap_or(grid.free_count() * DEFAULT_STEPS_PER_CELL);
    let graph = GridGraph::build(grid);

    match config.patrol.seed {
        Some(seed) => info!("Start node {}, seed {}", config.patrol.start_node, seed),
        None => info!("Start node {}, seed from entropy", config.patrol.start_node),
    }

    let mut patroller = Patroller::from_settings(graph, &config.patrol)?;
    let summary = patroller.run(max_steps)?;

    let stats = patroller.coverage_stats();
    info!(
        "Patrol finished: {} steps ({} first visits, {} revisits), completed: {}",
        summary.steps, summary.first_visits, summary.revisits, summary.completed
    );
    info!(
        "Coverage {:.1}%: visits per free cell min {}, max {}, mean {:.2}",
        stats.coverage() * 100.0,
        stats.min_visits,
        stats.max_visits,
        stats.mean_visits
    );

    if config.output.print_visit_map {
        info!(
            "Visit counts:\n{}",
            patroller.state().visit_map(patroller.graph())
        );
    }

    if let Some(path) = &config.output.path_file {
        io::save_path(path, patroller.state().visited_path(), patroller.graph())?;
        info!("Visited path saved to {:?}", path);
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<PatrolConfig> {
    let default_path = std::path::Path::new("dhruva-patrol.toml");
    match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            PatrolConfig::load(path)
        }
        None if default_path.exists() => {
            info!("Loading configuration from {:?}", default_path);
            PatrolConfig::load(default_path)
        }
        None => {
            info!("Using default configuration");
            Ok(PatrolConfig::default())
        }
    }
}
