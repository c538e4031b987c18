//! sectiongen: build a level graph from a JSON configuration
//!
//! Prints the seed, an ASCII map and a per-category summary, or the whole
//! graph as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, error, info};
use strum::IntoEnumIterator;

use sg_core::section::{Category, Direction};
use sg_core::{
    ActivationLog, CompletionPolicy, ConfigError, GenerationError, GeneratorConfig, LevelGraph,
    SceneGateway, start_generation,
};

/// Seeded section graph generator
#[derive(Parser, Debug)]
#[command(name = "sectiongen")]
#[command(author, version, about = "Generate a connected level of sections", long_about = None)]
struct Args {
    /// Configuration file (catalog and transition rules)
    #[arg(short = 'c', long = "config")]
    config: PathBuf,

    /// Seed override
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Expansion pass ceiling override
    #[arg(long = "max-iterations")]
    max_iterations: Option<usize>,

    /// Redraw population targets on every completion check
    #[arg(long = "redraw")]
    redraw: bool,

    /// Walk the finished level from the spawn section (e.g. down,right)
    #[arg(short = 'w', long = "walk", value_delimiter = ',')]
    walk: Vec<Direction>,

    /// Print the graph as JSON
    #[arg(long = "json")]
    json: bool,

    /// Verbose output (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Config(_) | CliError::Generation(GenerationError::Configuration(_)) => 2,
            CliError::Generation(_) => 1,
            CliError::Json(_) => 3,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("sectiongen: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

/// RUST_LOG wins; otherwise warnings plus one level per -v
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(args: &Args) -> Result<(), CliError> {
    let mut config = GeneratorConfig::from_path(&args.config)?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(max) = args.max_iterations {
        config = config.with_max_iterations(max);
    }
    if args.redraw {
        config = config.with_completion(CompletionPolicy::Redraw);
    }
    info!(
        "loaded {} templates from {}",
        config.catalog.templates().len(),
        args.config.display()
    );

    let graph = start_generation(&config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&graph)?);
    } else {
        print_summary(&graph);
    }

    if !args.walk.is_empty() {
        walk(&graph, &args.walk)?;
    }
    Ok(())
}

fn print_summary(graph: &LevelGraph) {
    println!("seed: {}", graph.seed());
    println!();
    println!("{}", graph.render_ascii());
    println!();
    println!("{} sections ({})", graph.len(), graph.status());
    for category in Category::iter() {
        let count = graph.count_of(category);
        if count > 0 {
            println!("  {} {:<8} {}", category.glyph(), category, count);
        }
    }
}

fn walk(graph: &LevelGraph, steps: &[Direction]) -> Result<(), CliError> {
    let mut gateway = SceneGateway::new(graph, ActivationLog::default())?;
    let Some(start) = gateway.current() else {
        return Ok(());
    };
    println!();
    println!("walk: start in {start}");
    for &step in steps {
        match gateway.traverse_from_current(step) {
            Some(next) => println!("  {step} -> {next}"),
            None => println!("  {step}: no crossing, staying put"),
        }
    }
    let events = gateway.into_activator().events;
    info!("walk produced {} activation changes", events.len());
    Ok(())
}
