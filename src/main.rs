mod app;
mod config;
mod input;
mod render;
mod research;
mod storage;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{
    collections::BTreeMap,
    fs::File,
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use torus_life::{classify_grid, TemplateLibrary};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "torus-life")]
#[command(about = "Game of Life on a torus, with recognition of the shapes it settles into", long_about = None)]
struct Args {
    /// settings file (JSON); defaults are used if it does not exist
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,

    /// directory of shape templates, one *.txt file per shape
    #[arg(long)]
    shapes: Option<PathBuf>,

    /// seed for the random fill
    #[arg(long)]
    seed: Option<u64>,

    /// chance of each cell starting alive (clamped to 0..1)
    #[arg(long)]
    density: Option<f64>,

    /// write logs here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Debug, Clone)]
enum Mode {
    /// Watch a random grid until it settles, then name the groups left (default)
    Play,
    /// Measure generations-to-settle across fill densities
    Research,
    /// Name the groups in a saved snapshot
    Classify {
        /// snapshot file: one line per row, '0' alive
        snapshot: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let mut settings = config::load_settings(&args.settings)?;
    if let Some(dir) = args.shapes {
        settings.shapes_dir = dir;
    }
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(density) = args.density {
        settings.live_density = density;
    }
    settings.validate()?;

    let library = TemplateLibrary::from_dir(&settings.shapes_dir).with_context(|| {
        format!("could not load templates from {}", settings.shapes_dir.display())
    })?;

    match args.mode.unwrap_or(Mode::Play) {
        Mode::Play => app::run(settings, library),
        Mode::Research => research::run(&settings),
        Mode::Classify { snapshot } => classify_snapshot(&snapshot, &library),
    }
}

fn classify_snapshot(path: &Path, library: &TemplateLibrary) -> Result<()> {
    let grid = storage::read_snapshot(path)?;
    let labels = classify_grid(&grid, library);
    println!(
        "{}x{} grid, {} alive, {} groups",
        grid.columns(),
        grid.rows(),
        grid.population(),
        labels.len()
    );
    let mut tally: BTreeMap<String, usize> = BTreeMap::new();
    for (i, label) in labels.iter().enumerate() {
        println!("{:>4}. {}", i + 1, label);
        *tally.entry(label.to_string()).or_default() += 1;
    }
    if !tally.is_empty() {
        println!();
        for (name, count) in tally {
            println!("{count:>4} x {name}");
        }
    }
    Ok(())
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}
