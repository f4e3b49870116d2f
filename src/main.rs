//! Tumble Sim command line
//!
//! Runs saved machines headlessly, prints them, and validates save files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use tumble_sim::Settings;
use tumble_sim::persistence;
use tumble_sim::sim::{Grid, run_to_completion};
use tumble_sim::view::Viewport;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON settings file
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Drop a tape of marbles through a machine and print the outputs
    Run {
        file: PathBuf,
        /// Input marbles as a string of 0s and 1s
        bits: Option<String>,
        /// Generate this many random input marbles instead
        #[arg(long, conflicts_with = "bits")]
        random: Option<usize>,
        /// Seed for --random
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Abort after this many grid updates
        #[arg(long)]
        max_ticks: Option<u64>,
    },
    /// Print a window of the machine
    Show {
        file: PathBuf,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        x: i32,
        #[arg(long, default_value_t = 8, allow_hyphen_values = true)]
        y: i32,
        #[arg(long, default_value_t = 40)]
        width: i32,
        #[arg(long, default_value_t = 20)]
        height: i32,
    },
    /// Parse a save file and summarise it
    Check { file: PathBuf },
}

fn main() -> Result<()> {
    let args = Args::parse();
    tumble_sim::logging::init(args.verbose);

    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    match args.command {
        Command::Run {
            file,
            bits,
            random,
            seed,
            json,
            max_ticks,
        } => {
            let settings = Settings {
                max_ticks: max_ticks.unwrap_or(settings.max_ticks),
                ..settings
            };
            let inputs = match (bits, random) {
                (_, Some(count)) => random_tape(count, seed),
                (Some(bits), None) => parse_bits(&bits)?,
                (None, None) => bail!("no input marbles: pass BITS or --random N"),
            };
            run(&file, inputs, json, &settings)
        }
        Command::Show {
            file,
            x,
            y,
            width,
            height,
        } => show(&file, Viewport::new(width, height, IVec2::new(x, y)), &settings),
        Command::Check { file } => check(&file, &settings),
    }
}

fn load(path: &Path, settings: &Settings) -> Result<Grid> {
    persistence::load(path, settings.max_nesting_depth)
        .with_context(|| format!("failed to load {}", path.display()))
}

fn run(path: &Path, inputs: Vec<bool>, json: bool, settings: &Settings) -> Result<()> {
    let mut grid = load(path, settings)?;
    let report = run_to_completion(&mut grid, inputs, settings)
        .with_context(|| format!("run of {} failed", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.bits());
        log::info!("{} outputs in {} ticks", report.outputs.len(), report.ticks);
    }
    Ok(())
}

fn show(path: &Path, viewport: Viewport, settings: &Settings) -> Result<()> {
    let grid = load(path, settings)?;
    let rows = if settings.color_output {
        viewport.render_ansi(&grid)
    } else {
        viewport.render(&grid)
    };
    for row in rows {
        println!("{row}");
    }
    Ok(())
}

fn check(path: &Path, settings: &Settings) -> Result<()> {
    let grid = load(path, settings)?;
    println!(
        "{}: {} tiles, nesting depth {}",
        path.display(),
        grid.len(),
        grid.depth()
    );
    Ok(())
}

fn parse_bits(bits: &str) -> Result<Vec<bool>> {
    bits.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => bail!("invalid input bit {other:?}, expected 0 or 1"),
        })
        .collect()
}

fn random_tape(count: usize, seed: u64) -> Vec<bool> {
    let mut rng = Pcg32::seed_from_u64(seed);
    (0..count).map(|_| rng.random_bool(0.5)).collect()
}
