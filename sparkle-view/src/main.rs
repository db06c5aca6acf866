//! Application entry point for the particle viewer.
//!
//! This binary parses the command line, loads the particle config, sets up
//! eframe/egui and delegates all interactive logic and rendering to
//! [`Viewer`] from the `viewer` module.

mod viewer;

use anyhow::Context;
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use sparkle_core::config::Config;
use std::path::PathBuf;
use viewer::Viewer;

/// Ambient and burst particle canvas.
#[derive(Parser, Debug)]
#[command(name = "sparkle-view", version)]
struct Args {
    /// TOML file overriding the default particle config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible particle sequence
    #[arg(short, long)]
    seed: Option<u64>,

    /// Start with the frame loop paused
    #[arg(long)]
    paused: bool,
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the config cannot be loaded or eframe fails to create the
///   native window or event loop.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let rng = match args.seed {
        Some(seed) => {
            log::info!("Using particle seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };

    let options = eframe::NativeOptions::default();
    let running = !args.paused;

    eframe::run_native(
        "Sparkle",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(cfg, rng, running)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))
}
