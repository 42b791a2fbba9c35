//! Sight CLI - run line-of-sight detectors over a YAML scene.
//!
//! - `sight scan <scene>` - what each detector sees
//! - `sight check <scene>` - validate a scene without scanning
//! - `sight init [path]` - write an example scene

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod report;
mod scene;

use report::{DetectorReport, ScanMode};
use scene::{Scene, EXAMPLE_SCENE};

#[derive(Parser)]
#[command(name = "sight")]
#[command(about = "Line-of-sight detection over YAML scenes", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run detectors and print what they see
    Scan {
        /// Scene file
        scene: PathBuf,

        /// Report every visible target instead of the first one
        #[arg(long)]
        all: bool,

        /// Only run this detector
        #[arg(long)]
        detector: Option<String>,

        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a scene
    Check {
        /// Scene file
        scene: PathBuf,
    },

    /// Write an example scene
    Init {
        /// Where to write it
        #[arg(default_value = "scene.yaml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let subscriber = fmt().with_env_filter(filter).with_target(false);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command {
        Commands::Scan {
            scene,
            all,
            detector,
            json,
        } => {
            let mode = if all { ScanMode::All } else { ScanMode::First };
            scan_scene(&scene, mode, detector.as_deref(), json)
        }
        Commands::Check { scene } => check_scene(&scene),
        Commands::Init { path } => init_scene(&path),
    }
}

fn scan_scene(path: &Path, mode: ScanMode, only: Option<&str>, json: bool) -> Result<()> {
    let scene = Scene::load(path)?;
    let world = scene.build_world()?;

    let defs = match only {
        Some(name) => vec![scene.detector(name)?],
        None => scene.detectors.iter().collect(),
    };

    let reports = defs
        .into_iter()
        .map(|def| report::scan(&scene, &world, def, mode))
        .collect::<Result<Vec<DetectorReport>>>()?;

    if json {
        let out = serde_json::to_string_pretty(&reports).context("Failed to encode reports")?;
        println!("{out}");
    } else {
        for report in &reports {
            println!("{report}");
        }
    }

    Ok(())
}

fn check_scene(path: &Path) -> Result<()> {
    let scene = Scene::load(path)?;
    let world = scene.build_world()?;
    for def in &scene.detectors {
        scene.detector_config(def)?;
    }

    println!(
        "{}: {} colliders, {} detectors OK",
        path.display(),
        world.world.len(),
        scene.detectors.len()
    );
    Ok(())
}

fn init_scene(path: &Path) -> Result<()> {
    if path.exists() {
        tracing::warn!("{} already exists, leaving it alone", path.display());
        return Ok(());
    }

    std::fs::write(path, EXAMPLE_SCENE)
        .with_context(|| format!("Failed to write scene to {}", path.display()))?;
    tracing::info!("Wrote example scene to {}", path.display());
    Ok(())
}
