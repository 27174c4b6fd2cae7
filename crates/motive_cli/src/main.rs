//! Motive CLI
//!
//! Simulate animation scenes without a display and inspect timing curves.

mod config;
mod project;
mod simulate;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::SceneConfig;
use simulate::Simulation;

/// Frame-based animation toolkit
#[derive(Parser, Debug)]
#[command(name = "motive")]
#[command(about = "Simulate animation scenes and inspect timing curves")]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a scene and print entity positions per frame
    Run {
        /// Scene file, or a directory containing motive.toml
        #[arg(default_value = ".")]
        scene: PathBuf,

        /// Override playback.fps
        #[arg(long)]
        fps: Option<u32>,

        /// Override playback.duration_ms
        #[arg(long)]
        duration: Option<f64>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Sample a timing function over [0, 1]
    Curve {
        /// Timing expression, e.g. `bounce` or `{ ease_out = { pow = 3.0 } }`
        timing: String,

        /// Number of evenly spaced samples, endpoints included
        #[arg(long, default_value = "11")]
        samples: usize,
    },

    /// Write a sample scene
    Init {
        #[arg(default_value = "motive.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    /// One JSON object per frame
    Json,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            scene,
            fps,
            duration,
            format,
        } => cmd_run(scene, fps, duration, format),
        Commands::Curve { timing, samples } => cmd_curve(&timing, samples),
        Commands::Init { path, force } => {
            let path = project::create_scene(&path, force)?;
            tracing::info!("Created {}", path.display());
            Ok(())
        }
    }
}

fn cmd_run(
    scene_path: PathBuf,
    fps: Option<u32>,
    duration: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let scene = SceneConfig::load(&scene_path)?;
    let fps = fps.unwrap_or(scene.playback.fps);
    let duration = duration.unwrap_or(scene.playback.duration_ms);
    tracing::info!(
        scene = %scene_path.display(),
        fps,
        duration,
        entities = scene.entities.len(),
        "Simulating"
    );

    let mut simulation = Simulation::from_scene(&scene)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let summary = simulation.run(fps, duration, |sample| {
        match format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut out, sample)?;
                writeln!(out)?;
            }
            OutputFormat::Text => {
                write!(out, "{:>5} {:>9.2}ms", sample.frame, sample.time)?;
                for p in &sample.positions {
                    write!(out, "  {}=({:.3}, {:.3})", p.name, p.x, p.y)?;
                }
                writeln!(out)?;
            }
        }
        Ok(())
    })?;

    if summary.hook_failures > 0 {
        tracing::warn!(failures = summary.hook_failures, "hooks failed during playback");
    }
    if format == OutputFormat::Text {
        writeln!(
            out,
            "{} frames, {} motions finished{}",
            summary.frames,
            summary.motions_finished,
            if summary.settled { "" } else { " (stopped at duration)" }
        )?;
    }
    Ok(())
}

fn cmd_curve(expr: &str, samples: usize) -> Result<()> {
    anyhow::ensure!(samples >= 2, "--samples must be at least 2");
    let timing = config::parse_timing(expr)?;
    tracing::debug!(?timing, samples, "sampling curve");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for i in 0..samples {
        let p = i as f64 / (samples - 1) as f64;
        writeln!(out, "{:.4}\t{:.6}", p, timing.apply(p)).context("Failed to write output")?;
    }
    Ok(())
}
