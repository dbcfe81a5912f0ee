//! Rockbim
//!
//! Converts RAMMS::Rockfall trajectory files and a rock point cloud into an
//! IFC4 (or dotbim) model with one placed, coloured rock per rendered
//! timestep.

mod app;
mod config;
mod errors;

use clap::Parser;
use rockbim_scene::{ColorMode, OutputFormat};
use std::path::PathBuf;

/// Rockbim - RAMMS::Rockfall trajectories to BIM
#[derive(Parser, Debug)]
#[command(name = "rockbim")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Trajectory files (.rts), one storey each
    #[arg(value_name = "RTS")]
    trajectories: Vec<PathBuf>,

    /// Rock point cloud (.pts)
    #[arg(short, long)]
    rock: Option<PathBuf>,

    /// Storey label per trajectory, in order (default: Pos<n> from the file name)
    #[arg(short, long = "label")]
    labels: Vec<String>,

    /// Minimum distance between rendered rocks in metres [default: 2.0]
    #[arg(short, long)]
    gap: Option<f64>,

    /// Colour mode: uniform, kinetic-energy or jump-height [default: uniform]
    #[arg(short, long)]
    color: Option<ColorMode>,

    /// Scenario name (default: taken from the first trajectory file name)
    #[arg(short, long)]
    scenario: Option<String>,

    /// Output file (default: <scenario>.ifc)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: ifc or bim (default: from the output extension)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// JSON configuration file; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = app::run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
