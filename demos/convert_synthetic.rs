//! Synthetic rockfall conversion
//!
//! Writes a small RAMMS-style scenario (an ellipsoidal rock and three
//! bouncing trajectories down a slope) and converts it to IFC and dotbim,
//! coloured by kinetic energy.
//!
//! Usage:
//!   cargo run --example convert_synthetic -- [output_dir]

use glam::{DQuat, DVec3};
use rockbim::data::rts::{RECORD_FIELDS, field};
use rockbim::data::{TrajectoryHeader, TrajectoryRecord, encode_trajectory};
use rockbim::scene::{ColorMode, ConversionConfig, OutputFormat, TrajectoryInput, convert};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::info;

const TIME_STEP: f64 = 0.05;
const GRAVITY: f64 = 9.81;
const SLOPE: f64 = 0.6;

/// Points on an ellipsoid with semi-axes 0.8 x 0.6 x 0.4 m.
fn rock_cloud() -> String {
    let n = 64;
    let golden = std::f64::consts::PI * (3.0 - 5f64.sqrt());
    let mut text = String::from("# synthetic boulder\n");
    for i in 0..n {
        let y = 1.0 - 2.0 * (i as f64 + 0.5) / n as f64;
        let r = (1.0 - y * y).sqrt();
        let theta = golden * i as f64;
        let p = DVec3::new(0.8 * r * theta.cos(), 0.6 * y, 0.4 * r * theta.sin());
        let _ = writeln!(text, "{:.6} {:.6} {:.6}", p.x, p.y, p.z);
    }
    text
}

/// A rock bouncing down a planar slope `z = -SLOPE * x`.
fn trajectory(start_y: f64, mass: f64, steps: usize) -> Vec<TrajectoryRecord> {
    let mut position = DVec3::new(0.0, start_y, 2.0);
    let mut velocity = DVec3::new(4.0, 0.3, 0.0);
    let mut rotation = DQuat::IDENTITY;
    let spin = DQuat::from_axis_angle(DVec3::Y, 0.15);

    (0..steps)
        .map(|step| {
            velocity.z -= GRAVITY * TIME_STEP;
            position += velocity * TIME_STEP;
            let ground = -SLOPE * position.x;
            if position.z < ground {
                position.z = ground;
                velocity.z = velocity.z.abs() * 0.6;
                velocity.x *= 0.9;
            }
            rotation = (spin * rotation).normalize();

            let mut values = [0.0; RECORD_FIELDS];
            values[field::TIME] = step as f64 * TIME_STEP;
            values[field::POSITION..field::POSITION + 3].copy_from_slice(&position.to_array());
            values[field::QUATERNION..field::QUATERNION + 4]
                .copy_from_slice(&[rotation.w, rotation.x, rotation.y, rotation.z]);
            values[field::VELOCITY..field::VELOCITY + 3].copy_from_slice(&velocity.to_array());
            values[field::KINETIC_ENERGY] = 0.5 * mass * velocity.length_squared();
            values[field::REFERENCE_HEIGHT] = ground;
            TrajectoryRecord(values)
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("rockbim-demo"));
    std::fs::create_dir_all(&out_dir)?;

    let rock = out_dir.join("boulder.pts");
    std::fs::write(&rock, rock_cloud())?;

    let mut inputs = Vec::new();
    for (i, (start_y, mass)) in [(0.0, 850.0), (6.0, 1200.0), (12.0, 400.0)]
        .into_iter()
        .enumerate()
    {
        let path = out_dir.join(format!("Demo_Pos{}.rts", i + 1));
        let header = TrajectoryHeader {
            mass,
            reserved: [0.0; 3],
        };
        std::fs::write(&path, encode_trajectory(&header, &trajectory(start_y, mass, 240)))?;
        inputs.push(TrajectoryInput::new(path));
    }

    for format in [OutputFormat::Ifc, OutputFormat::DotBim] {
        let config = ConversionConfig {
            rock: Some(rock.clone()),
            trajectories: inputs.clone(),
            color_mode: ColorMode::KineticEnergy,
            output: Some(out_dir.join(format!("Demo.{}", format.extension()))),
            ..Default::default()
        };
        let summary = convert(&config)?;
        info!(
            "{}: {} rocks in {} colours",
            summary.output.display(),
            summary.instances,
            summary.styles
        );
    }

    Ok(())
}
