//! End-to-end conversion: load inputs, build the scene, write it out.

use crate::config::{ConversionConfig, TrajectoryInput};
use crate::error::SceneError;
use crate::export::{OutputFormat, write_scene};
use crate::sampling::GapLength;
use crate::scene::SceneBuilder;
use rayon::prelude::*;
use rockbim_data::{Trajectory, TrajectoryName, load_point_cloud, load_trajectory};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// What a conversion run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub scenario: String,
    pub trajectories: usize,
    /// Rock instances written.
    pub instances: usize,
    /// Distinct surface styles.
    pub styles: usize,
    pub format: OutputFormat,
    pub output: PathBuf,
}

/// Run one conversion.
///
/// All inputs are validated and decoded before anything is written; on error
/// no output file is left behind.
pub fn convert(config: &ConversionConfig) -> Result<ConversionSummary, SceneError> {
    let start = Instant::now();

    let rock_path = config
        .rock
        .as_deref()
        .ok_or(SceneError::MissingInput("rock point cloud"))?;
    let first = config
        .trajectories
        .first()
        .ok_or(SceneError::MissingInput("at least one trajectory"))?;
    let gap = GapLength::new(config.gap_length)?;

    let rock = load_point_cloud(rock_path)?;

    let trajectories = load_trajectories(&config.trajectories)?;

    let scenario = config
        .scenario
        .clone()
        .unwrap_or_else(|| TrajectoryName::from_path(&first.path).scenario);
    let format = config.resolved_format();
    let output = config.resolved_output(&scenario);

    let scene = SceneBuilder::new(scenario)
        .with_project(config.project.clone())
        .with_gap_length(gap)
        .with_color_mode(config.color_mode)
        .build(rock, &trajectories)?;

    write_scene(&scene, &output, format)?;

    let summary = ConversionSummary {
        scenario: scene.scenario.clone(),
        trajectories: scene.groups.len(),
        instances: scene.instance_count(),
        styles: scene.distinct_colors(),
        format,
        output,
    };
    info!("Conversion finished in {:.2?}", start.elapsed());
    Ok(summary)
}

/// Decode every trajectory file in parallel, keeping input order.
fn load_trajectories(inputs: &[TrajectoryInput]) -> Result<Vec<Trajectory>, SceneError> {
    let trajectories = inputs
        .par_iter()
        .map(|input| load_trajectory(&input.path, input.label.as_deref()))
        .collect::<Result<Vec<_>, _>>()?;

    let records: usize = trajectories.iter().map(Trajectory::len).sum();
    info!(
        "Loaded {} trajectories with {} records",
        trajectories.len(),
        records
    );
    Ok(trajectories)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_rock() {
        let config = ConversionConfig {
            trajectories: vec![TrajectoryInput::new("a_Pos1.rts")],
            ..Default::default()
        };
        let err = convert(&config).unwrap_err();
        assert!(matches!(err, SceneError::MissingInput("rock point cloud")));
    }

    #[test]
    fn test_missing_trajectories() {
        let config = ConversionConfig {
            rock: Some(PathBuf::from("rock.pts")),
            ..Default::default()
        };
        let err = convert(&config).unwrap_err();
        assert!(matches!(err, SceneError::MissingInput("at least one trajectory")));
    }

    #[test]
    fn test_negative_gap_rejected_before_loading() {
        let config = ConversionConfig {
            rock: Some(PathBuf::from("does/not/exist.pts")),
            trajectories: vec![TrajectoryInput::new("does/not/exist_Pos1.rts")],
            gap_length: -1.0,
            ..Default::default()
        };
        let err = convert(&config).unwrap_err();
        assert!(matches!(err, SceneError::InvalidGapLength(_)));
    }
}
