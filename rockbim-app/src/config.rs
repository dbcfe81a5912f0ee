//! Configuration file loading and command-line overrides.

use crate::Args;
use crate::errors::AppError;
use rockbim_scene::{ConversionConfig, TrajectoryInput};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Read a JSON [`ConversionConfig`]; absent fields keep their defaults.
pub fn load_config(path: &Path) -> Result<ConversionConfig, AppError> {
    let config_error = |source| AppError::Config {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|e| config_error(serde_json::Error::io(e)))?;
    let config = serde_json::from_reader(BufReader::new(file)).map_err(config_error)?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Build the effective configuration: the config file (if any) with every
/// flag given on the command line laid over it.
pub fn resolve_config(args: &Args) -> Result<ConversionConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ConversionConfig::default(),
    };

    if let Some(rock) = &args.rock {
        config.rock = Some(rock.clone());
    }
    if !args.trajectories.is_empty() {
        config.trajectories = args
            .trajectories
            .iter()
            .map(|path| TrajectoryInput::new(path.clone()))
            .collect();
    }
    if !args.labels.is_empty() {
        if args.labels.len() != config.trajectories.len() {
            return Err(AppError::LabelCount {
                labels: args.labels.len(),
                trajectories: config.trajectories.len(),
            });
        }
        for (input, label) in config.trajectories.iter_mut().zip(&args.labels) {
            input.label = Some(label.clone());
        }
    }
    if let Some(gap) = args.gap {
        config.gap_length = gap;
    }
    if let Some(color) = args.color {
        config.color_mode = color;
    }
    if let Some(scenario) = &args.scenario {
        config.scenario = Some(scenario.clone());
    }
    if let Some(output) = &args.output {
        config.output = Some(output.clone());
    }
    if let Some(format) = args.format {
        config.format = Some(format);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use rockbim_scene::{ColorMode, OutputFormat};
    use std::path::PathBuf;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("rockbim").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_only() {
        let config = resolve_config(&args(&[
            "--rock",
            "boulder.pts",
            "A_Pos1.rts",
            "A_Pos2.rts",
            "--gap",
            "5",
            "--color",
            "jump-height",
            "--format",
            "bim",
        ]))
        .unwrap();
        assert_eq!(config.rock, Some(PathBuf::from("boulder.pts")));
        assert_eq!(config.trajectories.len(), 2);
        assert_eq!(config.trajectories[1].path, PathBuf::from("A_Pos2.rts"));
        assert_eq!(config.trajectories[1].label, None);
        assert_eq!(config.gap_length, 5.0);
        assert_eq!(config.color_mode, ColorMode::JumpHeight);
        assert_eq!(config.format, Some(OutputFormat::DotBim));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(
            &path,
            r#"{
                "rock": "from_file.pts",
                "trajectories": [{ "path": "X_Pos1.rts" }, { "path": "X_Pos2.rts" }],
                "gap_length": 1.0,
                "color_mode": "kinetic-energy",
                "scenario": "FromFile"
            }"#,
        )
        .unwrap();

        let config = resolve_config(&args(&[
            "--config",
            path.to_str().unwrap(),
            "--gap",
            "3",
            "-l",
            "North",
            "-l",
            "South",
        ]))
        .unwrap();

        assert_eq!(config.rock, Some(PathBuf::from("from_file.pts")));
        assert_eq!(config.gap_length, 3.0);
        assert_eq!(config.color_mode, ColorMode::KineticEnergy);
        assert_eq!(config.scenario.as_deref(), Some("FromFile"));
        assert_eq!(config.trajectories[0].label.as_deref(), Some("North"));
        assert_eq!(config.trajectories[1].label.as_deref(), Some("South"));
    }

    #[test]
    fn test_label_count_mismatch() {
        let err = resolve_config(&args(&["A_Pos1.rts", "-l", "One", "-l", "Two"])).unwrap_err();
        assert!(matches!(
            err,
            AppError::LabelCount {
                labels: 2,
                trajectories: 1
            }
        ));
    }

    #[test]
    fn test_bad_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"gap_length\": \"far\" }").unwrap();
        assert!(matches!(load_config(&path), Err(AppError::Config { .. })));
        assert!(matches!(
            load_config(&dir.path().join("missing.json")),
            Err(AppError::Config { .. })
        ));
    }

    #[test]
    fn test_unknown_color_rejected_by_parser() {
        let result = Args::try_parse_from(["rockbim", "--color", "rainbow"]);
        assert!(result.is_err());
    }
}
