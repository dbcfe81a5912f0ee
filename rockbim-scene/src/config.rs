//! Conversion configuration.

use crate::color::ColorMode;
use crate::export::OutputFormat;
use crate::sampling::GapLength;
use crate::scene::ProjectInfo;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One trajectory file to convert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryInput {
    pub path: PathBuf,
    /// Storey name; defaults to the `Pos<n>` part of the file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TrajectoryInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Everything a conversion run needs.
///
/// Loadable from JSON; absent fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Rock point cloud (`.pts`).
    pub rock: Option<PathBuf>,
    pub trajectories: Vec<TrajectoryInput>,
    /// Minimum distance in metres between rendered rocks.
    pub gap_length: f64,
    pub color_mode: ColorMode,
    /// Defaults to the scenario part of the first trajectory file name.
    pub scenario: Option<String>,
    /// Defaults to `<scenario>.<format extension>` in the working directory.
    pub output: Option<PathBuf>,
    /// Defaults to the output extension, else IFC.
    pub format: Option<OutputFormat>,
    pub project: ProjectInfo,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            rock: None,
            trajectories: Vec::new(),
            gap_length: GapLength::DEFAULT.get(),
            color_mode: ColorMode::default(),
            scenario: None,
            output: None,
            format: None,
            project: ProjectInfo::default(),
        }
    }
}

impl ConversionConfig {
    /// Output format: explicit, else inferred from the output path, else IFC.
    pub fn resolved_format(&self) -> OutputFormat {
        self.format
            .or_else(|| self.output.as_deref().and_then(OutputFormat::from_path))
            .unwrap_or_default()
    }

    /// Output path for a run of `scenario`.
    pub fn resolved_output(&self, scenario: &str) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => PathBuf::from(format!("{scenario}.{}", self.resolved_format().extension())),
        }
    }
}
