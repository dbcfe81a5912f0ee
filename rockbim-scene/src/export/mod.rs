//! Scene writers.

pub mod dotbim;
pub mod guid;
pub mod ifc;
pub mod step;

pub use dotbim::{BimFile, read_bim, scene_to_bim, write_bim};
pub use guid::GuidGenerator;
pub use ifc::write_ifc;

use crate::error::SceneError;
use crate::scene::Scene;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// IFC4 STEP file.
    #[default]
    Ifc,
    /// dotbim JSON.
    #[serde(alias = "bim")]
    DotBim,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Ifc => "ifc",
            OutputFormat::DotBim => "bim",
        }
    }

    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        extension.parse().ok()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ifc" => Ok(OutputFormat::Ifc),
            "bim" | "dotbim" => Ok(OutputFormat::DotBim),
            other => Err(format!("unknown output format '{other}' (expected ifc or bim)")),
        }
    }
}

/// Write `scene` to `path`.
///
/// The file is written next to `path` under a temporary name and renamed
/// into place once complete, so a failed export leaves no partial file.
#[tracing::instrument(skip_all, fields(path = %path.display(), format = %format))]
pub fn write_scene(scene: &Scene, path: &Path, format: OutputFormat) -> Result<(), SceneError> {
    let temp = temp_path(path);
    let result = write_to(scene, &temp, format).and_then(|()| {
        fs::rename(&temp, path).map_err(|e| SceneError::io(path, e))
    });
    if result.is_err() {
        let _ = fs::remove_file(&temp);
        return result;
    }

    info!("Wrote {} rock instances to {}", scene.instance_count(), path.display());
    Ok(())
}

fn write_to(scene: &Scene, path: &Path, format: OutputFormat) -> Result<(), SceneError> {
    let file = File::create(path).map_err(|e| SceneError::io(path, e))?;
    let writer = BufWriter::new(file);
    match format {
        OutputFormat::Ifc => write_ifc(scene, writer).map_err(|e| SceneError::io(path, e)),
        OutputFormat::DotBim => write_bim(scene, writer).map_err(SceneError::from),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("out/a.ifc")), Some(OutputFormat::Ifc));
        assert_eq!(OutputFormat::from_path(Path::new("a.BIM")), Some(OutputFormat::DotBim));
        assert_eq!(OutputFormat::from_path(Path::new("a.json")), None);
        assert_eq!(OutputFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_format_serde_names() {
        let parsed: OutputFormat = serde_json::from_str("\"bim\"").unwrap();
        assert_eq!(parsed, OutputFormat::DotBim);
        assert_eq!(serde_json::to_string(&OutputFormat::Ifc).unwrap(), "\"ifc\"");
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let temp = temp_path(Path::new("/data/run/Antoniberg.ifc"));
        assert_eq!(temp, Path::new("/data/run/Antoniberg.ifc.partial"));
    }
}
