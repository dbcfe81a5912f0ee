//! Scenario and trajectory names derived from RAMMS file names.
//!
//! RAMMS::Rockfall writes one file per release position, named
//! `<scenario>_Pos<n>.rts`. The part before the marker names the scenario (and
//! by default the output file); `Pos<n>` labels the trajectory.

use std::path::Path;

/// Separator between scenario name and trajectory label in a file stem.
pub const LABEL_MARKER: &str = "_Pos";

/// Names recovered from a trajectory file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrajectoryName {
    pub scenario: String,
    pub label: String,
}

impl TrajectoryName {
    /// Split a file stem at the first `_Pos` marker.
    ///
    /// Stems without the marker use the whole stem as both scenario and label.
    pub fn parse(stem: &str) -> Self {
        match stem.split_once(LABEL_MARKER) {
            Some((scenario, rest)) => Self {
                scenario: scenario.to_string(),
                label: format!("Pos{rest}"),
            },
            None => Self {
                scenario: stem.to_string(),
                label: stem.to_string(),
            },
        }
    }

    pub fn from_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        Self::parse(&stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ramms_name() {
        let name = TrajectoryName::parse("Antoniberg_Pos3");
        assert_eq!(name.scenario, "Antoniberg");
        assert_eq!(name.label, "Pos3");
    }

    #[test]
    fn test_from_path_strips_directory_and_extension() {
        let name = TrajectoryName::from_path(Path::new("/runs/2024/slope_A_Pos17.rts"));
        assert_eq!(name.scenario, "slope_A");
        assert_eq!(name.label, "Pos17");
    }

    #[test]
    fn test_first_marker_wins() {
        let name = TrajectoryName::parse("a_Pos1_Pos2");
        assert_eq!(name.scenario, "a");
        assert_eq!(name.label, "Pos1_Pos2");
    }

    #[test]
    fn test_without_marker() {
        let name = TrajectoryName::from_path(Path::new("single.rts"));
        assert_eq!(name.scenario, "single");
        assert_eq!(name.label, "single");
    }
}
