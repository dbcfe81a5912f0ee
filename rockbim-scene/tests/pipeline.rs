//! Full conversion runs against synthetic RAMMS output on disk.

use rockbim_data::rts::{RECORD_FIELDS, field};
use rockbim_data::{DataError, TrajectoryHeader, TrajectoryRecord, encode_trajectory};
use rockbim_scene::export::read_bim;
use rockbim_scene::{
    ColorMode, ConversionConfig, OutputFormat, SceneError, TrajectoryInput, convert,
};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

const CUBE: &str = "\
# unit cube with an interior point
0 0 0
1 0 0
0 1 0
1 1 0
0 0 1
1 0 1
0 1 1
1 1 1
0.5 0.5 0.5
";

/// 30 records one metre apart along x, starting 100 m from the origin.
fn straight_run(mass: f64) -> Vec<u8> {
    let records: Vec<TrajectoryRecord> = (0..30)
        .map(|i| {
            let mut values = [0.0; RECORD_FIELDS];
            values[field::TIME] = 0.1 * i as f64;
            values[field::POSITION] = 100.0 + i as f64;
            values[field::POSITION + 2] = 20.0;
            values[field::QUATERNION] = 1.0;
            values[field::VELOCITY] = 10.0;
            values[field::KINETIC_ENERGY] = 100.0 * i as f64;
            values[field::REFERENCE_HEIGHT] = 19.0;
            TrajectoryRecord(values)
        })
        .collect();
    let header = TrajectoryHeader {
        mass,
        reserved: [0.0; 3],
    };
    encode_trajectory(&header, &records)
}

fn write(dir: &Path, name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn config(dir: &Path, rock: PathBuf, trajectories: Vec<TrajectoryInput>) -> ConversionConfig {
    ConversionConfig {
        rock: Some(rock),
        trajectories,
        gap_length: 2.5,
        output: Some(dir.join("Antoniberg.ifc")),
        ..Default::default()
    }
}

fn count(text: &str, keyword: &str) -> usize {
    text.matches(&format!("={keyword}(")).count()
}

#[test]
fn test_single_trajectory_to_ifc() {
    let dir = tempfile::tempdir().unwrap();
    let rock = write(dir.path(), "cube.pts", CUBE);
    let rts = write(dir.path(), "Antoniberg_Pos1.rts", straight_run(12.5));

    let mut config = config(dir.path(), rock, vec![TrajectoryInput::new(rts)]);
    config.color_mode = ColorMode::KineticEnergy;
    let summary = convert(&config).unwrap();

    assert_eq!(summary.scenario, "Antoniberg");
    assert_eq!(summary.trajectories, 1);
    assert_eq!(summary.instances, 11);
    assert_eq!(summary.format, OutputFormat::Ifc);
    assert_eq!(summary.output, dir.path().join("Antoniberg.ifc"));

    let text = fs::read_to_string(&summary.output).unwrap();
    assert!(text.starts_with("ISO-10303-21;"));
    assert_eq!(count(&text, "IFCBUILDINGSTOREY"), 1);
    assert_eq!(count(&text, "IFCBUILDINGELEMENTPROXY"), 11);
    assert_eq!(count(&text, "IFCCARTESIANPOINTLIST3D"), 1);
    assert_eq!(count(&text, "IFCTRIANGULATEDFACESET"), summary.styles);
    assert!(text.contains("'Pos1'"));
    assert!(text.contains("'t = 2.7 s'"));
    assert!(text.contains("'t = 2.9 s'"));
    assert!(!text.contains("'t = 0.1 s'"));
    assert!(text.contains("IFCPROPERTYSINGLEVALUE('Rock Mass [kg]',$,IFCREAL(12.5),$)"));
    assert!(text.contains("IFCPROPERTYSINGLEVALUE('Rock Name',$,IFCTEXT('cube.pts'),$)"));
    // Last record carries the maximum energy and is pure red.
    assert!(text.contains("IFCCOLOURRGB($,1.0,0.0,0.0)"));
    assert!(!dir.path().join("Antoniberg.ifc.partial").exists());
}

#[test]
fn test_uniform_mode_uses_one_style() {
    let dir = tempfile::tempdir().unwrap();
    let rock = write(dir.path(), "cube.pts", CUBE);
    let a = write(dir.path(), "Antoniberg_Pos1.rts", straight_run(12.5));
    let b = write(dir.path(), "Antoniberg_Pos2.rts", straight_run(40.0));

    let inputs = vec![
        TrajectoryInput::new(a),
        TrajectoryInput::new(b).with_label("East gully"),
    ];
    let summary = convert(&config(dir.path(), rock, inputs)).unwrap();

    assert_eq!(summary.trajectories, 2);
    assert_eq!(summary.instances, 22);
    assert_eq!(summary.styles, 1);

    let text = fs::read_to_string(&summary.output).unwrap();
    assert_eq!(count(&text, "IFCSURFACESTYLE"), 1);
    assert_eq!(count(&text, "IFCBUILDINGSTOREY"), 2);
    assert!(text.contains("'East gully'"));
    assert!(text.contains("IFCCOLOURRGB($,0.5,0.5,0.5)"));
}

#[test]
fn test_repeated_runs_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let rock = write(dir.path(), "cube.pts", CUBE);
    let rts = write(dir.path(), "Antoniberg_Pos1.rts", straight_run(12.5));
    let config = config(dir.path(), rock, vec![TrajectoryInput::new(rts)]);

    let first = convert(&config).unwrap();
    let a = fs::read(&first.output).unwrap();
    let second = convert(&config).unwrap();
    let b = fs::read(&second.output).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_dotbim_output() {
    let dir = tempfile::tempdir().unwrap();
    let rock = write(dir.path(), "cube.pts", CUBE);
    let rts = write(dir.path(), "Antoniberg_Pos1.rts", straight_run(12.5));

    let mut config = config(dir.path(), rock, vec![TrajectoryInput::new(rts)]);
    config.output = Some(dir.path().join("scene.bim"));
    let summary = convert(&config).unwrap();
    assert_eq!(summary.format, OutputFormat::DotBim);

    let bim = read_bim(BufReader::new(File::open(&summary.output).unwrap())).unwrap();
    assert_eq!(bim.meshes.len(), 1);
    assert_eq!(bim.meshes[0].indices.len(), 12 * 3);
    assert_eq!(bim.elements.len(), 11);
    let last = &bim.elements[10];
    assert_eq!((last.vector.x, last.vector.y, last.vector.z), (129.0, 0.0, 20.0));
    assert_eq!(last.info["Trajectory"], "Pos1");
    assert_eq!(last.info["Jump Height [m]"], "1");
}

#[test]
fn test_collinear_rock_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let rock = write(dir.path(), "stick.pts", "0 0 0\n1 1 1\n2 2 2\n3 3 3\n");
    let rts = write(dir.path(), "Antoniberg_Pos1.rts", straight_run(12.5));
    let config = config(dir.path(), rock, vec![TrajectoryInput::new(rts)]);

    let err = convert(&config).unwrap_err();
    assert!(matches!(
        err,
        SceneError::Data(DataError::DegenerateGeometry { .. })
    ));
    assert!(!dir.path().join("Antoniberg.ifc").exists());
}

#[test]
fn test_truncated_trajectory_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let rock = write(dir.path(), "cube.pts", CUBE);
    let mut bytes = straight_run(12.5);
    bytes.truncate(bytes.len() - 8);
    let rts = write(dir.path(), "Antoniberg_Pos1.rts", bytes);

    let err = convert(&config(dir.path(), rock, vec![TrajectoryInput::new(rts)])).unwrap_err();
    assert!(matches!(
        err,
        SceneError::Data(DataError::MalformedTrajectoryFile { .. })
    ));
    assert!(!dir.path().join("Antoniberg.ifc").exists());
}

#[test]
fn test_default_output_name_uses_scenario() {
    let config = ConversionConfig {
        trajectories: vec![TrajectoryInput::new(PathBuf::from("runs/Hang_Pos4.rts"))],
        ..Default::default()
    };
    assert_eq!(config.resolved_output("Hang"), PathBuf::from("Hang.ifc"));
    assert_eq!(
        rockbim_data::TrajectoryName::from_path(&config.trajectories[0].path).scenario,
        "Hang"
    );
}
