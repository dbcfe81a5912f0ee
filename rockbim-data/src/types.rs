//! Core data types for trajectories and rock geometry.
//!
//! These are the decoded, format-independent representations shared by the
//! scene builder and the output writers.

use crate::error::DataError;
use crate::hull::convex_hull;
use crate::rts::TrajectoryRecord;
use glam::DVec3;

/// Header values preceding the timestep records of a trajectory file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryHeader {
    /// Rock mass in kilograms.
    pub mass: f64,
    /// Values 1..4 of the file; not interpreted.
    pub reserved: [f64; 3],
}

/// One simulated rock's full, time-ordered path.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// Display label, e.g. `Pos3`.
    pub label: String,
    /// Rock mass in kilograms.
    pub mass: f64,
    pub reserved: [f64; 3],
    /// Timestep records in file order.
    pub records: Vec<TrajectoryRecord>,
}

impl Trajectory {
    pub fn new(
        label: impl Into<String>,
        header: TrajectoryHeader,
        records: Vec<TrajectoryRecord>,
    ) -> Self {
        Self {
            label: label.into(),
            mass: header.mass,
            reserved: header.reserved,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total distance travelled between consecutive timesteps.
    pub fn path_length(&self) -> f64 {
        self.records
            .windows(2)
            .map(|w| w[0].position().distance(w[1].position()))
            .sum()
    }
}

/// Rock shape: the vertex cloud and its triangulated convex hull.
#[derive(Debug, Clone, PartialEq)]
pub struct RockGeometry {
    /// Name shown in the output, usually the point-cloud file name.
    pub name: String,
    /// Vertices in the rock's local frame.
    pub points: Vec<DVec3>,
    /// Hull triangles as 0-based indices into `points`, counter-clockwise
    /// when seen from outside.
    pub faces: Vec<[usize; 3]>,
}

impl RockGeometry {
    /// Build the rock mesh by computing the convex hull of `points`.
    pub fn from_points(name: impl Into<String>, points: Vec<DVec3>) -> Result<Self, DataError> {
        let faces = convex_hull(&points)?;
        Ok(Self {
            name: name.into(),
            points,
            faces,
        })
    }

    /// Hull triangles with 1-based indices, as IFC face sets expect.
    pub fn faces_one_based(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.faces.iter().map(|&[a, b, c]| [a + 1, b + 1, c + 1])
    }

    /// Enclosed volume of the hull.
    pub fn volume(&self) -> f64 {
        self.faces
            .iter()
            .map(|&[a, b, c]| {
                self.points[a].dot(self.points[b].cross(self.points[c])) / 6.0
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rts::RECORD_FIELDS;
    use approx::assert_relative_eq;

    fn record_at(x: f64, y: f64, z: f64) -> TrajectoryRecord {
        let mut values = [0.0; RECORD_FIELDS];
        values[1] = x;
        values[2] = y;
        values[3] = z;
        TrajectoryRecord(values)
    }

    fn unit_cube() -> Vec<DVec3> {
        let mut points = Vec::new();
        for &x in &[0.0, 1.0] {
            for &y in &[0.0, 1.0] {
                for &z in &[0.0, 1.0] {
                    points.push(DVec3::new(x, y, z));
                }
            }
        }
        points
    }

    #[test]
    fn test_trajectory_from_header() {
        let header = TrajectoryHeader {
            mass: 42.0,
            reserved: [1.0, 2.0, 3.0],
        };
        let t = Trajectory::new("Pos1", header, vec![record_at(0.0, 0.0, 0.0)]);
        assert_eq!(t.label, "Pos1");
        assert_eq!(t.mass, 42.0);
        assert_eq!(t.len(), 1);
        assert!(!t.is_empty());
    }

    #[test]
    fn test_path_length() {
        let header = TrajectoryHeader {
            mass: 1.0,
            reserved: [0.0; 3],
        };
        let t = Trajectory::new(
            "Pos1",
            header,
            vec![
                record_at(0.0, 0.0, 0.0),
                record_at(3.0, 4.0, 0.0),
                record_at(3.0, 4.0, 2.0),
            ],
        );
        assert_relative_eq!(t.path_length(), 7.0);
    }

    #[test]
    fn test_rock_from_cube() {
        let rock = RockGeometry::from_points("cube.pts", unit_cube()).unwrap();
        assert_eq!(rock.faces.len(), 12);
        assert_relative_eq!(rock.volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_faces_one_based() {
        let rock = RockGeometry::from_points("cube.pts", unit_cube()).unwrap();
        for (zero, one) in rock.faces.iter().zip(rock.faces_one_based()) {
            assert_eq!(one, [zero[0] + 1, zero[1] + 1, zero[2] + 1]);
        }
        assert!(rock.faces_one_based().flatten().all(|i| i >= 1 && i <= 8));
    }
}
