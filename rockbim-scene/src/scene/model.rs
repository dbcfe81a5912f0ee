//! Scene data types

use crate::color::{ColorMode, Rgb};
use crate::orientation::Orientation;
use glam::DVec3;
use rockbim_data::RockGeometry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Name of the property set attached to every rock instance.
pub const PROPERTY_SET_NAME: &str = "Rockfall Attributes";

pub const KINETIC_ENERGY_KEY: &str = "Kinetic Energy [kJ]";
pub const JUMP_HEIGHT_KEY: &str = "Jump Height [m]";
pub const VELOCITY_KEY: &str = "Velocity [m/s]";
pub const ROCK_NAME_KEY: &str = "Rock Name";
pub const ROCK_MASS_KEY: &str = "Rock Mass [kg]";

/// Names of the fixed upper levels of the spatial hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    pub name: String,
    pub description: String,
    pub site_name: String,
    pub building_name: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            name: "Rockfall Trajectories".to_string(),
            description: "Exported from RAMMS::Rockfall".to_string(),
            site_name: "Rockfall Site".to_string(),
            building_name: "RAMMS Simulation".to_string(),
        }
    }
}

/// Local frame of one rock instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Centre of mass in world coordinates.
    pub origin: DVec3,
    pub orientation: Orientation,
}

/// A property value as written to the output.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Real(f64),
}

/// Per-timestep values exposed on each rock instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RockProperties {
    pub kinetic_energy_kj: f64,
    pub jump_height_m: f64,
    pub speed_m_s: f64,
}

impl RockProperties {
    /// Per-timestep entries of the property set, in output order.
    pub fn entries(&self) -> [(&'static str, PropertyValue); 3] {
        [
            (KINETIC_ENERGY_KEY, PropertyValue::Real(self.kinetic_energy_kj)),
            (JUMP_HEIGHT_KEY, PropertyValue::Real(self.jump_height_m)),
            (VELOCITY_KEY, PropertyValue::Real(self.speed_m_s)),
        ]
    }
}

/// One placed, styled rock.
#[derive(Debug, Clone, PartialEq)]
pub struct RockInstance {
    /// Display name, `t = <seconds> s`.
    pub name: String,
    /// Index of the source record in its trajectory.
    pub record_index: usize,
    pub time: f64,
    pub placement: Placement,
    pub color: Rgb,
    pub properties: RockProperties,
}

/// All rendered rocks of one trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryGroup {
    pub label: String,
    pub mass: f64,
    /// Time-ascending.
    pub instances: Vec<RockInstance>,
}

impl TrajectoryGroup {
    /// Entries shared by every instance of the trajectory; they follow the
    /// per-timestep entries in the property set.
    pub fn shared_entries(&self, rock_name: &str) -> [(&'static str, PropertyValue); 2] {
        [
            (ROCK_NAME_KEY, PropertyValue::Text(rock_name.to_string())),
            (ROCK_MASS_KEY, PropertyValue::Real(self.mass)),
        ]
    }
}

/// Complete output scene, in output order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub scenario: String,
    pub project: ProjectInfo,
    pub rock: RockGeometry,
    pub color_mode: ColorMode,
    pub groups: Vec<TrajectoryGroup>,
}

impl Scene {
    pub fn instance_count(&self) -> usize {
        self.groups.iter().map(|g| g.instances.len()).sum()
    }

    pub fn instances(&self) -> impl Iterator<Item = (&TrajectoryGroup, &RockInstance)> {
        self.groups
            .iter()
            .flat_map(|g| g.instances.iter().map(move |i| (g, i)))
    }

    /// Number of distinct colours after quantisation.
    pub fn distinct_colors(&self) -> usize {
        self.instances()
            .map(|(_, i)| i.color.key())
            .collect::<HashSet<_>>()
            .len()
    }
}
