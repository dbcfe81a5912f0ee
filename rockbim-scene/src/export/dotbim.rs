//! dotbim (.bim) export.
//!
//! dotbim is a minimal JSON BIM format: a list of meshes plus elements that
//! place a mesh with a translation, a rotation quaternion and a colour. The
//! rock is stored once as mesh 0 and every rendered instance references it.
//!
//! See: https://dotbim.net/

use crate::export::guid::GuidGenerator;
use crate::scene::{PropertyValue, RockInstance, Scene, TrajectoryGroup};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};

const SCHEMA_VERSION: &str = "1.1.0";
const ROCK_MESH_ID: usize = 0;
const ELEMENT_TYPE: &str = "Rock";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BimFile {
    pub schema_version: String,
    pub meshes: Vec<BimMesh>,
    pub elements: Vec<BimElement>,
    #[serde(default)]
    pub info: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BimMesh {
    pub mesh_id: usize,
    /// Flat `[x0, y0, z0, x1, ...]`.
    pub coordinates: Vec<f64>,
    /// Flat, 0-based triangle indices.
    pub indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BimElement {
    pub mesh_id: usize,
    #[serde(rename = "type")]
    pub element_type: String,
    pub color: BimColor,
    pub vector: BimVector,
    pub rotation: BimRotation,
    pub guid: String,
    #[serde(default)]
    pub info: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BimColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BimVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BimRotation {
    pub qx: f64,
    pub qy: f64,
    pub qz: f64,
    pub qw: f64,
}

/// Convert a scene to its dotbim representation.
pub fn scene_to_bim(scene: &Scene) -> BimFile {
    let guids = GuidGenerator::new(&scene.scenario);

    let mesh = BimMesh {
        mesh_id: ROCK_MESH_ID,
        coordinates: scene.rock.points.iter().flat_map(|p| p.to_array()).collect(),
        indices: scene.rock.faces.iter().flatten().copied().collect(),
    };

    let elements = scene
        .groups
        .iter()
        .enumerate()
        .flat_map(|(group_index, group)| {
            let guids = &guids;
            group
                .instances
                .iter()
                .enumerate()
                .map(move |(instance_index, instance)| {
                    let guid = guids
                        .uuid(&format!("trajectory/{group_index}/instance/{instance_index}"))
                        .to_string();
                    instance_to_element(scene, group, instance, guid)
                })
        })
        .collect();

    let mut info = BTreeMap::new();
    info.insert("name".to_string(), scene.project.name.clone());
    info.insert("description".to_string(), scene.project.description.clone());
    info.insert("scenario".to_string(), scene.scenario.clone());
    info.insert("color_mode".to_string(), scene.color_mode.to_string());
    info.insert("exported_by".to_string(), "rockbim".to_string());

    BimFile {
        schema_version: SCHEMA_VERSION.to_string(),
        meshes: vec![mesh],
        elements,
        info,
    }
}

fn instance_to_element(
    scene: &Scene,
    group: &TrajectoryGroup,
    instance: &RockInstance,
    guid: String,
) -> BimElement {
    let mut info = BTreeMap::new();
    info.insert("Name".to_string(), instance.name.clone());
    info.insert("Trajectory".to_string(), group.label.clone());
    let entries = instance
        .properties
        .entries()
        .into_iter()
        .chain(group.shared_entries(&scene.rock.name));
    for (key, value) in entries {
        let text = match value {
            PropertyValue::Text(t) => t,
            PropertyValue::Real(v) => v.to_string(),
        };
        info.insert(key.to_string(), text);
    }

    let [r, g, b] = instance.color.to_u8();
    let origin = instance.placement.origin;
    let rotation = instance.placement.orientation.quaternion();

    BimElement {
        mesh_id: ROCK_MESH_ID,
        element_type: ELEMENT_TYPE.to_string(),
        color: BimColor { r, g, b, a: 255 },
        vector: BimVector {
            x: origin.x,
            y: origin.y,
            z: origin.z,
        },
        rotation: BimRotation {
            qx: rotation.x,
            qy: rotation.y,
            qz: rotation.z,
            qw: rotation.w,
        },
        guid,
        info,
    }
}

/// Write `scene` as pretty-printed dotbim JSON.
pub fn write_bim<W: Write>(scene: &Scene, mut out: W) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut out, &scene_to_bim(scene))?;
    out.flush().map_err(serde_json::Error::io)
}

/// Read a dotbim file back into its raw structure.
pub fn read_bim<R: Read>(reader: R) -> serde_json::Result<BimFile> {
    serde_json::from_reader(reader)
}
