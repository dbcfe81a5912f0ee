//! IFC4 export.
//!
//! Spatial structure: `IfcProject` → `IfcSite` → `IfcBuilding` → one
//! `IfcBuildingStorey` per trajectory → one `IfcBuildingElementProxy` per
//! rendered rock. All rocks share one `IfcCartesianPointList3D`; each distinct
//! colour gets its own face set, surface style and product shape.

use crate::color::{Rgb, StyleCache};
use crate::export::guid::GuidGenerator;
use crate::export::step::{EntityId, StepHeader, StepValue, StepWriter};
use crate::scene::{Placement, PropertyValue, Scene};
use crate::scene::model::PROPERTY_SET_NAME;
use glam::DVec3;
use std::io::{self, Write};
use tracing::debug;

pub const IFC_SCHEMA: &str = "IFC4";

/// Name given to every rock surface style.
const SURFACE_STYLE_NAME: &str = "RockSurfStyle";

/// Write `scene` as an IFC4 STEP file.
pub fn write_ifc<W: Write>(scene: &Scene, out: W) -> io::Result<()> {
    let step = IfcExporter::new(scene).export();
    let header = StepHeader {
        description: "ViewDefinition [ReferenceView]".to_string(),
        file_name: format!("{}.ifc", scene.scenario),
        time_stamp: String::new(),
        originating_system: "rockbim".to_string(),
        schema: IFC_SCHEMA.to_string(),
    };
    step.write_to(&header, out)
}

/// Shared representation context and geometry of the export.
struct SharedGeometry {
    context: EntityId,
    world_placement: EntityId,
    point_list: EntityId,
}

struct IfcExporter<'a> {
    scene: &'a Scene,
    step: StepWriter,
    guids: GuidGenerator,
}

impl<'a> IfcExporter<'a> {
    fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            step: StepWriter::new(),
            guids: GuidGenerator::new(&scene.scenario),
        }
    }

    fn export(mut self) -> StepWriter {
        let scene = self.scene;

        let world_axes = self.axis_placement(DVec3::ZERO, DVec3::Z, DVec3::X);
        let true_north = self
            .step
            .add("IFCDIRECTION", vec![StepValue::reals([0.0, 1.0])]);
        let context = self.step.add(
            "IFCGEOMETRICREPRESENTATIONCONTEXT",
            vec![
                StepValue::Null,
                "Model".into(),
                StepValue::Integer(3),
                StepValue::Real(1e-5),
                world_axes.into(),
                true_north.into(),
            ],
        );
        let units = self.units();

        let project = self.step.add(
            "IFCPROJECT",
            vec![
                guid(&self.guids, "project"),
                StepValue::Null,
                scene.project.name.as_str().into(),
                scene.project.description.as_str().into(),
                StepValue::Null,
                StepValue::Null,
                StepValue::Null,
                StepValue::refs([context]),
                units.into(),
            ],
        );

        let world_placement = self
            .step
            .add("IFCLOCALPLACEMENT", vec![StepValue::Null, world_axes.into()]);

        let site = self.step.add(
            "IFCSITE",
            spatial_attributes(
                guid(&self.guids, "site"),
                &scene.project.site_name,
                world_placement,
                5,
            ),
        );
        self.aggregate("project/site", project, &[site]);

        let building = self.step.add(
            "IFCBUILDING",
            spatial_attributes(
                guid(&self.guids, "building"),
                &scene.project.building_name,
                world_placement,
                3,
            ),
        );
        self.aggregate("site/building", site, &[building]);

        let coordinates: Vec<StepValue> = scene
            .rock
            .points
            .iter()
            .map(|p| StepValue::reals(p.to_array()))
            .collect();
        let point_list = self
            .step
            .add("IFCCARTESIANPOINTLIST3D", vec![StepValue::List(coordinates)]);

        let shared = SharedGeometry {
            context,
            world_placement,
            point_list,
        };

        let mut shapes: StyleCache<EntityId> = StyleCache::new();
        let mut storeys = Vec::with_capacity(scene.groups.len());

        for (group_index, group) in scene.groups.iter().enumerate() {
            let storey = self.step.add(
                "IFCBUILDINGSTOREY",
                spatial_attributes(
                    guid(&self.guids, &format!("trajectory/{group_index}")),
                    &group.label,
                    world_placement,
                    1,
                ),
            );
            storeys.push(storey);

            let shared_properties: Vec<EntityId> = group
                .shared_entries(&scene.rock.name)
                .iter()
                .map(|(name, value)| self.property(name, value))
                .collect();

            let mut elements = Vec::with_capacity(group.instances.len());
            for (instance_index, instance) in group.instances.iter().enumerate() {
                let path = format!("trajectory/{group_index}/instance/{instance_index}");

                let shape =
                    shapes.get_or_insert_with(instance.color, |color| self.rock_shape(color, &shared));
                let placement = self.local_placement(&instance.placement, &shared);

                let element = self.step.add(
                    "IFCBUILDINGELEMENTPROXY",
                    vec![
                        guid(&self.guids, &path),
                        StepValue::Null,
                        instance.name.as_str().into(),
                        StepValue::Null,
                        StepValue::Null,
                        placement.into(),
                        shape.into(),
                        StepValue::Null,
                        StepValue::Null,
                    ],
                );

                let mut properties: Vec<EntityId> = instance
                    .properties
                    .entries()
                    .iter()
                    .map(|(name, value)| self.property(name, value))
                    .collect();
                properties.extend_from_slice(&shared_properties);

                let property_set = self.step.add(
                    "IFCPROPERTYSET",
                    vec![
                        guid(&self.guids, &format!("{path}/properties")),
                        StepValue::Null,
                        PROPERTY_SET_NAME.into(),
                        StepValue::Null,
                        StepValue::refs(properties),
                    ],
                );
                self.step.add(
                    "IFCRELDEFINESBYPROPERTIES",
                    vec![
                        guid(&self.guids, &format!("{path}/defines")),
                        StepValue::Null,
                        StepValue::Null,
                        StepValue::Null,
                        StepValue::refs([element]),
                        property_set.into(),
                    ],
                );

                elements.push(element);
            }

            if !elements.is_empty() {
                self.step.add(
                    "IFCRELCONTAINEDINSPATIALSTRUCTURE",
                    vec![
                        guid(&self.guids, &format!("trajectory/{group_index}/contains")),
                        StepValue::Null,
                        StepValue::Null,
                        StepValue::Null,
                        StepValue::refs(elements),
                        storey.into(),
                    ],
                );
            }
        }

        if !storeys.is_empty() {
            self.aggregate("building/storeys", building, &storeys);
        }

        debug!(
            "IFC export: {} entities, {} rock styles",
            self.step.len(),
            shapes.len()
        );

        self.step
    }

    fn aggregate(&mut self, path: &str, whole: EntityId, parts: &[EntityId]) -> EntityId {
        let id = guid(&self.guids, &format!("aggregates/{path}"));
        self.step.add(
            "IFCRELAGGREGATES",
            vec![
                id,
                StepValue::Null,
                StepValue::Null,
                StepValue::Null,
                whole.into(),
                StepValue::refs(parts.iter().copied()),
            ],
        )
    }

    fn units(&mut self) -> EntityId {
        let units: Vec<EntityId> = [
            ("LENGTHUNIT", "METRE"),
            ("AREAUNIT", "SQUARE_METRE"),
            ("VOLUMEUNIT", "CUBIC_METRE"),
        ]
        .into_iter()
        .map(|(unit_type, name)| {
            self.step.add(
                "IFCSIUNIT",
                vec![
                    StepValue::Derived,
                    StepValue::Enum(unit_type),
                    StepValue::Null,
                    StepValue::Enum(name),
                ],
            )
        })
        .collect();
        self.step
            .add("IFCUNITASSIGNMENT", vec![StepValue::refs(units)])
    }

    fn axis_placement(&mut self, origin: DVec3, axis: DVec3, ref_direction: DVec3) -> EntityId {
        let location = self
            .step
            .add("IFCCARTESIANPOINT", vec![StepValue::reals(origin.to_array())]);
        let axis = self
            .step
            .add("IFCDIRECTION", vec![StepValue::reals(axis.to_array())]);
        let ref_direction = self
            .step
            .add("IFCDIRECTION", vec![StepValue::reals(ref_direction.to_array())]);
        self.step.add(
            "IFCAXIS2PLACEMENT3D",
            vec![location.into(), axis.into(), ref_direction.into()],
        )
    }

    fn local_placement(&mut self, placement: &Placement, shared: &SharedGeometry) -> EntityId {
        let orientation = placement.orientation;
        let axes = self.axis_placement(
            placement.origin,
            orientation.z_axis(),
            orientation.x_axis(),
        );
        self.step.add(
            "IFCLOCALPLACEMENT",
            vec![shared.world_placement.into(), axes.into()],
        )
    }

    /// Styled rock mesh for one colour; returns the product shape.
    fn rock_shape(&mut self, color: Rgb, shared: &SharedGeometry) -> EntityId {
        let colour = self.step.add(
            "IFCCOLOURRGB",
            vec![
                StepValue::Null,
                color.red.into(),
                color.green.into(),
                color.blue.into(),
            ],
        );
        let rendering = self.step.add(
            "IFCSURFACESTYLERENDERING",
            vec![
                colour.into(),
                StepValue::Real(0.0),
                StepValue::Null,
                StepValue::Null,
                StepValue::Null,
                StepValue::Null,
                StepValue::Null,
                StepValue::Null,
                StepValue::Enum("FLAT"),
            ],
        );
        let style = self.step.add(
            "IFCSURFACESTYLE",
            vec![
                SURFACE_STYLE_NAME.into(),
                StepValue::Enum("BOTH"),
                StepValue::refs([rendering]),
            ],
        );

        let faces: Vec<StepValue> = self
            .scene
            .rock
            .faces_one_based()
            .map(|face| StepValue::List(face.map(|i| StepValue::Integer(i as i64)).to_vec()))
            .collect();
        let face_set = self.step.add(
            "IFCTRIANGULATEDFACESET",
            vec![
                shared.point_list.into(),
                StepValue::Null,
                StepValue::Bool(true),
                StepValue::List(faces),
                StepValue::Null,
            ],
        );
        self.step.add(
            "IFCSTYLEDITEM",
            vec![face_set.into(), StepValue::refs([style]), StepValue::Null],
        );

        let representation = self.step.add(
            "IFCSHAPEREPRESENTATION",
            vec![
                shared.context.into(),
                "Body".into(),
                "Tessellation".into(),
                StepValue::refs([face_set]),
            ],
        );
        self.step.add(
            "IFCPRODUCTDEFINITIONSHAPE",
            vec![
                StepValue::Null,
                StepValue::Null,
                StepValue::refs([representation]),
            ],
        )
    }

    fn property(&mut self, name: &str, value: &PropertyValue) -> EntityId {
        let nominal = match value {
            PropertyValue::Real(v) => StepValue::typed("IFCREAL", StepValue::Real(*v)),
            PropertyValue::Text(t) => StepValue::typed("IFCTEXT", StepValue::string(t.as_str())),
        };
        self.step.add(
            "IFCPROPERTYSINGLEVALUE",
            vec![name.into(), StepValue::Null, nominal, StepValue::Null],
        )
    }
}

fn guid(guids: &GuidGenerator, path: &str) -> StepValue {
    StepValue::String(guids.ifc_guid(path))
}

/// Attributes of a site, building or storey placed at `placement`, padded
/// with unset optional attributes to the entity's `attribute_tail` length.
fn spatial_attributes(
    guid: StepValue,
    name: &str,
    placement: EntityId,
    attribute_tail: usize,
) -> Vec<StepValue> {
    let mut attributes = vec![
        guid,
        StepValue::Null,
        name.into(),
        StepValue::Null,
        StepValue::Null,
        placement.into(),
        StepValue::Null,
        StepValue::Null,
        StepValue::Enum("ELEMENT"),
    ];
    attributes.extend(std::iter::repeat_n(StepValue::Null, attribute_tail));
    attributes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorMode;
    use crate::orientation::Orientation;
    use crate::scene::{ProjectInfo, RockInstance, RockProperties, TrajectoryGroup};
    use rockbim_data::RockGeometry;

    fn instance(t: f64, color: Rgb) -> RockInstance {
        RockInstance {
            name: format!("t = {t} s"),
            record_index: 0,
            time: t,
            placement: Placement {
                origin: DVec3::new(t, 2.0, 3.0),
                orientation: Orientation::identity(),
            },
            color,
            properties: RockProperties {
                kinetic_energy_kj: 1.5,
                jump_height_m: 0.5,
                speed_m_s: 4.0,
            },
        }
    }

    fn scene(colors: &[Rgb]) -> Scene {
        let rock = RockGeometry::from_points(
            "tetra.pts",
            vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
        )
        .unwrap();
        Scene {
            scenario: "Antoniberg".to_string(),
            project: ProjectInfo::default(),
            rock,
            color_mode: ColorMode::KineticEnergy,
            groups: vec![
                TrajectoryGroup {
                    label: "Pos1".to_string(),
                    mass: 1200.0,
                    instances: colors
                        .iter()
                        .enumerate()
                        .map(|(i, &c)| instance(i as f64, c))
                        .collect(),
                },
                TrajectoryGroup {
                    label: "Pos2".to_string(),
                    mass: 800.0,
                    instances: vec![instance(9.0, colors[0])],
                },
            ],
        }
    }

    fn export(scene: &Scene) -> String {
        let mut out = Vec::new();
        write_ifc(scene, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn count(text: &str, keyword: &str) -> usize {
        text.lines()
            .filter(|l| l.contains(&format!("={keyword}(")))
            .count()
    }

    #[test]
    fn test_spatial_hierarchy() {
        let text = export(&scene(&[Rgb::UNIFORM, Rgb::UNIFORM]));
        assert_eq!(count(&text, "IFCPROJECT"), 1);
        assert_eq!(count(&text, "IFCSITE"), 1);
        assert_eq!(count(&text, "IFCBUILDING"), 1);
        assert_eq!(count(&text, "IFCBUILDINGSTOREY"), 2);
        assert_eq!(count(&text, "IFCBUILDINGELEMENTPROXY"), 3);
        assert_eq!(count(&text, "IFCRELCONTAINEDINSPATIALSTRUCTURE"), 2);
        assert_eq!(count(&text, "IFCRELDEFINESBYPROPERTIES"), 3);
        assert!(text.contains("'Pos1'"));
        assert!(text.contains("'Pos2'"));
        assert!(text.contains("FILE_SCHEMA(('IFC4'));"));
    }

    #[test]
    fn test_uniform_color_shares_one_shape() {
        let text = export(&scene(&[Rgb::UNIFORM, Rgb::UNIFORM, Rgb::UNIFORM]));
        assert_eq!(count(&text, "IFCCARTESIANPOINTLIST3D"), 1);
        assert_eq!(count(&text, "IFCTRIANGULATEDFACESET"), 1);
        assert_eq!(count(&text, "IFCSURFACESTYLE"), 1);
        assert_eq!(count(&text, "IFCPRODUCTDEFINITIONSHAPE"), 1);
        assert!(text.contains("IFCCOLOURRGB($,0.5,0.5,0.5)"));
    }

    #[test]
    fn test_one_shape_per_distinct_color() {
        let text = export(&scene(&[Rgb::gradient(0.0), Rgb::gradient(1.0), Rgb::gradient(0.0)]));
        assert_eq!(count(&text, "IFCTRIANGULATEDFACESET"), 2);
        assert_eq!(count(&text, "IFCCOLOURRGB"), 2);
        assert!(text.contains("IFCCOLOURRGB($,1.0,0.0,0.0)"));
        assert!(text.contains("IFCCOLOURRGB($,0.0,0.0,1.0)"));
    }

    #[test]
    fn test_property_set_contents() {
        let text = export(&scene(&[Rgb::UNIFORM]));
        assert!(text.contains("IFCPROPERTYSINGLEVALUE('Kinetic Energy [kJ]',$,IFCREAL(1.5),$)"));
        assert!(text.contains("IFCPROPERTYSINGLEVALUE('Jump Height [m]',$,IFCREAL(0.5),$)"));
        assert!(text.contains("IFCPROPERTYSINGLEVALUE('Velocity [m/s]',$,IFCREAL(4.0),$)"));
        assert!(text.contains("IFCPROPERTYSINGLEVALUE('Rock Name',$,IFCTEXT('tetra.pts'),$)"));
        assert!(text.contains("IFCPROPERTYSINGLEVALUE('Rock Mass [kg]',$,IFCREAL(1200.0),$)"));
        assert!(text.contains("'Rockfall Attributes'"));
    }

    #[test]
    fn test_face_indices_are_one_based() {
        let text = export(&scene(&[Rgb::UNIFORM]));
        let face_set = text
            .lines()
            .find(|l| l.contains("=IFCTRIANGULATEDFACESET("))
            .unwrap();
        assert!(!face_set.contains("(0,") && !face_set.contains(",0,") && !face_set.contains(",0)"));
        assert!(face_set.contains('4'));
    }

    #[test]
    fn test_export_is_deterministic() {
        let s = scene(&[Rgb::gradient(0.3), Rgb::gradient(0.6)]);
        assert_eq!(export(&s), export(&s));
    }
}
