//! Format-independent scene representation
//!
//! A [`Scene`] mirrors the spatial hierarchy written to the output file:
//! project, site and building, then one group per trajectory holding one
//! placed rock per render event.

pub mod builder;
pub mod model;

pub use builder::SceneBuilder;
pub use model::{
    Placement, ProjectInfo, PropertyValue, RockInstance, RockProperties, Scene, TrajectoryGroup,
};
