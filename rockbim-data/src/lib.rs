//! Rockbim Data Crate
//!
//! Input decoding for the rockfall-to-BIM converter: binary trajectory
//! records (`.rts`), rock point clouds (`.pts`) and the convex hull that turns
//! a point cloud into a closed rock mesh.
//! This crate knows nothing about output formats or colouring.

pub mod error;
pub mod hull;
pub mod naming;
pub mod pts;
pub mod rts;
pub mod types;

pub use error::{DataError, MalformedReason};
pub use hull::convex_hull;
pub use naming::TrajectoryName;
pub use pts::{load_point_cloud, parse_point_cloud};
pub use rts::{TrajectoryRecord, decode_trajectory, encode_trajectory, load_trajectory};
pub use types::{RockGeometry, Trajectory, TrajectoryHeader};
