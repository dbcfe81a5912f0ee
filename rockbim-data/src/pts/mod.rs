//! Rock point-cloud (`.pts`) loading

mod loader;

pub use loader::{load_point_cloud, parse_point_cloud};
