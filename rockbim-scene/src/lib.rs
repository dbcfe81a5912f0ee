//! Rockbim Scene Crate
//!
//! Turns decoded trajectories and a rock mesh into a BIM scene and writes it
//! out. It covers the path from input records to output file:
//!
//! ## Modules
//!
//! - [`sampling`]: distance-based selection of the timesteps to render
//! - [`color`]: metric colouring and the colour-keyed style cache
//! - [`orientation`]: quaternion to local placement axes
//! - [`scene`]: the format-independent scene and its builder
//! - [`export`]: IFC4 (STEP) and dotbim writers
//! - [`pipeline`]: configuration and the end-to-end conversion

pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod orientation;
pub mod pipeline;
pub mod sampling;
pub mod scene;

pub use color::{ColorMode, ColorScheme, Metric, Rgb};
pub use config::{ConversionConfig, TrajectoryInput};
pub use error::SceneError;
pub use export::{OutputFormat, write_scene};
pub use orientation::Orientation;
pub use pipeline::{ConversionSummary, convert};
pub use sampling::{GapLength, RenderEvent, render_events};
pub use scene::{ProjectInfo, Scene, SceneBuilder};
