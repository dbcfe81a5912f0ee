//! Rockbim
//!
//! RAMMS::Rockfall trajectories and rock point clouds to BIM models.
//! Input decoding lives in [`data`], sampling, colouring and export in
//! [`scene`]. The `rockbim` binary is in the `rockbim-app` crate.

pub use rockbim_data as data;
pub use rockbim_scene as scene;
