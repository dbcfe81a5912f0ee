use rockbim_scene::SceneError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{labels} labels given for {trajectories} trajectories")]
    LabelCount { labels: usize, trajectories: usize },

    #[error(transparent)]
    Scene(#[from] SceneError),
}
