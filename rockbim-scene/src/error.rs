//! Error types for scene assembly and export.

use crate::color::Metric;
use rockbim_data::DataError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a conversion run.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error("{metric} colouring needs a positive maximum over all records, found {max}")]
    MetricRange { metric: Metric, max: f64 },

    #[error("gap length must be a finite, non-negative distance, got {0}")]
    InvalidGapLength(f64),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SceneError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SceneError::Io {
            path: path.into(),
            source,
        }
    }
}
