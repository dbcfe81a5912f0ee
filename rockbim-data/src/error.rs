//! Error types for input decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Why a trajectory file was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("length of {0} bytes is not a multiple of 8")]
    UnalignedLength(usize),

    #[error("header needs 4 values, found {0}")]
    TruncatedHeader(usize),

    #[error("payload of {values} values is not a multiple of 26")]
    PartialRecord { values: usize },

    #[error("file contains no timestep records")]
    NoRecords,
}

/// Errors that can occur while reading rock and trajectory inputs.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("malformed trajectory file {}: {reason} (at byte {byte_offset})", .path.display())]
    MalformedTrajectoryFile {
        path: PathBuf,
        byte_offset: usize,
        reason: MalformedReason,
    },

    #[error("point cloud {} line {line}: {reason}", .path.display())]
    PointCloudParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("degenerate rock geometry ({points} points): {reason}")]
    DegenerateGeometry { points: usize, reason: &'static str },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}
