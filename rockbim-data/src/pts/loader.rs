//! Point-cloud file loading functions

use crate::error::DataError;
use crate::types::RockGeometry;
use glam::DVec3;
use std::path::Path;
use tracing::{debug, info};

/// Parse a plain-text point cloud: one `x y z` row per line.
///
/// Fields are separated by any whitespace. Blank lines and lines starting
/// with `#` are skipped. `path` is only used for error context.
pub fn parse_point_cloud(text: &str, path: &Path) -> Result<Vec<DVec3>, DataError> {
    let parse_error = |line: usize, reason: String| DataError::PointCloudParse {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut points = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(parse_error(
                line,
                format!("expected 3 values, found {}", fields.len()),
            ));
        }

        let mut xyz = [0.0; 3];
        for (slot, token) in xyz.iter_mut().zip(&fields) {
            *slot = token
                .parse::<f64>()
                .map_err(|e| parse_error(line, format!("'{}': {}", token, e)))?;
        }
        points.push(DVec3::from_array(xyz));
    }

    debug!("Parsed {} points from {}", points.len(), path.display());
    Ok(points)
}

/// Load a `.pts` file and build the rock mesh from its convex hull.
///
/// The rock is named after the file name.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_point_cloud(path: &Path) -> Result<RockGeometry, DataError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    let points = parse_point_cloud(&text, path)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let rock = RockGeometry::from_points(name, points)?;
    info!(
        "Rock '{}': {} points, {} hull triangles",
        rock.name,
        rock.points.len(),
        rock.faces.len()
    );
    debug!("Rock '{}' hull volume {:.4} m³", rock.name, rock.volume());
    Ok(rock)
}
