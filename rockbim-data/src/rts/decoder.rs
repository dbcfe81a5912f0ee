//! Trajectory file decoding and encoding

use crate::error::{DataError, MalformedReason};
use crate::naming::TrajectoryName;
use crate::rts::{RECORD_FIELDS, TrajectoryRecord};
use crate::types::{Trajectory, TrajectoryHeader};
use std::path::Path;
use tracing::{debug, info};

/// Number of `f64` values preceding the first record.
pub const HEADER_VALUES: usize = 4;

const VALUE_BYTES: usize = std::mem::size_of::<f64>();
const HEADER_BYTES: usize = HEADER_VALUES * VALUE_BYTES;
const RECORD_BYTES: usize = RECORD_FIELDS * VALUE_BYTES;

/// Decode the raw contents of a trajectory file.
///
/// The file is a flat sequence of native-endian `f64` values: a 4-value
/// header (rock mass followed by three reserved values) and then consecutive
/// 26-value timestep records. `path` is only used for error context.
pub fn decode_trajectory(
    bytes: &[u8],
    path: &Path,
) -> Result<(TrajectoryHeader, Vec<TrajectoryRecord>), DataError> {
    let malformed = |byte_offset, reason| DataError::MalformedTrajectoryFile {
        path: path.to_path_buf(),
        byte_offset,
        reason,
    };

    if bytes.len() % VALUE_BYTES != 0 {
        let aligned = bytes.len() - bytes.len() % VALUE_BYTES;
        return Err(malformed(
            aligned,
            MalformedReason::UnalignedLength(bytes.len()),
        ));
    }

    let value_count = bytes.len() / VALUE_BYTES;
    if value_count < HEADER_VALUES {
        return Err(malformed(0, MalformedReason::TruncatedHeader(value_count)));
    }

    let payload = &bytes[HEADER_BYTES..];
    let payload_values = value_count - HEADER_VALUES;
    if payload_values % RECORD_FIELDS != 0 {
        let complete = payload.len() / RECORD_BYTES;
        return Err(malformed(
            HEADER_BYTES + complete * RECORD_BYTES,
            MalformedReason::PartialRecord {
                values: payload_values,
            },
        ));
    }
    if payload.is_empty() {
        return Err(malformed(HEADER_BYTES, MalformedReason::NoRecords));
    }

    let header_values: [f64; HEADER_VALUES] = bytemuck::pod_read_unaligned(&bytes[..HEADER_BYTES]);
    let header = TrajectoryHeader {
        mass: header_values[0],
        reserved: [header_values[1], header_values[2], header_values[3]],
    };

    let records: Vec<TrajectoryRecord> = payload
        .chunks_exact(RECORD_BYTES)
        .map(bytemuck::pod_read_unaligned)
        .collect();

    debug!(
        "Decoded {} records (mass {} kg) from {}",
        records.len(),
        header.mass,
        path.display()
    );

    Ok((header, records))
}

/// Read and decode a trajectory file.
///
/// When `label` is `None` the label is taken from the `_Pos` filename suffix.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load_trajectory(path: &Path, label: Option<&str>) -> Result<Trajectory, DataError> {
    let bytes = std::fs::read(path).map_err(|e| DataError::io(path, e))?;
    let (header, records) = decode_trajectory(&bytes, path)?;

    let label = match label {
        Some(label) => label.to_string(),
        None => TrajectoryName::from_path(path).label,
    };

    info!(
        "Loaded trajectory '{}': {} timesteps, mass {} kg",
        label,
        records.len(),
        header.mass
    );

    let trajectory = Trajectory::new(label, header, records);
    debug!(
        "Trajectory '{}' travels {:.2} m",
        trajectory.label,
        trajectory.path_length()
    );
    Ok(trajectory)
}

/// Encode a header and records into the on-disk layout read by [`decode_trajectory`].
pub fn encode_trajectory(header: &TrajectoryHeader, records: &[TrajectoryRecord]) -> Vec<u8> {
    let header_values = [
        header.mass,
        header.reserved[0],
        header.reserved[1],
        header.reserved[2],
    ];

    let mut bytes = Vec::with_capacity(HEADER_BYTES + records.len() * RECORD_BYTES);
    bytes.extend_from_slice(bytemuck::bytes_of(&header_values));
    bytes.extend_from_slice(bytemuck::cast_slice(records));
    bytes
}
