//! RAMMS::Rockfall trajectory (`.rts`) decoding

mod decoder;
mod record;

pub use decoder::{HEADER_VALUES, decode_trajectory, encode_trajectory, load_trajectory};
pub use record::{RECORD_FIELDS, TrajectoryRecord, field};
