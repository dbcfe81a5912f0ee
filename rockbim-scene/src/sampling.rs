//! Distance-based selection of the timesteps to render.
//!
//! Simulations dump records at a fixed time step, so slow sections of a path
//! produce dense clusters of near-identical rocks. The filter here only keeps
//! a record once the rock has travelled more than the gap length since the
//! last kept one, which bounds the output by path length instead of
//! timestep count.

use crate::error::SceneError;
use glam::DVec3;
use rockbim_data::TrajectoryRecord;
use std::ops::RangeInclusive;
use tracing::warn;

/// Gap lengths outside this range are accepted but usually a mistake.
pub const RECOMMENDED_GAP_RANGE: RangeInclusive<f64> = 0.1..=10.0;

/// Minimum travel distance between consecutively rendered rocks.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct GapLength(f64);

impl GapLength {
    pub const DEFAULT: GapLength = GapLength(2.0);

    pub fn new(value: f64) -> Result<Self, SceneError> {
        if !value.is_finite() || value < 0.0 {
            return Err(SceneError::InvalidGapLength(value));
        }
        if !RECOMMENDED_GAP_RANGE.contains(&value) {
            warn!(
                "Gap length {} is outside the recommended range {:?}",
                value, RECOMMENDED_GAP_RANGE
            );
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for GapLength {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A timestep selected for output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderEvent<'a> {
    /// Position of the record in its trajectory.
    pub index: usize,
    pub record: &'a TrajectoryRecord,
}

/// Lazily select the records of one trajectory that get a rock instance.
///
/// The last rendered position starts at the origin, not at the first record,
/// so the first record is emitted whenever it lies farther than the gap from
/// the origin. A record is emitted when it lies strictly farther than `gap`
/// from the last emitted one. The final record is always emitted.
pub fn render_events(
    records: &[TrajectoryRecord],
    gap: GapLength,
) -> impl Iterator<Item = RenderEvent<'_>> + '_ {
    let last_index = records.len().saturating_sub(1);

    records
        .iter()
        .enumerate()
        .scan(DVec3::ZERO, move |last_rendered, (index, record)| {
            let position = record.position();
            let emit = position.distance(*last_rendered) > gap.0 || index == last_index;
            if emit {
                *last_rendered = position;
            }
            Some(emit.then_some(RenderEvent { index, record }))
        })
        .flatten()
}
