//! Per-timestep trajectory record

use bytemuck::{Pod, Zeroable};
use glam::DVec3;

/// Number of `f64` values in one timestep record.
pub const RECORD_FIELDS: usize = 26;

/// Positional field offsets inside a [`TrajectoryRecord`].
///
/// Offsets not listed here are simulation scalars that are carried through
/// untouched and can be read with [`TrajectoryRecord::get`].
pub mod field {
    pub const TIME: usize = 0;
    pub const POSITION: usize = 1;
    pub const QUATERNION: usize = 4;
    pub const VELOCITY: usize = 8;
    pub const KINETIC_ENERGY: usize = 15;
    pub const REFERENCE_HEIGHT: usize = 18;
}

/// One timestep of a simulated rock, exactly as stored on disk.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TrajectoryRecord(pub [f64; RECORD_FIELDS]);

impl TrajectoryRecord {
    /// Raw value at a positional offset.
    pub fn get(&self, offset: usize) -> Option<f64> {
        self.0.get(offset).copied()
    }

    /// Elapsed simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.0[field::TIME]
    }

    /// Centre of mass in world coordinates.
    pub fn position(&self) -> DVec3 {
        self.vec3_at(field::POSITION)
    }

    /// Orientation quaternion as stored, `(w, x, y, z)`.
    pub fn quaternion_wxyz(&self) -> [f64; 4] {
        let q = field::QUATERNION;
        [self.0[q], self.0[q + 1], self.0[q + 2], self.0[q + 3]]
    }

    pub fn velocity(&self) -> DVec3 {
        self.vec3_at(field::VELOCITY)
    }

    /// Magnitude of the velocity vector (m/s).
    pub fn speed(&self) -> f64 {
        self.velocity().length()
    }

    /// Kinetic energy in joules.
    pub fn kinetic_energy(&self) -> f64 {
        self.0[field::KINETIC_ENERGY]
    }

    /// Height of the rock above its reference height (m).
    pub fn jump_height(&self) -> f64 {
        self.0[field::POSITION + 2] - self.0[field::REFERENCE_HEIGHT]
    }

    fn vec3_at(&self, offset: usize) -> DVec3 {
        DVec3::new(self.0[offset], self.0[offset + 1], self.0[offset + 2])
    }
}

impl Default for TrajectoryRecord {
    fn default() -> Self {
        Self::zeroed()
    }
}
