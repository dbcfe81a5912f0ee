//! Rock orientation from the simulation quaternion.

use glam::{DMat3, DQuat, DVec3};
use tracing::warn;

/// Quaternions shorter than this cannot be normalised meaningfully.
const MIN_QUATERNION_LENGTH: f64 = 1e-12;

/// Rigid rotation of a rock instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    rotation: DQuat,
}

impl Orientation {
    pub fn identity() -> Self {
        Self {
            rotation: DQuat::IDENTITY,
        }
    }

    /// Build from a `(w, x, y, z)` quaternion as stored in trajectory records.
    ///
    /// The quaternion is normalised first; a zero or non-finite quaternion
    /// falls back to the identity rotation.
    pub fn from_wxyz(w: f64, x: f64, y: f64, z: f64) -> Self {
        let q = DQuat::from_xyzw(x, y, z, w);
        let length = q.length();
        if !length.is_finite() || length < MIN_QUATERNION_LENGTH {
            warn!(
                "Invalid orientation quaternion ({}, {}, {}, {}), using identity",
                w, x, y, z
            );
            return Self::identity();
        }
        Self {
            rotation: q / length,
        }
    }

    /// Unit quaternion of this rotation.
    pub fn quaternion(&self) -> DQuat {
        self.rotation
    }

    /// Rotation matrix; its columns are the rotated global axes.
    pub fn matrix(&self) -> DMat3 {
        DMat3::from_quat(self.rotation)
    }

    /// The global X axis after rotation (placement reference direction).
    pub fn x_axis(&self) -> DVec3 {
        self.matrix().x_axis
    }

    /// The global Z axis after rotation (placement axis).
    pub fn z_axis(&self) -> DVec3 {
        self.matrix().z_axis
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}
