//! Metric colouring of rock instances.
//!
//! Colouring runs in two passes: [`ColorScheme::resolve`] reduces every record
//! of every trajectory to the global maximum of the chosen metric, then
//! [`ColorScheme::color_for`] maps each rendered record onto a blue-to-red
//! gradient. Uniform mode skips both passes.

use crate::error::SceneError;
use rockbim_data::{Trajectory, TrajectoryRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::str::FromStr;

/// How rock instances are coloured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorMode {
    /// One grey for every instance.
    #[default]
    Uniform,
    #[serde(alias = "energy")]
    KineticEnergy,
    #[serde(alias = "height")]
    JumpHeight,
}

impl ColorMode {
    /// The metric driving the gradient, if any.
    pub fn metric(self) -> Option<Metric> {
        match self {
            ColorMode::Uniform => None,
            ColorMode::KineticEnergy => Some(Metric::KineticEnergy),
            ColorMode::JumpHeight => Some(Metric::JumpHeight),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColorMode::Uniform => "uniform",
            ColorMode::KineticEnergy => "kinetic-energy",
            ColorMode::JumpHeight => "jump-height",
        })
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uniform" => Ok(ColorMode::Uniform),
            "kinetic-energy" | "energy" => Ok(ColorMode::KineticEnergy),
            "jump-height" | "height" => Ok(ColorMode::JumpHeight),
            other => Err(format!(
                "unknown color mode '{other}' (expected uniform, kinetic-energy or jump-height)"
            )),
        }
    }
}

/// Scalar a gradient is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Kinetic energy in joules.
    KineticEnergy,
    /// Height above the record's reference height in metres.
    JumpHeight,
}

impl Metric {
    pub fn value(self, record: &TrajectoryRecord) -> f64 {
        match self {
            Metric::KineticEnergy => record.kinetic_energy(),
            Metric::JumpHeight => record.jump_height(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Metric::KineticEnergy => "kinetic energy",
            Metric::JumpHeight => "jump height",
        })
    }
}

/// Maximum of `metric` over all records of all trajectories.
///
/// Returns negative infinity when there are no records.
pub fn metric_max(trajectories: &[Trajectory], metric: Metric) -> f64 {
    trajectories
        .iter()
        .flat_map(|t| &t.records)
        .map(|r| metric.value(r))
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Normalisation of a metric against its global maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    max: f64,
}

impl ColorScale {
    /// Fails with [`SceneError::MetricRange`] unless `max` is finite and positive.
    pub fn new(metric: Metric, max: f64) -> Result<Self, SceneError> {
        if !max.is_finite() || max <= 0.0 {
            return Err(SceneError::MetricRange { metric, max });
        }
        Ok(Self { max })
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// `(1 - v/max)^2`, with `v/max` clamped to `[0, 1]`.
    ///
    /// 1.0 at or below zero, 0.0 at the maximum.
    pub fn intensity(&self, value: f64) -> f64 {
        let ratio = (value / self.max).clamp(0.0, 1.0);
        (1.0 - ratio).powi(2)
    }
}

/// Resolved colouring for a whole scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorScheme {
    Uniform,
    Gradient { metric: Metric, scale: ColorScale },
}

impl ColorScheme {
    /// First pass: find the metric range across all trajectories.
    pub fn resolve(mode: ColorMode, trajectories: &[Trajectory]) -> Result<Self, SceneError> {
        match mode.metric() {
            None => Ok(ColorScheme::Uniform),
            Some(metric) => {
                let max = metric_max(trajectories, metric);
                let scale = ColorScale::new(metric, max)?;
                Ok(ColorScheme::Gradient { metric, scale })
            }
        }
    }

    /// Second pass: colour of one rendered record.
    pub fn color_for(&self, record: &TrajectoryRecord) -> Rgb {
        match self {
            ColorScheme::Uniform => Rgb::UNIFORM,
            ColorScheme::Gradient { metric, scale } => {
                Rgb::gradient(scale.intensity(metric.value(record)))
            }
        }
    }
}

/// Linear RGB colour with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Rgb {
    pub const UNIFORM: Rgb = Rgb {
        red: 0.5,
        green: 0.5,
        blue: 0.5,
    };

    /// Red at intensity 0 (metric maximum), blue at intensity 1.
    pub fn gradient(intensity: f64) -> Self {
        Self {
            red: 1.0 - intensity,
            green: 0.0,
            blue: intensity,
        }
    }

    pub fn key(&self) -> ColorKey {
        let q = |c: f64| (c.clamp(0.0, 1.0) * ColorKey::STEPS).round() as u16;
        ColorKey([q(self.red), q(self.green), q(self.blue)])
    }

    pub fn to_u8(&self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.red), q(self.green), q(self.blue)]
    }
}

/// Colour quantised to 1/1000 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorKey(pub [u16; 3]);

impl ColorKey {
    const STEPS: f64 = 1000.0;
}

/// Shared per-colour resources, created on first use.
///
/// Instances whose colours quantise to the same key share one entry, so a
/// uniform scene ends up with exactly one.
#[derive(Debug)]
pub struct StyleCache<V> {
    entries: HashMap<ColorKey, V>,
}

impl<V: Copy> StyleCache<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get_or_insert_with(&mut self, color: Rgb, create: impl FnOnce(Rgb) -> V) -> V {
        match self.entries.entry(color.key()) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => *e.insert(create(color)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Copy> Default for StyleCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
