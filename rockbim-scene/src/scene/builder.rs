//! Scene assembly from trajectories

use crate::color::{ColorMode, ColorScheme};
use crate::error::SceneError;
use crate::orientation::Orientation;
use crate::sampling::{GapLength, RenderEvent, render_events};
use crate::scene::model::{
    Placement, ProjectInfo, RockInstance, RockProperties, Scene, TrajectoryGroup,
};
use rayon::prelude::*;
use rockbim_data::{RockGeometry, Trajectory};
use tracing::{debug, info};

/// Builder for a [`Scene`].
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    scenario: String,
    project: ProjectInfo,
    gap: GapLength,
    color_mode: ColorMode,
}

impl SceneBuilder {
    pub fn new(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            project: ProjectInfo::default(),
            gap: GapLength::default(),
            color_mode: ColorMode::default(),
        }
    }

    pub fn with_project(mut self, project: ProjectInfo) -> Self {
        self.project = project;
        self
    }

    pub fn with_gap_length(mut self, gap: GapLength) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    /// Sample, colour and place every trajectory.
    ///
    /// Groups keep the order of `trajectories`; instances within a group are
    /// time-ascending.
    pub fn build(self, rock: RockGeometry, trajectories: &[Trajectory]) -> Result<Scene, SceneError> {
        if trajectories.is_empty() {
            return Err(SceneError::MissingInput("at least one trajectory"));
        }

        let scheme = ColorScheme::resolve(self.color_mode, trajectories)?;
        if let ColorScheme::Gradient { metric, scale } = &scheme {
            info!("Colouring by {} (maximum {})", metric, scale.max());
        }

        let gap = self.gap;
        let groups: Vec<TrajectoryGroup> = trajectories
            .par_iter()
            .map(|trajectory| build_group(trajectory, gap, &scheme))
            .collect();

        let scene = Scene {
            scenario: self.scenario,
            project: self.project,
            rock,
            color_mode: self.color_mode,
            groups,
        };

        info!(
            "Scene '{}': {} trajectories, {} rock instances, {} colours",
            scene.scenario,
            scene.groups.len(),
            scene.instance_count(),
            scene.distinct_colors()
        );

        Ok(scene)
    }
}

fn build_group(trajectory: &Trajectory, gap: GapLength, scheme: &ColorScheme) -> TrajectoryGroup {
    let instances: Vec<RockInstance> = render_events(&trajectory.records, gap)
        .map(|event| instance_for(event, scheme))
        .collect();

    debug!(
        "Trajectory '{}': {} of {} timesteps rendered",
        trajectory.label,
        instances.len(),
        trajectory.records.len()
    );

    TrajectoryGroup {
        label: trajectory.label.clone(),
        mass: trajectory.mass,
        instances,
    }
}

fn instance_for(event: RenderEvent<'_>, scheme: &ColorScheme) -> RockInstance {
    let record = event.record;
    let [w, x, y, z] = record.quaternion_wxyz();

    RockInstance {
        name: format!("t = {:?} s", (record.time() * 1000.0).round() / 1000.0),
        record_index: event.index,
        time: record.time(),
        placement: Placement {
            origin: record.position(),
            orientation: Orientation::from_wxyz(w, x, y, z),
        },
        color: scheme.color_for(record),
        properties: RockProperties {
            kinetic_energy_kj: record.kinetic_energy() / 1000.0,
            jump_height_m: record.jump_height(),
            speed_m_s: record.speed(),
        },
    }
}
