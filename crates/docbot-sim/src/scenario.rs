//! Scenario files: scene layout, tuning, input schedule, and task script.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use docbot_tasks::{InputSignal, TaskName, TaskSpec, Vec3, WorkshopConfig};

use crate::world::{ConveyorBelt, WorkshopWorld};

/// A complete, self-contained run description, loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Display name, used only in logs and summaries.
    pub name: String,

    /// Scenario seed; all in-run randomness derives from it.
    pub seed: u64,

    /// Fixed simulation step.
    pub dt_seconds: f32,

    /// Hard tick budget for the whole script.
    pub max_ticks: u64,

    /// Workshop tuning handed to the task catalog.
    pub workshop: WorkshopConfig,

    /// Scene layout used to build the reference world.
    pub scene: SceneLayout,

    /// The linear task script the runner drives.
    pub script: Vec<TaskSpec>,

    /// Scheduled input signals, by absolute tick.
    pub inputs: Vec<InputEvent>,

    /// Scheduled player teleports, by absolute tick. Stands in for the
    /// player's own controller, which is not simulated.
    pub player_moves: Vec<PlayerMove>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: String::new(),
            seed: 0,
            dt_seconds: 0.1,
            max_ticks: 1_000,
            workshop: WorkshopConfig::default(),
            scene: SceneLayout::default(),
            script: Vec::new(),
            inputs: Vec::new(),
            player_moves: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneLayout {
    pub agent: Vec3,
    pub agent_speed: f32,
    pub player: Option<Vec3>,
    pub tags: BTreeMap<String, Vec3>,
    pub waypoints: BTreeMap<String, Vec3>,
    pub indicators: Vec<String>,
    pub shelf_parts: usize,
    pub conveyor: Option<ConveyorSpec>,
}

impl Default for SceneLayout {
    fn default() -> Self {
        Self {
            agent: Vec3::ZERO,
            agent_speed: 10.0,
            player: None,
            tags: BTreeMap::new(),
            waypoints: BTreeMap::new(),
            indicators: Vec::new(),
            shelf_parts: 0,
            conveyor: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConveyorSpec {
    pub waypoint: String,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InputEvent {
    pub tick: u64,
    pub signal: InputSignal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerMove {
    pub tick: u64,
    pub position: Vec3,
}

/// The agent id the reference runner drives. Scenarios describe a single
/// workshop station, so one well-known id is enough.
pub const AGENT: u64 = 1;

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario from {}", path.display()))?;
        let scenario: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse scenario from {}", path.display()))?;
        Ok(scenario)
    }

    /// Build the reference world this scenario describes.
    pub fn build_world(&self) -> WorkshopWorld {
        let mut world = WorkshopWorld::new();
        world.insert_agent(AGENT, self.scene.agent, self.scene.agent_speed);

        if let Some(player) = self.scene.player {
            world.set_player_position(player);
        }
        for (tag, position) in &self.scene.tags {
            world.insert_tag(tag.clone(), *position);
        }
        for (name, position) in &self.scene.waypoints {
            world.insert_waypoint(name.clone(), *position);
        }
        for tag in &self.scene.indicators {
            world.insert_indicator(tag.clone());
        }
        world.set_shelf_parts(self.scene.shelf_parts);

        if let Some(conveyor) = &self.scene.conveyor {
            world.set_belt(ConveyorBelt {
                waypoint: conveyor.waypoint.clone(),
                speed: conveyor.speed,
            });
        }

        world
    }

    /// Static lint of the scenario: argument shape per task, and every name
    /// the script mentions must resolve in the scene. Returns one message per
    /// problem; an empty list means the scenario is runnable.
    pub fn lint(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (index, spec) in self.script.iter().enumerate() {
            match (spec.name.takes_arg(), spec.arg.as_deref()) {
                (true, None) => {
                    problems.push(format!("step {index}: {} requires an argument", spec.name));
                }
                (false, Some(arg)) => {
                    problems.push(format!(
                        "step {index}: {} takes no argument (got `{arg}`)",
                        spec.name
                    ));
                }
                _ => {}
            }

            let Some(arg) = spec.arg.as_deref() else {
                continue;
            };
            match spec.name {
                TaskName::MoveTo if !self.scene.tags.contains_key(arg) => {
                    problems.push(format!("step {index}: tag `{arg}` is not in the scene"));
                }
                TaskName::ConveyorMoveTo if !self.scene.waypoints.contains_key(arg) => {
                    problems.push(format!(
                        "step {index}: waypoint `{arg}` is not in the scene"
                    ));
                }
                TaskName::IndicateGreen | TaskName::IndicateYellow | TaskName::IndicateRed
                    if !self.scene.indicators.iter().any(|tag| tag == arg) =>
                {
                    problems.push(format!(
                        "step {index}: indicator `{arg}` is not in the scene"
                    ));
                }
                _ => {}
            }
        }

        if let Some(conveyor) = &self.scene.conveyor {
            if !self.scene.waypoints.contains_key(&conveyor.waypoint) {
                problems.push(format!(
                    "conveyor waypoint `{}` is not in the scene",
                    conveyor.waypoint
                ));
            }
        }

        problems
    }
}
