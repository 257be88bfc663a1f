//! Reference workshop world.
//!
//! A deterministic, in-memory stand-in for the host engine: entity registries
//! are plain `BTreeMap`s, navigation is straight-line integration toward a
//! commanded destination, and the conveyor is a fixed-speed follower. None of
//! this is pathfinding or physics; it exists so scenarios and tests can run
//! the task layer end to end without an engine.

use std::collections::BTreeMap;

use docbot_core::{WorldMut, WorldView};
use docbot_tasks::{IndicatorColor, InputSignal, Vec3, WorkshopMut, WorkshopView};

#[derive(Debug, Clone, Copy)]
struct AgentState {
    position: Vec3,
    destination: Option<Vec3>,
    speed: f32,
}

/// The patient robot on the conveyor line. Inactive until first staged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Patient {
    pub position: Vec3,
    pub active: bool,
}

/// A station indicator: hidden until an Indicate task lights it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Indicator {
    pub visible: bool,
    pub color: Option<IndicatorColor>,
}

/// Fixed-speed drift of the active patient toward a named waypoint, applied
/// once per [`WorkshopWorld::advance`]. The consolidated form of the belt
/// follower: staging teleports, the belt carries.
#[derive(Debug, Clone)]
pub struct ConveyorBelt {
    pub waypoint: String,
    pub speed: f32,
}

#[derive(Debug, Default)]
pub struct WorkshopWorld {
    agents: BTreeMap<u64, AgentState>,
    player: Option<Vec3>,
    tags: BTreeMap<String, Vec3>,
    waypoints: BTreeMap<String, Vec3>,
    indicators: BTreeMap<String, Indicator>,
    shelf: Vec<bool>,
    mess: bool,
    patient: Patient,
    belt: Option<ConveyorBelt>,
    pending_input: Option<InputSignal>,
}

impl WorkshopWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_agent(&mut self, agent: u64, position: Vec3, speed: f32) {
        self.agents.insert(
            agent,
            AgentState {
                position,
                destination: None,
                speed,
            },
        );
    }

    pub fn set_agent_position(&mut self, agent: u64, position: Vec3) {
        if let Some(state) = self.agents.get_mut(&agent) {
            state.position = position;
        }
    }

    pub fn set_player_position(&mut self, position: Vec3) {
        self.player = Some(position);
    }

    pub fn insert_tag(&mut self, tag: impl Into<String>, position: Vec3) {
        self.tags.insert(tag.into(), position);
    }

    pub fn insert_waypoint(&mut self, name: impl Into<String>, position: Vec3) {
        self.waypoints.insert(name.into(), position);
    }

    pub fn insert_indicator(&mut self, tag: impl Into<String>) {
        self.indicators.insert(tag.into(), Indicator::default());
    }

    pub fn set_shelf_parts(&mut self, count: usize) {
        self.shelf = vec![true; count];
    }

    pub fn set_belt(&mut self, belt: ConveyorBelt) {
        self.belt = Some(belt);
    }

    /// Inject this tick's input signal. Overwrites an unconsumed one; the
    /// input layer delivers at most one signal per tick.
    pub fn press(&mut self, signal: InputSignal) {
        self.pending_input = Some(signal);
    }

    pub fn patient(&self) -> Patient {
        self.patient
    }

    pub fn indicator(&self, tag: &str) -> Option<Indicator> {
        self.indicators.get(tag).copied()
    }

    pub fn shelf_active_count(&self) -> usize {
        self.shelf.iter().filter(|active| **active).count()
    }

    pub fn commanded_destination(&self, agent: u64) -> Option<Vec3> {
        self.agents.get(&agent).and_then(|state| state.destination)
    }

    /// Integrate one frame: agents step toward their commanded destinations,
    /// the belt drifts the active patient, and an unconsumed input signal
    /// expires.
    pub fn advance(&mut self, dt_seconds: f32) {
        let dt = dt_seconds.max(0.0);

        for state in self.agents.values_mut() {
            if let Some(destination) = state.destination {
                state.position = state
                    .position
                    .move_towards(destination, state.speed.max(0.0) * dt);
            }
        }

        if let Some(belt) = &self.belt {
            if self.patient.active {
                if let Some(target) = self.waypoints.get(&belt.waypoint) {
                    self.patient.position = self
                        .patient
                        .position
                        .move_towards(*target, belt.speed.max(0.0) * dt);
                }
            }
        }

        self.pending_input = None;
    }
}

impl WorldView for WorkshopWorld {
    type Agent = u64;
}

impl WorldMut for WorkshopWorld {}

impl WorkshopView for WorkshopWorld {
    fn agent_position(&self, agent: u64) -> Option<Vec3> {
        self.agents.get(&agent).map(|state| state.position)
    }

    fn player_position(&self) -> Option<Vec3> {
        self.player
    }

    fn tagged_position(&self, tag: &str) -> Option<Vec3> {
        self.tags.get(tag).copied()
    }

    fn waypoint(&self, name: &str) -> Option<Vec3> {
        self.waypoints.get(name).copied()
    }

    fn shelf_part_count(&self) -> usize {
        self.shelf.len()
    }

    fn mess_present(&self) -> bool {
        self.mess
    }
}

impl WorkshopMut for WorkshopWorld {
    fn command_move(&mut self, agent: u64, destination: Vec3) {
        if let Some(state) = self.agents.get_mut(&agent) {
            state.destination = Some(destination);
        }
    }

    fn cancel_move(&mut self, agent: u64) {
        if let Some(state) = self.agents.get_mut(&agent) {
            state.destination = None;
        }
    }

    fn stage_patient(&mut self, position: Vec3) {
        self.patient.position = position;
        self.patient.active = true;
    }

    fn set_indicator(&mut self, tag: &str, color: IndicatorColor) -> bool {
        match self.indicators.get_mut(tag) {
            Some(indicator) => {
                indicator.visible = true;
                indicator.color = Some(color);
                true
            }
            None => false,
        }
    }

    fn set_mess(&mut self, present: bool) {
        self.mess = present;
    }

    fn deactivate_shelf_part(&mut self, index: usize) {
        if let Some(active) = self.shelf.get_mut(index) {
            *active = false;
        }
    }

    fn take_input(&mut self) -> Option<InputSignal> {
        self.pending_input.take()
    }
}
