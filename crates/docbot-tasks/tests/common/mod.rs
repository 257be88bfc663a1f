//! Shared test double for the workshop world traits. Records every effect a
//! task issues so assertions can check both outcomes and side effects.

#![allow(dead_code)]

use std::collections::BTreeMap;

use docbot_core::{TickContext, WorldMut, WorldView};
use docbot_tasks::{IndicatorColor, InputSignal, Vec3, WorkshopMut, WorkshopView};

#[derive(Default)]
pub struct TestWorld {
    pub agent_pos: Option<Vec3>,
    pub player_pos: Option<Vec3>,
    pub tags: BTreeMap<String, Vec3>,
    pub waypoints: BTreeMap<String, Vec3>,
    pub indicators: BTreeMap<String, Option<IndicatorColor>>,
    pub shelf: Vec<bool>,
    pub mess: bool,
    pub patient_pos: Option<Vec3>,
    pub patient_active: bool,
    pub input: Option<InputSignal>,
    pub move_commands: Vec<(u64, Vec3)>,
    pub cancels: Vec<u64>,
}

impl TestWorld {
    pub fn with_agent_at(position: Vec3) -> Self {
        Self {
            agent_pos: Some(position),
            ..Self::default()
        }
    }

    pub fn add_tag(&mut self, tag: &str, position: Vec3) {
        self.tags.insert(tag.to_owned(), position);
    }

    pub fn add_waypoint(&mut self, name: &str, position: Vec3) {
        self.waypoints.insert(name.to_owned(), position);
    }

    pub fn add_indicator(&mut self, tag: &str) {
        self.indicators.insert(tag.to_owned(), None);
    }
}

impl WorldView for TestWorld {
    type Agent = u64;
}

impl WorldMut for TestWorld {}

impl WorkshopView for TestWorld {
    fn agent_position(&self, _agent: u64) -> Option<Vec3> {
        self.agent_pos
    }

    fn player_position(&self) -> Option<Vec3> {
        self.player_pos
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

impl WorkshopMut for TestWorld {
    fn command_move(&mut self, agent: u64, destination: Vec3) {
        self.move_commands.push((agent, destination));
    }

    fn cancel_move(&mut self, agent: u64) {
        self.cancels.push(agent);
    }

    fn stage_patient(&mut self, position: Vec3) {
        self.patient_pos = Some(position);
        self.patient_active = true;
    }

    fn set_indicator(&mut self, tag: &str, color: IndicatorColor) -> bool {
        match self.indicators.get_mut(tag) {
            Some(slot) => {
                *slot = Some(color);
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
        self.input.take()
    }
}

pub const AGENT: u64 = 1;

pub fn ctx(tick: u64) -> TickContext {
    TickContext {
        tick,
        dt_seconds: 0.1,
        seed: 123,
    }
}
