use docbot_core::{WorldMut, WorldView};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Discrete input signal, polled once per tick.
///
/// The host's input device layer is a collaborator; the task layer only sees
/// edge-triggered signals. `Other` stands for "any other key" and satisfies
/// the discharge prompt without confirming or denying anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InputSignal {
    Confirm,
    Deny,
    Other,
}

/// Station indicator palette. Written by the Indicate* tasks, read only by
/// the human player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IndicatorColor {
    Green,
    Yellow,
    Red,
}

/// Read-only workshop queries.
///
/// Tag and waypoint resolution is an injected registry; a missing name is a
/// typed `None`, never a fault. All lookups that can fail look like that.
pub trait WorkshopView: WorldView {
    fn agent_position(&self, agent: Self::Agent) -> Option<Vec3>;

    /// Position of the (single) player/customer entity.
    fn player_position(&self) -> Option<Vec3>;

    /// Resolve a scene tag to the tagged entity's current position.
    fn tagged_position(&self, tag: &str) -> Option<Vec3>;

    /// Resolve a conveyor waypoint name to its world position.
    fn waypoint(&self, name: &str) -> Option<Vec3>;

    /// Number of part slots on the spare-part shelf (active or not).
    fn shelf_part_count(&self) -> usize;

    fn mess_present(&self) -> bool;
}

/// Workshop effects.
pub trait WorkshopMut: WorldMut + WorkshopView {
    /// Ask the host's movement system to steer the agent toward
    /// `destination`. Steering, avoidance, and pathing are the host's
    /// business; the task layer only issues and cancels the command.
    fn command_move(&mut self, agent: Self::Agent, destination: Vec3);

    fn cancel_move(&mut self, agent: Self::Agent);

    /// Teleport the patient entity to `position` and activate it.
    fn stage_patient(&mut self, position: Vec3);

    /// Make the tagged indicator visible with the given color. Returns false
    /// when no indicator carries the tag.
    fn set_indicator(&mut self, tag: &str, color: IndicatorColor) -> bool;

    fn set_mess(&mut self, present: bool);

    /// Deactivate the shelf part at `index`. Deactivating an already-inactive
    /// part is a no-op.
    fn deactivate_shelf_part(&mut self, index: usize);

    /// Take this tick's input signal, if any. Consuming: at most one signal
    /// is delivered per tick.
    fn take_input(&mut self) -> Option<InputSignal>;
}
