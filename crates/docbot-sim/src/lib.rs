//! Reference workshop simulation.
//!
//! Everything the task layer treats as an external collaborator (entity
//! registry, movement system, input source, the conveyor) implemented as a
//! small deterministic world, plus YAML scenarios and a scripted runner that
//! stands in for the behavior-tree engine.

#![forbid(unsafe_code)]

pub mod runner;
pub mod scenario;
pub mod world;

pub use runner::{run_scenario, RunOutcome, RunReport, ScriptRunner, StepReport};
pub use scenario::{ConveyorSpec, InputEvent, PlayerMove, Scenario, SceneLayout, AGENT};
pub use world::{ConveyorBelt, Indicator, Patient, WorkshopWorld};
