//! DocBot workshop leaf-task catalog.
//!
//! The repair-shop agent's behavior is owned by an external behavior-tree
//! engine; this crate supplies the leaves the engine invokes by symbolic
//! name: movement, customer interaction, diagnosis and repair gambles,
//! conveyor staging, mess handling, and outcome indicators. Every task
//! reports a tri-state [`docbot_core::ActionStatus`] and keeps its durable
//! state in the world or on the blackboard.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod chance;
pub mod config;
pub mod counter;
pub mod math;
pub mod tasks;
pub mod world;

pub use catalog::{TaskCatalog, TaskError, TaskName, TaskSpec};
pub use chance::RepairOdds;
pub use config::WorkshopConfig;
pub use counter::ThresholdCounter;
pub use math::Vec3;
pub use tasks::{
    customer_in_range, AttemptRepairTask, ChanceCheckTask, CleanMessTask, ConveyorMoveToTask,
    CreateMessTask, CustomerNearTask, DebugLogTask, DischargeCustomerTask, ErrorTally,
    ErrorsNotMaxedTask, IncrementUniversalErrorsTask, IndicateTask, MoveToTask,
    ResetUniversalErrorsTask, ServingTask, TallySide, ERROR_TALLY, NAV_TARGET, RNG_OVERRIDE,
};
pub use world::{IndicatorColor, InputSignal, WorkshopMut, WorkshopView};
