//! Name-to-task dispatch.
//!
//! The host engine addresses tasks by symbolic name with zero or one string
//! argument. [`TaskCatalog`] owns the workshop tuning and turns a
//! `(name, arg)` pair into a ready task instance, or ticks one immediately
//! for hosts that rebuild leaves every tick.

use core::fmt;
use core::str::FromStr;

use docbot_core::{Action, ActionKey, ActionStatus, Blackboard, TickContext};
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::WorkshopConfig;
use crate::tasks::{
    AttemptRepairTask, ChanceCheckTask, CleanMessTask, ConveyorMoveToTask, CreateMessTask,
    CustomerNearTask, DebugLogTask, DischargeCustomerTask, ErrorsNotMaxedTask, IncrementUniversalErrorsTask,
    IndicateTask, MoveToTask, ResetUniversalErrorsTask, ServingTask, TallySide,
};
use crate::world::{IndicatorColor, WorkshopMut};

/// Every task name the catalog answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TaskName {
    MoveTo,
    ConveyorMoveTo,
    Idle,
    CheckCustomer,
    Serving,
    CheckIfFunctional,
    CheckIfRepairable,
    AttemptRepair,
    CreateMess,
    CleanMess,
    DischargeCustomer,
    LocalErrorsNotMaxed,
    UniversalErrorsNotMaxed,
    IncrementUniversalErrors,
    ResetUniversalErrors,
    IndicateGreen,
    IndicateYellow,
    IndicateRed,
    DebugLog,
}

impl TaskName {
    pub const ALL: [TaskName; 19] = [
        TaskName::MoveTo,
        TaskName::ConveyorMoveTo,
        TaskName::Idle,
        TaskName::CheckCustomer,
        TaskName::Serving,
        TaskName::CheckIfFunctional,
        TaskName::CheckIfRepairable,
        TaskName::AttemptRepair,
        TaskName::CreateMess,
        TaskName::CleanMess,
        TaskName::DischargeCustomer,
        TaskName::LocalErrorsNotMaxed,
        TaskName::UniversalErrorsNotMaxed,
        TaskName::IncrementUniversalErrors,
        TaskName::ResetUniversalErrors,
        TaskName::IndicateGreen,
        TaskName::IndicateYellow,
        TaskName::IndicateRed,
        TaskName::DebugLog,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskName::MoveTo => "MoveTo",
            TaskName::ConveyorMoveTo => "ConveyorMoveTo",
            TaskName::Idle => "Idle",
            TaskName::CheckCustomer => "CheckCustomer",
            TaskName::Serving => "Serving",
            TaskName::CheckIfFunctional => "CheckIfFunctional",
            TaskName::CheckIfRepairable => "CheckIfRepairable",
            TaskName::AttemptRepair => "AttemptRepair",
            TaskName::CreateMess => "CreateMess",
            TaskName::CleanMess => "CleanMess",
            TaskName::DischargeCustomer => "DischargeCustomer",
            TaskName::LocalErrorsNotMaxed => "LocalErrorsNotMaxed",
            TaskName::UniversalErrorsNotMaxed => "UniversalErrorsNotMaxed",
            TaskName::IncrementUniversalErrors => "IncrementUniversalErrors",
            TaskName::ResetUniversalErrors => "ResetUniversalErrors",
            TaskName::IndicateGreen => "IndicateGreen",
            TaskName::IndicateYellow => "IndicateYellow",
            TaskName::IndicateRed => "IndicateRed",
            TaskName::DebugLog => "DebugLog",
        }
    }

    pub fn as_key(self) -> ActionKey {
        ActionKey(self.as_str())
    }

    /// Whether the task consumes the one-string-argument slot.
    pub fn takes_arg(self) -> bool {
        matches!(
            self,
            TaskName::MoveTo
                | TaskName::ConveyorMoveTo
                | TaskName::IndicateGreen
                | TaskName::IndicateYellow
                | TaskName::IndicateRed
                | TaskName::DebugLog
        )
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskName {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| TaskError::UnknownTask(s.to_owned()))
    }
}

/// One engine invocation: a name plus its optional string argument.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskSpec {
    pub name: TaskName,
    #[cfg_attr(feature = "serde", serde(default))]
    pub arg: Option<String>,
}

impl TaskSpec {
    pub fn new(name: TaskName) -> Self {
        Self { name, arg: None }
    }

    pub fn with_arg(name: TaskName, arg: impl Into<String>) -> Self {
        Self {
            name,
            arg: Some(arg.into()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("unknown task name `{0}`")]
    UnknownTask(String),
    #[error("task `{0}` requires an argument")]
    MissingArgument(TaskName),
    #[error("task `{0}` takes no argument")]
    UnexpectedArgument(TaskName),
}

/// The full leaf catalog, parameterized by workshop tuning.
#[derive(Debug, Clone, Default)]
pub struct TaskCatalog {
    config: WorkshopConfig,
}

impl TaskCatalog {
    pub fn new(config: WorkshopConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkshopConfig {
        &self.config
    }

    /// Build a fresh task instance for `spec`.
    ///
    /// Instances carry no durable state, so hosts may rebuild them every
    /// tick or keep one alive across ticks via `ActionRuntime`; both read
    /// and write the same blackboard keys.
    pub fn instantiate<W>(&self, spec: &TaskSpec) -> Result<Box<dyn Action<W>>, TaskError>
    where
        W: WorkshopMut + 'static,
    {
        let arg = self.check_arg(spec)?;
        let cfg = &self.config;

        let action: Box<dyn Action<W>> = match spec.name {
            TaskName::MoveTo => Box::new(MoveToTask::new(arg, cfg.stop_distance)),
            TaskName::ConveyorMoveTo => {
                Box::new(ConveyorMoveToTask::new(arg, cfg.spawn_offset))
            }
            TaskName::Idle | TaskName::CheckCustomer => {
                Box::new(CustomerNearTask::new(cfg.interaction_distance))
            }
            TaskName::Serving => Box::new(ServingTask),
            TaskName::CheckIfFunctional => Box::new(ChanceCheckTask::functional(cfg.odds)),
            TaskName::CheckIfRepairable => Box::new(ChanceCheckTask::repairable(cfg.odds)),
            TaskName::AttemptRepair => Box::new(AttemptRepairTask::new(cfg)),
            TaskName::CreateMess => Box::new(CreateMessTask),
            TaskName::CleanMess => Box::new(CleanMessTask),
            TaskName::DischargeCustomer => {
                Box::new(DischargeCustomerTask::new(cfg.interaction_distance))
            }
            TaskName::LocalErrorsNotMaxed => {
                Box::new(ErrorsNotMaxedTask::new(TallySide::Local, cfg))
            }
            TaskName::UniversalErrorsNotMaxed => {
                Box::new(ErrorsNotMaxedTask::new(TallySide::Universal, cfg))
            }
            TaskName::IncrementUniversalErrors => {
                Box::new(IncrementUniversalErrorsTask::new(cfg))
            }
            TaskName::ResetUniversalErrors => Box::new(ResetUniversalErrorsTask::new(cfg)),
            TaskName::IndicateGreen => Box::new(IndicateTask::new(arg, IndicatorColor::Green)),
            TaskName::IndicateYellow => Box::new(IndicateTask::new(arg, IndicatorColor::Yellow)),
            TaskName::IndicateRed => Box::new(IndicateTask::new(arg, IndicatorColor::Red)),
            TaskName::DebugLog => Box::new(DebugLogTask::new(arg)),
        };

        Ok(action)
    }

    /// Build and tick a task in one step, for hosts with no instance
    /// bookkeeping of their own.
    pub fn tick<W>(
        &self,
        spec: &TaskSpec,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Result<ActionStatus, TaskError>
    where
        W: WorkshopMut + 'static,
    {
        let mut action = self.instantiate::<W>(spec)?;
        Ok(action.tick(ctx, agent, world, blackboard))
    }

    fn check_arg<'a>(&self, spec: &'a TaskSpec) -> Result<&'a str, TaskError> {
        match (spec.name.takes_arg(), spec.arg.as_deref()) {
            (true, Some(arg)) => Ok(arg),
            (true, None) => Err(TaskError::MissingArgument(spec.name)),
            (false, Some(_)) => Err(TaskError::UnexpectedArgument(spec.name)),
            (false, None) => Ok(""),
        }
    }
}
