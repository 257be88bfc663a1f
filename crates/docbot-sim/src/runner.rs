//! Linear script runner.
//!
//! Drives a scenario's task script the way the external engine would drive a
//! tree branch: one invocation per tick, re-invoking while Running, moving to
//! the next step on Success. A Failure stops the script (there is no tree
//! here to branch to), and the tick budget bounds the whole run.

use std::collections::BTreeMap;

use docbot_core::{ActionOutcome, ActionRuntime, Blackboard, TickContext};
use docbot_tasks::{TaskCatalog, TaskError, TaskSpec};
use docbot_tools::{TraceLog, TRACE_LOG};

use crate::scenario::{Scenario, AGENT};
use crate::world::WorkshopWorld;

#[derive(Debug, Clone)]
pub struct StepReport {
    pub spec: TaskSpec,
    pub outcome: ActionOutcome,
    pub started_tick: u64,
    pub finished_tick: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every step reported Success.
    Completed,
    /// The step at this index reported Failure; later steps never ran.
    StepFailed { step: usize },
    /// The tick budget ran out inside this step; its instance was cancelled.
    OutOfTicks { step: usize },
}

#[derive(Debug)]
pub struct RunReport {
    pub steps: Vec<StepReport>,
    pub ticks_used: u64,
    pub outcome: RunOutcome,
    pub trace: TraceLog,
    /// World state at the end of the run, for post-run inspection.
    pub world: WorkshopWorld,
}

impl RunReport {
    pub fn completed(&self) -> bool {
        self.outcome == RunOutcome::Completed
    }
}

pub struct ScriptRunner {
    catalog: TaskCatalog,
}

impl ScriptRunner {
    pub fn new(catalog: TaskCatalog) -> Self {
        Self { catalog }
    }

    pub fn run(&self, scenario: &Scenario) -> Result<RunReport, TaskError> {
        let mut world = scenario.build_world();
        let mut blackboard = Blackboard::new();
        blackboard.set(TRACE_LOG, TraceLog::default());
        let mut runtime = ActionRuntime::<WorkshopWorld>::default();

        let inputs: BTreeMap<u64, _> = scenario
            .inputs
            .iter()
            .map(|event| (event.tick, event.signal))
            .collect();
        let player_moves: BTreeMap<u64, _> = scenario
            .player_moves
            .iter()
            .map(|event| (event.tick, event.position))
            .collect();

        tracing::info!(
            name = %scenario.name,
            seed = scenario.seed,
            steps = scenario.script.len(),
            "running scenario"
        );

        let mut tick: u64 = 0;
        let mut steps = Vec::with_capacity(scenario.script.len());
        let mut outcome = RunOutcome::Completed;

        'script: for (index, spec) in scenario.script.iter().enumerate() {
            let started_tick = tick;

            loop {
                let ctx = TickContext {
                    tick,
                    dt_seconds: scenario.dt_seconds,
                    seed: scenario.seed,
                };

                if tick >= scenario.max_ticks {
                    runtime.cancel_current(&ctx, AGENT, &mut world, &mut blackboard);
                    outcome = RunOutcome::OutOfTicks { step: index };
                    break 'script;
                }

                if let Some(position) = player_moves.get(&tick) {
                    world.set_player_position(*position);
                }
                if let Some(signal) = inputs.get(&tick) {
                    world.press(*signal);
                }

                if !runtime.is_running(spec.name.as_key()) {
                    let action = self.catalog.instantiate::<WorkshopWorld>(spec)?;
                    runtime.ensure_current(
                        spec.name.as_key(),
                        move |_, _, _, _| action,
                        &ctx,
                        AGENT,
                        &mut world,
                        &mut blackboard,
                    );
                }

                let finished = runtime.tick(&ctx, AGENT, &mut world, &mut blackboard);
                world.advance(scenario.dt_seconds);
                tick += 1;

                if let Some(step_outcome) = finished {
                    tracing::debug!(
                        step = index,
                        task = %spec.name,
                        outcome = ?step_outcome,
                        ticks = tick - started_tick,
                        "step finished"
                    );
                    steps.push(StepReport {
                        spec: spec.clone(),
                        outcome: step_outcome,
                        started_tick,
                        finished_tick: tick - 1,
                    });
                    if step_outcome == ActionOutcome::Failure {
                        outcome = RunOutcome::StepFailed { step: index };
                        break 'script;
                    }
                    break;
                }
            }
        }

        let trace = blackboard.remove(TRACE_LOG).unwrap_or_default();
        Ok(RunReport {
            steps,
            ticks_used: tick,
            outcome,
            trace,
            world,
        })
    }
}

/// Run a scenario with a catalog built from its own workshop tuning.
pub fn run_scenario(scenario: &Scenario) -> Result<RunReport, TaskError> {
    ScriptRunner::new(TaskCatalog::new(scenario.workshop.clone())).run(scenario)
}
