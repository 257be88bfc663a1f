//! Leaf task implementations.
//!
//! Tasks are per-invocation values: anything that must survive across ticks
//! (the navigation target, the error tallies) lives on the blackboard under
//! the keys exported here, so the host may rebuild a task instance every
//! tick without losing state.

use docbot_core::{
    Action, ActionStatus, BbKey, Blackboard, DeterministicRng, SplitMix64, TickContext,
};
use docbot_tools::{emit, TraceEvent};

use crate::chance::RepairOdds;
use crate::config::WorkshopConfig;
use crate::counter::ThresholdCounter;
use crate::math::Vec3;
use crate::world::{IndicatorColor, InputSignal, WorkshopMut, WorkshopView};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The agent's in-flight navigation target. Present iff a `MoveTo` is
/// underway; cleared on arrival and on cancellation.
pub const NAV_TARGET: BbKey<Vec3> = BbKey::new(0xD0CB_0700_0000_0001);

/// Local and universal error counters for the current visit.
pub const ERROR_TALLY: BbKey<ErrorTally> = BbKey::new(0xD0CB_0700_0000_0002);

/// Scripted randomness. When present, every chance site draws from this
/// source instead of the seed-derived generator, so a caller can dictate the
/// exact draw sequence a probabilistic task sees.
pub const RNG_OVERRIDE: BbKey<Box<dyn DeterministicRng>> = BbKey::new(0xD0CB_0700_0000_0003);

/// RNG stream constants. Each chance site draws from its own stream so the
/// sites stay independent under a shared scenario seed.
mod streams {
    pub const DIAGNOSIS: u64 = 0xD1A6_0001;
    pub const REPAIRABLE: u64 = 0xD1A6_0002;
    pub const REPAIR_LOOP: u64 = 0xD1A6_0003;
    pub const SHELF_PICK: u64 = 0xD1A6_0004;
}

/// The two retry budgets of a customer visit.
///
/// `local` gates one repair attempt and resets only when a repair succeeds.
/// `universal` spans the whole visit and is reset explicitly by the restock
/// flow (`ResetUniversalErrors`), never by a repair outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ErrorTally {
    pub local: ThresholdCounter,
    pub universal: ThresholdCounter,
}

impl ErrorTally {
    pub fn new(max_local: u32, max_universal: u32) -> Self {
        Self {
            local: ThresholdCounter::new(max_local),
            universal: ThresholdCounter::new(max_universal),
        }
    }
}

fn tally_mut(
    blackboard: &mut Blackboard,
    max_local: u32,
    max_universal: u32,
) -> &mut ErrorTally {
    blackboard.get_or_insert_with(ERROR_TALLY, || ErrorTally::new(max_local, max_universal))
}

/// Draw source for one chance site: the scripted override when the
/// blackboard carries one, otherwise a generator derived from the tick
/// context. The override is taken out of the blackboard for the duration of
/// the draws and handed back by [`ChanceSource::restore`], so its position
/// advances across sites and ticks.
struct ChanceSource {
    scripted: Option<Box<dyn DeterministicRng>>,
    fallback: SplitMix64,
}

impl ChanceSource {
    fn take<A: docbot_core::AgentId>(
        ctx: &TickContext,
        agent: A,
        stream: u64,
        blackboard: &mut Blackboard,
    ) -> Self {
        Self {
            scripted: blackboard.remove(RNG_OVERRIDE),
            fallback: ctx.tick_rng_for_agent(agent, stream),
        }
    }

    fn rng(&mut self) -> &mut dyn DeterministicRng {
        match self.scripted.as_deref_mut() {
            Some(scripted) => scripted,
            None => &mut self.fallback,
        }
    }

    fn restore(self, blackboard: &mut Blackboard) {
        if let Some(scripted) = self.scripted {
            blackboard.set(RNG_OVERRIDE, scripted);
        }
    }
}

/// True iff the player is within `interaction_distance` of the agent.
///
/// Pure: same positions and radius always yield the same answer, and nothing
/// is mutated. Missing entities count as out of range.
pub fn customer_in_range<W: WorkshopView>(
    world: &W,
    agent: W::Agent,
    interaction_distance: f32,
) -> bool {
    match (world.agent_position(agent), world.player_position()) {
        (Some(agent_pos), Some(player_pos)) => {
            agent_pos.distance(player_pos) < interaction_distance
        }
        _ => false,
    }
}

/// Walk the agent toward a tagged entity.
///
/// A tag that resolves to nothing is a domain failure, not a fault: the miss
/// is traced and the task reports `Failure`. Arrival is re-evaluated from the
/// current position on every invocation, so a task that starts within
/// `stop_distance` succeeds without ever commanding movement.
#[derive(Debug, Clone)]
pub struct MoveToTask {
    tag: String,
    stop_distance: f32,
}

impl MoveToTask {
    pub fn new(tag: impl Into<String>, stop_distance: f32) -> Self {
        Self {
            tag: tag.into(),
            stop_distance,
        }
    }
}

impl<W> Action<W> for MoveToTask
where
    W: WorkshopMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus {
        let Some(target) = world.tagged_position(&self.tag) else {
            emit(
                blackboard,
                TraceEvent::new(ctx.tick, "move_to.missing_tag").with_detail(self.tag.clone()),
            );
            return ActionStatus::Failure;
        };

        let Some(pos) = world.agent_position(agent) else {
            return ActionStatus::Failure;
        };

        if pos.distance(target) < self.stop_distance {
            world.cancel_move(agent);
            blackboard.remove(NAV_TARGET);
            return ActionStatus::Success;
        }

        blackboard.set(NAV_TARGET, target);
        world.command_move(agent, target);
        ActionStatus::Running
    }

    fn cancel(
        &mut self,
        _ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        world.cancel_move(agent);
        blackboard.remove(NAV_TARGET);
    }
}

/// Teleport the patient onto a named conveyor waypoint.
///
/// The patient is staged `spawn_offset` below the waypoint marker and
/// activated. Unlike movement this is instantaneous, so the only non-success
/// outcome is an unresolvable waypoint name.
#[derive(Debug, Clone)]
pub struct ConveyorMoveToTask {
    waypoint: String,
    spawn_offset: f32,
}

impl ConveyorMoveToTask {
    pub fn new(waypoint: impl Into<String>, spawn_offset: f32) -> Self {
        Self {
            waypoint: waypoint.into(),
            spawn_offset,
        }
    }
}

impl<W> Action<W> for ConveyorMoveToTask
where
    W: WorkshopMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        _agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus {
        let Some(marker) = world.waypoint(&self.waypoint) else {
            emit(
                blackboard,
                TraceEvent::new(ctx.tick, "conveyor.missing_waypoint")
                    .with_detail(self.waypoint.clone()),
            );
            return ActionStatus::Failure;
        };

        world.stage_patient(Vec3::new(marker.x, marker.y - self.spawn_offset, marker.z));
        ActionStatus::Success
    }
}

/// Customer-proximity condition, shared by the `CheckCustomer` and `Idle`
/// names. Success iff the player is within the interaction radius.
#[derive(Debug, Clone, Copy)]
pub struct CustomerNearTask {
    interaction_distance: f32,
}

impl CustomerNearTask {
    pub fn new(interaction_distance: f32) -> Self {
        Self {
            interaction_distance,
        }
    }
}

impl<W> Action<W> for CustomerNearTask
where
    W: WorkshopMut + 'static,
{
    fn tick(
        &mut self,
        _ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> ActionStatus {
        if customer_in_range(&*world, agent, self.interaction_distance) {
            ActionStatus::Success
        } else {
            ActionStatus::Failure
        }
    }
}

/// Ask the customer whether to take the robot in.
///
/// Confirm accepts, deny declines, anything else (or no input at all) keeps
/// the prompt up for another tick. The only task whose three outcomes are all
/// driven by external input rather than world state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServingTask;

impl<W> Action<W> for ServingTask
where
    W: WorkshopMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        _agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus {
        match world.take_input() {
            Some(InputSignal::Confirm) => ActionStatus::Success,
            Some(InputSignal::Deny) => ActionStatus::Failure,
            Some(InputSignal::Other) | None => {
                emit(
                    blackboard,
                    TraceEvent::new(ctx.tick, "serving.prompt")
                        .with_detail("accept the robot for repair? confirm or deny"),
                );
                ActionStatus::Running
            }
        }
    }
}

/// Single-draw diagnosis condition. `CheckIfFunctional` and
/// `CheckIfRepairable` are both instances of this with distinct streams, so
/// the two checks stay uncorrelated under one seed. Redrawn every tick, no
/// memoized verdict.
#[derive(Debug, Clone, Copy)]
pub struct ChanceCheckTask {
    odds: RepairOdds,
    stream: u64,
}

impl ChanceCheckTask {
    pub fn functional(odds: RepairOdds) -> Self {
        Self {
            odds,
            stream: streams::DIAGNOSIS,
        }
    }

    pub fn repairable(odds: RepairOdds) -> Self {
        Self {
            odds,
            stream: streams::REPAIRABLE,
        }
    }
}

impl<W> Action<W> for ChanceCheckTask
where
    W: WorkshopMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        _world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus {
        let mut source = ChanceSource::take(ctx, agent, self.stream, blackboard);
        let passed = self.odds.roll(source.rng());
        source.restore(blackboard);

        if passed {
            ActionStatus::Success
        } else {
            ActionStatus::Failure
        }
    }
}

/// Bounded synchronous repair loop.
///
/// Rolls until either a roll succeeds (local counter resets to zero) or the
/// local budget is exhausted. No intermediate `Running`: the whole loop runs
/// inside one invocation, so the worst case is `max_local_errors + 1` draws.
/// On exhaustion the counter is left past its maximum, which is what makes
/// the subsequent `LocalErrorsNotMaxed` check fail.
#[derive(Debug, Clone, Copy)]
pub struct AttemptRepairTask {
    odds: RepairOdds,
    max_local_errors: u32,
    max_universal_errors: u32,
}

impl AttemptRepairTask {
    pub fn new(config: &WorkshopConfig) -> Self {
        Self {
            odds: config.odds,
            max_local_errors: config.max_local_errors,
            max_universal_errors: config.max_universal_errors,
        }
    }
}

impl<W> Action<W> for AttemptRepairTask
where
    W: WorkshopMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        _world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus {
        let mut source = ChanceSource::take(ctx, agent, streams::REPAIR_LOOP, blackboard);

        let mut draws = 0u32;
        let (repaired, errors) = {
            let tally = tally_mut(blackboard, self.max_local_errors, self.max_universal_errors);
            loop {
                if !tally.local.not_maxed() {
                    break (false, tally.local.count());
                }
                draws += 1;
                if self.odds.roll(source.rng()) {
                    tally.local.reset();
                    break (true, 0);
                }
                tally.local.increment();
            }
        };
        source.restore(blackboard);

        if repaired {
            emit(
                blackboard,
                TraceEvent::new(ctx.tick, "repair.success").with_a(u64::from(draws)),
            );
            ActionStatus::Success
        } else {
            emit(
                blackboard,
                TraceEvent::new(ctx.tick, "repair.exhausted")
                    .with_a(u64::from(draws))
                    .with_b(u64::from(errors)),
            );
            ActionStatus::Failure
        }
    }
}

/// Scatter debris and knock one random part off the spare shelf.
///
/// The shelf pick does not track prior picks; hitting an already-inactive
/// slot is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateMessTask;

impl<W> Action<W> for CreateMessTask
where
    W: WorkshopMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus {
        world.set_mess(true);

        let count = world.shelf_part_count();
        if count > 0 {
            let mut source = ChanceSource::take(ctx, agent, streams::SHELF_PICK, blackboard);
            let index = (source.rng().next_u64() % count as u64) as usize;
            source.restore(blackboard);
            world.deactivate_shelf_part(index);
        }

        ActionStatus::Success
    }
}

/// Clear the debris flag. Always succeeds, even when nothing was there.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanMessTask;

impl<W> Action<W> for CleanMessTask
where
    W: WorkshopMut + 'static,
{
    fn tick(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        world: &mut W,
        _blackboard: &mut Blackboard,
    ) -> ActionStatus {
        world.set_mess(false);
        ActionStatus::Success
    }
}

/// Hand the finished robot back.
///
/// Gated on customer proximity: while the player is out of range the task
/// keeps prompting and reports `Running`. Once in range, any input signal
/// completes the handover.
#[derive(Debug, Clone, Copy)]
pub struct DischargeCustomerTask {
    interaction_distance: f32,
}

impl DischargeCustomerTask {
    pub fn new(interaction_distance: f32) -> Self {
        Self {
            interaction_distance,
        }
    }
}

impl<W> Action<W> for DischargeCustomerTask
where
    W: WorkshopMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus {
        if !customer_in_range(&*world, agent, self.interaction_distance) {
            emit(
                blackboard,
                TraceEvent::new(ctx.tick, "discharge.prompt")
                    .with_detail("waiting for the customer to collect the robot"),
            );
            return ActionStatus::Running;
        }

        if world.take_input().is_some() {
            return ActionStatus::Success;
        }

        emit(
            blackboard,
            TraceEvent::new(ctx.tick, "discharge.prompt")
                .with_detail("press any key to hand over the robot"),
        );
        ActionStatus::Running
    }
}

/// Which of the two error budgets a counter condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallySide {
    Local,
    Universal,
}

/// Condition over one error budget. Success while the counter has not passed
/// its maximum; the boundary is inclusive, so a counter sitting exactly at
/// the maximum still passes.
#[derive(Debug, Clone, Copy)]
pub struct ErrorsNotMaxedTask {
    side: TallySide,
    max_local_errors: u32,
    max_universal_errors: u32,
}

impl ErrorsNotMaxedTask {
    pub fn new(side: TallySide, config: &WorkshopConfig) -> Self {
        Self {
            side,
            max_local_errors: config.max_local_errors,
            max_universal_errors: config.max_universal_errors,
        }
    }
}

impl<W> Action<W> for ErrorsNotMaxedTask
where
    W: WorkshopMut + 'static,
{
    fn tick(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus {
        let tally = tally_mut(blackboard, self.max_local_errors, self.max_universal_errors);
        let ok = match self.side {
            TallySide::Local => tally.local.not_maxed(),
            TallySide::Universal => tally.universal.not_maxed(),
        };
        if ok {
            ActionStatus::Success
        } else {
            ActionStatus::Failure
        }
    }
}

/// Charge one error against the per-visit budget.
#[derive(Debug, Clone, Copy)]
pub struct IncrementUniversalErrorsTask {
    max_local_errors: u32,
    max_universal_errors: u32,
}

impl IncrementUniversalErrorsTask {
    pub fn new(config: &WorkshopConfig) -> Self {
        Self {
            max_local_errors: config.max_local_errors,
            max_universal_errors: config.max_universal_errors,
        }
    }
}

impl<W> Action<W> for IncrementUniversalErrorsTask
where
    W: WorkshopMut + 'static,
{
    fn tick(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus {
        tally_mut(blackboard, self.max_local_errors, self.max_universal_errors)
            .universal
            .increment();
        ActionStatus::Success
    }
}

/// Zero the per-visit budget when a new customer visit begins.
#[derive(Debug, Clone, Copy)]
pub struct ResetUniversalErrorsTask {
    max_local_errors: u32,
    max_universal_errors: u32,
}

impl ResetUniversalErrorsTask {
    pub fn new(config: &WorkshopConfig) -> Self {
        Self {
            max_local_errors: config.max_local_errors,
            max_universal_errors: config.max_universal_errors,
        }
    }
}

impl<W> Action<W> for ResetUniversalErrorsTask
where
    W: WorkshopMut + 'static,
{
    fn tick(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus {
        tally_mut(blackboard, self.max_local_errors, self.max_universal_errors)
            .universal
            .reset();
        ActionStatus::Success
    }
}

/// Light up a tagged station indicator.
///
/// A missing indicator is traced and reported as `Failure`, the same way
/// `MoveTo` treats a missing tag.
#[derive(Debug, Clone)]
pub struct IndicateTask {
    tag: String,
    color: IndicatorColor,
}

impl IndicateTask {
    pub fn new(tag: impl Into<String>, color: IndicatorColor) -> Self {
        Self {
            tag: tag.into(),
            color,
        }
    }
}

impl<W> Action<W> for IndicateTask
where
    W: WorkshopMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        _agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus {
        if world.set_indicator(&self.tag, self.color) {
            ActionStatus::Success
        } else {
            emit(
                blackboard,
                TraceEvent::new(ctx.tick, "indicate.missing_tag").with_detail(self.tag.clone()),
            );
            ActionStatus::Failure
        }
    }
}

/// Emit an arbitrary message into the trace. Always succeeds.
#[derive(Debug, Clone)]
pub struct DebugLogTask {
    message: String,
}

impl DebugLogTask {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<W> Action<W> for DebugLogTask
where
    W: WorkshopMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus {
        emit(
            blackboard,
            TraceEvent::new(ctx.tick, "debug.log").with_detail(self.message.clone()),
        );
        ActionStatus::Success
    }
}
