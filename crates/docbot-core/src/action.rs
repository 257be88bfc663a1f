use crate::{Blackboard, TickContext, WorldMut};

/// Tri-state result of a single task invocation.
///
/// `Running` means the task has no outcome yet: the host is expected to
/// invoke the same task again on its next tick. A task never suspends
/// internally; every invocation runs to completion and reports one of these
/// three values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Running,
    Success,
    Failure,
}

/// A finished outcome (`Running` excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Success,
    Failure,
}

impl From<ActionOutcome> for ActionStatus {
    fn from(value: ActionOutcome) -> Self {
        match value {
            ActionOutcome::Success => ActionStatus::Success,
            ActionOutcome::Failure => ActionStatus::Failure,
        }
    }
}

impl ActionStatus {
    pub fn outcome(self) -> Option<ActionOutcome> {
        match self {
            ActionStatus::Running => None,
            ActionStatus::Success => Some(ActionOutcome::Success),
            ActionStatus::Failure => Some(ActionOutcome::Failure),
        }
    }

    pub fn is_running(self) -> bool {
        matches!(self, ActionStatus::Running)
    }
}

/// Stable symbolic identity of a task, as the host engine names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionKey(pub &'static str);

/// A leaf task.
///
/// Contract: `tick` evaluates the current world state, optionally mutates it,
/// and reports an [`ActionStatus`]. Hosts that stop re-invoking a `Running`
/// task are not required to call [`Action::cancel`]; tasks must therefore
/// keep all durable state in the world or blackboard, never in hidden
/// half-finished effects. `cancel` exists for hosts that *do* signal
/// abandonment and lets a task release anything it commanded (e.g. an
/// in-flight navigation request).
pub trait Action<W>: 'static
where
    W: WorldMut + 'static,
{
    fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> ActionStatus;

    fn cancel(
        &mut self,
        _ctx: &TickContext,
        _agent: W::Agent,
        _world: &mut W,
        _blackboard: &mut Blackboard,
    ) {
    }
}

struct RunningAction<W>
where
    W: WorldMut + 'static,
{
    key: ActionKey,
    action: Box<dyn Action<W>>,
}

/// Bookkeeping for at most one in-flight task instance.
///
/// Models the host side of the re-invocation protocol: `ensure_current`
/// keeps a keyed instance alive across ticks, `tick` drives it until it
/// produces an outcome, and `cancel_current` is the explicit abandonment
/// path (switching keys via `ensure_current` cancels the previous instance
/// as well).
pub struct ActionRuntime<W>
where
    W: WorldMut + 'static,
{
    current: Option<RunningAction<W>>,
    just_finished: Option<(ActionKey, ActionOutcome)>,
}

impl<W> ActionRuntime<W>
where
    W: WorldMut + 'static,
{
    pub fn current_key(&self) -> Option<ActionKey> {
        self.current.as_ref().map(|a| a.key)
    }

    pub fn is_running(&self, key: ActionKey) -> bool {
        self.current_key() == Some(key)
    }

    pub fn cancel_current(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) {
        if let Some(current) = self.current.as_mut() {
            current.action.cancel(ctx, agent, world, blackboard);
        }
        self.current = None;
        self.just_finished = None;
    }

    /// Make `key` the current task, building a fresh instance unless one with
    /// the same key is already in flight. A differently-keyed instance is
    /// cancelled first.
    pub fn ensure_current<F>(
        &mut self,
        key: ActionKey,
        make: F,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) where
        F: FnOnce(&TickContext, W::Agent, &mut W, &mut Blackboard) -> Box<dyn Action<W>>,
    {
        if self.is_running(key) {
            return;
        }

        if let Some(current) = self.current.as_mut() {
            current.action.cancel(ctx, agent, world, blackboard);
            self.current = None;
        }

        self.just_finished = None;
        let action = make(ctx, agent, world, blackboard);
        self.current = Some(RunningAction { key, action });
    }

    /// Tick the current instance once. Returns the outcome if it finished,
    /// leaving it retrievable via [`ActionRuntime::take_just_finished`].
    pub fn tick(
        &mut self,
        ctx: &TickContext,
        agent: W::Agent,
        world: &mut W,
        blackboard: &mut Blackboard,
    ) -> Option<ActionOutcome> {
        let current = self.current.as_mut()?;

        let status = current.action.tick(ctx, agent, world, blackboard);
        let outcome = status.outcome()?;
        let key = current.key;

        self.current = None;
        self.just_finished = Some((key, outcome));
        Some(outcome)
    }

    pub fn take_just_finished(&mut self, key: ActionKey) -> Option<ActionOutcome> {
        match self.just_finished {
            Some((finished_key, outcome)) if finished_key == key => {
                self.just_finished = None;
                Some(outcome)
            }
            _ => None,
        }
    }
}

impl<W> Default for ActionRuntime<W>
where
    W: WorldMut + 'static,
{
    fn default() -> Self {
        Self {
            current: None,
            just_finished: None,
        }
    }
}
