use docbot_core::{
    Action, ActionKey, ActionOutcome, ActionRuntime, ActionStatus, Blackboard, TickContext,
    WorldMut, WorldView,
};

#[derive(Default)]
struct TestWorld {
    log: Vec<&'static str>,
    canceled: Vec<&'static str>,
}

impl WorldView for TestWorld {
    type Agent = u64;
}

impl WorldMut for TestWorld {}

/// Runs for `remaining` ticks, then reports the given outcome.
struct Countdown {
    name: &'static str,
    remaining: u32,
    result: ActionStatus,
}

impl Action<TestWorld> for Countdown {
    fn tick(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut TestWorld,
        _blackboard: &mut Blackboard,
    ) -> ActionStatus {
        world.log.push(self.name);
        if self.remaining > 0 {
            self.remaining -= 1;
            return ActionStatus::Running;
        }
        self.result
    }

    fn cancel(
        &mut self,
        _ctx: &TickContext,
        _agent: u64,
        world: &mut TestWorld,
        _blackboard: &mut Blackboard,
    ) {
        world.canceled.push(self.name);
    }
}

fn ctx(tick: u64) -> TickContext {
    TickContext {
        tick,
        dt_seconds: 0.1,
        seed: 123,
    }
}

#[test]
fn same_key_keeps_the_instance_alive() {
    let agent = 1u64;
    let key = ActionKey("walk");
    let mut world = TestWorld::default();
    let mut bb = Blackboard::new();
    let mut runtime = ActionRuntime::default();

    for tick in 0..3u64 {
        let ctx = ctx(tick);
        runtime.ensure_current(
            key,
            |_, _, _, _| {
                Box::new(Countdown {
                    name: "walk",
                    remaining: 2,
                    result: ActionStatus::Success,
                })
            },
            &ctx,
            agent,
            &mut world,
            &mut bb,
        );
        runtime.tick(&ctx, agent, &mut world, &mut bb);
    }

    // One instance ticked three times, not three instances once each.
    assert_eq!(world.log, vec!["walk", "walk", "walk"]);
    assert_eq!(world.canceled, Vec::<&str>::new());
    assert_eq!(runtime.take_just_finished(key), Some(ActionOutcome::Success));
}

#[test]
fn switching_keys_cancels_the_previous_instance() {
    let agent = 1u64;
    let mut world = TestWorld::default();
    let mut bb = Blackboard::new();
    let mut runtime = ActionRuntime::default();

    let c = ctx(0);
    runtime.ensure_current(
        ActionKey("walk"),
        |_, _, _, _| {
            Box::new(Countdown {
                name: "walk",
                remaining: 10,
                result: ActionStatus::Success,
            })
        },
        &c,
        agent,
        &mut world,
        &mut bb,
    );
    runtime.tick(&c, agent, &mut world, &mut bb);

    let c = ctx(1);
    runtime.ensure_current(
        ActionKey("serve"),
        |_, _, _, _| {
            Box::new(Countdown {
                name: "serve",
                remaining: 0,
                result: ActionStatus::Failure,
            })
        },
        &c,
        agent,
        &mut world,
        &mut bb,
    );
    let outcome = runtime.tick(&c, agent, &mut world, &mut bb);

    assert_eq!(world.canceled, vec!["walk"]);
    assert_eq!(outcome, Some(ActionOutcome::Failure));
    assert_eq!(
        runtime.take_just_finished(ActionKey("serve")),
        Some(ActionOutcome::Failure)
    );
}

#[test]
fn finished_instance_is_cleared_and_can_restart() {
    let agent = 1u64;
    let key = ActionKey("walk");
    let mut world = TestWorld::default();
    let mut bb = Blackboard::new();
    let mut runtime = ActionRuntime::default();

    let c = ctx(0);
    runtime.ensure_current(
        key,
        |_, _, _, _| {
            Box::new(Countdown {
                name: "walk",
                remaining: 0,
                result: ActionStatus::Success,
            })
        },
        &c,
        agent,
        &mut world,
        &mut bb,
    );
    assert_eq!(
        runtime.tick(&c, agent, &mut world, &mut bb),
        Some(ActionOutcome::Success)
    );
    assert_eq!(runtime.current_key(), None);

    // Re-ensuring with the same key builds a fresh instance.
    let c = ctx(1);
    runtime.ensure_current(
        key,
        |_, _, _, _| {
            Box::new(Countdown {
                name: "walk",
                remaining: 5,
                result: ActionStatus::Success,
            })
        },
        &c,
        agent,
        &mut world,
        &mut bb,
    );
    assert_eq!(runtime.tick(&c, agent, &mut world, &mut bb), None);
    assert!(runtime.is_running(key));
}

#[test]
fn take_just_finished_is_consumed_and_key_checked() {
    let agent = 1u64;
    let key = ActionKey("walk");
    let mut world = TestWorld::default();
    let mut bb = Blackboard::new();
    let mut runtime = ActionRuntime::default();

    let c = ctx(0);
    runtime.ensure_current(
        key,
        |_, _, _, _| {
            Box::new(Countdown {
                name: "walk",
                remaining: 0,
                result: ActionStatus::Success,
            })
        },
        &c,
        agent,
        &mut world,
        &mut bb,
    );
    runtime.tick(&c, agent, &mut world, &mut bb);

    assert_eq!(runtime.take_just_finished(ActionKey("other")), None);
    assert_eq!(runtime.take_just_finished(key), Some(ActionOutcome::Success));
    assert_eq!(runtime.take_just_finished(key), None);
}

#[test]
fn cancel_current_invokes_the_hook_and_clears_state() {
    let agent = 1u64;
    let key = ActionKey("walk");
    let mut world = TestWorld::default();
    let mut bb = Blackboard::new();
    let mut runtime = ActionRuntime::default();

    let c = ctx(0);
    runtime.ensure_current(
        key,
        |_, _, _, _| {
            Box::new(Countdown {
                name: "walk",
                remaining: 10,
                result: ActionStatus::Success,
            })
        },
        &c,
        agent,
        &mut world,
        &mut bb,
    );
    runtime.tick(&c, agent, &mut world, &mut bb);
    runtime.cancel_current(&c, agent, &mut world, &mut bb);

    assert_eq!(world.canceled, vec!["walk"]);
    assert_eq!(runtime.current_key(), None);
    assert_eq!(runtime.take_just_finished(key), None);
}
