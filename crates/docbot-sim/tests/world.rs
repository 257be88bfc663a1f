use docbot_sim::{ConveyorBelt, WorkshopWorld};
use docbot_tasks::{InputSignal, Vec3, WorkshopMut, WorkshopView};

const AGENT: u64 = 1;

#[test]
fn agents_integrate_toward_their_commanded_destination() {
    let mut world = WorkshopWorld::new();
    world.insert_agent(AGENT, Vec3::ZERO, 10.0);
    world.command_move(AGENT, Vec3::new(3.0, 0.0, 0.0));

    world.advance(0.1);
    assert_eq!(world.agent_position(AGENT), Some(Vec3::new(1.0, 0.0, 0.0)));

    // Never overshoots: the remaining 2 units take two more frames, and
    // further frames hold position at the destination.
    for _ in 0..4 {
        world.advance(0.1);
    }
    assert_eq!(world.agent_position(AGENT), Some(Vec3::new(3.0, 0.0, 0.0)));
}

#[test]
fn cancel_move_freezes_the_agent() {
    let mut world = WorkshopWorld::new();
    world.insert_agent(AGENT, Vec3::ZERO, 10.0);
    world.command_move(AGENT, Vec3::new(10.0, 0.0, 0.0));
    world.advance(0.1);

    world.cancel_move(AGENT);
    world.advance(0.1);

    assert_eq!(world.agent_position(AGENT), Some(Vec3::new(1.0, 0.0, 0.0)));
    assert!(world.commanded_destination(AGENT).is_none());
}

#[test]
fn the_belt_carries_only_an_active_patient() {
    let mut world = WorkshopWorld::new();
    world.insert_waypoint("BeltEnd", Vec3::new(10.0, 0.0, 0.0));
    world.set_belt(ConveyorBelt {
        waypoint: "BeltEnd".to_owned(),
        speed: 5.0,
    });

    // Inactive patient: the belt leaves it alone.
    world.advance(0.1);
    assert_eq!(world.patient().position, Vec3::ZERO);

    world.stage_patient(Vec3::ZERO);
    world.advance(0.1);
    assert_eq!(world.patient().position, Vec3::new(0.5, 0.0, 0.0));
}

#[test]
fn input_signals_expire_at_frame_end() {
    let mut world = WorkshopWorld::new();
    world.press(InputSignal::Confirm);
    world.advance(0.1);

    assert_eq!(world.take_input(), None);

    // Within a frame the signal is consumed exactly once.
    world.press(InputSignal::Deny);
    assert_eq!(world.take_input(), Some(InputSignal::Deny));
    assert_eq!(world.take_input(), None);
}

#[test]
fn shelf_parts_deactivate_individually() {
    let mut world = WorkshopWorld::new();
    world.set_shelf_parts(3);

    world.deactivate_shelf_part(1);
    assert_eq!(world.shelf_part_count(), 3);
    assert_eq!(world.shelf_active_count(), 2);

    // Out-of-range and repeated deactivations are no-ops.
    world.deactivate_shelf_part(1);
    world.deactivate_shelf_part(9);
    assert_eq!(world.shelf_active_count(), 2);
}
