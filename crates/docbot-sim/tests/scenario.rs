use docbot_sim::{ConveyorSpec, Scenario, AGENT};
use docbot_tasks::{InputSignal, TaskName, TaskSpec, Vec3, WorkshopConfig, WorkshopView};

const VISIT_YAML: &str = r#"
name: repair-visit
seed: 7
scene:
  agent: { x: 0.0, y: 0.0, z: 0.0 }
  player: { x: 30.0, y: 0.0, z: 0.0 }
  tags:
    ServiceCounter: { x: 8.0, y: 0.0, z: 0.0 }
  waypoints:
    RepairBay: { x: 10.0, y: 2.0, z: -2.0 }
  indicators:
    - BayLamp
  shelf_parts: 4
  conveyor:
    waypoint: RepairBay
    speed: 2.0
script:
  - name: MoveTo
    arg: ServiceCounter
  - name: Serving
  - name: ConveyorMoveTo
    arg: RepairBay
  - name: IndicateGreen
    arg: BayLamp
inputs:
  - tick: 6
    signal: Confirm
player_moves:
  - tick: 11
    position: { x: 10.0, y: 0.0, z: 0.0 }
"#;

#[test]
fn a_full_scenario_parses_from_yaml() {
    let scenario: Scenario = serde_yaml::from_str(VISIT_YAML).unwrap();

    assert_eq!(scenario.name, "repair-visit");
    assert_eq!(scenario.seed, 7);
    assert_eq!(scenario.scene.player, Some(Vec3::new(30.0, 0.0, 0.0)));
    assert_eq!(scenario.scene.shelf_parts, 4);
    assert_eq!(
        scenario.script[0],
        TaskSpec::with_arg(TaskName::MoveTo, "ServiceCounter")
    );
    assert_eq!(scenario.script[1], TaskSpec::new(TaskName::Serving));
    assert_eq!(scenario.inputs[0].tick, 6);
    assert_eq!(scenario.inputs[0].signal, InputSignal::Confirm);
    assert_eq!(
        scenario.player_moves[0].position,
        Vec3::new(10.0, 0.0, 0.0)
    );
    assert!(scenario.lint().is_empty());
}

#[test]
fn omitted_fields_fall_back_to_defaults() {
    let scenario: Scenario = serde_yaml::from_str("name: bare").unwrap();

    assert_eq!(scenario.name, "bare");
    assert_eq!(scenario.seed, 0);
    assert_eq!(scenario.dt_seconds, 0.1);
    assert_eq!(scenario.max_ticks, 1_000);
    assert_eq!(scenario.workshop, WorkshopConfig::default());
    assert_eq!(scenario.scene.agent_speed, 10.0);
    assert!(scenario.script.is_empty());
    assert!(scenario.scene.conveyor.is_none());
}

#[test]
fn workshop_tuning_overrides_parse() {
    let scenario: Scenario = serde_yaml::from_str(
        "name: tuned\nworkshop:\n  stop_distance: 2.5\n  max_local_errors: 1\n",
    )
    .unwrap();

    assert_eq!(scenario.workshop.stop_distance, 2.5);
    assert_eq!(scenario.workshop.max_local_errors, 1);
    // Unmentioned knobs keep their defaults.
    assert_eq!(scenario.workshop.interaction_distance, 20.0);
}

#[test]
fn build_world_places_everything_from_the_scene() {
    let scenario: Scenario = serde_yaml::from_str(VISIT_YAML).unwrap();
    let world = scenario.build_world();

    assert_eq!(world.agent_position(AGENT), Some(Vec3::ZERO));
    assert_eq!(world.player_position(), Some(Vec3::new(30.0, 0.0, 0.0)));
    assert_eq!(
        world.tagged_position("ServiceCounter"),
        Some(Vec3::new(8.0, 0.0, 0.0))
    );
    assert_eq!(world.waypoint("RepairBay"), Some(Vec3::new(10.0, 2.0, -2.0)));
    assert_eq!(world.shelf_part_count(), 4);
    assert_eq!(world.shelf_active_count(), 4);
    // Present but unlit until an Indicate task runs.
    let lamp = world.indicator("BayLamp").unwrap();
    assert!(!lamp.visible);
    assert!(!world.patient().active);
}

#[test]
fn lint_flags_argument_shape_and_unresolved_names() {
    let mut scenario: Scenario = serde_yaml::from_str(VISIT_YAML).unwrap();
    scenario.script = vec![
        TaskSpec::new(TaskName::MoveTo),
        TaskSpec::with_arg(TaskName::CleanMess, "junk"),
        TaskSpec::with_arg(TaskName::MoveTo, "NoSuchTag"),
        TaskSpec::with_arg(TaskName::ConveyorMoveTo, "NoSuchBelt"),
        TaskSpec::with_arg(TaskName::IndicateRed, "NoSuchLamp"),
    ];

    let problems = scenario.lint();

    assert_eq!(problems.len(), 5);
    assert!(problems[0].contains("requires an argument"));
    assert!(problems[1].contains("takes no argument"));
    assert!(problems[2].contains("`NoSuchTag`"));
    assert!(problems[3].contains("`NoSuchBelt`"));
    assert!(problems[4].contains("`NoSuchLamp`"));
}

#[test]
fn lint_flags_a_dangling_conveyor_waypoint() {
    let mut scenario: Scenario = serde_yaml::from_str(VISIT_YAML).unwrap();
    scenario.scene.conveyor = Some(ConveyorSpec {
        waypoint: "Unmapped".to_owned(),
        speed: 1.0,
    });

    let problems = scenario.lint();

    assert_eq!(problems.len(), 1);
    assert!(problems[0].contains("conveyor waypoint `Unmapped`"));
}
