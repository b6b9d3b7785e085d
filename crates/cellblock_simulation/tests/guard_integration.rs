//! Guard integration test
//!
//! Полный headless App (SimulationPlugin), 60Hz, один update = один tick.
//!
//! Проверяем:
//! - поимку prisoner'а и возврат guard'а в Patrol
//! - Alert на открытую дверь
//! - синхронизацию двойных дверей
//! - побег через exit zone

use bevy::prelude::*;
use cellblock_simulation::components::{DetectionLayer, MarkerKind, NavAgent, Prisoner, RespawnPose, SignMarker};
use cellblock_simulation::guard::ports::Locomotion;
use cellblock_simulation::scene::{
    link_doors, spawn_cell_door, spawn_exit_zone, spawn_guard, spawn_prisoner, Framing, GuardSpawn,
};
use cellblock_simulation::*;

const CATCH_MESSAGE: &str = "Stop right there!";
const ALERT_MESSAGE: &str = "Huh? The door is open!";

/// Helper: App с полной симуляцией
fn create_cellblock_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app
}

fn corridor_route() -> Vec<Waypoint> {
    vec![
        Waypoint::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(-5.0, 0.0, 0.0)),
        Waypoint::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(5.0, 0.0, -10.0)),
        Waypoint::new(Vec3::new(0.0, 0.0, -20.0), Vec3::new(-5.0, 0.0, -20.0)),
    ]
}

fn spawn_corridor_guard(app: &mut App, prisoner: Entity, anomaly: Option<Entity>, alert: Vec<Waypoint>) -> Entity {
    let setup = GuardSetup {
        config: GuardConfig::default(),
        targets: GuardTargets {
            primary: prisoner,
            anomaly,
        },
        patrol: corridor_route(),
        alert,
        respawn: RespawnPose::default(),
    };

    let guard = spawn_guard(
        &mut app.world_mut().commands(),
        GuardSpawn::new(Transform::default(), setup),
    )
    .expect("valid guard setup");
    app.world_mut().flush();
    guard
}

fn guard_state(app: &App, guard: Entity) -> Option<GuardStateKind> {
    app.world()
        .get::<GuardStateMachine>(guard)
        .and_then(|machine| machine.active_kind())
}

/// Крутит update, пока guard не войдёт в `state`. Возвращает число tick'ов.
fn run_until_state(app: &mut App, guard: Entity, state: GuardStateKind, max_ticks: usize) -> Option<usize> {
    for tick in 0..max_ticks {
        app.update();
        if guard_state(app, guard) == Some(state) {
            return Some(tick);
        }
    }
    None
}

fn markers(app: &mut App) -> Vec<MarkerKind> {
    let world = app.world_mut();
    let mut query = world.query::<&SignMarker>();
    query.iter(world).map(|marker| marker.kind).collect()
}

/// Test: guard видит prisoner'а перед собой, ловит и возвращается в Patrol
#[test]
fn test_guard_catches_prisoner_and_resumes_patrol() {
    let mut app = create_cellblock_app(42);

    let prisoner = spawn_prisoner(&mut app.world_mut().commands(), Vec3::new(0.0, 0.0, -5.0));
    app.world_mut().flush();
    let respawn = RespawnPose::new(Vec3::new(30.0, 0.0, 30.0), Quat::IDENTITY);
    if let Some(mut state) = app.world_mut().get_mut::<Prisoner>(prisoner) {
        state.respawn = respawn;
    }

    let guard = spawn_corridor_guard(&mut app, prisoner, None, Vec::new());

    // detection_delay 1.0 + cadence скана
    let spotted = run_until_state(&mut app, guard, GuardStateKind::TargetReached, 180);
    assert!(spotted.is_some(), "guard должен заметить prisoner'а");
    assert!(spotted.unwrap() >= 59, "подтверждение не раньше detection_delay");

    assert!(app.world().get::<Prisoner>(prisoner).unwrap().caught);
    assert!(!app.world().get::<VisionSensor>(guard).unwrap().is_active());
    assert_eq!(app.world().resource::<MessageBoard>().text(), Some(CATCH_MESSAGE));
    assert_eq!(markers(&mut app), vec![MarkerKind::Detection]);

    // Пойманный prisoner стоит на месте
    let caught_at = app.world().get::<Transform>(prisoner).unwrap().translation;

    // reach_delay 2s + подход + обработка 2s
    let resumed = run_until_state(&mut app, guard, GuardStateKind::Patrol, 600);
    assert!(resumed.is_some(), "guard должен вернуться в Patrol");
    assert_eq!(caught_at, Vec3::new(0.0, 0.0, -5.0));

    let prisoner_state = app.world().get::<Prisoner>(prisoner).unwrap();
    assert!(!prisoner_state.caught);
    assert_eq!(
        app.world().get::<Transform>(prisoner).unwrap().translation,
        respawn.translation
    );

    // Guard телепортирован на respawn (origin) и только начал движение
    let guard_position = app.world().get::<Transform>(guard).unwrap().translation;
    assert!(guard_position.length() < 0.5, "guard at {:?}", guard_position);

    assert_eq!(app.world().resource::<MessageBoard>().text(), None);
    assert!(markers(&mut app).is_empty());
    assert!(app.world().resource::<CameraFraming>().is_inside());

    // Sensor включается через секунду
    for _ in 0..70 {
        app.update();
    }
    assert!(app.world().get::<VisionSensor>(guard).unwrap().is_active());
    assert_eq!(guard_state(&app, guard), Some(GuardStateKind::Patrol));
}

/// Test: при 60Hz prisoner подтверждается ровно через 60 tick'ов (1s)
/// после первого скана, который его увидел
#[test]
fn test_detection_delay_holds_at_fixed_step() {
    let mut app = create_cellblock_app(42);

    let prisoner = spawn_prisoner(&mut app.world_mut().commands(), Vec3::new(0.0, 0.0, -5.0));
    app.world_mut().flush();

    // Один waypoint, look target на prisoner'е: guard не отворачивается
    let setup = GuardSetup {
        config: GuardConfig::default(),
        targets: GuardTargets {
            primary: prisoner,
            anomaly: None,
        },
        patrol: vec![Waypoint::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0))],
        alert: Vec::new(),
        respawn: RespawnPose::default(),
    };
    let guard = spawn_guard(
        &mut app.world_mut().commands(),
        GuardSpawn::new(Transform::default(), setup),
    )
    .expect("valid guard setup");
    app.world_mut().flush();

    let mut seen_at = None;
    let mut confirmed_at = None;
    for tick in 0..180 {
        app.update();

        if guard_state(&app, guard) == Some(GuardStateKind::TargetReached) {
            confirmed_at = Some(tick);
            break;
        }

        let seen = app
            .world()
            .get::<VisionSensor>(guard)
            .is_some_and(|sensor| sensor.first_seen(prisoner).is_some());
        if seen && seen_at.is_none() {
            seen_at = Some(tick);
        }
    }

    let seen_at = seen_at.expect("prisoner должен попасть в поле зрения");
    let confirmed_at = confirmed_at.expect("prisoner должен быть подтверждён");
    assert_eq!(confirmed_at - seen_at, 60);
}

/// Test: открытая дверь в поле зрения → Alert
#[test]
fn test_open_door_triggers_alert() {
    let mut app = create_cellblock_app(42);

    let prisoner = spawn_prisoner(&mut app.world_mut().commands(), Vec3::new(20.0, 0.0, 20.0));
    let door = spawn_cell_door(
        &mut app.world_mut().commands(),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(1.0, 1.5, 0.1),
    );
    app.world_mut().flush();
    if let Some(mut state) = app.world_mut().get_mut::<Door>(door) {
        state.unlock();
        state.open();
    }

    let alert_route = vec![
        Waypoint::pass_through(Vec3::new(3.0, 0.0, -2.0)),
        Waypoint::pass_through(Vec3::new(3.0, 0.0, -6.0)),
    ];
    let guard = spawn_corridor_guard(&mut app, prisoner, Some(door), alert_route);

    let alerted = run_until_state(&mut app, guard, GuardStateKind::Alert, 180);
    assert!(alerted.is_some(), "guard должен заметить открытую дверь");

    assert_eq!(app.world().resource::<MessageBoard>().text(), Some(ALERT_MESSAGE));
    assert!(app.world().get::<Door>(door).unwrap().suppressed);
    assert_eq!(*app.world().get::<DetectionLayer>(door).unwrap(), DetectionLayer::Inert);
    assert_eq!(markers(&mut app), vec![MarkerKind::Alert]);

    // Сообщение висит 3 секунды, Alert продолжается
    for _ in 0..200 {
        app.update();
    }
    assert_eq!(app.world().resource::<MessageBoard>().text(), None);
    assert_eq!(guard_state(&app, guard), Some(GuardStateKind::Alert));

    // Guard идёт по alert route
    let destination = app.world().get::<NavAgent>(guard).unwrap().destination;
    assert!(destination.is_some_and(|d| d.x == 3.0));
}

/// Test: открытие одной створки открывает вторую
#[test]
fn test_linked_doors_mirror_each_other() {
    let mut app = create_cellblock_app(1);

    let left = spawn_cell_door(&mut app.world_mut().commands(), Vec3::new(4.0, 0.0, -9.5), Vec3::new(0.1, 1.5, 0.5));
    let right = spawn_cell_door(&mut app.world_mut().commands(), Vec3::new(4.0, 0.0, -10.5), Vec3::new(0.1, 1.5, 0.5));
    link_doors(&mut app.world_mut().commands(), left, right);
    app.world_mut().flush();
    app.update();

    if let Some(mut door) = app.world_mut().get_mut::<Door>(left) {
        door.unlock();
        door.open();
    }
    app.world_mut().send_event(DoorChanged { door: left });
    app.update();

    let mirrored = *app.world().get::<Door>(right).unwrap();
    assert!(mirrored.is_open);
    assert!(!mirrored.is_locked);
    assert_eq!(*app.world().get::<DetectionLayer>(right).unwrap(), DetectionLayer::Target);
}

/// Test: prisoner за спиной guard'а доходит до выхода
#[test]
fn test_prisoner_escape_disables_guard() {
    let mut app = create_cellblock_app(42);

    let prisoner = spawn_prisoner(&mut app.world_mut().commands(), Vec3::new(0.0, 0.0, 25.0));
    let win_point = Vec3::new(0.0, 0.0, 50.0);
    spawn_exit_zone(
        &mut app.world_mut().commands(),
        Vec3::new(0.0, 0.0, 30.0),
        Vec3::new(2.0, 2.0, 2.0),
        win_point,
    );
    app.world_mut().flush();
    let guard = spawn_corridor_guard(&mut app, prisoner, None, Vec::new());

    if let Some(mut agent) = app.world_mut().get_mut::<NavAgent>(prisoner) {
        agent.set_destination(Vec3::new(0.0, 0.0, 30.0));
    }

    for _ in 0..200 {
        app.update();
    }

    let prisoner_state = app.world().get::<Prisoner>(prisoner).unwrap();
    assert!(prisoner_state.escaped);
    assert!(!prisoner_state.caught);
    assert_eq!(app.world().get::<Transform>(prisoner).unwrap().translation, win_point);

    assert!(!app.world().get::<GuardStateMachine>(guard).unwrap().is_enabled());
    assert!(!app.world().get::<VisionSensor>(guard).unwrap().is_active());
    assert_eq!(app.world().resource::<CameraFraming>().framing, Framing::Outside);
}
