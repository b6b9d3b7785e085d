//! Headless симуляция тюремного блока
//!
//! Guard патрулирует коридор. Через 10 секунд дверь камеры открывается,
//! prisoner пытается дойти до выхода.

use bevy::prelude::*;
use cellblock_simulation::components::{NavAgent, Prisoner};
use cellblock_simulation::guard::ports::Locomotion;
use cellblock_simulation::scene::{spawn_cellblock, CellblockHandles};
use cellblock_simulation::{
    create_headless_app, init_logger, log_error, log_info, CameraFraming, Door, DoorChanged, GuardConfig, GuardStateMachine,
    MessageBoard, SimulationPlugin,
};

const TICKS: u32 = 60 * 90;
const DOOR_OPENS_AT: u32 = 60 * 10;
const PRISONER_RUNS_AT: u32 = 60 * 14;

fn main() {
    init_logger();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);
    log_info(&format!("Starting cellblock headless simulation (seed: {})", seed));

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    let handles = match spawn_cellblock(&mut app.world_mut().commands(), GuardConfig::default()) {
        Ok(handles) => handles,
        Err(err) => {
            log_error(&format!("Failed to build cellblock: {}", err));
            return;
        }
    };
    app.world_mut().flush();

    for tick in 0..TICKS {
        match tick {
            DOOR_OPENS_AT => open_cell_door(&mut app, handles),
            PRISONER_RUNS_AT => send_prisoner_to_exit(&mut app, handles),
            _ => {}
        }

        app.update();

        if tick % 120 == 0 {
            report(&mut app, handles, tick);
        }

        let escaped = app
            .world()
            .get::<Prisoner>(handles.prisoner)
            .is_some_and(|prisoner| prisoner.escaped);
        if escaped {
            log_info(&format!("Tick {}: prisoner escaped, simulation stops", tick));
            break;
        }
    }

    log_info("Simulation complete!");
}

fn open_cell_door(app: &mut App, handles: CellblockHandles) {
    let world = app.world_mut();
    if let Some(mut door) = world.get_mut::<Door>(handles.cell_door) {
        door.unlock();
        door.open();
    }
    world.send_event(DoorChanged {
        door: handles.cell_door,
    });
    log_info("Cell door opened");
}

fn send_prisoner_to_exit(app: &mut App, handles: CellblockHandles) {
    let Some(exit) = app.world().get::<Transform>(handles.exit).map(|t| t.translation) else {
        return;
    };

    if let Some(mut agent) = app.world_mut().get_mut::<NavAgent>(handles.prisoner) {
        agent.set_destination(exit);
    }
    log_info("Prisoner runs for the exit");
}

fn report(app: &mut App, handles: CellblockHandles, tick: u32) {
    let world = app.world();

    let state = world
        .get::<GuardStateMachine>(handles.guard)
        .and_then(|machine| machine.active_kind());
    let guard_position = world.get::<Transform>(handles.guard).map(|t| t.translation);
    let caught = world.get::<Prisoner>(handles.prisoner).map(|p| p.caught);
    let message = world.resource::<MessageBoard>().text().map(str::to_string);
    let framing = world.resource::<CameraFraming>().framing;

    log_info(&format!(
        "Tick {}: guard {:?} at {:?}, prisoner caught: {:?}, message: {:?}, camera: {:?}",
        tick, state, guard_position, caught, message, framing
    ));
}
