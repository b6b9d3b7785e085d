//! Scene module: объекты тюремного блока вокруг guard'а
//!
//! - door: двери камер, двойные двери (DoorLink mediator)
//! - message: message board
//! - camera: camera framing
//! - escape: exit zone (win condition)
//! - spawn: helpers для сборки сцены

use bevy::prelude::*;

pub mod camera;
pub mod door;
pub mod escape;
pub mod message;
pub mod spawn;

pub use camera::{CameraFraming, Framing};
pub use door::{Door, DoorChanged, DoorLink, LinkedDoor};
pub use escape::Escaped;
pub use message::MessageBoard;
pub use spawn::{
    link_doors, spawn_cell_door, spawn_cellblock, spawn_exit_zone, spawn_guard, spawn_prisoner, spawn_wall,
    CellblockHandles, GuardSpawn,
};

use crate::SimulationSet;

/// Scene Plugin
///
/// Порядок выполнения (SimulationSet::Scene):
/// 1. expire_messages: timed сообщения
/// 2. propagate_linked_doors: DoorChanged → partner
/// 3. sync_door_layers: состояние двери → DetectionLayer
/// 4. detect_escape: exit zone
pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MessageBoard>()
            .init_resource::<CameraFraming>()
            .add_event::<DoorChanged>()
            .add_event::<Escaped>();

        app.add_systems(
            FixedUpdate,
            (
                message::expire_messages,
                door::propagate_linked_doors,
                door::sync_door_layers,
                escape::detect_escape,
            )
                .chain()
                .in_set(SimulationSet::Scene),
        );
    }
}
