//! Guard behavior module
//!
//! State machine {Patrol, Pause, Alert, Sleep, TargetReached}, которую
//! раз в tick двигает `tick_guard_state_machines`. Вся логика state'ов
//! работает через traits из `ports`, ECS adapters: в `systems`.

use bevy::prelude::*;

pub mod config;
pub mod error;
pub mod machine;
pub mod ports;
pub mod route;
pub mod states;
pub mod systems;


// Re-export основных типов
pub use config::GuardConfig;
pub use error::GuardSetupError;
pub use machine::{GuardCore, GuardSetup, GuardStateKind, GuardStateMachine, GuardTargets};
pub use route::{PatrolRoute, RouteCursor, RouteError, Waypoint};

use crate::SimulationSet;

/// Guard Plugin
///
/// Порядок выполнения (SimulationSet::Behavior):
/// 1. tick_guard_state_machines: state update + переходы
/// 2. follow_sign_markers: markers над головой guard'а
pub struct GuardPlugin;

impl Plugin for GuardPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (systems::tick_guard_state_machines, systems::follow_sign_markers)
                .chain()
                .in_set(SimulationSet::Behavior),
        );
    }
}
