//! Movement domain: headless навигация
//!
//! Архитектура:
//! - Guard/Prisoner выставляют destination через NavAgent (intent)
//! - drive_nav_agents интегрирует движение по прямой к цели
//! - Препятствия навигация не обходит (NavMesh вне headless симуляции)
//!
//! Детерминизм: fixed timestep (60Hz), без RNG.

use bevy::prelude::*;

use crate::components::NavAgent;
use crate::SimulationSet;

/// Movement Plugin
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, drive_nav_agents.in_set(SimulationSet::Locomotion));
    }
}

/// Система: шаг всех NavAgent'ов к их destination
///
/// Transform: источник правды для позиции (teleport пишет прямо в него),
/// поэтому агент синхронизирует `position` из Transform перед шагом.
pub fn drive_nav_agents(mut agents: Query<(&mut NavAgent, &mut Transform)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (mut agent, mut transform) in agents.iter_mut() {
        let mut translation = transform.translation;
        agent.step(&mut translation, delta);

        if translation != transform.translation {
            transform.translation = translation;
        }
    }
}
