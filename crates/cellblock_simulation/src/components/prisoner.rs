//! Prisoner: цель guard'а

use bevy::prelude::*;

use super::world::RespawnPose;

/// Prisoner (player-controlled в игре, scripted в headless сценах)
///
/// `caught` выставляет guard на TargetReached, пока prisoner пойман
/// его NavAgent стоит (halted).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Prisoner {
    pub caught: bool,
    /// Дошёл до exit zone (терминальное состояние сцены)
    pub escaped: bool,
    pub respawn: RespawnPose,
}

impl Prisoner {
    pub fn new(respawn: RespawnPose) -> Self {
        Self {
            caught: false,
            escaped: false,
            respawn,
        }
    }
}
