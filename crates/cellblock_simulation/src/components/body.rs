//! Collision footprint guard'а (стоя / лёжа)

use bevy::prelude::*;

/// Ось капсулы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum CapsuleAxis {
    X,
    Y,
    Z,
}

/// Капсула, которой тело занимает место в мире
///
/// Sleep кладёт guard'а (PRONE) и возвращает исходную капсулу на выходе.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Footprint {
    pub radius: f32,
    pub height: f32,
    pub axis: CapsuleAxis,
}

impl Footprint {
    pub const STANDING: Footprint = Footprint {
        radius: 0.5,
        height: 3.0,
        axis: CapsuleAxis::Y,
    };

    /// Лёжа: капсула вдоль Z
    pub const PRONE: Footprint = Footprint {
        radius: 1.0,
        height: 0.5,
        axis: CapsuleAxis::Z,
    };
}

impl Default for Footprint {
    fn default() -> Self {
        Self::STANDING
    }
}
