//! World компоненты: detection layers, препятствия, sign markers, exit zone

use bevy::prelude::*;

/// Слой, по которому sensor фильтрует тела
///
/// - Target: то, что sensor ищет (prisoner, открытая дверь)
/// - Obstacle: блокирует line of sight (стены, закрытая дверь)
/// - Inert: невидимо для sensor'а
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum DetectionLayer {
    Target,
    Obstacle,
    Inert,
}

/// Axis-aligned коробка препятствия (центр = Transform.translation)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ObstacleShape {
    pub half_extents: Vec3,
}

impl ObstacleShape {
    pub fn new(half_extents: Vec3) -> Self {
        Self {
            half_extents: half_extents.abs(),
        }
    }
}

/// Поза, в которую entity возвращается после поимки
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct RespawnPose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl RespawnPose {
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn from_transform(transform: &Transform) -> Self {
        Self::new(transform.translation, transform.rotation)
    }
}

impl Default for RespawnPose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

/// Вид sign marker'а над головой guard'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum MarkerKind {
    /// "?": заметил аномалию
    Alert,
    /// "!": заметил prisoner'а
    Detection,
}

/// Sign marker (живёт, пока активен создавший его state)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SignMarker {
    pub kind: MarkerKind,
    pub owner: Entity,
}

/// Смещение marker'а над головой guard'а
pub const SIGN_MARKER_OFFSET: Vec3 = Vec3::new(0.0, 3.5, 0.0);

/// Зона выхода: prisoner внутри коробки считается сбежавшим
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ExitZone {
    pub half_extents: Vec3,
    /// Куда ставим prisoner'а после побега
    pub win_point: Vec3,
}

impl ExitZone {
    pub fn contains(&self, center: Vec3, point: Vec3) -> bool {
        let local = (point - center).abs();
        local.x <= self.half_extents.x
            && local.y <= self.half_extents.y
            && local.z <= self.half_extents.z
    }
}
