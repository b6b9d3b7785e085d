//! Spawn helpers для сцены тюремного блока

use bevy::prelude::*;

use super::door::{Door, LinkedDoor};
use crate::components::{
    AnimationPlayer, ClipLengths, DetectionLayer, ExitZone, Footprint, NavAgent, ObstacleShape, Prisoner, RespawnPose,
};
use crate::guard::{GuardConfig, GuardSetup, GuardSetupError, GuardStateMachine, GuardTargets, Waypoint};
use crate::perception::{SensorConfig, VisionSensor};

/// Всё, что нужно для guard'а
#[derive(Debug, Clone)]
pub struct GuardSpawn {
    pub transform: Transform,
    pub setup: GuardSetup,
    pub sensor: SensorConfig,
    pub clips: ClipLengths,
    /// Скорость ходьбы (m/s)
    pub speed: f32,
}

impl GuardSpawn {
    pub fn new(transform: Transform, setup: GuardSetup) -> Self {
        Self {
            transform,
            setup,
            sensor: SensorConfig::default(),
            clips: ClipLengths::default(),
            speed: NavAgent::default().speed,
        }
    }
}

/// Spawn guard'а. Невалидный маршрут → ошибка, ничего не spawn'ится.
pub fn spawn_guard(commands: &mut Commands, spawn: GuardSpawn) -> Result<Entity, GuardSetupError> {
    let machine = GuardStateMachine::new(spawn.setup)?;

    let mut agent = NavAgent::new(spawn.speed);
    agent.position = spawn.transform.translation;

    let guard = commands
        .spawn((
            spawn.transform,
            machine,
            VisionSensor::new(spawn.sensor),
            agent,
            AnimationPlayer::with_lengths(spawn.clips),
            Footprint::STANDING,
        ))
        .id();

    crate::log(&format!("Spawned guard {:?} at {:?}", guard, spawn.transform.translation));
    Ok(guard)
}

/// Spawn prisoner'а (respawn поза = стартовая)
pub fn spawn_prisoner(commands: &mut Commands, position: Vec3) -> Entity {
    let transform = Transform::from_translation(position);
    let mut agent = NavAgent::new(3.0);
    agent.position = position;

    commands
        .spawn((
            transform,
            Prisoner::new(RespawnPose::from_transform(&transform)),
            agent,
            DetectionLayer::Target,
        ))
        .id()
}

/// Spawn двери камеры (закрыта и заперта)
pub fn spawn_cell_door(commands: &mut Commands, position: Vec3, half_extents: Vec3) -> Entity {
    let door = Door::locked();
    commands
        .spawn((
            Transform::from_translation(position),
            door,
            door.detection_layer(),
            ObstacleShape::new(half_extents),
        ))
        .id()
}

/// Связывает две створки двойной двери
pub fn link_doors(commands: &mut Commands, first: Entity, second: Entity) {
    commands.entity(first).insert(LinkedDoor { partner: second });
    commands.entity(second).insert(LinkedDoor { partner: first });
}

pub fn spawn_wall(commands: &mut Commands, center: Vec3, half_extents: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(center),
            DetectionLayer::Obstacle,
            ObstacleShape::new(half_extents),
        ))
        .id()
}

pub fn spawn_exit_zone(commands: &mut Commands, center: Vec3, half_extents: Vec3, win_point: Vec3) -> Entity {
    commands
        .spawn((
            Transform::from_translation(center),
            ExitZone {
                half_extents: half_extents.abs(),
                win_point,
            },
        ))
        .id()
}

/// Entity'ы тестового тюремного блока
#[derive(Debug, Clone, Copy)]
pub struct CellblockHandles {
    pub guard: Entity,
    pub prisoner: Entity,
    pub cell_door: Entity,
    pub exit: Entity,
}

/// Собирает стандартный блок: коридор вдоль -Z, камера справа
/// (дверь на x = 4), exit zone в конце коридора.
pub fn spawn_cellblock(commands: &mut Commands, config: GuardConfig) -> Result<CellblockHandles, GuardSetupError> {
    let prisoner = spawn_prisoner(commands, Vec3::new(7.0, 0.0, -10.0));
    let cell_door = spawn_cell_door(commands, Vec3::new(4.0, 0.0, -10.0), Vec3::new(0.1, 1.5, 1.0));

    // Стена камеры с проёмом под дверь
    spawn_wall(commands, Vec3::new(4.0, 0.0, -4.5), Vec3::new(0.1, 1.5, 4.5));
    spawn_wall(commands, Vec3::new(4.0, 0.0, -15.5), Vec3::new(0.1, 1.5, 4.5));

    let exit = spawn_exit_zone(
        commands,
        Vec3::new(0.0, 0.0, -30.0),
        Vec3::new(3.0, 2.0, 2.0),
        Vec3::new(0.0, 0.0, -40.0),
    );

    let setup = GuardSetup {
        config,
        targets: GuardTargets {
            primary: prisoner,
            anomaly: Some(cell_door),
        },
        patrol: vec![
            Waypoint::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(-5.0, 0.0, 0.0)),
            Waypoint::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(5.0, 0.0, -10.0)),
            Waypoint::new(Vec3::new(0.0, 0.0, -20.0), Vec3::new(-5.0, 0.0, -20.0)),
        ],
        alert: vec![
            Waypoint::pass_through(Vec3::new(2.0, 0.0, -8.0)),
            Waypoint::pass_through(Vec3::new(2.0, 0.0, -12.0)),
        ],
        respawn: RespawnPose::default(),
    };
    let guard = spawn_guard(commands, GuardSpawn::new(Transform::default(), setup))?;

    Ok(CellblockHandles {
        guard,
        prisoner,
        cell_door,
        exit,
    })
}
