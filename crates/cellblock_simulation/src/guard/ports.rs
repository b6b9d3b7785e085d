//! Коллабораторы guard'а
//!
//! State machine не трогает ECS напрямую: всё, что ей нужно от мира,
//! приходит через эти traits. ECS adapters живут в `guard::systems`,
//! fakes для unit tests: в `machine_tests`.

use bevy::prelude::*;
use rand::RngCore;

use crate::components::{AnimationClip, Footprint, MarkerKind, RespawnPose};
use crate::perception::VisionSensor;

/// Навигация (NavAgent в симуляции)
pub trait Locomotion {
    fn set_destination(&mut self, position: Vec3);
    fn destination(&self) -> Vec3;
    fn is_path_pending(&self) -> bool;
    fn remaining_distance(&self) -> f32;
    fn velocity(&self) -> Vec3;
    fn stop(&mut self);
}

pub trait Animator {
    fn play(&mut self, clip: AnimationClip);
    fn current_state_is(&self, clip: AnimationClip) -> bool;
    /// Длина текущего clip'а (секунды)
    fn current_state_length(&self) -> f32;
}

/// Поза и collision footprint guard'а
pub trait GuardBody {
    fn translation(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);
    fn teleport(&mut self, pose: RespawnPose);
    fn footprint(&self) -> Footprint;
    fn set_footprint(&mut self, footprint: Footprint);
}

/// Как долго висит сообщение
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageDuration {
    /// Скрыть через N секунд (если не заменено раньше)
    Timed(f32),
    /// До явного hide()
    Persistent,
}

pub trait MessageSurface {
    fn show(&mut self, text: &str, duration: MessageDuration);
    fn hide(&mut self);
}

/// Primary target (prisoner)
pub trait DetectionStatus {
    fn target_position(&self) -> Vec3;
    fn is_caught(&self) -> bool;
    /// Ставит флаг caught и останавливает собственную навигацию цели
    fn mark_caught(&mut self);
    fn mark_uncaught(&mut self);
    /// Возвращает цель в respawn позу
    fn respawn(&mut self);
}

/// Handle на marker, созданный state'ом
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub Entity);

/// Объекты сцены, которыми управляет guard
pub trait Scenery {
    fn spawn_marker(&mut self, kind: MarkerKind) -> MarkerHandle;
    fn despawn_marker(&mut self, marker: MarkerHandle);
    /// Аномалия перестаёт быть видимой для sensor'ов
    fn neutralize_anomaly(&mut self);
    fn close_and_lock_anomaly(&mut self);
    fn reset_camera_framing(&mut self);
}

/// Всё, что нужно state'у на один tick
pub struct GuardContext<'a> {
    pub body: &'a mut dyn GuardBody,
    pub locomotion: &'a mut dyn Locomotion,
    pub animator: &'a mut dyn Animator,
    pub sensor: &'a mut VisionSensor,
    pub messages: &'a mut dyn MessageSurface,
    pub prisoner: &'a mut dyn DetectionStatus,
    pub scenery: &'a mut dyn Scenery,
    pub rng: &'a mut dyn RngCore,
    /// Длительность tick'а (секунды)
    pub delta: f32,
}
