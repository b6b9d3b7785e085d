//! Movement компоненты: навигационный агент и скорость перемещения

use bevy::prelude::*;

use crate::guard::ports::Locomotion;

/// Расстояние, на котором агент считается стоящим в точке назначения
pub const NAV_ARRIVAL_EPSILON: f32 = 0.01;

/// Навигационный агент (headless замена engine-side NavMesh агента)
///
/// Архитектура:
/// - AI пишет destination через [`Locomotion`] (high-level intent)
/// - `drive_nav_agents` в FixedUpdate двигает Transform к цели
/// - path_pending = true сразу после set_destination, до следующего шага drive
///
/// Без destination агент стоит на месте.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    /// Скорость движения (m/s)
    pub speed: f32,
    /// Текущая цель (None: стоим)
    pub destination: Option<Vec3>,
    /// Путь ещё не рассчитан (выставляется в set_destination)
    pub path_pending: bool,
    /// Оставшееся расстояние до destination
    pub remaining_distance: f32,
    /// Скорость за последний шаг
    pub velocity: Vec3,
    /// Позиция агента на момент последнего шага (синхронизируется с Transform)
    pub position: Vec3,
    /// Агент заморожен (пойманный prisoner не двигается)
    pub halted: bool,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self::new(2.0) // 2 m/s: базовая скорость ходьбы
    }
}

impl NavAgent {
    pub fn new(speed: f32) -> Self {
        Self {
            speed: speed.max(0.0),
            destination: None,
            path_pending: false,
            remaining_distance: 0.0,
            velocity: Vec3::ZERO,
            position: Vec3::ZERO,
            halted: false,
        }
    }

    /// Один шаг интеграции: двигает `translation` к destination.
    pub fn step(&mut self, translation: &mut Vec3, delta: f32) {
        self.position = *translation;
        // Путь "рассчитан" на первом шаге после set_destination
        self.path_pending = false;

        let Some(destination) = self.destination else {
            self.velocity = Vec3::ZERO;
            self.remaining_distance = 0.0;
            return;
        };

        let to_destination = destination - self.position;
        let distance = to_destination.length();

        if self.halted || distance <= NAV_ARRIVAL_EPSILON {
            self.velocity = Vec3::ZERO;
            self.remaining_distance = distance;
            return;
        }

        let direction = to_destination / distance;
        let travel = (self.speed * delta).min(distance);
        *translation += direction * travel;

        self.position = *translation;
        self.remaining_distance = distance - travel;
        self.velocity = if self.remaining_distance <= NAV_ARRIVAL_EPSILON {
            Vec3::ZERO
        } else {
            direction * self.speed
        };
    }
}

impl Locomotion for NavAgent {
    fn set_destination(&mut self, position: Vec3) {
        self.destination = Some(position);
        self.path_pending = true;
        self.remaining_distance = position.distance(self.position);
    }

    fn destination(&self) -> Vec3 {
        self.destination.unwrap_or(self.position)
    }

    fn is_path_pending(&self) -> bool {
        self.path_pending
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining_distance
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn stop(&mut self) {
        self.destination = None;
        self.path_pending = false;
        self.remaining_distance = 0.0;
        self.velocity = Vec3::ZERO;
    }
}
