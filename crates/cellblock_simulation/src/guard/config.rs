//! Guard configuration

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Настройки поведения guard'а
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Сколько стоим на waypoint'е (секунды)
    pub pause_duration: f32,
    /// Сколько спим (секунды)
    pub sleep_duration: f32,
    /// Вероятность уснуть после паузы (0..=1)
    pub chance_to_sleep: f32,
    /// Задержка перед подходом к пойманной цели (секунды)
    pub reach_delay: f32,
    /// Скорость поворота (множитель slerp в секунду)
    pub look_rotation_speed: f32,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            pause_duration: 5.0,
            sleep_duration: 5.0,
            chance_to_sleep: 0.25,
            reach_delay: 2.0,
            look_rotation_speed: 8.0,
        }
    }
}

impl GuardConfig {
    /// Зажимает невалидные значения. Симуляция не падает из-за конфига.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();

        Self {
            pause_duration: clamp_field("pause_duration", self.pause_duration, 0.0, f32::MAX, defaults.pause_duration),
            sleep_duration: clamp_field("sleep_duration", self.sleep_duration, 0.0, f32::MAX, defaults.sleep_duration),
            chance_to_sleep: clamp_field("chance_to_sleep", self.chance_to_sleep, 0.0, 1.0, defaults.chance_to_sleep),
            reach_delay: clamp_field("reach_delay", self.reach_delay, 0.0, f32::MAX, defaults.reach_delay),
            look_rotation_speed: clamp_field(
                "look_rotation_speed",
                self.look_rotation_speed,
                0.0,
                f32::MAX,
                defaults.look_rotation_speed,
            ),
        }
    }
}

fn clamp_field(name: &str, value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    let clean = if value.is_finite() { value.clamp(min, max) } else { fallback };

    if clean != value {
        crate::log_warning(&format!("GuardConfig: {} = {} is invalid, using {}", name, value, clean));
    }

    clean
}
