//! Visibility sensor: FOV + line of sight + debounce
//!
//! Архитектура:
//! - VisionSensor: ECS компонент на guard'е (records + confirmed set)
//! - scan() вызывается с cadence `scan_interval`, не каждый tick
//! - Цель confirmed, если она непрерывно проходила фильтры >= detection_delay
//! - Выход из видимости мгновенный, вход debounced
//!
//! Records, не обновлённые сканом, удаляются в том же скане
//! (цель, покинувшая радиус, тоже теряется сразу).

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::spatial::SpatialQuery;
use crate::components::DetectionLayer;

/// Допуск на ошибку f32 при накоплении шагов (12 × 1/60 != 0.2 ровно)
const SCAN_EPSILON: f32 = 1e-4;

/// Параметры sensor'а
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Радиус обзора (метры)
    pub view_radius: f32,
    /// Полный угол обзора (градусы, 0..=360)
    pub view_angle: f32,
    /// Сколько цель должна быть видна до подтверждения (секунды)
    pub detection_delay: f32,
    /// Период скана (секунды)
    pub scan_interval: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            view_radius: 8.0,
            view_angle: 180.0,
            detection_delay: 1.0,
            scan_interval: 0.2,
        }
    }
}

impl SensorConfig {
    /// Возвращает конфиг с зажатыми в допустимые пределы значениями.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut clean = self;

        clean.view_radius = non_negative("view_radius", self.view_radius, defaults.view_radius);
        clean.detection_delay = non_negative("detection_delay", self.detection_delay, defaults.detection_delay);
        clean.scan_interval = non_negative("scan_interval", self.scan_interval, defaults.scan_interval);

        clean.view_angle = if self.view_angle.is_finite() {
            self.view_angle.clamp(0.0, 360.0)
        } else {
            defaults.view_angle
        };
        if clean.view_angle != self.view_angle {
            crate::log_warning(&format!(
                "SensorConfig: view_angle {} out of range, using {}",
                self.view_angle, clean.view_angle
            ));
        }

        clean
    }
}

fn non_negative(name: &str, value: f32, fallback: f32) -> f32 {
    let clean = if !value.is_finite() {
        fallback
    } else {
        value.max(0.0)
    };

    if clean != value {
        crate::log_warning(&format!("SensorConfig: {} = {} is invalid, using {}", name, value, clean));
    }

    clean
}

/// Результат одного скана (для логов и событий)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    /// Цели, подтверждённые в этом скане
    pub confirmed: Vec<Entity>,
    /// Цели, которые были confirmed и пропали
    pub lost: Vec<Entity>,
}

/// Visibility sensor guard'а
#[derive(Component, Debug, Clone)]
pub struct VisionSensor {
    config: SensorConfig,
    active: bool,
    /// target → время первого обнаружения (elapsed секунды)
    records: HashMap<Entity, f64>,
    /// Подтверждённые цели в порядке подтверждения
    confirmed: Vec<Entity>,
    confirmed_lookup: HashSet<Entity>,
    /// Исключённые цели (до следующего activate/deactivate)
    ignored: HashSet<Entity>,
    /// Время до следующего скана
    scan_cooldown: f32,
}

impl Default for VisionSensor {
    fn default() -> Self {
        Self::new(SensorConfig::default())
    }
}

impl VisionSensor {
    pub fn new(config: SensorConfig) -> Self {
        Self {
            config: config.sanitized(),
            active: true,
            records: HashMap::new(),
            confirmed: Vec::new(),
            confirmed_lookup: HashSet::new(),
            ignored: HashSet::new(),
            scan_cooldown: 0.0,
        }
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Включает sensor. Records сбрасываются даже если он уже был активен.
    pub fn activate(&mut self) {
        self.active = true;
        self.clear();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.clear();
    }

    /// Исключает цель из records и последующих сканов
    pub fn ignore(&mut self, target: Entity) {
        self.ignored.insert(target);
        self.records.remove(&target);
        if self.confirmed_lookup.remove(&target) {
            self.confirmed.retain(|&e| e != target);
        }
    }

    pub fn is_visible(&self, target: Entity) -> bool {
        self.confirmed_lookup.contains(&target)
    }

    pub fn has_any_visible(&self) -> bool {
        !self.confirmed.is_empty()
    }

    /// Snapshot подтверждённых целей
    pub fn visible_targets(&self) -> Vec<Entity> {
        self.confirmed.clone()
    }

    pub fn first_seen(&self, target: Entity) -> Option<f64> {
        self.records.get(&target).copied()
    }

    /// Продвигает cadence скана. Возвращает true, если пора сканировать.
    ///
    /// Первый tick сканирует сразу. Остаток cooldown'а переносится на
    /// следующий период, поэтому при 60Hz и 0.2s скан идёт ровно раз в 12 tick'ов.
    pub fn tick_scan(&mut self, delta: f32) -> bool {
        let interval = self.config.scan_interval;
        let due = self.scan_cooldown <= SCAN_EPSILON;
        if due {
            // После длинного tick'а не догоняем пропущенные сканы
            let carried = if self.scan_cooldown < -interval { 0.0 } else { self.scan_cooldown };
            self.scan_cooldown = carried + interval;
        }

        self.scan_cooldown -= delta;
        due
    }

    fn clear(&mut self) {
        self.records.clear();
        self.confirmed.clear();
        self.confirmed_lookup.clear();
        self.ignored.clear();
    }

    /// Один скан
    ///
    /// `origin`/`forward`: поза sensor'а, `now`: elapsed время симуляции.
    /// Неактивный sensor ничего не делает.
    pub fn scan<S: SpatialQuery + ?Sized>(&mut self, origin: Vec3, forward: Vec3, now: f64, space: &S) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        if !self.active {
            return outcome;
        }

        let half_angle = self.config.view_angle / 2.0;
        let delay = self.config.detection_delay as f64;
        let mut refreshed: HashSet<Entity> = HashSet::new();

        for candidate in space.query_radius(origin, self.config.view_radius, DetectionLayer::Target) {
            if self.ignored.contains(&candidate.target) {
                continue;
            }

            if horizontal_angle(forward, candidate.position - origin) >= half_angle {
                continue;
            }

            let distance = origin.distance(candidate.position);
            if space.is_obstructed(origin, candidate.position, distance, DetectionLayer::Obstacle) {
                continue;
            }

            refreshed.insert(candidate.target);
            let first_seen = *self.records.entry(candidate.target).or_insert(now);

            if now - first_seen >= delay && self.confirmed_lookup.insert(candidate.target) {
                self.confirmed.push(candidate.target);
                outcome.confirmed.push(candidate.target);
            }
        }

        // Всё, что не прошло фильтры в этом скане, теряется сразу
        self.records.retain(|target, _| refreshed.contains(target));
        let lookup = &mut self.confirmed_lookup;
        self.confirmed.retain(|target| {
            if refreshed.contains(target) {
                true
            } else {
                lookup.remove(target);
                outcome.lost.push(*target);
                false
            }
        });

        outcome
    }
}

/// Угол (градусы) между forward и direction в плоскости XZ.
///
/// Вырожденный вектор (цель точно над/под sensor'ом) считаем в поле зрения.
pub fn horizontal_angle(forward: Vec3, direction: Vec3) -> f32 {
    let a = Vec2::new(forward.x, forward.z);
    let b = Vec2::new(direction.x, direction.z);

    let (Some(a), Some(b)) = (a.try_normalize(), b.try_normalize()) else {
        return 0.0;
    };

    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}
