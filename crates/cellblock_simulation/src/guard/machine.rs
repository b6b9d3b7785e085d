//! Guard state machine
//!
//! Один активный state. Переходы синхронные: exit старого завершается
//! до enter нового. enter может сразу запросить следующий переход
//! (Pause с нулевой длительностью → Patrol), такие цепочки ограничены.

use bevy::prelude::*;

use super::config::GuardConfig;
use super::error::GuardSetupError;
use super::ports::GuardContext;
use super::route::{PatrolRoute, RouteCursor, Waypoint};
use super::states::{GuardState, RouteVariant};
use crate::components::RespawnPose;
use crate::perception::VisionSensor;

/// Максимум переходов, запрошенных из enter подряд
const MAX_CHAINED_TRANSITIONS: usize = 8;

/// Идентификатор state'а (для запросов перехода и логов)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum GuardStateKind {
    Patrol,
    Pause,
    Alert,
    Sleep,
    TargetReached,
}

/// Цели guard'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuardTargets {
    /// Prisoner
    pub primary: Entity,
    /// Открытая дверь камеры (если есть)
    pub anomaly: Option<Entity>,
}

/// Всё, из чего собирается guard
#[derive(Debug, Clone)]
pub struct GuardSetup {
    pub config: GuardConfig,
    pub targets: GuardTargets,
    pub patrol: Vec<Waypoint>,
    /// Пустой alert route допустим только без аномалии
    pub alert: Vec<Waypoint>,
    /// Куда guard возвращается после поимки
    pub respawn: RespawnPose,
}

/// Данные, общие для всех state'ов
#[derive(Debug, Clone)]
pub struct GuardCore {
    pub config: GuardConfig,
    pub targets: GuardTargets,
    pub patrol: RouteCursor,
    pub alert: RouteCursor,
    pub respawn: RespawnPose,
    /// Отложенное включение sensor'а (секунды до включения)
    sensor_wake: Option<f32>,
}

impl GuardCore {
    pub fn cursor_mut(&mut self, variant: RouteVariant) -> &mut RouteCursor {
        match variant {
            RouteVariant::Patrol => &mut self.patrol,
            RouteVariant::Alert => &mut self.alert,
        }
    }

    /// Выключает sensor и отменяет отложенное включение
    pub fn deactivate_sensor(&mut self, sensor: &mut VisionSensor) {
        self.sensor_wake = None;
        sensor.deactivate();
    }

    pub fn schedule_sensor_wake(&mut self, delay: f32) {
        self.sensor_wake = Some(delay.max(0.0));
    }

    pub fn pending_sensor_wake(&self) -> Option<f32> {
        self.sensor_wake
    }

    fn tick_sensor_wake(&mut self, sensor: &mut VisionSensor, delta: f32) {
        let Some(remaining) = self.sensor_wake.as_mut() else {
            return;
        };

        *remaining -= delta;
        if *remaining <= 0.0 {
            self.sensor_wake = None;
            sensor.activate();
        }
    }

    pub fn anomaly_visible(&self, sensor: &VisionSensor) -> bool {
        self.targets.anomaly.is_some_and(|anomaly| sensor.is_visible(anomaly))
    }

    pub fn primary_visible(&self, sensor: &VisionSensor) -> bool {
        sensor.is_visible(self.targets.primary)
    }
}

/// Behavior controller guard'а (ECS компонент)
#[derive(Component, Debug)]
pub struct GuardStateMachine {
    core: GuardCore,
    state: Option<GuardState>,
    enabled: bool,
    transitions: u64,
}

impl GuardStateMachine {
    pub fn new(setup: GuardSetup) -> Result<Self, GuardSetupError> {
        if let Some(index) = setup.patrol.iter().position(|wp| wp.look_target.is_none()) {
            return Err(GuardSetupError::MissingLookTarget { index });
        }

        let patrol = PatrolRoute::new(setup.patrol).map_err(|_| GuardSetupError::EmptyPatrolRoute)?;

        let alert = if setup.alert.is_empty() && setup.targets.anomaly.is_none() {
            patrol.clone()
        } else {
            PatrolRoute::new(setup.alert).map_err(|_| GuardSetupError::EmptyAlertRoute)?
        };

        Ok(Self {
            core: GuardCore {
                config: setup.config.sanitized(),
                targets: setup.targets,
                patrol: RouteCursor::new(patrol),
                alert: RouteCursor::new(alert),
                respawn: setup.respawn,
                sensor_wake: None,
            },
            state: None,
            enabled: true,
            transitions: 0,
        })
    }

    pub fn core(&self) -> &GuardCore {
        &self.core
    }

    pub fn active_kind(&self) -> Option<GuardStateKind> {
        self.state.as_ref().map(GuardState::kind)
    }

    pub fn is_started(&self) -> bool {
        self.state.is_some()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Сколько переходов выполнено с момента создания
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Guard перестаёт тикать (prisoner сбежал)
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Входит в Patrol, если machine ещё не запущена
    pub fn start(&mut self, ctx: &mut GuardContext) {
        if self.state.is_none() {
            self.set_state(Some(GuardStateKind::Patrol), ctx);
        }
    }

    /// Единственная точка смены state'а
    ///
    /// `None` и запрос текущего state'а игнорируются.
    pub fn set_state(&mut self, next: Option<GuardStateKind>, ctx: &mut GuardContext) {
        let mut pending = next;
        let mut hops = 0;

        while let Some(kind) = pending.take() {
            if self.active_kind() == Some(kind) {
                break;
            }

            if hops >= MAX_CHAINED_TRANSITIONS {
                crate::log_warning(&format!(
                    "Guard: dropped transition to {:?} after {} chained transitions",
                    kind, hops
                ));
                break;
            }
            hops += 1;

            let previous = self.state.take();
            let previous_kind = previous.as_ref().map(GuardState::kind);
            if let Some(mut old) = previous {
                old.exit(&mut self.core, ctx);
            }

            crate::log_info(&format!("🛡️ Guard: {:?} → {:?}", previous_kind, kind));

            let mut state = GuardState::for_kind(kind);
            pending = state.enter(&mut self.core, ctx);
            self.state = Some(state);
            self.transitions += 1;
        }
    }

    /// Один tick поведения
    pub fn tick(&mut self, ctx: &mut GuardContext) {
        if !self.enabled {
            return;
        }

        self.core.tick_sensor_wake(ctx.sensor, ctx.delta);

        if self.state.is_none() {
            self.start(ctx);
        }

        let request = match self.state.as_mut() {
            Some(state) => state.update(&mut self.core, ctx),
            None => None,
        };

        self.set_state(request, ctx);
    }
}
