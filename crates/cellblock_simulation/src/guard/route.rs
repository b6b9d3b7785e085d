//! Patrol route и ping-pong курсор

use bevy::prelude::*;
use thiserror::Error;

/// Точка маршрута
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Waypoint {
    pub position: Vec3,
    /// Куда смотреть во время паузы на этой точке
    pub look_target: Option<Vec3>,
}

impl Waypoint {
    pub fn new(position: Vec3, look_target: Vec3) -> Self {
        Self {
            position,
            look_target: Some(look_target),
        }
    }

    /// Точка без look target (alert route)
    pub fn pass_through(position: Vec3) -> Self {
        Self {
            position,
            look_target: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route has no waypoints")]
    Empty,
}

/// Непустой маршрут
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct PatrolRoute {
    waypoints: Vec<Waypoint>,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, RouteError> {
        if waypoints.is_empty() {
            return Err(RouteError::Empty);
        }
        Ok(Self { waypoints })
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }
}

/// Ping-pong обход маршрута
///
/// Индекс всегда в `[0, len - 1]`. Маршрут из одной точки стоит на 0.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct RouteCursor {
    route: PatrolRoute,
    index: usize,
    forward: bool,
}

impl RouteCursor {
    pub fn new(route: PatrolRoute) -> Self {
        Self {
            route,
            index: 0,
            forward: true,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }

    pub fn route(&self) -> &PatrolRoute {
        &self.route
    }

    pub fn current(&self) -> Waypoint {
        // index инвариантно в границах, маршрут непустой
        self.route.waypoints[self.index.min(self.route.len() - 1)]
    }

    /// Следующая точка: forward → index + 1, после конца → len - 2 и разворот;
    /// backward → index - 1, ниже нуля → 1 и разворот.
    pub fn advance(&mut self) -> Waypoint {
        let len = self.route.len();
        if len < 2 {
            self.index = 0;
            return self.current();
        }

        if self.forward {
            if self.index + 1 >= len {
                self.index = len - 2;
                self.forward = false;
            } else {
                self.index += 1;
            }
        } else if self.index == 0 {
            self.index = 1;
            self.forward = true;
        } else {
            self.index -= 1;
        }

        self.current()
    }

    /// Возвращает курсор в начало (направление сохраняется)
    pub fn reset(&mut self) {
        self.index = 0;
    }
}
