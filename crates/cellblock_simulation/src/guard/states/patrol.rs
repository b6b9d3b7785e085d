//! Route-following state (Patrol и Alert)
//!
//! Обход маршрута общий, различия вынесены в [`RoutePolicy`]:
//! - Patrol: на waypoint'е → Pause, увидел аномалию → Alert
//! - Alert: на waypoint'е идёт дальше, аномалию уже игнорирует

use super::{face_towards, has_arrived, play_locomotion_animation};
use crate::guard::machine::{GuardCore, GuardStateKind};
use crate::guard::ports::{GuardContext, MarkerHandle};

/// Точность прихода на waypoint (метры)
pub const WAYPOINT_TOLERANCE: f32 = 0.1;

pub type RouteHook = fn(&mut RouteState, &mut GuardCore, &mut GuardContext) -> Option<GuardStateKind>;

/// Поведение route-following state'а в ключевых точках
#[derive(Clone, Copy)]
pub struct RoutePolicy {
    pub on_waypoint_reached: RouteHook,
    pub on_anomaly_spotted: RouteHook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteVariant {
    Patrol,
    Alert,
}

impl RouteVariant {
    pub fn policy(&self) -> RoutePolicy {
        match self {
            RouteVariant::Patrol => PATROL_POLICY,
            RouteVariant::Alert => super::alert::ALERT_POLICY,
        }
    }

    pub fn kind(&self) -> GuardStateKind {
        match self {
            RouteVariant::Patrol => GuardStateKind::Patrol,
            RouteVariant::Alert => GuardStateKind::Alert,
        }
    }
}

pub const PATROL_POLICY: RoutePolicy = RoutePolicy {
    on_waypoint_reached: request_pause,
    on_anomaly_spotted: request_alert,
};

fn request_pause(_: &mut RouteState, _: &mut GuardCore, _: &mut GuardContext) -> Option<GuardStateKind> {
    Some(GuardStateKind::Pause)
}

fn request_alert(_: &mut RouteState, _: &mut GuardCore, _: &mut GuardContext) -> Option<GuardStateKind> {
    Some(GuardStateKind::Alert)
}

#[derive(Debug, Clone)]
pub struct RouteState {
    variant: RouteVariant,
    /// Marker, созданный этим state'ом
    pub(crate) marker: Option<MarkerHandle>,
}

impl RouteState {
    pub fn new(variant: RouteVariant) -> Self {
        Self { variant, marker: None }
    }

    pub fn variant(&self) -> RouteVariant {
        self.variant
    }

    pub fn enter(&mut self, core: &mut GuardCore, ctx: &mut GuardContext) -> Option<GuardStateKind> {
        if self.variant == RouteVariant::Alert {
            super::alert::raise_alert(self, core, ctx);
        }

        self.navigate_to_next(core, ctx);
        None
    }

    /// Следующий waypoint по ping-pong курсору
    pub fn navigate_to_next(&mut self, core: &mut GuardCore, ctx: &mut GuardContext) {
        let waypoint = core.cursor_mut(self.variant).advance();
        ctx.locomotion.set_destination(waypoint.position);
    }

    pub fn update(&mut self, core: &mut GuardCore, ctx: &mut GuardContext) -> Option<GuardStateKind> {
        let policy = self.variant.policy();

        let destination = ctx.locomotion.destination();
        face_towards(ctx, destination, core.config.look_rotation_speed);
        play_locomotion_animation(ctx);

        if has_arrived(&*ctx.locomotion, WAYPOINT_TOLERANCE) {
            ctx.locomotion.stop();
            return (policy.on_waypoint_reached)(self, core, ctx);
        }

        if core.anomaly_visible(&*ctx.sensor) {
            return (policy.on_anomaly_spotted)(self, core, ctx);
        }

        if core.primary_visible(&*ctx.sensor) {
            return Some(GuardStateKind::TargetReached);
        }

        None
    }

    pub fn exit(&mut self, _core: &mut GuardCore, ctx: &mut GuardContext) {
        if let Some(marker) = self.marker.take() {
            ctx.scenery.despawn_marker(marker);
        }
    }
}
