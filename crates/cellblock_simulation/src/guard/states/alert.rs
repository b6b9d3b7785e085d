//! Alert: guard заметил открытую дверь и идёт по alert route

use super::patrol::{RoutePolicy, RouteState};
use crate::components::MarkerKind;
use crate::guard::machine::{GuardCore, GuardStateKind};
use crate::guard::ports::{GuardContext, MessageDuration};

pub const ALERT_MESSAGE: &str = "Huh? The door is open!";
pub const ALERT_MESSAGE_SECONDS: f32 = 3.0;

pub const ALERT_POLICY: RoutePolicy = RoutePolicy {
    on_waypoint_reached: keep_moving,
    on_anomaly_spotted: already_alerted,
};

fn already_alerted(_: &mut RouteState, _: &mut GuardCore, _: &mut GuardContext) -> Option<GuardStateKind> {
    None
}

fn keep_moving(state: &mut RouteState, core: &mut GuardCore, ctx: &mut GuardContext) -> Option<GuardStateKind> {
    state.navigate_to_next(core, ctx);
    None
}

/// Вход в Alert (до начала движения)
pub(super) fn raise_alert(state: &mut RouteState, core: &mut GuardCore, ctx: &mut GuardContext) {
    if let Some(anomaly) = core.targets.anomaly {
        ctx.sensor.ignore(anomaly);
    }
    ctx.scenery.neutralize_anomaly();

    state.marker = Some(ctx.scenery.spawn_marker(MarkerKind::Alert));
    ctx.messages.show(ALERT_MESSAGE, MessageDuration::Timed(ALERT_MESSAGE_SECONDS));

    core.alert.reset();
}
