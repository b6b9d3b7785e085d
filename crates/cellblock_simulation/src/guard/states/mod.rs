//! Guard states
//!
//! Patrol и Alert: один route-following state с разными policy
//! (`RouteVariant`). Остальные state'ы: отдельные структуры.
//! Каждый state:
//! - enter: может сразу вернуть запрос перехода
//! - update: вызывается раз в tick, возвращает запрос перехода
//! - exit: убирает за собой (markers, sensor, footprint)

use bevy::prelude::*;

pub mod alert;
pub mod patrol;
pub mod pause;
pub mod sleep;
pub mod target_reached;

pub use patrol::{RoutePolicy, RouteState, RouteVariant};
pub use pause::PauseState;
pub use sleep::{SleepPhase, SleepState};
pub use target_reached::TargetReachedState;

use super::machine::{GuardCore, GuardStateKind};
use super::ports::{GuardContext, Locomotion};
use crate::components::AnimationClip;

/// Активный state guard'а
#[derive(Debug, Clone)]
pub enum GuardState {
    Route(RouteState),
    Pause(PauseState),
    Sleep(SleepState),
    TargetReached(TargetReachedState),
}

impl GuardState {
    pub fn for_kind(kind: GuardStateKind) -> Self {
        match kind {
            GuardStateKind::Patrol => GuardState::Route(RouteState::new(RouteVariant::Patrol)),
            GuardStateKind::Alert => GuardState::Route(RouteState::new(RouteVariant::Alert)),
            GuardStateKind::Pause => GuardState::Pause(PauseState::default()),
            GuardStateKind::Sleep => GuardState::Sleep(SleepState::default()),
            GuardStateKind::TargetReached => GuardState::TargetReached(TargetReachedState::default()),
        }
    }

    pub fn kind(&self) -> GuardStateKind {
        match self {
            GuardState::Route(route) => route.variant().kind(),
            GuardState::Pause(_) => GuardStateKind::Pause,
            GuardState::Sleep(_) => GuardStateKind::Sleep,
            GuardState::TargetReached(_) => GuardStateKind::TargetReached,
        }
    }

    pub fn enter(&mut self, core: &mut GuardCore, ctx: &mut GuardContext) -> Option<GuardStateKind> {
        match self {
            GuardState::Route(state) => state.enter(core, ctx),
            GuardState::Pause(state) => state.enter(core, ctx),
            GuardState::Sleep(state) => state.enter(core, ctx),
            GuardState::TargetReached(state) => state.enter(core, ctx),
        }
    }

    pub fn update(&mut self, core: &mut GuardCore, ctx: &mut GuardContext) -> Option<GuardStateKind> {
        match self {
            GuardState::Route(state) => state.update(core, ctx),
            GuardState::Pause(state) => state.update(core, ctx),
            GuardState::Sleep(state) => state.update(core, ctx),
            GuardState::TargetReached(state) => state.update(core, ctx),
        }
    }

    pub fn exit(&mut self, core: &mut GuardCore, ctx: &mut GuardContext) {
        match self {
            GuardState::Route(state) => state.exit(core, ctx),
            GuardState::Pause(_) => {}
            GuardState::Sleep(state) => state.exit(core, ctx),
            GuardState::TargetReached(state) => state.exit(core, ctx),
        }
    }
}

/// Плавный поворот guard'а к точке (только yaw)
pub(crate) fn face_towards(ctx: &mut GuardContext, target: Vec3, speed: f32) {
    let offset = target - ctx.body.translation();
    if Vec2::new(offset.x, offset.z).length_squared() < 1e-6 {
        return;
    }

    // forward = -Z
    let goal = Quat::from_rotation_y(f32::atan2(-offset.x, -offset.z));
    let t = (ctx.delta * speed).clamp(0.0, 1.0);
    let rotation = ctx.body.rotation().slerp(goal, t);
    ctx.body.set_rotation(rotation);
}

/// Idle стоя, Patrol в движении
pub(crate) fn play_locomotion_animation(ctx: &mut GuardContext) {
    let clip = if ctx.locomotion.velocity() == Vec3::ZERO {
        AnimationClip::Idle
    } else {
        AnimationClip::Patrol
    };
    ctx.animator.play(clip);
}

pub(crate) fn has_arrived(locomotion: &dyn Locomotion, tolerance: f32) -> bool {
    !locomotion.is_path_pending() && locomotion.remaining_distance() < tolerance
}
