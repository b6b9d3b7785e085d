//! Pause: guard стоит на waypoint'е и смотрит в сторону look target

use bevy::prelude::*;
use rand::Rng;

use super::face_towards;
use crate::components::AnimationClip;
use crate::guard::machine::{GuardCore, GuardStateKind};
use crate::guard::ports::GuardContext;

#[derive(Debug, Clone, Default)]
pub struct PauseState {
    look_target: Option<Vec3>,
    elapsed: f32,
}

impl PauseState {
    pub fn enter(&mut self, core: &mut GuardCore, _ctx: &mut GuardContext) -> Option<GuardStateKind> {
        if core.config.pause_duration <= 0.0 {
            return Some(GuardStateKind::Patrol);
        }

        self.look_target = core.patrol.current().look_target;
        self.elapsed = 0.0;
        None
    }

    pub fn update(&mut self, core: &mut GuardCore, ctx: &mut GuardContext) -> Option<GuardStateKind> {
        self.elapsed += ctx.delta;

        if self.elapsed > core.config.pause_duration {
            let roll: f32 = ctx.rng.gen();
            return if roll < core.config.chance_to_sleep {
                Some(GuardStateKind::Sleep)
            } else {
                Some(GuardStateKind::Patrol)
            };
        }

        if let Some(look_target) = self.look_target {
            face_towards(ctx, look_target, core.config.look_rotation_speed);
        }
        ctx.animator.play(AnimationClip::Idle);

        if core.anomaly_visible(&*ctx.sensor) {
            return Some(GuardStateKind::Alert);
        }

        if core.primary_visible(&*ctx.sensor) {
            return Some(GuardStateKind::TargetReached);
        }

        None
    }
}
