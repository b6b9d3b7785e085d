//! Sleep: guard засыпает на посту
//!
//! FallingAsleep (clip * 3.5) → Asleep (sleep_duration, лёжа)
//! → WakingUp (clip * 2.0) → Grace (2 s) → Patrol.
//! Sensor выключен всё это время.

use crate::guard::machine::{GuardCore, GuardStateKind};
use crate::guard::ports::GuardContext;
use crate::components::{AnimationClip, Footprint};

/// Множитель длины clip'а FallAsleep
pub const FALL_ASLEEP_HOLD_FACTOR: f32 = 3.5;
/// Множитель длины clip'а WakeUp
pub const WAKE_UP_HOLD_FACTOR: f32 = 2.0;
/// Пауза после пробуждения до возврата в Patrol (секунды)
pub const WAKE_GRACE_SECONDS: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SleepPhase {
    #[default]
    FallingAsleep,
    Asleep,
    WakingUp,
    Grace,
    Done,
}

#[derive(Debug, Clone, Default)]
pub struct SleepState {
    phase: SleepPhase,
    /// Время до конца текущей фазы
    remaining: f32,
    /// Footprint до засыпания (None: не засыпали)
    standing: Option<Footprint>,
}

impl SleepState {
    pub fn enter(&mut self, core: &mut GuardCore, ctx: &mut GuardContext) -> Option<GuardStateKind> {
        if core.config.sleep_duration <= 0.0 {
            self.phase = SleepPhase::Done;
            return Some(GuardStateKind::Patrol);
        }

        core.deactivate_sensor(ctx.sensor);
        ctx.locomotion.stop();
        self.standing = Some(ctx.body.footprint());

        ctx.animator.play(AnimationClip::FallAsleep);
        self.phase = SleepPhase::FallingAsleep;
        self.remaining = ctx.animator.current_state_length() * FALL_ASLEEP_HOLD_FACTOR;
        None
    }

    pub fn update(&mut self, core: &mut GuardCore, ctx: &mut GuardContext) -> Option<GuardStateKind> {
        self.remaining -= ctx.delta;
        if self.remaining > 0.0 {
            return None;
        }

        match self.phase {
            SleepPhase::FallingAsleep => {
                ctx.body.set_footprint(Footprint::PRONE);
                self.phase = SleepPhase::Asleep;
                self.remaining = core.config.sleep_duration;
                None
            }
            SleepPhase::Asleep => {
                ctx.animator.play(AnimationClip::WakeUp);
                self.phase = SleepPhase::WakingUp;
                self.remaining = ctx.animator.current_state_length() * WAKE_UP_HOLD_FACTOR;
                None
            }
            SleepPhase::WakingUp => {
                if let Some(standing) = self.standing {
                    ctx.body.set_footprint(standing);
                }
                self.phase = SleepPhase::Grace;
                self.remaining = WAKE_GRACE_SECONDS;
                None
            }
            SleepPhase::Grace | SleepPhase::Done => {
                self.phase = SleepPhase::Done;
                Some(GuardStateKind::Patrol)
            }
        }
    }

    pub fn exit(&mut self, _core: &mut GuardCore, ctx: &mut GuardContext) {
        if let Some(standing) = self.standing.take() {
            ctx.body.set_footprint(standing);
        }
        ctx.sensor.activate();
    }
}
