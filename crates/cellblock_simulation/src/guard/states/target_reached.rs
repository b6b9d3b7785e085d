//! TargetReached: guard поймал prisoner'а
//!
//! Последовательность:
//! 1. enter: prisoner caught, guard стоит, sensor выключен, "!" marker
//! 2. через reach_delay guard идёт к prisoner'у (один раз)
//! 3. дошёл → через PROCESS_DELAY обрабатывает поимку и возвращается в Patrol

use super::{face_towards, has_arrived, play_locomotion_animation};
use crate::components::MarkerKind;
use crate::guard::machine::{GuardCore, GuardStateKind};
use crate::guard::ports::{GuardContext, MarkerHandle, MessageDuration};

pub const CATCH_MESSAGE: &str = "Stop right there!";
/// Дистанция, на которой guard считается дошедшим до prisoner'а
pub const CATCH_DISTANCE: f32 = 1.25;
/// Задержка между приходом и обработкой поимки (секунды)
pub const PROCESS_DELAY: f32 = 2.0;
/// Sensor включается через столько секунд после выхода
pub const SENSOR_WAKE_DELAY: f32 = 1.0;

#[derive(Debug, Clone, Default)]
pub struct TargetReachedState {
    elapsed: f32,
    approach_issued: bool,
    reached: bool,
    process_timer: Option<f32>,
    marker: Option<MarkerHandle>,
}

impl TargetReachedState {
    pub fn enter(&mut self, core: &mut GuardCore, ctx: &mut GuardContext) -> Option<GuardStateKind> {
        ctx.prisoner.mark_caught();
        ctx.locomotion.stop();
        core.deactivate_sensor(ctx.sensor);

        self.marker = Some(ctx.scenery.spawn_marker(MarkerKind::Detection));
        ctx.messages.show(CATCH_MESSAGE, MessageDuration::Persistent);
        None
    }

    pub fn update(&mut self, core: &mut GuardCore, ctx: &mut GuardContext) -> Option<GuardStateKind> {
        let target = ctx.prisoner.target_position();
        face_towards(ctx, target, core.config.look_rotation_speed);
        play_locomotion_animation(ctx);

        if let Some(timer) = self.process_timer.as_mut() {
            *timer -= ctx.delta;
            if *timer <= 0.0 {
                self.process_timer = None;
                return self.process_target(core, ctx);
            }
            return None;
        }

        self.elapsed += ctx.delta;

        if !self.approach_issued {
            if self.elapsed >= core.config.reach_delay {
                ctx.locomotion.set_destination(target);
                self.approach_issued = true;
            }
            return None;
        }

        if !self.reached && has_arrived(&*ctx.locomotion, CATCH_DISTANCE) {
            ctx.locomotion.stop();
            self.reached = true;
            self.process_timer = Some(PROCESS_DELAY);
        }

        None
    }

    /// Поимка обработана: всё возвращается в исходное состояние
    fn process_target(&mut self, core: &mut GuardCore, ctx: &mut GuardContext) -> Option<GuardStateKind> {
        ctx.messages.hide();
        if let Some(marker) = self.marker.take() {
            ctx.scenery.despawn_marker(marker);
        }

        ctx.body.teleport(core.respawn);
        ctx.prisoner.respawn();
        ctx.prisoner.mark_uncaught();

        ctx.scenery.close_and_lock_anomaly();
        ctx.scenery.reset_camera_framing();

        core.patrol.reset();
        Some(GuardStateKind::Patrol)
    }

    pub fn exit(&mut self, core: &mut GuardCore, ctx: &mut GuardContext) {
        ctx.locomotion.stop();
        core.schedule_sensor_wake(SENSOR_WAKE_DELAY);

        if let Some(marker) = self.marker.take() {
            ctx.scenery.despawn_marker(marker);
        }
    }
}
