//! Guard systems и ECS adapters для коллабораторов

use bevy::prelude::*;

use super::machine::GuardStateMachine;
use super::ports::{DetectionStatus, GuardBody, GuardContext, Locomotion, MarkerHandle, Scenery};
use crate::components::{
    AnimationPlayer, Footprint, MarkerKind, NavAgent, Prisoner, RespawnPose, SignMarker, SIGN_MARKER_OFFSET,
};
use crate::perception::VisionSensor;
use crate::scene::{CameraFraming, Door, DoorChanged, MessageBoard};
use crate::DeterministicRng;

/// Transform + Footprint guard'а
struct EcsGuardBody<'a> {
    transform: &'a mut Transform,
    footprint: &'a mut Footprint,
}

impl GuardBody for EcsGuardBody<'_> {
    fn translation(&self) -> Vec3 {
        self.transform.translation
    }

    fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }

    fn teleport(&mut self, pose: RespawnPose) {
        self.transform.translation = pose.translation;
        self.transform.rotation = pose.rotation;
    }

    fn footprint(&self) -> Footprint {
        *self.footprint
    }

    fn set_footprint(&mut self, footprint: Footprint) {
        *self.footprint = footprint;
    }
}

/// Prisoner как primary target
struct EcsPrisoner<'a> {
    prisoner: &'a mut Prisoner,
    transform: &'a mut Transform,
    agent: &'a mut NavAgent,
}

impl DetectionStatus for EcsPrisoner<'_> {
    fn target_position(&self) -> Vec3 {
        self.transform.translation
    }

    fn is_caught(&self) -> bool {
        self.prisoner.caught
    }

    fn mark_caught(&mut self) {
        self.prisoner.caught = true;
        self.agent.stop();
        self.agent.halted = true;
    }

    fn mark_uncaught(&mut self) {
        self.prisoner.caught = false;
        self.agent.halted = false;
    }

    fn respawn(&mut self) {
        let pose = self.prisoner.respawn;
        self.transform.translation = pose.translation;
        self.transform.rotation = pose.rotation;
        self.agent.stop();
    }
}

/// Markers, аномалия и камера
struct EcsScenery<'a, 'w, 's, 'e> {
    commands: &'a mut Commands<'w, 's>,
    guard: Entity,
    /// Где появляется marker (следует за guard'ом через follow_sign_markers)
    anchor: Vec3,
    anomaly: Option<(Entity, Mut<'a, Door>)>,
    framing: &'a mut CameraFraming,
    door_changes: &'a mut EventWriter<'e, DoorChanged>,
}

impl Scenery for EcsScenery<'_, '_, '_, '_> {
    fn spawn_marker(&mut self, kind: MarkerKind) -> MarkerHandle {
        let marker = self
            .commands
            .spawn((
                SignMarker {
                    kind,
                    owner: self.guard,
                },
                Transform::from_translation(self.anchor + SIGN_MARKER_OFFSET),
            ))
            .id();
        MarkerHandle(marker)
    }

    fn despawn_marker(&mut self, marker: MarkerHandle) {
        self.commands.entity(marker.0).despawn();
    }

    fn neutralize_anomaly(&mut self) {
        if let Some((_, door)) = self.anomaly.as_mut() {
            door.suppress();
        }
    }

    fn close_and_lock_anomaly(&mut self) {
        if let Some((entity, door)) = self.anomaly.as_mut() {
            door.close_immediately(true);
            self.door_changes.write(DoorChanged { door: *entity });
        }
    }

    fn reset_camera_framing(&mut self) {
        self.framing.reset_inside();
    }
}

/// Система: один tick всех guard'ов
///
/// Собирает GuardContext из компонентов guard'а, его prisoner'а и двери
/// и передаёт его state machine.
#[allow(clippy::too_many_arguments)]
pub fn tick_guard_state_machines(
    mut commands: Commands,
    mut guards: Query<
        (
            Entity,
            &mut GuardStateMachine,
            &mut VisionSensor,
            &mut Transform,
            &mut NavAgent,
            &mut AnimationPlayer,
            &mut Footprint,
        ),
        Without<Prisoner>,
    >,
    mut prisoners: Query<(&mut Prisoner, &mut Transform, &mut NavAgent), Without<GuardStateMachine>>,
    mut doors: Query<&mut Door>,
    mut board: ResMut<MessageBoard>,
    mut framing: ResMut<CameraFraming>,
    mut rng: ResMut<DeterministicRng>,
    mut door_changes: EventWriter<DoorChanged>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (guard, mut machine, mut sensor, mut transform, mut agent, mut animator, mut footprint) in guards.iter_mut() {
        if !machine.is_enabled() {
            continue;
        }

        let targets = machine.core().targets;
        let Ok((mut prisoner, mut prisoner_transform, mut prisoner_agent)) = prisoners.get_mut(targets.primary) else {
            crate::log_warning(&format!("Guard {:?}: primary target {:?} not found", guard, targets.primary));
            continue;
        };

        let anomaly = targets
            .anomaly
            .and_then(|entity| doors.get_mut(entity).ok().map(|door| (entity, door)));
        let anchor = transform.translation;

        let mut body = EcsGuardBody {
            transform: &mut *transform,
            footprint: &mut *footprint,
        };
        let mut status = EcsPrisoner {
            prisoner: &mut *prisoner,
            transform: &mut *prisoner_transform,
            agent: &mut *prisoner_agent,
        };
        let mut scenery = EcsScenery {
            commands: &mut commands,
            guard,
            anchor,
            anomaly,
            framing: &mut *framing,
            door_changes: &mut door_changes,
        };

        let mut ctx = GuardContext {
            body: &mut body,
            locomotion: &mut *agent,
            animator: &mut *animator,
            sensor: &mut *sensor,
            messages: &mut *board,
            prisoner: &mut status,
            scenery: &mut scenery,
            rng: &mut rng.rng,
            delta,
        };

        machine.tick(&mut ctx);
    }
}

/// Система: sign markers следуют за своими guard'ами
pub fn follow_sign_markers(
    mut markers: Query<(&SignMarker, &mut Transform)>,
    owners: Query<&Transform, Without<SignMarker>>,
) {
    for (marker, mut transform) in markers.iter_mut() {
        if let Ok(owner) = owners.get(marker.owner) {
            transform.translation = owner.translation + SIGN_MARKER_OFFSET;
        }
    }
}
