//! Escape trigger (win condition)

use bevy::prelude::*;

use super::camera::CameraFraming;
use crate::components::{ExitZone, NavAgent, Prisoner};
use crate::guard::ports::Locomotion;
use crate::guard::GuardStateMachine;
use crate::perception::VisionSensor;

/// Prisoner дошёл до exit zone
#[derive(Event, Debug, Clone, Copy)]
pub struct Escaped {
    pub prisoner: Entity,
}

/// Система: prisoner в exit zone → побег
///
/// Все guard'ы выключаются (state machine, sensor, навигация),
/// prisoner переносится в win point, камера переходит наружу.
pub fn detect_escape(
    zones: Query<(&ExitZone, &Transform)>,
    mut prisoners: Query<(Entity, &mut Prisoner, &mut Transform, &mut NavAgent), Without<ExitZone>>,
    mut guards: Query<(&mut GuardStateMachine, &mut VisionSensor, &mut NavAgent), Without<Prisoner>>,
    mut framing: ResMut<CameraFraming>,
    mut escaped_events: EventWriter<Escaped>,
) {
    for (prisoner_entity, mut prisoner, mut transform, mut agent) in prisoners.iter_mut() {
        if prisoner.escaped || prisoner.caught {
            continue;
        }

        let Some(zone) = zones
            .iter()
            .find(|(zone, zone_transform)| zone.contains(zone_transform.translation, transform.translation))
            .map(|(zone, _)| *zone)
        else {
            continue;
        };

        prisoner.escaped = true;
        agent.stop();
        transform.translation = zone.win_point;

        for (mut machine, mut sensor, mut guard_agent) in guards.iter_mut() {
            machine.disable();
            sensor.deactivate();
            guard_agent.stop();
        }

        framing.set_outside();
        escaped_events.write(Escaped {
            prisoner: prisoner_entity,
        });

        crate::log_info(&format!("🏁 Prisoner {:?} escaped", prisoner_entity));
    }
}
