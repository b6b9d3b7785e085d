//! Perception systems

use bevy::prelude::*;

use super::sensor::VisionSensor;
use super::spatial::SpatialSnapshot;
use crate::components::{DetectionLayer, ObstacleShape};

/// Система: скан всех VisionSensor'ов
///
/// Snapshot тел собирается один раз за tick и только если хотя бы одному
/// sensor'у пора сканировать.
pub fn scan_vision_sensors(
    mut sensors: Query<(Entity, &mut VisionSensor, &Transform)>,
    bodies: Query<(Entity, &Transform, &DetectionLayer, Option<&ObstacleShape>)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let now = time.elapsed_secs_f64();
    let mut snapshot: Option<SpatialSnapshot> = None;

    for (observer, mut sensor, transform) in sensors.iter_mut() {
        if !sensor.tick_scan(delta) || !sensor.is_active() {
            continue;
        }

        let space = snapshot.get_or_insert_with(|| build_snapshot(&bodies));
        let outcome = sensor.scan(transform.translation, transform.forward().as_vec3(), now, &*space);

        for target in outcome.confirmed {
            crate::log(&format!("👁️ Sensor {:?}: target {:?} confirmed visible", observer, target));
        }
        for target in outcome.lost {
            crate::log(&format!("👻 Sensor {:?}: lost sight of {:?}", observer, target));
        }
    }
}

fn build_snapshot(bodies: &Query<(Entity, &Transform, &DetectionLayer, Option<&ObstacleShape>)>) -> SpatialSnapshot {
    let mut snapshot = SpatialSnapshot::new();

    for (entity, transform, layer, shape) in bodies.iter() {
        if *layer == DetectionLayer::Inert {
            continue;
        }

        match shape {
            Some(shape) => snapshot.insert_box(entity, transform.translation, shape.half_extents, *layer),
            None => snapshot.insert_point(entity, transform.translation, *layer),
        }
    }

    snapshot
}
