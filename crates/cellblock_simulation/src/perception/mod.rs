//! Perception module: visibility sensor guard'а
//!
//! Порядок в FixedUpdate (SimulationSet::Perception):
//! 1. scan_vision_sensors: cadence + FOV + line of sight + debounce
//!
//! Behavior читает результат через VisionSensor::is_visible в том же tick'е.

use bevy::prelude::*;

pub mod sensor;
pub mod spatial;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod sensor_tests;

pub use sensor::{horizontal_angle, ScanOutcome, SensorConfig, VisionSensor};
pub use spatial::{Candidate, SpatialQuery, SpatialSnapshot};
pub use systems::scan_vision_sensors;

use crate::SimulationSet;

/// Perception Plugin
pub struct PerceptionPlugin;

impl Plugin for PerceptionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, scan_vision_sensors.in_set(SimulationSet::Perception));
    }
}
