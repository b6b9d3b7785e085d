//! Tests for VisionSensor (debounce, FOV, line of sight).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::components::DetectionLayer;
    use crate::perception::{horizontal_angle, SensorConfig, SpatialSnapshot, VisionSensor};
    use crate::FIXED_STEP;

    const FORWARD: Vec3 = Vec3::NEG_Z;

    fn prisoner() -> Entity {
        Entity::from_raw(10)
    }

    fn sensor_with_delay(delay: f32) -> VisionSensor {
        VisionSensor::new(SensorConfig {
            detection_delay: delay,
            ..Default::default()
        })
    }

    fn space_with_target_at(position: Vec3) -> SpatialSnapshot {
        let mut space = SpatialSnapshot::new();
        space.insert_point(prisoner(), position, DetectionLayer::Target);
        space
    }

    #[test]
    fn test_sensor_config_default() {
        let config = SensorConfig::default();
        assert_eq!(config.view_radius, 8.0);
        assert_eq!(config.view_angle, 180.0);
        assert_eq!(config.detection_delay, 1.0);
        assert_eq!(config.scan_interval, 0.2);
    }

    #[test]
    fn test_sensor_config_sanitized_clamps_invalid_values() {
        let config = SensorConfig {
            view_radius: -3.0,
            view_angle: 720.0,
            detection_delay: f32::NAN,
            scan_interval: 0.5,
        }
        .sanitized();

        assert_eq!(config.view_radius, 0.0);
        assert_eq!(config.view_angle, 360.0);
        assert_eq!(config.detection_delay, 1.0);
        assert_eq!(config.scan_interval, 0.5);
    }

    #[test]
    fn test_debounce_confirms_only_after_delay() {
        let mut sensor = sensor_with_delay(1.0);
        let space = space_with_target_at(Vec3::new(0.0, 0.0, -4.0));

        sensor.scan(Vec3::ZERO, FORWARD, 5.0, &space);
        assert!(!sensor.is_visible(prisoner()));
        assert_eq!(sensor.first_seen(prisoner()), Some(5.0));

        sensor.scan(Vec3::ZERO, FORWARD, 5.9, &space);
        assert!(!sensor.is_visible(prisoner()));

        let outcome = sensor.scan(Vec3::ZERO, FORWARD, 6.0, &space);
        assert!(sensor.is_visible(prisoner()));
        assert_eq!(outcome.confirmed, vec![prisoner()]);
        assert!(sensor.has_any_visible());
        assert_eq!(sensor.visible_targets(), vec![prisoner()]);
    }

    #[test]
    fn test_exit_is_immediate_and_reentry_restarts_debounce() {
        let mut sensor = sensor_with_delay(1.0);
        let visible = space_with_target_at(Vec3::new(0.0, 0.0, -4.0));
        // За спиной guard'а
        let behind = space_with_target_at(Vec3::new(0.0, 0.0, 4.0));

        sensor.scan(Vec3::ZERO, FORWARD, 0.0, &visible);
        sensor.scan(Vec3::ZERO, FORWARD, 1.0, &visible);
        assert!(sensor.is_visible(prisoner()));

        let outcome = sensor.scan(Vec3::ZERO, FORWARD, 1.2, &behind);
        assert!(!sensor.is_visible(prisoner()));
        assert_eq!(outcome.lost, vec![prisoner()]);
        assert_eq!(sensor.first_seen(prisoner()), None);

        sensor.scan(Vec3::ZERO, FORWARD, 1.4, &visible);
        assert_eq!(sensor.first_seen(prisoner()), Some(1.4));
        sensor.scan(Vec3::ZERO, FORWARD, 2.2, &visible);
        assert!(!sensor.is_visible(prisoner()));
    }

    #[test]
    fn test_target_leaving_radius_is_pruned() {
        let mut sensor = sensor_with_delay(0.5);
        let near = space_with_target_at(Vec3::new(0.0, 0.0, -2.0));
        let gone = SpatialSnapshot::new();

        sensor.scan(Vec3::ZERO, FORWARD, 0.0, &near);
        sensor.scan(Vec3::ZERO, FORWARD, 0.6, &near);
        assert!(sensor.is_visible(prisoner()));

        sensor.scan(Vec3::ZERO, FORWARD, 0.8, &gone);
        assert!(!sensor.is_visible(prisoner()));
        assert_eq!(sensor.first_seen(prisoner()), None);
    }

    #[test]
    fn test_zero_delay_confirms_on_first_scan() {
        let mut sensor = sensor_with_delay(0.0);
        let space = space_with_target_at(Vec3::new(1.0, 0.0, -3.0));

        sensor.scan(Vec3::ZERO, FORWARD, 3.0, &space);
        assert!(sensor.is_visible(prisoner()));
    }

    #[test]
    fn test_wall_blocks_detection() {
        let mut sensor = sensor_with_delay(0.0);
        let mut space = space_with_target_at(Vec3::new(0.0, 0.0, -6.0));
        space.insert_box(
            Entity::from_raw(99),
            Vec3::new(0.0, 0.0, -3.0),
            Vec3::new(3.0, 2.0, 0.2),
            DetectionLayer::Obstacle,
        );

        sensor.scan(Vec3::ZERO, FORWARD, 0.0, &space);
        assert!(!sensor.is_visible(prisoner()));
        assert_eq!(sensor.first_seen(prisoner()), None);
    }

    #[test]
    fn test_target_outside_radius_is_not_seen() {
        let mut sensor = sensor_with_delay(0.0);
        let space = space_with_target_at(Vec3::new(0.0, 0.0, -8.5));

        sensor.scan(Vec3::ZERO, FORWARD, 0.0, &space);
        assert!(!sensor.has_any_visible());
    }

    #[test]
    fn test_activate_is_idempotent_and_clears_records() {
        let mut sensor = sensor_with_delay(0.0);
        let space = space_with_target_at(Vec3::new(0.0, 0.0, -2.0));

        sensor.scan(Vec3::ZERO, FORWARD, 0.0, &space);
        assert!(sensor.is_visible(prisoner()));

        sensor.activate();
        sensor.activate();
        assert!(sensor.is_active());
        assert!(!sensor.has_any_visible());
        assert_eq!(sensor.first_seen(prisoner()), None);

        sensor.deactivate();
        sensor.deactivate();
        assert!(!sensor.is_active());

        // Неактивный sensor не сканирует
        sensor.scan(Vec3::ZERO, FORWARD, 1.0, &space);
        assert!(!sensor.has_any_visible());
        assert_eq!(sensor.first_seen(prisoner()), None);
    }

    #[test]
    fn test_ignore_excludes_target_until_reactivated() {
        let mut sensor = sensor_with_delay(0.0);
        let space = space_with_target_at(Vec3::new(0.0, 0.0, -2.0));

        sensor.scan(Vec3::ZERO, FORWARD, 0.0, &space);
        sensor.ignore(prisoner());
        assert!(!sensor.is_visible(prisoner()));

        sensor.scan(Vec3::ZERO, FORWARD, 0.2, &space);
        assert!(!sensor.is_visible(prisoner()));

        sensor.activate();
        sensor.scan(Vec3::ZERO, FORWARD, 0.4, &space);
        assert!(sensor.is_visible(prisoner()));
    }

    #[test]
    fn test_scan_cadence() {
        let mut sensor = VisionSensor::new(SensorConfig {
            scan_interval: 0.2,
            ..Default::default()
        });

        // Первый tick сканирует сразу
        assert!(sensor.tick_scan(0.1));
        assert!(!sensor.tick_scan(0.1));
        assert!(sensor.tick_scan(0.1));
    }

    #[test]
    fn test_scan_cadence_at_fixed_step() {
        let mut sensor = VisionSensor::default();
        let delta = FIXED_STEP.as_secs_f32();

        // 0.2s при 60Hz = ровно 12 tick'ов, без дрейфа
        let scans: Vec<usize> = (0..100).filter(|_| sensor.tick_scan(delta)).collect();
        assert_eq!(scans, vec![0, 12, 24, 36, 48, 60, 72, 84, 96]);
    }

    #[test]
    fn test_scan_cadence_skips_missed_scans_after_long_tick() {
        let mut sensor = VisionSensor::default();

        assert!(sensor.tick_scan(1.0));
        // Один скан после простоя, а не пять подряд
        assert!(sensor.tick_scan(0.1));
        assert!(!sensor.tick_scan(0.1));
        assert!(sensor.tick_scan(0.1));
    }

    #[test]
    fn test_debounce_at_fixed_step_confirms_after_sixty_ticks() {
        let mut sensor = sensor_with_delay(1.0);
        let space = space_with_target_at(Vec3::new(0.0, 0.0, -4.0));
        let step = FIXED_STEP.as_secs_f64();

        let mut seen_at = None;
        let mut confirmed_at = None;
        for tick in 0..120 {
            if !sensor.tick_scan(FIXED_STEP.as_secs_f32()) {
                continue;
            }
            sensor.scan(Vec3::ZERO, FORWARD, tick as f64 * step, &space);

            if seen_at.is_none() && sensor.first_seen(prisoner()).is_some() {
                seen_at = Some(tick);
            }
            if confirmed_at.is_none() && sensor.is_visible(prisoner()) {
                confirmed_at = Some(tick);
            }
        }

        assert_eq!(seen_at, Some(0));
        assert_eq!(confirmed_at, Some(60));
    }

    #[test]
    fn test_target_on_fov_edge_is_outside() {
        let edge = Vec3::new(4.0, 0.0, 0.0);
        let edge_angle = horizontal_angle(FORWARD, edge);
        assert!((edge_angle - 90.0).abs() < 1e-3);

        // Половина угла обзора совпадает с углом до цели бит в бит
        let mut sensor = VisionSensor::new(SensorConfig {
            view_angle: edge_angle * 2.0,
            detection_delay: 0.0,
            ..Default::default()
        });
        sensor.scan(Vec3::ZERO, FORWARD, 0.0, &space_with_target_at(edge));
        assert!(!sensor.is_visible(prisoner()));
        assert!(sensor.first_seen(prisoner()).is_none());

        // Чуть впереди границы: уже в поле зрения
        sensor.scan(Vec3::ZERO, FORWARD, 0.2, &space_with_target_at(Vec3::new(4.0, 0.0, -0.1)));
        assert!(sensor.is_visible(prisoner()));
    }

    #[test]
    fn test_default_view_angle_excludes_target_at_right_angle() {
        let mut sensor = sensor_with_delay(0.0);

        sensor.scan(Vec3::ZERO, FORWARD, 0.0, &space_with_target_at(Vec3::new(-4.0, 0.0, 0.0)));
        assert!(!sensor.is_visible(prisoner()));
    }

    #[test]
    fn test_horizontal_angle_ignores_height() {
        assert!(horizontal_angle(FORWARD, Vec3::new(0.0, 5.0, -1.0)).abs() < 1e-4);
        assert!((horizontal_angle(FORWARD, Vec3::X) - 90.0).abs() < 1e-4);
        assert_eq!(horizontal_angle(FORWARD, Vec3::Y), 0.0);
    }
}
