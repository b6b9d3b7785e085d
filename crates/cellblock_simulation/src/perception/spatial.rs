//! Spatial queries для sensor'а: radius query + obstruction raycast
//!
//! Sensor не знает про ECS queries, он работает через [`SpatialQuery`].
//! В симуляции реализация: [`SpatialSnapshot`], собранный из Transform'ов
//! перед сканом. Тесты подсовывают собственный snapshot.

use bevy::math::bounding::{Aabb3d, RayCast3d};
use bevy::prelude::*;

use crate::components::DetectionLayer;

/// Кандидат, найденный radius query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub target: Entity,
    pub position: Vec3,
}

/// Spatial query service
pub trait SpatialQuery {
    /// Все тела слоя `layer` в пределах `radius` от `center`
    fn query_radius(&self, center: Vec3, radius: f32, layer: DetectionLayer) -> Vec<Candidate>;

    /// Есть ли тело слоя `layer` на отрезке `from → to` (не дальше `max_distance`)
    fn is_obstructed(&self, from: Vec3, to: Vec3, max_distance: f32, layer: DetectionLayer) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct SpatialBody {
    entity: Entity,
    position: Vec3,
    layer: DetectionLayer,
    half_extents: Option<Vec3>,
}

/// Снимок тел мира на момент скана
#[derive(Debug, Clone, Default)]
pub struct SpatialSnapshot {
    bodies: Vec<SpatialBody>,
}

impl SpatialSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Точечное тело (prisoner): участвует в radius query, луч не блокирует
    pub fn insert_point(&mut self, entity: Entity, position: Vec3, layer: DetectionLayer) {
        self.bodies.push(SpatialBody {
            entity,
            position,
            layer,
            half_extents: None,
        });
    }

    /// Тело-коробка (стена, дверь)
    pub fn insert_box(&mut self, entity: Entity, center: Vec3, half_extents: Vec3, layer: DetectionLayer) {
        self.bodies.push(SpatialBody {
            entity,
            position: center,
            layer,
            half_extents: Some(half_extents.abs()),
        });
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl SpatialQuery for SpatialSnapshot {
    fn query_radius(&self, center: Vec3, radius: f32, layer: DetectionLayer) -> Vec<Candidate> {
        self.bodies
            .iter()
            .filter(|body| body.layer == layer && body.position.distance(center) <= radius)
            .map(|body| Candidate {
                target: body.entity,
                position: body.position,
            })
            .collect()
    }

    fn is_obstructed(&self, from: Vec3, to: Vec3, max_distance: f32, layer: DetectionLayer) -> bool {
        // Нулевой отрезок ничем не перекрыт
        let Ok(direction) = Dir3::new(to - from) else {
            return false;
        };

        let ray = RayCast3d::new(from, direction, max_distance.max(0.0));

        self.bodies
            .iter()
            .filter(|body| body.layer == layer)
            .filter_map(|body| body.half_extents.map(|half| Aabb3d::new(body.position, half)))
            .any(|aabb| ray.aabb_intersection_at(&aabb).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_radius_filters_by_layer_and_distance() {
        let mut snapshot = SpatialSnapshot::new();
        let near = Entity::from_raw(1);
        let far = Entity::from_raw(2);
        let wall = Entity::from_raw(3);

        snapshot.insert_point(near, Vec3::new(0.0, 0.0, -3.0), DetectionLayer::Target);
        snapshot.insert_point(far, Vec3::new(0.0, 0.0, -30.0), DetectionLayer::Target);
        snapshot.insert_box(wall, Vec3::new(0.0, 0.0, -1.0), Vec3::ONE, DetectionLayer::Obstacle);

        let found = snapshot.query_radius(Vec3::ZERO, 8.0, DetectionLayer::Target);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target, near);
    }

    #[test]
    fn test_wall_between_blocks_line_of_sight() {
        let mut snapshot = SpatialSnapshot::new();
        snapshot.insert_box(
            Entity::from_raw(7),
            Vec3::new(0.0, 0.0, -2.0),
            Vec3::new(2.0, 2.0, 0.1),
            DetectionLayer::Obstacle,
        );

        let target = Vec3::new(0.0, 0.0, -5.0);
        assert!(snapshot.is_obstructed(Vec3::ZERO, target, 5.0, DetectionLayer::Obstacle));

        // Стена за целью не мешает
        assert!(!snapshot.is_obstructed(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 1.0, DetectionLayer::Obstacle));

        // Другой слой не учитывается
        assert!(!snapshot.is_obstructed(Vec3::ZERO, target, 5.0, DetectionLayer::Inert));
    }
}
