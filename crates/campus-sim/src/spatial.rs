//! Spatial queries: can something stand at a world point?
//!
//! A point is blocked by the playable-area boundary or by any registered
//! building footprint. Parking lots never block. Buildings whose footprint
//! has not been registered yet do not block either.

use std::collections::BTreeMap;

use campus_core::config::PlayfieldExtent;
use campus_core::shapes::Shape;
use campus_core::types::{BuildingId, Vec2};

#[derive(Debug, Clone, Default)]
pub struct SpatialQuery {
    extent: PlayfieldExtent,
    /// Boundary outline the point must not touch. When absent the
    /// rectangular `extent` is used instead.
    boundary: Option<Shape>,
    obstacles: BTreeMap<BuildingId, Shape>,
}

impl SpatialQuery {
    pub fn new(extent: PlayfieldExtent) -> Self {
        Self {
            extent,
            boundary: None,
            obstacles: BTreeMap::new(),
        }
    }

    pub fn set_boundary(&mut self, boundary: Option<Shape>) {
        self.boundary = boundary;
    }

    pub fn boundary(&self) -> Option<&Shape> {
        self.boundary.as_ref()
    }

    /// Register (or replace) the solid footprint of a building.
    pub fn register_obstacle(&mut self, id: BuildingId, shape: Shape) {
        self.obstacles.insert(id, shape);
    }

    pub fn remove_obstacle(&mut self, id: &BuildingId) -> Option<Shape> {
        self.obstacles.remove(id)
    }

    /// Whether `point` is inside the playable area and clear of buildings.
    pub fn can_occupy(&self, point: Vec2) -> bool {
        let inside_area = match &self.boundary {
            Some(boundary) => !boundary.contains(point),
            None => self.extent.contains(point),
        };
        if !inside_area {
            return false;
        }

        !self
            .obstacles
            .iter()
            .any(|(id, shape)| !id.is_parking() && shape.contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> SpatialQuery {
        let mut q = SpatialQuery::new(PlayfieldExtent::default());
        q.register_obstacle(BuildingId::new("library"), Shape::rect(100.0, 100.0, 50.0, 50.0));
        q.register_obstacle(
            BuildingId::new("parking_south"),
            Shape::rect(300.0, 300.0, 80.0, 40.0),
        );
        q
    }

    #[test]
    fn open_ground_is_free() {
        assert!(query().can_occupy(Vec2::new(500.0, 500.0)));
    }

    #[test]
    fn building_blocks_including_edge() {
        let q = query();
        assert!(!q.can_occupy(Vec2::new(120.0, 120.0)));
        assert!(!q.can_occupy(Vec2::new(100.0, 125.0)));
        assert!(q.can_occupy(Vec2::new(99.0, 125.0)));
    }

    #[test]
    fn parking_never_blocks() {
        assert!(query().can_occupy(Vec2::new(320.0, 320.0)));
    }

    #[test]
    fn unregistered_building_does_not_block() {
        let mut q = query();
        q.remove_obstacle(&BuildingId::new("library"));
        assert!(q.can_occupy(Vec2::new(120.0, 120.0)));
    }

    #[test]
    fn extent_fallback_when_no_boundary() {
        let q = query();
        assert!(q.can_occupy(Vec2::new(0.0, 0.0)));
        assert!(q.can_occupy(Vec2::new(1920.0, 1080.0)));
        assert!(!q.can_occupy(Vec2::new(-1.0, 500.0)));
        assert!(!q.can_occupy(Vec2::new(500.0, 1081.0)));
    }

    #[test]
    fn boundary_line_replaces_extent() {
        let mut q = query();
        q.set_boundary(Some(Shape::Polyline {
            points: vec![Vec2::new(0.0, 50.0), Vec2::new(1000.0, 50.0)],
            half_width: 3.0,
        }));
        assert!(!q.can_occupy(Vec2::new(400.0, 52.0)), "touching the line");
        assert!(q.can_occupy(Vec2::new(400.0, 60.0)));
        // The rectangle no longer applies once a boundary is configured.
        assert!(q.can_occupy(Vec2::new(-10.0, 500.0)));
    }
}
