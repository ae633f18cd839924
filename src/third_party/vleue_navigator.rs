//! `vleue_navigator` navmesh backend for the navigable surface.
//!
//! The navmesh is two-dimensional: world XZ maps to navmesh XY and every
//! point on the surface shares one floor height.

use bevy::prelude::*;
use vleue_navigator::prelude::*;

use crate::gameplay::movement::navigation::{NavigableSurface, PathQuery, PathStatus};

/// A flat floor with polygonal holes, backed by a `NavMesh`.
pub struct NavMeshSurface {
    mesh: NavMesh,
    height: f32,
}

impl NavMeshSurface {
    /// Builds a surface covering the rectangle `min..max` (XZ) at `height`,
    /// with every footprint in `obstacles` cut out.
    #[must_use]
    pub fn from_obstacles(min: Vec2, max: Vec2, height: f32, obstacles: &[Rect]) -> Self {
        let edge = vec![
            Vec2::new(min.x, min.y),
            Vec2::new(max.x, min.y),
            Vec2::new(max.x, max.y),
            Vec2::new(min.x, max.y),
        ];
        let holes = obstacles
            .iter()
            .map(|footprint| {
                vec![
                    Vec2::new(footprint.min.x, footprint.min.y),
                    Vec2::new(footprint.max.x, footprint.min.y),
                    Vec2::new(footprint.max.x, footprint.max.y),
                    Vec2::new(footprint.min.x, footprint.max.y),
                ]
            })
            .collect();
        debug!(obstacles = obstacles.len(), "building navmesh surface");
        Self {
            mesh: NavMesh::from_edge_and_obstacles(edge, holes),
            height,
        }
    }

    fn on_floor(&self, point: Vec2) -> Vec3 {
        Vec3::new(point.x, self.height, point.y)
    }
}

impl NavigableSurface for NavMeshSurface {
    fn find_path(&self, from: Vec3, to: Vec3) -> PathQuery {
        let Some(path) = self.mesh.path(from.xz(), to.xz()) else {
            return PathQuery::invalid();
        };
        let waypoints = path
            .path
            .into_iter()
            .map(|point| self.on_floor(point))
            .collect();
        PathQuery::through(self.on_floor(from.xz()), waypoints, PathStatus::Complete)
    }

    fn project(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        if (point.y - self.height).abs() > max_distance || !self.mesh.is_in_mesh(point.xz()) {
            return None;
        }
        Some(self.on_floor(point.xz()))
    }
}
