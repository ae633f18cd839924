//! Navigable surface abstraction: path queries and point projection.

use std::sync::Arc;

use bevy::prelude::*;

/// Half extent of the default open ground (world units).
const DEFAULT_GROUND_HALF_EXTENT: f32 = 50.0;

/// Completeness of a path query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum PathStatus {
    /// The path reaches the destination.
    Complete,
    /// The path stops at the reachable point closest to the destination.
    Partial,
    /// No path exists.
    Invalid,
}

/// Result of a path query. Ephemeral: never stored beyond the frame that needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct PathQuery {
    /// Waypoints after the start point, ending at the reached point.
    pub waypoints: Vec<Vec3>,
    pub status: PathStatus,
    /// Total length from the start point through every waypoint.
    pub length: f32,
}

impl PathQuery {
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            waypoints: Vec::new(),
            status: PathStatus::Invalid,
            length: 0.0,
        }
    }

    /// Builds a query from `waypoints`, measuring length from `from`.
    #[must_use]
    pub fn through(from: Vec3, waypoints: Vec<Vec3>, status: PathStatus) -> Self {
        let length = waypoints
            .iter()
            .scan(from, |previous, &point| {
                let segment = previous.distance(point);
                *previous = point;
                Some(segment)
            })
            .sum();
        Self {
            waypoints,
            status,
            length,
        }
    }
}

/// Walkable geometry the agent navigates over.
pub trait NavigableSurface: Send + Sync + 'static {
    /// Shortest path from `from` to `to`.
    fn find_path(&self, from: Vec3, to: Vec3) -> PathQuery;

    /// Closest point on the surface to `point`, if one lies within `max_distance`.
    fn project(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;
}

/// The surface every movement query runs against.
#[derive(Resource, Clone)]
pub struct NavSurface(pub Arc<dyn NavigableSurface>);

impl NavSurface {
    pub fn new(surface: impl NavigableSurface) -> Self {
        Self(Arc::new(surface))
    }

    #[must_use]
    pub fn surface(&self) -> &dyn NavigableSurface {
        self.0.as_ref()
    }
}

impl Default for NavSurface {
    fn default() -> Self {
        Self::new(OpenGround::default())
    }
}

/// An unobstructed rectangular floor in the XZ plane.
///
/// Paths are straight lines. A destination outside the floor yields a
/// partial path to the closest point on the edge; a start outside the floor
/// yields no path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenGround {
    pub min: Vec2,
    pub max: Vec2,
    pub height: f32,
}

impl Default for OpenGround {
    fn default() -> Self {
        Self {
            min: Vec2::splat(-DEFAULT_GROUND_HALF_EXTENT),
            max: Vec2::splat(DEFAULT_GROUND_HALF_EXTENT),
            height: 0.0,
        }
    }
}

impl OpenGround {
    fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    fn on_floor(&self, point: Vec2) -> Vec3 {
        Vec3::new(point.x, self.height, point.y)
    }
}

impl NavigableSurface for OpenGround {
    fn find_path(&self, from: Vec3, to: Vec3) -> PathQuery {
        if !self.contains(from.xz()) {
            return PathQuery::invalid();
        }
        let start = self.on_floor(from.xz());
        if self.contains(to.xz()) {
            return PathQuery::through(start, vec![self.on_floor(to.xz())], PathStatus::Complete);
        }
        let edge = to.xz().clamp(self.min, self.max);
        PathQuery::through(start, vec![self.on_floor(edge)], PathStatus::Partial)
    }

    fn project(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        if (point.y - self.height).abs() > max_distance || !self.contains(point.xz()) {
            return None;
        }
        Some(self.on_floor(point.xz()))
    }
}
