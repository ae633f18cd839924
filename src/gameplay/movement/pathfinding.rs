//! Waypoint path state followed by the mover.

use bevy::prelude::*;

use super::navigation::{PathQuery, PathStatus};

/// Waypoint path computed from the navigable surface.
#[derive(Debug, Clone, Reflect, Default, PartialEq)]
pub struct NavPath {
    /// World-space waypoints, ending at the reached destination.
    pub waypoints: Vec<Vec3>,
    /// Index of the next waypoint to steer toward.
    pub current_index: usize,
    /// Destination this path was computed for.
    destination: Option<Vec3>,
}

impl NavPath {
    /// Replace the path with the result of a query for `destination`.
    /// An invalid query leaves an empty path.
    pub fn set(&mut self, query: PathQuery, destination: Vec3) {
        self.waypoints = if query.status == PathStatus::Invalid {
            Vec::new()
        } else {
            query.waypoints
        };
        self.current_index = 0;
        self.destination = Some(destination);
    }

    /// Clear the path (no waypoints).
    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.current_index = 0;
        self.destination = None;
    }

    /// Get the current waypoint, if any remain.
    #[must_use]
    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.waypoints.get(self.current_index).copied()
    }

    /// Advance to the next waypoint. Returns true if there are more waypoints.
    pub fn advance(&mut self) -> bool {
        self.current_index += 1;
        self.current_index < self.waypoints.len()
    }

    /// Whether the path was computed for a destination further than
    /// `tolerance` from `destination`.
    #[must_use]
    pub fn needs_recompute(&self, destination: Vec3, tolerance: f32) -> bool {
        self.destination
            .is_none_or(|computed| computed.distance(destination) > tolerance)
    }
}
