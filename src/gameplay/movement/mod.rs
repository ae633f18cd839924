//! Movement executor: reachability checks, path following, and the locomotion signal.
//!
//! The mover follows whatever destination it was last given, whether the
//! request came through ownership (`AgentActions::start_move_action`) or from
//! the fighter steering it during pursuit.

pub mod navigation;
pub mod pathfinding;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use self::navigation::{NavSurface, NavigableSurface, PathStatus};
use self::pathfinding::NavPath;
use super::Health;
use super::action::Action;
use super::animation::CombatAnimator;
use crate::GameSet;

// === Constants ===

/// Top speed at a speed fraction of 1.0 (world units per second).
pub const DEFAULT_MAX_SPEED: f32 = 6.0;

/// Longest path a movement command may follow (world units).
pub const DEFAULT_MAX_PATH_LENGTH: f32 = 40.0;

/// A new destination closer than this to the current path's destination
/// keeps the current path.
const REPATH_DISTANCE: f32 = 0.25;

/// Distance at which a waypoint counts as reached.
const WAYPOINT_REACHED_DISTANCE: f32 = 0.05;

// === Components ===

/// Drives an agent across the navigable surface.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Mover {
    pub max_speed: f32,
    pub max_path_length: f32,
    speed: f32,
    destination: Option<Vec3>,
    stopped: bool,
    nav_enabled: bool,
    path: NavPath,
    velocity: Vec3,
}

impl Default for Mover {
    fn default() -> Self {
        Self {
            max_speed: DEFAULT_MAX_SPEED,
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
            speed: DEFAULT_MAX_SPEED,
            destination: None,
            stopped: true,
            nav_enabled: true,
            path: NavPath::default(),
            velocity: Vec3::ZERO,
        }
    }
}

impl Mover {
    /// Whether a complete path no longer than `max_path_length` leads from
    /// `from` to `destination`. Pure query.
    #[must_use]
    pub fn can_move_to(&self, from: Vec3, destination: Vec3, surface: &dyn NavigableSurface) -> bool {
        let path = surface.find_path(from, destination);
        path.status == PathStatus::Complete && path.length <= self.max_path_length
    }

    /// Heads for `destination` at `speed_fraction` (clamped to `[0, 1]`) of
    /// `max_speed`, without touching action ownership.
    pub fn move_to(&mut self, destination: Vec3, speed_fraction: f32) {
        self.stopped = false;
        self.speed = speed_fraction.clamp(0.0, 1.0) * self.max_speed;
        self.destination = Some(destination);
    }

    /// Halts traversal. The destination is kept so a later `move_to` can resume.
    pub const fn cancel(&mut self) {
        self.stopped = true;
    }

    /// Teleports bookkeeping: forgets the destination and path, and stops.
    pub fn warp(&mut self) {
        self.destination = None;
        self.path.clear();
        self.stopped = true;
        self.velocity = Vec3::ZERO;
    }

    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    #[must_use]
    pub const fn nav_enabled(&self) -> bool {
        self.nav_enabled
    }

    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    #[must_use]
    pub const fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[must_use]
    pub const fn path(&self) -> &NavPath {
        &self.path
    }

    /// Advances one frame and returns the forward-axis speed for animation.
    ///
    /// A dead agent is frozen: navigation is disabled and nothing moves.
    pub fn tick(
        &mut self,
        transform: &mut Transform,
        surface: &dyn NavigableSurface,
        has_died: bool,
        dt: f32,
    ) -> f32 {
        self.nav_enabled = !has_died;
        if !self.nav_enabled {
            self.velocity = Vec3::ZERO;
            return 0.0;
        }

        if let Some(destination) = self.destination {
            if self.path.needs_recompute(destination, REPATH_DISTANCE) {
                let query = surface.find_path(transform.translation, destination);
                trace!(?destination, status = ?query.status, length = query.length, "path computed");
                self.path.set(query, destination);
            }
        }

        let start = transform.translation;
        if !self.stopped {
            self.follow_path(transform, self.speed * dt);
        }
        self.velocity = if dt > 0.0 {
            (transform.translation - start) / dt
        } else {
            Vec3::ZERO
        };
        self.velocity.dot(*transform.forward())
    }

    /// Spends `budget` distance walking the remaining waypoints.
    fn follow_path(&mut self, transform: &mut Transform, mut budget: f32) {
        while budget > 0.0 {
            let Some(waypoint) = self.path.current_waypoint() else {
                break;
            };
            let offset = waypoint - transform.translation;
            let distance = offset.length();
            if distance <= WAYPOINT_REACHED_DISTANCE {
                self.path.advance();
                continue;
            }

            let direction = offset / distance;
            let step = budget.min(distance);
            transform.translation += direction * step;
            face(transform, direction);
            budget -= step;
        }
    }

    /// Position and orientation for the save system.
    #[must_use]
    pub fn capture_state(transform: &Transform) -> MoverSnapshot {
        let (yaw, pitch, roll) = transform.rotation.to_euler(EulerRot::YXZ);
        MoverSnapshot {
            position: transform.translation.to_array(),
            rotation: [yaw, pitch, roll],
        }
    }

    /// Warps to a saved position and orientation. Skips path validation:
    /// restoring must never fail on reachability.
    pub fn restore_state(&mut self, transform: &mut Transform, snapshot: &MoverSnapshot) {
        let [yaw, pitch, roll] = snapshot.rotation;
        transform.translation = Vec3::from_array(snapshot.position);
        transform.rotation = Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll);
        self.warp();
    }
}

impl Action for Mover {
    fn cancel(&mut self) {
        Self::cancel(self);
    }
}

/// Saved mover state: position plus YXZ euler rotation (radians).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoverSnapshot {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
}

/// Turns the agent to look along the horizontal part of `direction`.
fn face(transform: &mut Transform, direction: Vec3) {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() > f32::EPSILON {
        transform.look_to(flat, Vec3::Y);
    }
}

// === Systems ===

/// Ticks every mover, whether or not it currently owns its agent.
/// Runs in `GameSet::Movement`.
fn drive_movers(
    time: Res<Time>,
    surface: Res<NavSurface>,
    mut movers: Query<(
        &mut Mover,
        &mut Transform,
        Option<&Health>,
        Option<&mut CombatAnimator>,
    )>,
) {
    let dt = time.delta_secs();
    for (mut mover, mut transform, health, animator) in &mut movers {
        let has_died = health.is_some_and(Health::has_died);
        let forward_speed = mover.tick(&mut transform, surface.surface(), has_died, dt);
        if let Some(mut animator) = animator {
            animator.forward_speed = forward_speed;
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Mover>()
        .register_type::<NavPath>()
        .init_resource::<NavSurface>();

    app.add_systems(Update, drive_movers.in_set(GameSet::Movement));
}
