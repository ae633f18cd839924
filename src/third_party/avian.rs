//! Avian3d physics configuration and the pointer probe built on its spatial queries.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::GameSet;
use crate::gameplay::Player;
use crate::gameplay::control::{InteractionDispatch, PlayerController, PointerHit, PointerHits};

/// Farthest distance the pointer probe reaches along the camera ray.
const PROBE_DISTANCE: f32 = 200.0;

/// Most entities the volumetric probe reports per frame.
const PROBE_MAX_HITS: u32 = 16;

// === Collision Layers ===

/// Physics collision layers used by pointer queries.
///
/// - **Ground**: walkable floor.
/// - **Targetable**: entities the volumetric probe can pick.
/// - **Obstacle**: static blockers.
///
/// The plain pointer ray stops on the first collider of any layer.
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum CollisionLayer {
    #[default]
    Ground,
    Targetable,
    Obstacle,
}

impl CollisionLayer {
    /// Layers for a collider that belongs to `self` and interacts with everything.
    #[must_use]
    pub fn layers(self) -> CollisionLayers {
        CollisionLayers::new(self, LayerMask::ALL)
    }
}

/// Filter for the plain pointer ray: every scene layer except the player.
fn scene_filter(player: Entity) -> SpatialQueryFilter {
    SpatialQueryFilter::from_mask([
        CollisionLayer::Ground,
        CollisionLayer::Obstacle,
        CollisionLayer::Targetable,
    ])
    .with_excluded_entities([player])
}

// === Systems ===

/// Casts the pointer into the scene: a sphere along the camera ray collects
/// targetable hits and a plain ray finds the first scene point under the
/// pointer. The player is excluded from both. Whether that point is walkable
/// is left to the navigable surface.
/// Runs in `GameSet::Input`, before interaction dispatch.
fn probe_pointer(
    window: Single<&Window, With<PrimaryWindow>>,
    camera: Single<(&Camera, &GlobalTransform), With<Camera3d>>,
    player: Single<(Entity, &PlayerController), With<Player>>,
    spatial: SpatialQuery,
    mut hits: ResMut<PointerHits>,
) {
    hits.hits.clear();
    hits.ground = None;

    let Some(cursor_position) = window.cursor_position() else {
        return;
    };
    let (camera, camera_transform) = *camera;
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_position) else {
        return;
    };
    let (player, controller) = *player;

    let targetable = SpatialQueryFilter::from_mask(CollisionLayer::Targetable)
        .with_excluded_entities([player]);
    hits.hits = spatial
        .shape_hits(
            &Collider::sphere(controller.probe_radius),
            ray.origin,
            Quat::IDENTITY,
            ray.direction,
            PROBE_MAX_HITS,
            &ShapeCastConfig::from_max_distance(PROBE_DISTANCE),
            &targetable,
        )
        .into_iter()
        .map(|hit| PointerHit {
            entity: hit.entity,
            distance: hit.distance,
        })
        .collect();

    hits.ground = spatial
        .cast_ray(
            ray.origin,
            ray.direction,
            PROBE_DISTANCE,
            true,
            &scene_filter(player),
        )
        .map(|hit| ray.get_point(hit.distance));
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(PhysicsPlugins::default());
    app.add_systems(
        Update,
        probe_pointer
            .in_set(GameSet::Input)
            .before(InteractionDispatch),
    );
}
