//! Demo arena: a walled-in floor with a controllable player and training dummies.

use avian3d::prelude::*;
use bevy::prelude::*;

use crate::GameSet;
use crate::gameplay::action::ActionScheduler;
use crate::gameplay::animation::CombatAnimator;
use crate::gameplay::combat::Fighter;
use crate::gameplay::combat::target::CombatTarget;
use crate::gameplay::combat::weapon::{WeaponCatalog, WeaponSockets};
use crate::gameplay::control::PlayerController;
use crate::gameplay::movement::Mover;
use crate::gameplay::movement::navigation::NavSurface;
use crate::gameplay::stats::BaseStats;
use crate::gameplay::{Health, Player};
use crate::persistence::SaveableEntity;
use crate::third_party::avian::CollisionLayer;
use crate::third_party::vleue_navigator::NavMeshSurface;

// === Constants ===

/// Half extent of the square arena floor (world units).
pub const ARENA_HALF_EXTENT: f32 = 25.0;

/// Agent radius; obstacle footprints are inflated by this on the navmesh.
const AGENT_RADIUS: f32 = 0.4;
const AGENT_HEIGHT: f32 = 1.8;

const OBSTACLE_HEIGHT: f32 = 2.0;

/// Obstacle footprints in the XZ plane.
const OBSTACLES: [(Vec2, Vec2); 3] = [
    (Vec2::new(-8.0, -2.0), Vec2::new(-6.0, 6.0)),
    (Vec2::new(3.0, 4.0), Vec2::new(10.0, 6.0)),
    (Vec2::new(4.0, -10.0), Vec2::new(6.0, -3.0)),
];

const DUMMY_POSITIONS: [Vec3; 3] = [
    Vec3::new(-12.0, 0.0, 2.0),
    Vec3::new(6.0, 0.0, 10.0),
    Vec3::new(12.0, 0.0, -6.0),
];

pub const DUMMY_HEALTH: f32 = 60.0;

/// Weapon the player starts with.
const PLAYER_WEAPON: &str = "sword";

/// Offset of the follow camera from the player.
const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 14.0, 12.0);

// === Components ===

/// Camera that keeps the player in view from a fixed offset.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct FollowCamera {
    pub offset: Vec3,
}

/// Shared meshes and materials for arena agents.
#[derive(Resource, Debug, Clone)]
pub struct ArenaAssets {
    pub agent_mesh: Handle<Mesh>,
    pub player_material: Handle<StandardMaterial>,
    pub dummy_material: Handle<StandardMaterial>,
}

impl FromWorld for ArenaAssets {
    fn from_world(world: &mut World) -> Self {
        let agent_mesh = world
            .resource_mut::<Assets<Mesh>>()
            .add(Capsule3d::new(AGENT_RADIUS, AGENT_HEIGHT - 2.0 * AGENT_RADIUS));
        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        Self {
            agent_mesh,
            player_material: materials.add(Color::srgb(0.2, 0.5, 0.9)),
            dummy_material: materials.add(Color::srgb(0.8, 0.3, 0.2)),
        }
    }
}

/// Upright capsule whose base rests on the entity's origin.
fn agent_collider() -> Collider {
    Collider::compound(vec![(
        Vec3::Y * (AGENT_HEIGHT / 2.0),
        Quat::IDENTITY,
        Collider::capsule(AGENT_RADIUS, AGENT_HEIGHT - 2.0 * AGENT_RADIUS),
    )])
}

/// Components of a training dummy standing at `position`.
///
/// The root stays on the floor so range checks measure ground distance; the
/// body mesh is a child.
pub fn dummy_bundle(assets: &ArenaAssets, position: Vec3) -> impl Bundle {
    (
        Name::new("Training Dummy"),
        CombatTarget::default(),
        Health::new(DUMMY_HEALTH),
        Transform::from_translation(position),
        Visibility::default(),
        RigidBody::Static,
        agent_collider(),
        CollisionLayer::Targetable.layers(),
        children![(
            Name::new("Dummy Body"),
            Mesh3d(assets.agent_mesh.clone()),
            MeshMaterial3d(assets.dummy_material.clone()),
            Transform::from_xyz(0.0, AGENT_HEIGHT / 2.0, 0.0),
        )],
    )
}

fn footprint((min, max): (Vec2, Vec2)) -> Rect {
    Rect::from_corners(min, max)
}

// === Systems ===

fn spawn_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    assets: Res<ArenaAssets>,
    catalog: Res<WeaponCatalog>,
) {
    let size = ARENA_HALF_EXTENT * 2.0;
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(size, size))),
        MeshMaterial3d(materials.add(Color::srgb(0.35, 0.45, 0.3))),
        Transform::default(),
        RigidBody::Static,
        Collider::half_space(Vec3::Y),
        CollisionLayer::Ground.layers(),
    ));

    let obstacle_material = materials.add(Color::srgb(0.5, 0.5, 0.55));
    for (index, corners) in OBSTACLES.into_iter().enumerate() {
        let rect = footprint(corners);
        let extent = rect.size();
        let center = rect.center();
        commands.spawn((
            Name::new(format!("Obstacle {index}")),
            Mesh3d(meshes.add(Cuboid::new(extent.x, OBSTACLE_HEIGHT, extent.y))),
            MeshMaterial3d(obstacle_material.clone()),
            Transform::from_xyz(center.x, OBSTACLE_HEIGHT / 2.0, center.y),
            RigidBody::Static,
            Collider::cuboid(extent.x, OBSTACLE_HEIGHT, extent.y),
            CollisionLayer::Obstacle.layers(),
        ));
    }

    let footprints: Vec<Rect> = OBSTACLES
        .into_iter()
        .map(|corners| footprint(corners).inflate(AGENT_RADIUS))
        .collect();
    commands.insert_resource(NavSurface::new(NavMeshSurface::from_obstacles(
        Vec2::splat(-ARENA_HALF_EXTENT),
        Vec2::splat(ARENA_HALF_EXTENT),
        0.0,
        &footprints,
    )));

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 20.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        Name::new("Follow Camera"),
        Camera3d::default(),
        FollowCamera {
            offset: CAMERA_OFFSET,
        },
        Transform::from_translation(CAMERA_OFFSET).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let player = commands
        .spawn((
            Name::new("Player"),
            Player,
            PlayerController::default(),
            SaveableEntity("player".to_string()),
            Health::new(100.0),
            BaseStats {
                health: 100.0,
                damage: 10.0,
            },
            ActionScheduler::default(),
            Mover::default(),
            Fighter::new(catalog.resolve(PLAYER_WEAPON).clone()),
            CombatAnimator::default(),
            Transform::default(),
            Visibility::default(),
            RigidBody::Kinematic,
            agent_collider(),
            CollisionLayer::Targetable.layers(),
        ))
        .id();
    commands.spawn((
        Name::new("Player Body"),
        Mesh3d(assets.agent_mesh.clone()),
        MeshMaterial3d(assets.player_material.clone()),
        Transform::from_xyz(0.0, AGENT_HEIGHT / 2.0, 0.0),
        ChildOf(player),
    ));
    let right_hand = commands
        .spawn((
            Name::new("Right Hand"),
            Transform::from_xyz(AGENT_RADIUS, AGENT_HEIGHT * 0.55, -0.2),
            ChildOf(player),
        ))
        .id();
    let left_hand = commands
        .spawn((
            Name::new("Left Hand"),
            Transform::from_xyz(-AGENT_RADIUS, AGENT_HEIGHT * 0.55, -0.2),
            ChildOf(player),
        ))
        .id();
    commands.entity(player).insert(WeaponSockets {
        right_hand,
        left_hand,
    });

    for position in DUMMY_POSITIONS {
        commands.spawn(dummy_bundle(&assets, position));
    }
    info!(
        obstacles = OBSTACLES.len(),
        dummies = DUMMY_POSITIONS.len(),
        "arena spawned"
    );
}

/// Keeps the camera at its offset from the player.
/// Runs in `GameSet::Presentation`.
fn follow_player(
    player: Single<&Transform, (With<Player>, Without<FollowCamera>)>,
    camera: Single<(&mut Transform, &FollowCamera)>,
) {
    let (mut transform, follow) = camera.into_inner();
    let focus = player.translation;
    *transform = Transform::from_translation(focus + follow.offset).looking_at(focus, Vec3::Y);
}

// === Plugin ===

pub fn plugin(app: &mut App) {
    app.register_type::<FollowCamera>()
        .init_resource::<ArenaAssets>();

    app.add_systems(Startup, spawn_arena);
    app.add_systems(Update, follow_player.in_set(GameSet::Presentation));

    #[cfg(feature = "dev")]
    app.add_plugins(crate::dev_tools::plugin);
}
