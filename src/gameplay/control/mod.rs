//! Pointer-driven interaction: turns the pointer each frame into a UI claim,
//! a combat command, or a movement command, and picks the cursor to show.

pub mod cursor;

use bevy::prelude::*;

use self::cursor::{ActiveCursor, CursorType};
use super::action::{ActionScheduler, AgentActions};
use super::combat::Fighter;
use super::combat::target::{CombatTarget, TargetSnapshot};
use super::movement::Mover;
use super::movement::navigation::{NavSurface, NavigableSurface};
use super::{Health, Player};
use crate::GameSet;

// === Constants ===

/// Radius of the volumetric probe cast along the pointer ray.
pub const DEFAULT_PROBE_RADIUS: f32 = 1.0;

/// Largest vertical gap allowed when projecting a ground hit onto the navigable surface.
pub const DEFAULT_MAX_NAV_PROJECTION: f32 = 1.0;

// === Capabilities ===

/// Agent state a [`Raycastable`] may act on while handling a pointer hit.
pub struct InteractionContext<'a> {
    pub actions: AgentActions<'a>,
    /// The agent's position.
    pub position: Vec3,
    pub surface: &'a dyn NavigableSurface,
    /// Whether the primary pointer button is held this frame.
    pub primary_held: bool,
}

/// Something the pointer can interact with in the world.
pub trait Raycastable {
    /// Cursor to show when this capability claims the pointer.
    fn cursor_type(&self) -> CursorType;

    /// Reacts to the pointer resting on `subject`. Returns true to claim the
    /// frame; false lets lower-priority hits and the movement fallback run.
    fn handle_raycast(&self, subject: &TargetSnapshot, context: &mut InteractionContext) -> bool;
}

/// Capabilities an entity can carry to react to the pointer, each as an
/// optional [`Raycastable`] component. [`CombatTarget`] is the only one so
/// far; another capability joins as one more `Option<&T>` here and in
/// `attached_capabilities`.
pub type RaycastableQuery<'w, 's> =
    Query<'w, 's, (&'static GlobalTransform, Option<&'static Health>, Option<&'static CombatTarget>)>;

/// Capabilities attached to one entity, in the order they are offered the hit.
fn attached_capabilities(combat: Option<&CombatTarget>) -> impl Iterator<Item = &dyn Raycastable> {
    [combat.map(|target| target as &dyn Raycastable)]
        .into_iter()
        .flatten()
}

// === Components ===

/// Per-agent pointer control settings and drag state.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PlayerController {
    pub probe_radius: f32,
    pub max_nav_projection: f32,
    dragging_ui: bool,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            probe_radius: DEFAULT_PROBE_RADIUS,
            max_nav_projection: DEFAULT_MAX_NAV_PROJECTION,
            dragging_ui: false,
        }
    }
}

impl PlayerController {
    #[must_use]
    pub const fn is_dragging_ui(&self) -> bool {
        self.dragging_ui
    }

    /// Claims the frame while the pointer is over UI, and keeps claiming it
    /// during a drag that started on UI until the button is released.
    fn interact_with_ui(&mut self, over_ui: bool, pressed: bool, released: bool) -> bool {
        if released {
            self.dragging_ui = false;
        }
        if over_ui {
            if pressed {
                self.dragging_ui = true;
            }
            return true;
        }
        self.dragging_ui
    }
}

// === Resources ===

/// One entity intersected by the pointer probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerHit {
    pub entity: Entity,
    /// Distance along the pointer ray.
    pub distance: f32,
}

/// Result of this frame's pointer probe. Filled by the physics backend.
#[derive(Resource, Debug, Clone, Default)]
pub struct PointerHits {
    /// Every entity the volumetric probe touched, in no particular order.
    pub hits: Vec<PointerHit>,
    /// First point the plain pointer ray struck, if any.
    pub ground: Option<Vec3>,
}

impl PointerHits {
    /// Hits ordered nearest first.
    #[must_use]
    pub fn sorted(&self) -> Vec<PointerHit> {
        let mut hits = self.hits.clone();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

/// `SystemSet` for pointer interaction dispatch. The pointer probe runs
/// `.before(InteractionDispatch)`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct InteractionDispatch;

// === Systems ===

/// Resolves the pointer in priority order: UI, death gate, world
/// interaction, movement fallback, nothing. The first match wins.
/// Runs in `GameSet::Input`.
fn dispatch_pointer(
    mouse: Res<ButtonInput<MouseButton>>,
    hits: Res<PointerHits>,
    surface: Res<NavSurface>,
    interactions: Query<&Interaction>,
    raycastables: RaycastableQuery,
    mut players: Query<
        (
            Entity,
            &mut PlayerController,
            &Health,
            &Transform,
            &mut ActionScheduler,
            &mut Mover,
            &mut Fighter,
        ),
        With<Player>,
    >,
    mut cursor: ResMut<ActiveCursor>,
) {
    let Ok((player, mut controller, health, transform, mut scheduler, mut mover, mut fighter)) =
        players.single_mut()
    else {
        return;
    };

    let over_ui = interactions
        .iter()
        .any(|interaction| *interaction != Interaction::None);
    let claimed_by_ui = controller.interact_with_ui(
        over_ui,
        mouse.just_pressed(MouseButton::Left),
        mouse.just_released(MouseButton::Left),
    );

    let resolved = if claimed_by_ui {
        CursorType::Ui
    } else if health.has_died() {
        CursorType::None
    } else {
        let mut context = InteractionContext {
            actions: AgentActions {
                scheduler: &mut scheduler,
                mover: &mut mover,
                fighter: &mut fighter,
            },
            position: transform.translation,
            surface: surface.surface(),
            primary_held: mouse.pressed(MouseButton::Left),
        };
        interact_with_world(player, &hits, &raycastables, &mut context)
            .or_else(|| interact_with_movement(&hits, &controller, &mut context))
            .unwrap_or(CursorType::None)
    };

    cursor.set_if_neq(ActiveCursor(resolved));
}

/// Offers each hit, nearest first, to every raycastable capability attached
/// to it. The first capability that claims the hit picks the cursor.
fn interact_with_world(
    player: Entity,
    hits: &PointerHits,
    raycastables: &RaycastableQuery,
    context: &mut InteractionContext,
) -> Option<CursorType> {
    for hit in hits.sorted() {
        if hit.entity == player {
            continue;
        }
        let Ok((transform, health, combat)) = raycastables.get(hit.entity) else {
            continue;
        };
        let subject = TargetSnapshot {
            entity: hit.entity,
            position: transform.translation(),
            has_died: health.is_some_and(Health::has_died),
        };
        for raycastable in attached_capabilities(combat) {
            if raycastable.handle_raycast(&subject, context) {
                return Some(raycastable.cursor_type());
            }
        }
    }
    None
}

/// Moves toward the ground point under the pointer when it projects onto
/// the navigable surface and is reachable. Shows the movement cursor on
/// hover; only a held primary button issues the move.
fn interact_with_movement(
    hits: &PointerHits,
    controller: &PlayerController,
    context: &mut InteractionContext,
) -> Option<CursorType> {
    let ground = hits.ground?;
    let destination = context
        .surface
        .project(ground, controller.max_nav_projection)?;
    if !context
        .actions
        .mover
        .can_move_to(context.position, destination, context.surface)
    {
        return None;
    }
    if context.primary_held {
        context.actions.start_move_action(destination, 1.0);
    }
    Some(CursorType::Movement)
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<PlayerController>()
        .init_resource::<PointerHits>()
        .init_resource::<ButtonInput<MouseButton>>();

    app.add_plugins(cursor::plugin);

    app.add_systems(
        Update,
        dispatch_pointer
            .in_set(InteractionDispatch)
            .in_set(GameSet::Input),
    );
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::gameplay::action::ActionKind;
    use crate::testing::{create_test_app, spawn_test_player, spawn_test_target};
    use pretty_assertions::assert_eq;

    fn create_dispatch_test_app() -> App {
        let mut app = create_test_app();
        app.init_resource::<PointerHits>()
            .init_resource::<NavSurface>()
            .init_resource::<ActiveCursor>()
            .init_resource::<ButtonInput<MouseButton>>()
            .add_systems(Update, dispatch_pointer);
        app
    }

    fn point_at(app: &mut App, hits: Vec<PointerHit>, ground: Option<Vec3>) {
        *app.world_mut().resource_mut::<PointerHits>() = PointerHits { hits, ground };
    }

    fn press(app: &mut App) {
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
    }

    fn cursor(app: &App) -> CursorType {
        app.world().resource::<ActiveCursor>().0
    }

    fn scheduler(app: &App, player: Entity) -> Option<ActionKind> {
        app.world().get::<ActionScheduler>(player).unwrap().current()
    }

    #[test]
    fn ui_wins_over_targetable_under_pointer() {
        let mut app = create_dispatch_test_app();
        let player = spawn_test_player(app.world_mut(), Vec3::ZERO);
        let target = spawn_test_target(app.world_mut(), Vec3::new(1.0, 0.0, 0.0), 50.0);
        app.world_mut().spawn(Interaction::Hovered);
        point_at(
            &mut app,
            vec![PointerHit {
                entity: target,
                distance: 5.0,
            }],
            Some(Vec3::new(1.0, 0.0, 0.0)),
        );
        press(&mut app);

        app.update();

        assert_eq!(cursor(&app), CursorType::Ui);
        assert_eq!(scheduler(&app, player), None);
        assert_eq!(app.world().get::<Fighter>(player).unwrap().target(), None);
    }

    #[test]
    fn hovering_target_shows_combat_cursor_without_attacking() {
        let mut app = create_dispatch_test_app();
        let player = spawn_test_player(app.world_mut(), Vec3::ZERO);
        let target = spawn_test_target(app.world_mut(), Vec3::new(1.0, 0.0, 0.0), 50.0);
        point_at(
            &mut app,
            vec![PointerHit {
                entity: target,
                distance: 5.0,
            }],
            None,
        );

        app.update();

        assert_eq!(cursor(&app), CursorType::Combat);
        assert_eq!(scheduler(&app, player), None);
    }

    #[test]
    fn clicking_target_attacks() {
        let mut app = create_dispatch_test_app();
        let player = spawn_test_player(app.world_mut(), Vec3::ZERO);
        let target = spawn_test_target(app.world_mut(), Vec3::new(1.0, 0.0, 0.0), 50.0);
        point_at(
            &mut app,
            vec![PointerHit {
                entity: target,
                distance: 5.0,
            }],
            None,
        );
        press(&mut app);

        app.update();

        assert_eq!(scheduler(&app, player), Some(ActionKind::Combat));
        assert_eq!(app.world().get::<Fighter>(player).unwrap().target(), Some(target));
    }

    #[test]
    fn nearest_live_target_wins_and_dead_ones_fall_through() {
        let mut app = create_dispatch_test_app();
        let player = spawn_test_player(app.world_mut(), Vec3::ZERO);
        let dead = spawn_test_target(app.world_mut(), Vec3::new(1.0, 0.0, 0.0), 10.0);
        app.world_mut()
            .get_mut::<Health>(dead)
            .unwrap()
            .take_damage(player, 10.0);
        let near = spawn_test_target(app.world_mut(), Vec3::new(2.0, 0.0, 0.0), 50.0);
        let far = spawn_test_target(app.world_mut(), Vec3::new(3.0, 0.0, 0.0), 50.0);
        point_at(
            &mut app,
            vec![
                PointerHit {
                    entity: far,
                    distance: 8.0,
                },
                PointerHit {
                    entity: dead,
                    distance: 4.0,
                },
                PointerHit {
                    entity: near,
                    distance: 6.0,
                },
            ],
            None,
        );
        press(&mut app);

        app.update();

        assert_eq!(app.world().get::<Fighter>(player).unwrap().target(), Some(near));
    }

    #[test]
    fn ground_hover_shows_movement_cursor_and_click_moves() {
        let mut app = create_dispatch_test_app();
        let player = spawn_test_player(app.world_mut(), Vec3::ZERO);
        point_at(&mut app, Vec::new(), Some(Vec3::new(4.0, 0.3, 4.0)));

        app.update();
        assert_eq!(cursor(&app), CursorType::Movement);
        assert_eq!(scheduler(&app, player), None);

        press(&mut app);
        app.update();

        assert_eq!(scheduler(&app, player), Some(ActionKind::Movement));
        let mover = app.world().get::<Mover>(player).unwrap();
        assert_eq!(mover.destination(), Some(Vec3::new(4.0, 0.0, 4.0)));
    }

    #[test]
    fn unreachable_ground_clears_cursor() {
        let mut app = create_dispatch_test_app();
        let player = spawn_test_player(app.world_mut(), Vec3::ZERO);
        point_at(&mut app, Vec::new(), Some(Vec3::new(35.0, 0.0, 35.0)));
        press(&mut app);

        app.update();

        assert_eq!(cursor(&app), CursorType::None);
        assert_eq!(scheduler(&app, player), None);
    }

    #[test]
    fn ground_too_far_above_surface_is_ignored() {
        let mut app = create_dispatch_test_app();
        spawn_test_player(app.world_mut(), Vec3::ZERO);
        point_at(&mut app, Vec::new(), Some(Vec3::new(2.0, 3.0, 2.0)));

        app.update();

        assert_eq!(cursor(&app), CursorType::None);
    }

    #[test]
    fn disabled_target_falls_through_to_movement() {
        let mut app = create_dispatch_test_app();
        let player = spawn_test_player(app.world_mut(), Vec3::ZERO);
        let target = spawn_test_target(app.world_mut(), Vec3::new(1.0, 0.0, 0.0), 50.0);
        app.world_mut().get_mut::<CombatTarget>(target).unwrap().enabled = false;
        point_at(
            &mut app,
            vec![PointerHit {
                entity: target,
                distance: 5.0,
            }],
            Some(Vec3::new(1.0, 0.0, 0.5)),
        );
        press(&mut app);

        app.update();

        assert_eq!(cursor(&app), CursorType::Movement);
        assert_eq!(scheduler(&app, player), Some(ActionKind::Movement));
        assert_eq!(app.world().get::<Fighter>(player).unwrap().target(), None);
    }

    #[test]
    fn pointer_resting_on_obstacle_top_clears_cursor() {
        use crate::third_party::vleue_navigator::NavMeshSurface;

        let mut app = create_dispatch_test_app();
        app.insert_resource(NavSurface::new(NavMeshSurface::from_obstacles(
            Vec2::splat(-25.0),
            Vec2::splat(25.0),
            0.0,
            &[Rect::new(3.0, 4.0, 10.0, 6.0)],
        )));
        let player = spawn_test_player(app.world_mut(), Vec3::ZERO);

        // The floor in front of the wall is a valid destination.
        point_at(&mut app, Vec::new(), Some(Vec3::new(5.83, 0.0, 2.78)));
        app.update();
        assert_eq!(cursor(&app), CursorType::Movement);

        // The ray stops on the wall's top face, two units above the floor.
        point_at(&mut app, Vec::new(), Some(Vec3::new(5.0, 2.0, 4.1)));
        press(&mut app);
        app.update();

        assert_eq!(cursor(&app), CursorType::None);
        assert_eq!(scheduler(&app, player), None);
    }

    #[test]
    fn dead_player_gets_no_cursor_and_issues_nothing() {
        let mut app = create_dispatch_test_app();
        let player = spawn_test_player(app.world_mut(), Vec3::ZERO);
        let target = spawn_test_target(app.world_mut(), Vec3::new(1.0, 0.0, 0.0), 50.0);
        app.world_mut()
            .get_mut::<Health>(player)
            .unwrap()
            .take_damage(target, 1_000.0);
        point_at(
            &mut app,
            vec![PointerHit {
                entity: target,
                distance: 5.0,
            }],
            Some(Vec3::new(2.0, 0.0, 2.0)),
        );
        press(&mut app);

        app.update();

        assert_eq!(cursor(&app), CursorType::None);
        assert_eq!(scheduler(&app, player), None);
    }
}
