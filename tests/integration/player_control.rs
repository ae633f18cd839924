//! Pointer dispatch, pursuit, and cancellation through the full system chain.

use bevy::prelude::*;
use pretty_assertions::assert_eq;
use rpg_control::gameplay::Health;
use rpg_control::gameplay::action::{ActionKind, ActionScheduler};
use rpg_control::gameplay::combat::{EngagementState, Fighter};
use rpg_control::gameplay::control::cursor::{ActiveCursor, CursorType};
use rpg_control::gameplay::control::{PointerHit, PointerHits};
use rpg_control::gameplay::movement::Mover;

use crate::{create_game_app, position, spawn_dummy, spawn_player, with_actions};

fn point_at(app: &mut App, entity: Entity) {
    app.world_mut().resource_mut::<PointerHits>().hits = vec![PointerHit {
        entity,
        distance: 10.0,
    }];
}

fn click(app: &mut App) {
    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .press(MouseButton::Left);
    app.update();
    app.world_mut()
        .resource_mut::<ButtonInput<MouseButton>>()
        .reset_all();
    *app.world_mut().resource_mut::<PointerHits>() = PointerHits::default();
}

fn advance(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

fn current_action(app: &App, agent: Entity) -> Option<ActionKind> {
    app.world().get::<ActionScheduler>(agent).unwrap().current()
}

#[test]
fn ui_claims_the_pointer_before_world_targets() {
    let mut app = create_game_app();
    let player = spawn_player(&mut app, Vec3::ZERO);
    let dummy = spawn_dummy(&mut app, Vec3::new(3.0, 0.0, 0.0));
    app.world_mut().spawn(Interaction::Pressed);
    point_at(&mut app, dummy);

    click(&mut app);

    assert_eq!(app.world().resource::<ActiveCursor>().0, CursorType::Ui);
    assert_eq!(current_action(&app, player), None);
}

#[test]
fn clicking_a_dummy_pursues_then_strikes_it() {
    let mut app = create_game_app();
    let player = spawn_player(&mut app, Vec3::ZERO);
    let dummy = spawn_dummy(&mut app, Vec3::new(6.0, 0.0, 0.0));
    point_at(&mut app, dummy);

    click(&mut app);
    assert_eq!(current_action(&app, player), Some(ActionKind::Combat));

    advance(&mut app, 30);

    let fighter = app.world().get::<Fighter>(player).unwrap();
    assert_eq!(fighter.state(), EngagementState::Attacking);
    assert!(position(&app, player).distance(Vec3::new(6.0, 0.0, 0.0)) <= 2.0);
    assert!(app.world().get::<Health>(dummy).unwrap().current < 50.0);
}

#[test]
fn death_mid_pursuit_freezes_the_agent() {
    let mut app = create_game_app();
    let player = spawn_player(&mut app, Vec3::ZERO);
    let dummy = spawn_dummy(&mut app, Vec3::new(20.0, 0.0, 0.0));
    with_actions(&mut app, player, |actions| actions.attack(dummy));
    advance(&mut app, 3);
    assert!(position(&app, player).x > 0.0);

    app.world_mut()
        .get_mut::<Health>(player)
        .unwrap()
        .take_damage(dummy, 1_000.0);
    app.update();
    let frozen_at = position(&app, player);
    advance(&mut app, 5);

    assert_eq!(position(&app, player), frozen_at);
    assert_eq!(current_action(&app, player), None);
    assert_eq!(app.world().get::<Fighter>(player).unwrap().target(), None);
    assert!(!app.world().get::<Mover>(player).unwrap().nav_enabled());
}

#[test]
fn cancelling_an_attack_stops_the_pursuit() {
    let mut app = create_game_app();
    let player = spawn_player(&mut app, Vec3::ZERO);
    let dummy = spawn_dummy(&mut app, Vec3::new(20.0, 0.0, 0.0));
    with_actions(&mut app, player, |actions| actions.attack(dummy));
    advance(&mut app, 3);

    with_actions(&mut app, player, |actions| actions.cancel_current_action());
    let stopped_at = position(&app, player);
    advance(&mut app, 5);

    assert_eq!(position(&app, player), stopped_at);
    assert!(app.world().get::<Mover>(player).unwrap().is_stopped());
    assert_eq!(app.world().get::<Health>(dummy).unwrap().current, 50.0);
}

#[test]
fn moving_abandons_the_current_target() {
    let mut app = create_game_app();
    let player = spawn_player(&mut app, Vec3::ZERO);
    let dummy = spawn_dummy(&mut app, Vec3::new(20.0, 0.0, 0.0));
    with_actions(&mut app, player, |actions| actions.attack(dummy));
    app.update();

    with_actions(&mut app, player, |actions| {
        actions.start_move_action(Vec3::new(0.0, 0.0, -5.0), 1.0);
    });
    advance(&mut app, 20);

    assert_eq!(current_action(&app, player), Some(ActionKind::Movement));
    assert_eq!(app.world().get::<Fighter>(player).unwrap().target(), None);
    assert!(position(&app, player).distance(Vec3::new(0.0, 0.0, -5.0)) < 0.1);
}
