//! Movement domain: debug-only grapple playground.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::grapple::{FixedAnchor, PullTarget, PullTuning, StickyZone};
use crate::movement::{Actor, GameLayer, Ground, MovementState, Wall};

fn solid(
    commands: &mut Commands,
    marker: impl Bundle,
    color: Color,
    size: Vec2,
    at: Vec2,
    layers: CollisionLayers,
) -> Entity {
    commands
        .spawn((
            marker,
            Sprite {
                color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(at.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            layers,
        ))
        .id()
}

pub(crate) fn spawn_test_room(mut commands: Commands, pull_tuning: Res<PullTuning>) {
    let wall_color = Color::srgb(0.3, 0.3, 0.4);
    let ground_color = Color::srgb(0.4, 0.5, 0.4);
    let anchor_color = Color::srgb(0.8, 0.7, 0.2);

    let ground_layers = CollisionLayers::new(
        GameLayer::Ground,
        [GameLayer::Player, GameLayer::Interactable],
    );
    let wall_layers = CollisionLayers::new(
        GameLayer::Wall,
        [GameLayer::Player, GameLayer::Interactable],
    );
    let anchor_layers = CollisionLayers::new(GameLayer::Interactable, LayerMask::NONE);

    // Ground
    solid(
        &mut commands,
        Ground,
        ground_color,
        Vec2::new(1200.0, 40.0),
        Vec2::new(0.0, -200.0),
        ground_layers,
    );

    // Side walls
    for x in [-620.0, 620.0] {
        solid(
            &mut commands,
            Wall,
            wall_color,
            Vec2::new(40.0, 700.0),
            Vec2::new(x, 130.0),
            wall_layers,
        );
    }

    // Ceiling slab the rope can hook anywhere along
    solid(
        &mut commands,
        (Ground, FixedAnchor),
        ground_color,
        Vec2::new(500.0, 30.0),
        Vec2::new(0.0, 420.0),
        ground_layers,
    );

    // Floating hooks
    for x in [-350.0, 350.0] {
        solid(
            &mut commands,
            FixedAnchor,
            anchor_color,
            Vec2::splat(16.0),
            Vec2::new(x, 250.0),
            anchor_layers,
        );
    }

    // Crate to reel in
    commands.spawn((
        PullTarget::new(pull_tuning.clone()),
        Actor,
        MovementState::default(),
        Sprite {
            color: Color::srgb(0.6, 0.4, 0.2),
            custom_size: Some(Vec2::splat(32.0)),
            ..default()
        },
        Transform::from_xyz(250.0, -150.0, 0.0),
        RigidBody::Dynamic,
        Collider::rectangle(32.0, 32.0),
        LockedAxes::ROTATION_LOCKED,
        LinearVelocity::default(),
        GravityScale(0.0),
        CollisionEventsEnabled,
        CollisionLayers::new(
            GameLayer::Interactable,
            [GameLayer::Ground, GameLayer::Wall, GameLayer::Sensor],
        ),
    ));

    // Sticky patch on the left wall
    commands.spawn((
        StickyZone,
        Sprite {
            color: Color::srgba(0.3, 0.8, 0.9, 0.35),
            custom_size: Some(Vec2::new(60.0, 160.0)),
            ..default()
        },
        Transform::from_xyz(-570.0, 100.0, -1.0),
        RigidBody::Static,
        Collider::rectangle(60.0, 160.0),
        Sensor,
        CollisionEventsEnabled,
        CollisionLayers::new(GameLayer::Sensor, [GameLayer::Interactable]),
    ));

    info!("Spawned grapple test room");
}
