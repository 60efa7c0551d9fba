//! Movement domain: player bootstrap.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::grapple::Grappler;
use crate::movement::{GameLayer, Player};

pub(crate) fn spawn_player(mut commands: Commands, existing_player: Query<Entity, With<Player>>) {
    // Don't spawn if player already exists
    if !existing_player.is_empty() {
        info!("Player already exists, skipping spawn");
        return;
    }

    let entity = commands
        .spawn((
            // Identity & abilities; Grappler pulls in Actor and MovementState
            (Player, Grappler::default()),
            // Rendering
            Sprite {
                color: Color::srgb(0.9, 0.9, 0.9),
                custom_size: Some(Vec2::new(24.0, 48.0)),
                ..default()
            },
            Transform::from_xyz(0.0, 100.0, 0.0),
            // Physics
            (
                RigidBody::Dynamic,
                Collider::rectangle(24.0, 48.0),
                LockedAxes::ROTATION_LOCKED,
                LinearVelocity::default(),
                GravityScale(0.0), // We handle gravity manually for more control
                Friction::new(0.0),
                CollisionEventsEnabled,
                CollisionLayers::new(
                    GameLayer::Player,
                    [GameLayer::Ground, GameLayer::Wall, GameLayer::Sensor],
                ),
            ),
        ))
        .id();

    info!("Spawned player {}", entity);
}
