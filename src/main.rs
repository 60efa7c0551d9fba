mod ability;
mod content;
mod grapple;
mod math;
mod movement;

use avian2d::prelude::*;
use bevy::prelude::*;

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Grapnel".to_string(),
                resolution: (1280, 720).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(PhysicsPlugins::default())
        .add_plugins((
            content::ContentPlugin,
            movement::MovementPlugin,
            grapple::GrapplePlugin,
        ))
        .add_systems(Startup, setup_camera)
        .run();
}
