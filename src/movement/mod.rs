//! Movement domain: actor locomotion, gravity, contact detection and the
//! physics facade handed to abilities.

mod body;
mod bootstrap;
mod components;
#[cfg(feature = "dev-tools")]
mod dev;
mod events;
mod resources;
mod systems;
#[cfg(test)]
mod tests;

pub use body::{ActorBody, PhysicsBody};
pub use components::{Actor, Facing, GameLayer, Ground, MovementState, Player, Wall, WallContact};
pub use events::{ActorCollision, CollisionAxis};
pub use resources::{MovementInput, MovementTuning};
pub(crate) use systems::keyboard_axis;

use bevy::prelude::*;

use crate::movement::bootstrap::spawn_player;
use crate::movement::systems::{
    apply_gravity, apply_horizontal_movement, detect_ground, detect_walls, read_input,
    update_facing,
};

/// Ordering of the fixed-step movement work. Abilities run between
/// detection and locomotion so they can lock the body first.
#[derive(SystemSet, Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum MovementSystems {
    Detect,
    Locomotion,
}

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<MovementInput>()
            .add_message::<ActorCollision>()
            .configure_sets(
                FixedUpdate,
                (MovementSystems::Detect, MovementSystems::Locomotion).chain(),
            )
            .add_systems(Startup, spawn_player)
            .add_systems(Update, read_input)
            .add_systems(
                FixedUpdate,
                (detect_ground, detect_walls)
                    .chain()
                    .in_set(MovementSystems::Detect),
            )
            .add_systems(
                FixedUpdate,
                (update_facing, apply_horizontal_movement, apply_gravity)
                    .chain()
                    .in_set(MovementSystems::Locomotion),
            );

        #[cfg(feature = "dev-tools")]
        app.add_systems(Startup, dev::spawn_test_room);
    }
}
