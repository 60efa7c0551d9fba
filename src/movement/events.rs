//! Movement domain: contact events consumed by abilities.

use bevy::ecs::message::Message;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionAxis {
    /// Ran into a wall
    Horizontal,
    /// Landed or hit a ceiling
    Vertical,
}

/// Emitted on the tick an actor starts touching terrain along `axis`.
#[derive(Debug, Clone, Copy)]
pub struct ActorCollision {
    pub entity: Entity,
    pub axis: CollisionAxis,
    /// Velocity at the moment of contact
    pub velocity: Vec2,
}

impl Message for ActorCollision {}
