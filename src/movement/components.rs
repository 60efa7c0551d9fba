//! Movement domain: components and physics layers for actors.

use avian2d::prelude::*;
use bevy::prelude::*;

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Ground surfaces (floors, platforms, ceilings)
    Ground,
    /// Wall surfaces
    Wall,
    /// Player character
    Player,
    /// Things a grapple can hook that are not terrain (anchors, crates)
    Interactable,
    /// Sensors (sticky zones) - should not block movement
    Sensor,
}

#[derive(Component, Debug)]
pub struct Player;

/// Anything moved by our own integration rather than avian's gravity.
#[derive(Component, Debug, Default)]
pub struct Actor;

#[derive(Component, Debug, Default)]
pub struct MovementState {
    pub on_ground: bool,
    pub on_wall: WallContact,
    pub facing: Facing,
    /// Set while an ability drives velocity; locomotion and gravity back off.
    pub ability_locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallContact {
    #[default]
    None,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// Facing implied by a horizontal axis, if it points anywhere.
    pub fn from_axis(x: f32) -> Option<Self> {
        if x > 0.1 {
            Some(Facing::Right)
        } else if x < -0.1 {
            Some(Facing::Left)
        } else {
            None
        }
    }
}

/// Marker for ground colliders
#[derive(Component, Debug)]
pub struct Ground;

/// Marker for wall colliders
#[derive(Component, Debug)]
pub struct Wall;
