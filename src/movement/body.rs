//! Movement domain: the physics facade abilities read and write through.

use bevy::prelude::*;

use crate::movement::{Facing, MovementTuning};

/// What an ability may see and change on the body it controls.
///
/// Integration, collision and gravity stay with the movement systems and
/// avian; abilities only exchange velocities through this trait.
pub trait PhysicsBody {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);
    fn facing(&self) -> Facing;
    /// `velocity` after one fixed tick of gravity.
    fn calc_fall(&self, velocity: Vec2) -> Vec2;
    /// Length of the fixed physics tick in seconds.
    fn fixed_delta(&self) -> f32;

    fn apply_velocity(&mut self, delta: Vec2) {
        let v = self.velocity();
        self.set_velocity(v + delta);
    }
}

/// [`PhysicsBody`] over the components of one actor entity.
pub struct ActorBody<'a> {
    pub position: Vec2,
    pub velocity: &'a mut Vec2,
    pub facing: Facing,
    pub tuning: &'a MovementTuning,
    pub dt: f32,
}

impl PhysicsBody for ActorBody<'_> {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        *self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        if velocity.is_finite() {
            *self.velocity = velocity;
        } else {
            warn!("Discarding non-finite velocity {:?}", velocity);
        }
    }

    fn facing(&self) -> Facing {
        self.facing
    }

    fn calc_fall(&self, velocity: Vec2) -> Vec2 {
        self.tuning.fall(velocity, self.dt)
    }

    fn fixed_delta(&self) -> f32 {
        self.dt
    }
}
