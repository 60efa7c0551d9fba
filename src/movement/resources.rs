//! Movement domain: tuning and input resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Resource, Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MovementTuning {
    pub max_speed: f32,
    pub accel: f32,
    pub decel: f32,
    pub air_accel: f32,
    pub gravity: f32,
    /// Terminal fall speed (positive, applied downwards)
    pub max_fall_speed: f32,
    /// Probe length beyond the collider used for ground/wall contact
    pub contact_probe: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            max_speed: 320.0,
            accel: 3000.0,
            decel: 2600.0,
            air_accel: 1400.0,
            gravity: 1800.0,
            max_fall_speed: 1200.0,
            contact_probe: 4.0,
        }
    }
}

impl MovementTuning {
    /// Velocity after one tick of gravity, capped at terminal speed.
    pub fn fall(&self, velocity: Vec2, dt: f32) -> Vec2 {
        let y = (velocity.y - self.gravity * dt).max(-self.max_fall_speed);
        Vec2::new(velocity.x, y)
    }
}

#[derive(Resource, Debug, Default)]
pub struct MovementInput {
    pub axis: Vec2,
}
