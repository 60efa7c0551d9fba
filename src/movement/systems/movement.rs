//! Movement domain: locomotion and gravity systems.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::movement::{Actor, Facing, MovementInput, MovementState, MovementTuning, Player};

pub(crate) fn apply_horizontal_movement(
    time: Res<Time>,
    input: Res<MovementInput>,
    tuning: Res<MovementTuning>,
    mut query: Query<(&MovementState, &mut LinearVelocity), With<Player>>,
) {
    let dt = time.delta_secs();

    for (state, mut velocity) in &mut query {
        // The active ability owns velocity
        if state.ability_locked {
            continue;
        }

        let target_vx = input.axis.x * tuning.max_speed;
        let accel = dt
            * if state.on_ground {
                tuning.accel
            } else {
                tuning.air_accel
            };

        if input.axis.x.abs() > 0.1 {
            if velocity.x < target_vx {
                velocity.x = (velocity.x + accel).min(target_vx);
            } else {
                velocity.x = (velocity.x - accel).max(target_vx);
            }
        } else if state.on_ground {
            // Keep air momentum; only friction on the ground
            let decel = tuning.decel * dt;
            if velocity.x > 0.0 {
                velocity.x = (velocity.x - decel).max(0.0);
            } else {
                velocity.x = (velocity.x + decel).min(0.0);
            }
        }
    }
}

pub(crate) fn apply_gravity(
    time: Res<Time>,
    tuning: Res<MovementTuning>,
    mut query: Query<(&MovementState, &mut LinearVelocity), With<Actor>>,
) {
    let dt = time.delta_secs();

    for (state, mut velocity) in &mut query {
        if state.ability_locked {
            continue;
        }
        if state.on_ground && velocity.y <= 0.0 {
            velocity.y = 0.0;
            continue;
        }

        velocity.0 = tuning.fall(velocity.0, dt);
    }
}

pub(crate) fn update_facing(
    input: Res<MovementInput>,
    mut query: Query<&mut MovementState, With<Player>>,
) {
    let Some(facing) = Facing::from_axis(input.axis.x) else {
        return;
    };
    for mut state in &mut query {
        state.facing = facing;
    }
}
