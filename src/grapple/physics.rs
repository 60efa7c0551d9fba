//! Grapple domain: rope math run by the grappler states.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::grapple::{AttachmentResult, GrappleTuning, GrappleWorld, GrapplerInfo};
use crate::math::{angle_from_up, closest_between, decompose, lerp_clamped, rotate, sign};
use crate::movement::{Facing, PhysicsBody};

/// Redirect velocity along the rope when it first goes taut.
///
/// Only applies while moving away from the anchor; otherwise the body keeps
/// its velocity and this returns false.
pub fn start_grapple(body: &mut dyn PhysicsBody, tuning: &GrappleTuning, point: Vec2) -> bool {
    let velocity = body.velocity();
    let rope = point - body.position();
    let Some((projection, ortho)) = decompose(velocity, rope) else {
        return false;
    };
    if projection.dot(rope) >= 0.0 {
        return false;
    }

    let magnitude = lerp_clamped(ortho.length(), velocity.length(), tuning.start_mult);
    body.set_velocity(ortho.normalize_or_zero() * magnitude);
    true
}

/// Velocity for one swinging tick.
///
/// `velocity` has already been through gravity. `direction` is the held
/// horizontal input, `anchor_speed` how fast the thing the rope hangs from
/// is moving.
pub fn swing_velocity(
    velocity: Vec2,
    position: Vec2,
    point: Vec2,
    direction: i8,
    anchor_speed: f32,
    tuning: &GrappleTuning,
    dt: f32,
) -> Vec2 {
    let rope = point - position;
    let Some((projection, ortho)) = decompose(velocity, rope) else {
        return velocity;
    };

    // Moving toward the anchor: rope is slack
    if projection.dot(rope) >= 0.0 {
        return velocity;
    }

    let ortho_dir = ortho.normalize_or_zero();
    let mut v = ortho_dir
        * (projection.length() * tuning.normal_mult + ortho.length() * tuning.orth_mult);

    let angle = angle_from_up(rope);
    if v.length() < tuning.small_angle_magnitude
        && angle <= tuning.small_angle
        && anchor_speed < 1.0
    {
        if sign(rope.x) == sign(v.x) {
            let magnitude = closest_between(
                -tuning.small_angle_magnitude,
                tuning.small_angle_magnitude,
                velocity.length(),
            );
            v = ortho_dir * magnitude;
        }
        if angle < tuning.zero_angle {
            v *= 0.25;
        }
    }

    if direction != 0 && v.length() <= tuning.move_speed {
        let push = rotate(projection.normalize_or_zero(), f32::from(direction) * FRAC_PI_2);
        v += push * tuning.acceleration * dt;
    }

    v
}

/// Velocity added when letting go of a swing.
pub fn release_boost(velocity: Vec2, facing: Facing, tuning: &GrappleTuning) -> Vec2 {
    let add = Vec2::new(facing.sign(), 1.0)
        * (tuning.boost_speed * velocity.length()).max(tuning.min_boost);
    add.normalize_or_zero() * add.length().clamp(-tuning.max_boost, tuning.max_boost)
}

/// How far the rope tip has travelled after `elapsed` seconds, capped.
pub fn extend_distance(tuning: &GrappleTuning, elapsed: f32) -> f32 {
    (tuning.extend_speed * elapsed).min(tuning.max_extend_distance)
}

/// Cast the extending rope from the grappler toward `aim` and offer it to
/// every hit in ray order. The first target that accepts wins.
pub fn extend_update(
    world: &mut dyn GrappleWorld,
    grappler: &GrapplerInfo,
    tuning: &GrappleTuning,
    elapsed: f32,
    aim: Vec2,
) -> AttachmentResult {
    let origin = grappler.position;
    let Ok(direction) = Dir2::new(aim - origin) else {
        return AttachmentResult::none(origin);
    };
    let distance = extend_distance(tuning, elapsed);
    let tip = origin + *direction * distance;

    for hit in world.raycast_all(origin, direction, distance) {
        let result = world.attach_grapple(hit.entity, grappler, hit.point);
        if result.is_attached() {
            return result;
        }
    }

    AttachmentResult::none(tip)
}

/// Horizontal wall hit while swinging: the speed the wall took away goes
/// into the vertical axis, scaled by `hit_wall_mult`.
pub fn redirect_wall_hit(old_v: Vec2, new_v: Vec2, tuning: &GrappleTuning) -> Vec2 {
    let lost = (old_v.x - new_v.x).abs() * tuning.hit_wall_mult;
    let up = if new_v.y < 0.0 { -1.0 } else { 1.0 };
    Vec2::new(new_v.x, new_v.y + up * lost)
}
