//! Movement domain: unit tests for tuning math and the actor body facade.

use bevy::prelude::*;

use super::{ActorBody, Facing, MovementTuning, PhysicsBody};

#[test]
fn test_fall_applies_gravity_and_caps() {
    let tuning = MovementTuning {
        gravity: 1000.0,
        max_fall_speed: 300.0,
        ..default()
    };

    let v = tuning.fall(Vec2::new(5.0, 0.0), 0.1);
    assert_eq!(v, Vec2::new(5.0, -100.0));

    let capped = tuning.fall(Vec2::new(0.0, -290.0), 0.1);
    assert_eq!(capped, Vec2::new(0.0, -300.0));
}

#[test]
fn test_facing_from_axis() {
    assert_eq!(Facing::from_axis(1.0), Some(Facing::Right));
    assert_eq!(Facing::from_axis(-0.5), Some(Facing::Left));
    assert_eq!(Facing::from_axis(0.05), None);
    assert_eq!(Facing::Left.sign(), -1.0);
}

#[test]
fn test_actor_body_writes_through() {
    let tuning = MovementTuning::default();
    let mut velocity = Vec2::new(1.0, 2.0);
    {
        let mut body = ActorBody {
            position: Vec2::ZERO,
            velocity: &mut velocity,
            facing: Facing::Right,
            tuning: &tuning,
            dt: 1.0 / 64.0,
        };
        body.apply_velocity(Vec2::new(2.0, -2.0));
        assert_eq!(body.velocity(), Vec2::new(3.0, 0.0));
        assert_eq!(body.fixed_delta(), 1.0 / 64.0);
    }
    assert_eq!(velocity, Vec2::new(3.0, 0.0));
}

#[test]
fn test_actor_body_rejects_non_finite_velocity() {
    let tuning = MovementTuning::default();
    let mut velocity = Vec2::new(4.0, 0.0);
    let mut body = ActorBody {
        position: Vec2::ZERO,
        velocity: &mut velocity,
        facing: Facing::Left,
        tuning: &tuning,
        dt: 0.1,
    };

    body.set_velocity(Vec2::new(f32::NAN, 1.0));
    assert_eq!(body.velocity(), Vec2::new(4.0, 0.0));
}

#[test]
fn test_actor_body_fall_uses_tuning() {
    let tuning = MovementTuning {
        gravity: 100.0,
        ..default()
    };
    let mut velocity = Vec2::ZERO;
    let body = ActorBody {
        position: Vec2::ZERO,
        velocity: &mut velocity,
        facing: Facing::Right,
        tuning: &tuning,
        dt: 0.5,
    };

    assert_eq!(body.calc_fall(Vec2::new(1.0, 0.0)), Vec2::new(1.0, -50.0));
}
