//! Movement domain: keyboard sampling shared by locomotion and abilities.

use bevy::prelude::*;

use crate::movement::MovementInput;

const LEFT: [KeyCode; 2] = [KeyCode::KeyA, KeyCode::ArrowLeft];
const RIGHT: [KeyCode; 2] = [KeyCode::KeyD, KeyCode::ArrowRight];
const DOWN: [KeyCode; 2] = [KeyCode::KeyS, KeyCode::ArrowDown];
const UP: [KeyCode; 2] = [KeyCode::KeyW, KeyCode::ArrowUp];

/// Held direction as a vector with components in -1..=1. Vertical only
/// matters for aiming.
pub(crate) fn keyboard_axis(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let axis = |neg: [KeyCode; 2], pos: [KeyCode; 2]| {
        let held = |keys: [KeyCode; 2]| f32::from(u8::from(keyboard.any_pressed(keys)));
        held(pos) - held(neg)
    };
    Vec2::new(axis(LEFT, RIGHT), axis(DOWN, UP))
}

pub(crate) fn read_input(keyboard: Res<ButtonInput<KeyCode>>, mut input: ResMut<MovementInput>) {
    input.axis = keyboard_axis(&keyboard);
}
