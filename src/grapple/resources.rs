//! Grapple domain: tuning and input resources.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Resource, Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GrappleTuning {
    /// Grapple stops when you collide with a wall
    pub collide_wall_stop: bool,
    /// Grapple extend units per second
    pub extend_speed: f32,
    /// Furthest the rope tip travels before giving up
    pub max_extend_distance: f32,
    /// Longest an extension may run before giving up
    pub max_extend_duration: f32,
    /// Start grapple energy loss: 0 keeps only the orthogonal speed, 1 keeps all of it
    pub start_mult: f32,
    /// Multiplier for magnitude of the rope-parallel component of velocity
    pub normal_mult: f32,
    /// Multiplier for magnitude of the orthogonal component of velocity
    pub orth_mult: f32,
    /// Angle from the vertical (degrees) under which a slow swing stalls
    pub small_angle: f32,
    /// Speed under which a small-angle swing stalls
    pub small_angle_magnitude: f32,
    /// Angle from the vertical (degrees) under which velocity is damped hard
    pub zero_angle: f32,
    /// Boost speed multiplier after leaving the grapple
    pub boost_speed: f32,
    pub min_boost: f32,
    pub max_boost: f32,
    /// Per-axis rope length cap. `None` disables the check.
    pub max_grapple_distance: Option<Vec2>,
    /// Capped speed for swing pumping
    pub move_speed: f32,
    /// How fast you push when holding left/right while swinging
    pub acceleration: f32,
    /// Share of the discarded horizontal speed sent upward after hitting a wall
    pub hit_wall_mult: f32,
    /// Game speed while a rope is extending. 1 leaves time alone.
    pub bullet_time_scale: f32,
}

impl Default for GrappleTuning {
    fn default() -> Self {
        Self {
            collide_wall_stop: true,
            extend_speed: 1600.0,
            max_extend_distance: 420.0,
            max_extend_duration: 0.4,
            start_mult: 0.5,
            normal_mult: 0.25,
            orth_mult: 1.0,
            small_angle: 20.0,
            small_angle_magnitude: 60.0,
            zero_angle: 5.0,
            boost_speed: 0.2,
            min_boost: 80.0,
            max_boost: 320.0,
            max_grapple_distance: None,
            move_speed: 520.0,
            acceleration: 900.0,
            hit_wall_mult: 0.5,
            bullet_time_scale: 1.0,
        }
    }
}

impl GrappleTuning {
    /// Per-axis distance check between the grappler and its rope end.
    pub fn too_far(&self, position: Vec2, point: Vec2) -> bool {
        let Some(max) = self.max_grapple_distance else {
            return false;
        };
        let d = (point - position).abs();
        d.x > max.x || d.y > max.y
    }
}

/// Grapple controls accumulated since the last fixed tick.
///
/// Edges are OR-ed in every frame and cleared once a fixed tick consumed them,
/// so presses between ticks are never lost.
#[derive(Resource, Debug, Clone, Default)]
pub struct GrappleInput {
    pub grapple_pressed: bool,
    pub grapple_released: bool,
    /// Held direction; wins over `aim_point` when non-zero
    pub aim_direction: Vec2,
    /// World point under the cursor, if there is one
    pub aim_point: Option<Vec2>,
    /// -1, 0 or 1
    pub move_axis: i8,
}

impl GrappleInput {
    pub fn clear_edges(&mut self) {
        self.grapple_pressed = false;
        self.grapple_released = false;
    }
}
