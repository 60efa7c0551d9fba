//! Vector helpers shared by the grapple and pull-target states.

use bevy::prelude::*;

/// Rope vectors shorter than this are treated as degenerate.
pub const MIN_ROPE_LENGTH_SQ: f32 = 1.0e-8;

/// Split `v` into the part parallel to `rope` and the part orthogonal to it.
///
/// Returns `None` for a degenerate rope so callers skip the branch instead of
/// dividing by zero.
pub fn decompose(v: Vec2, rope: Vec2) -> Option<(Vec2, Vec2)> {
    let len_sq = rope.length_squared();
    if len_sq <= MIN_ROPE_LENGTH_SQ {
        return None;
    }
    let projection = rope * (v.dot(rope) / len_sq);
    Some((projection, v - projection))
}

/// Unsigned angle in degrees between `v` and straight up. Zero vectors report 0.
pub fn angle_from_up(v: Vec2) -> f32 {
    let n = v.normalize_or_zero();
    if n == Vec2::ZERO {
        return 0.0;
    }
    n.dot(Vec2::Y).clamp(-1.0, 1.0).acos().to_degrees()
}

/// The value in `[min, max]` closest to `value`.
pub fn closest_between(min: f32, max: f32, value: f32) -> f32 {
    value.clamp(min, max)
}

/// Rotate `v` counter-clockwise by `radians`.
pub fn rotate(v: Vec2, radians: f32) -> Vec2 {
    Vec2::from_angle(radians).rotate(v)
}

/// Sign of `x` as -1, 0 or 1. Unlike `f32::signum`, zero maps to zero.
pub fn sign(x: f32) -> i32 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Interpolate with `t` clamped to `[0, 1]`.
pub fn lerp_clamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Per-axis combine: an axis where `add` opposes `base` is reset to `add`,
/// otherwise the two are summed.
pub fn combine_with_reset(base: Vec2, add: Vec2) -> Vec2 {
    let axis = |b: f32, a: f32| {
        if sign(b) != 0 && sign(a) != 0 && sign(b) != sign(a) {
            a
        } else {
            b + a
        }
    };
    Vec2::new(axis(base.x, add.x), axis(base.y, add.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1.0e-4;

    #[test]
    fn test_decompose_is_exact() {
        let cases = [
            (Vec2::new(5.0, 0.0), Vec2::new(0.0, 10.0)),
            (Vec2::new(-3.0, 7.5), Vec2::new(2.0, -1.0)),
            (Vec2::new(0.25, -12.0), Vec2::new(-4.0, -4.0)),
            (Vec2::ZERO, Vec2::new(1.0, 1.0)),
        ];
        for (v, r) in cases {
            let (projection, ortho) = decompose(v, r).unwrap();
            assert!((projection + ortho - v).length() < EPS);
            assert!(ortho.dot(r).abs() < EPS);
        }
    }

    #[test]
    fn test_decompose_rejects_zero_rope() {
        assert!(decompose(Vec2::new(1.0, 2.0), Vec2::ZERO).is_none());
    }

    #[test]
    fn test_angle_from_up() {
        assert!(angle_from_up(Vec2::new(0.0, 3.0)).abs() < EPS);
        assert!((angle_from_up(Vec2::new(2.0, 0.0)) - 90.0).abs() < EPS);
        assert!((angle_from_up(Vec2::new(-1.0, 1.0)) - 45.0).abs() < EPS);
        assert!((angle_from_up(Vec2::new(0.0, -1.0)) - 180.0).abs() < EPS);
        assert_eq!(angle_from_up(Vec2::ZERO), 0.0);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let r = rotate(Vec2::X, std::f32::consts::FRAC_PI_2);
        assert!((r - Vec2::Y).length() < EPS);
        let r = rotate(Vec2::X, -std::f32::consts::FRAC_PI_2);
        assert!((r + Vec2::Y).length() < EPS);
    }

    #[test]
    fn test_sign_zero_is_zero() {
        assert_eq!(sign(0.0), 0);
        assert_eq!(sign(-0.0), 0);
        assert_eq!(sign(3.0), 1);
        assert_eq!(sign(-0.5), -1);
    }

    #[test]
    fn test_combine_with_reset() {
        let v = combine_with_reset(Vec2::new(4.0, -2.0), Vec2::new(-1.0, -3.0));
        assert_eq!(v, Vec2::new(-1.0, -5.0));
        let v = combine_with_reset(Vec2::ZERO, Vec2::new(2.0, 1.0));
        assert_eq!(v, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_lerp_clamped() {
        assert_eq!(lerp_clamped(2.0, 4.0, 0.5), 3.0);
        assert_eq!(lerp_clamped(2.0, 4.0, 3.0), 4.0);
        assert_eq!(lerp_clamped(2.0, 4.0, -1.0), 2.0);
    }
}
