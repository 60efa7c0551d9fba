//! Validation for loaded tuning values.

use crate::grapple::{GrappleTuning, PullTuning};
use crate::movement::MovementTuning;

/// A tuning value that parsed but makes no sense.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningError {
    pub source_type: &'static str,
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} field '{}' {}",
            self.source_type, self.field, self.message
        )
    }
}

impl std::error::Error for TuningError {}

/// Helper macro for rejecting negative or non-finite numbers
macro_rules! check_non_negative {
    ($errors:expr, $source_type:expr, $tuning:expr, $($field:ident),+ $(,)?) => {
        $(
            if !($tuning.$field >= 0.0 && $tuning.$field.is_finite()) {
                $errors.push(TuningError {
                    source_type: $source_type,
                    field: stringify!($field),
                    message: format!("must be a finite value >= 0, got {}", $tuning.$field),
                });
            }
        )+
    };
}

/// Helper macro for fractions that must stay in 0..=1
macro_rules! check_unit {
    ($errors:expr, $source_type:expr, $tuning:expr, $($field:ident),+ $(,)?) => {
        $(
            if !(0.0..=1.0).contains(&$tuning.$field) {
                $errors.push(TuningError {
                    source_type: $source_type,
                    field: stringify!($field),
                    message: format!("must be within 0..=1, got {}", $tuning.$field),
                });
            }
        )+
    };
}

pub fn validate_grapple(tuning: &GrappleTuning) -> Vec<TuningError> {
    let mut errors = Vec::new();

    check_non_negative!(
        errors,
        "GrappleTuning",
        tuning,
        extend_speed,
        max_extend_distance,
        max_extend_duration,
        normal_mult,
        orth_mult,
        small_angle,
        small_angle_magnitude,
        zero_angle,
        boost_speed,
        min_boost,
        max_boost,
        move_speed,
        acceleration,
        hit_wall_mult,
    );
    check_unit!(errors, "GrappleTuning", tuning, start_mult);

    if tuning.zero_angle > tuning.small_angle {
        errors.push(TuningError {
            source_type: "GrappleTuning",
            field: "zero_angle",
            message: format!(
                "must not exceed small_angle ({} > {})",
                tuning.zero_angle, tuning.small_angle
            ),
        });
    }
    if tuning.min_boost > tuning.max_boost {
        errors.push(TuningError {
            source_type: "GrappleTuning",
            field: "min_boost",
            message: format!(
                "must not exceed max_boost ({} > {})",
                tuning.min_boost, tuning.max_boost
            ),
        });
    }
    if !(tuning.bullet_time_scale > 0.0 && tuning.bullet_time_scale <= 1.0) {
        errors.push(TuningError {
            source_type: "GrappleTuning",
            field: "bullet_time_scale",
            message: format!("must be within (0, 1], got {}", tuning.bullet_time_scale),
        });
    }
    if let Some(max) = tuning.max_grapple_distance
        && (max.x <= 0.0 || max.y <= 0.0)
    {
        errors.push(TuningError {
            source_type: "GrappleTuning",
            field: "max_grapple_distance",
            message: format!("must be positive on both axes, got {:?}", max),
        });
    }

    errors
}

pub fn validate_pull(tuning: &PullTuning) -> Vec<TuningError> {
    let mut errors = Vec::new();

    check_non_negative!(
        errors,
        "PullTuning",
        tuning,
        min_pull_v,
        init_pull_mag,
        distance_scale,
        keep_v_grace_time,
    );
    check_unit!(errors, "PullTuning", tuning, grapple_lerp);

    errors
}

pub fn validate_movement(tuning: &MovementTuning) -> Vec<TuningError> {
    let mut errors = Vec::new();

    check_non_negative!(
        errors,
        "MovementTuning",
        tuning,
        max_speed,
        accel,
        decel,
        air_accel,
        gravity,
        max_fall_speed,
        contact_probe,
    );

    errors
}
