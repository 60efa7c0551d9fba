//! Loader for RON tuning files at startup.

use bevy::prelude::*;
use ron::Options;
use std::fs;
use std::path::Path;

use super::validation::{TuningError, validate_grapple, validate_movement, validate_pull};
use crate::grapple::{GrappleTuning, PullTuning};
use crate::movement::MovementTuning;

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for ContentLoadError {}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Parse a single RON struct from a string.
pub fn parse_single<T>(file: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file.to_string(),
            message: format!("Parse error: {}", e),
        })
}

/// Load a single RON struct (not wrapped in a list).
fn load_single_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file_name = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: file_name.clone(),
        message: format!("IO error: {}", e),
    })?;

    parse_single(&file_name, &contents)
}

/// Load one tuning file and run its validator.
fn load_validated<T>(
    path: &Path,
    validate: fn(&T) -> Vec<TuningError>,
) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let tuning: T = load_single_file(path)?;
    let errors = validate(&tuning);
    if errors.is_empty() {
        return Ok(tuning);
    }

    let message = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(ContentLoadError {
        file: path.display().to_string(),
        message: format!("Invalid tuning: {}", message),
    })
}

/// Every tuning resource, as loaded or defaulted.
#[derive(Debug, Clone, Default)]
pub struct TuningSet {
    pub grapple: GrappleTuning,
    pub pull: PullTuning,
    pub movement: MovementTuning,
}

/// Load all tuning from `base_path`.
///
/// Files are independent: one that fails to load keeps its defaults and its
/// error is returned alongside the rest.
pub fn load_tuning(base_path: &Path) -> (TuningSet, Vec<ContentLoadError>) {
    let mut set = TuningSet::default();
    let mut errors = Vec::new();

    // Helper macro to reduce boilerplate
    macro_rules! load_into {
        ($field:expr, $file:expr, $validate:expr) => {
            match load_validated(&base_path.join($file), $validate) {
                Ok(tuning) => $field = tuning,
                Err(e) => errors.push(e),
            }
        };
    }

    load_into!(set.grapple, "grapple_tuning.ron", validate_grapple);
    load_into!(set.pull, "pull_tuning.ron", validate_pull);
    load_into!(set.movement, "movement_tuning.ron", validate_movement);

    (set, errors)
}
