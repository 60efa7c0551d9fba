//! Content domain: data-driven tuning loaded from `assets/data`.

mod loader;
mod validation;

pub use loader::{ContentLoadError, TuningSet, load_tuning, parse_single};
pub use validation::{TuningError, validate_grapple, validate_movement, validate_pull};

use bevy::prelude::*;
use std::path::PathBuf;

/// Directory the tuning files are read from.
#[derive(Resource, Debug, Clone)]
pub struct ContentRoot(pub PathBuf);

impl Default for ContentRoot {
    fn default() -> Self {
        Self(PathBuf::from("assets/data"))
    }
}

fn load_tuning_files(mut commands: Commands, root: Res<ContentRoot>) {
    let (set, errors) = load_tuning(&root.0);

    for err in &errors {
        error!("{}; using defaults", err);
    }
    if errors.is_empty() {
        info!("Loaded tuning from {}", root.0.display());
    } else {
        warn!(
            "{} tuning file(s) failed to load from {}",
            errors.len(),
            root.0.display()
        );
    }

    commands.insert_resource(set.grapple);
    commands.insert_resource(set.pull);
    commands.insert_resource(set.movement);
}

/// Loads tuning before any `Startup` system spawns with it.
pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContentRoot>()
            .add_systems(PreStartup, load_tuning_files);
    }
}
