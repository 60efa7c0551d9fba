//! Grapple domain: the grappler ability, rope physics and the targets a rope
//! can attach to.

mod components;
pub mod events;
mod physics;
mod pull;
mod resources;
mod states;
mod systems;
mod target;
#[cfg(test)]
mod tests;
mod world;

pub use components::{Grappler, StickyZone};
pub use events::{GrappleAttached, GrappleDetached, GrappleStateChanged, PullStateChanged};
pub use physics::{
    extend_distance, extend_update, redirect_wall_hit, release_boost, start_grapple,
    swing_velocity,
};
pub use pull::{Grace, PullContext, PullKind, PullState, PullTarget, PullTargetMut, PullTuning};
pub use resources::{GrappleInput, GrappleTuning};
pub use states::{
    ExtendGrapple, GrappleContext, GrappleEvent, GrappleKind, GrappleState, Pulling, Release,
    Swinging,
};
pub use target::{
    AttachmentResult, FixedAnchor, FixedAnchorView, GrappleHit, GrappleType, GrappleWorld,
    Grappleable, GrapplerInfo,
};
pub use world::EcsGrappleWorld;

use bevy::prelude::*;

use crate::grapple::systems::{
    apply_bullet_time, clear_grapple_edges, publish_state_changes, read_grapple_input,
    release_removed_grappler, tick_grapplers, tick_pull_targets, track_sticky_zones,
    validate_grapplers,
};
use crate::movement::MovementSystems;

/// Fixed-step grapple work, slotted between contact detection and locomotion.
#[derive(SystemSet, Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum GrappleSystems {
    Ability,
    Targets,
    Publish,
}

pub struct GrapplePlugin;

impl Plugin for GrapplePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GrappleTuning>()
            .init_resource::<PullTuning>()
            .init_resource::<GrappleInput>()
            .add_message::<GrappleStateChanged>()
            .add_message::<PullStateChanged>()
            .add_message::<GrappleAttached>()
            .add_message::<GrappleDetached>()
            .configure_sets(
                FixedUpdate,
                (
                    GrappleSystems::Ability,
                    GrappleSystems::Targets,
                    GrappleSystems::Publish,
                )
                    .chain()
                    .after(MovementSystems::Detect)
                    .before(MovementSystems::Locomotion),
            )
            .add_observer(release_removed_grappler)
            .add_systems(Update, (read_grapple_input, apply_bullet_time))
            .add_systems(
                FixedUpdate,
                (validate_grapplers, tick_grapplers, clear_grapple_edges)
                    .chain()
                    .in_set(GrappleSystems::Ability),
            )
            .add_systems(
                FixedUpdate,
                (track_sticky_zones, tick_pull_targets)
                    .chain()
                    .in_set(GrappleSystems::Targets),
            )
            .add_systems(
                FixedUpdate,
                publish_state_changes.in_set(GrappleSystems::Publish),
            );

        #[cfg(feature = "dev-tools")]
        app.add_systems(Update, systems::draw_ropes);
    }
}
