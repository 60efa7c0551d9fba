//! Grapple domain: messages published for presentation and other gameplay.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::grapple::{GrappleKind, GrappleType, PullKind};

#[derive(Debug, Clone, Copy)]
pub struct GrappleStateChanged {
    pub entity: Entity,
    pub from: GrappleKind,
    pub to: GrappleKind,
}

impl Message for GrappleStateChanged {}

#[derive(Debug, Clone, Copy)]
pub struct PullStateChanged {
    pub entity: Entity,
    pub from: PullKind,
    pub to: PullKind,
}

impl Message for PullStateChanged {}

/// A rope took hold.
#[derive(Debug, Clone, Copy)]
pub struct GrappleAttached {
    pub grappler: Entity,
    pub target: Entity,
    pub point: Vec2,
    pub grapple_type: GrappleType,
}

impl Message for GrappleAttached {}

#[derive(Debug, Clone, Copy)]
pub struct GrappleDetached {
    pub grappler: Entity,
    pub target: Entity,
    /// The release boost was applied
    pub boosted: bool,
}

impl Message for GrappleDetached {}
