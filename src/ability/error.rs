//! Ability domain: configuration errors raised while setting up ability entities.

use bevy::prelude::*;

/// Setup failures. These are fatal for the entity that raised them and are
/// reported before the first tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbilityError {
    /// An ability entity is missing a component its states rely on.
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },
}

impl std::fmt::Display for AbilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbilityError::MissingComponent { entity, component } => {
                write!(f, "entity {} is missing required component {}", entity, component)
            }
        }
    }
}

impl std::error::Error for AbilityError {}
