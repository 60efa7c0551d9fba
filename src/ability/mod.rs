//! Ability domain: the generic per-entity state machine every ability runs on.
//!
//! An ability is an enum of states implementing [`AbilityState`] for the
//! context type its hooks need. The machine owns exactly one live state and
//! swaps it only through [`AbilityStateMachine::set_state`] or a
//! [`Transition`] returned from a hook.

mod error;
mod machine;

pub use error::AbilityError;
pub use machine::{
    AbilityState, AbilityStateKind, AbilityStateMachine, MAX_CHAINED_TRANSITIONS, StateChange,
    Transition,
};
