//! Ability domain: state machine engine, state hooks and transition records.

use std::fmt::Debug;

use bevy::prelude::*;

/// Upper bound on transitions committed by one call when enter hooks keep
/// requesting new states.
pub const MAX_CHAINED_TRANSITIONS: usize = 8;

/// What a hook wants the machine to do next.
#[derive(Debug)]
#[must_use]
pub enum Transition<S> {
    Stay,
    To(S),
}

impl<S> Default for Transition<S> {
    fn default() -> Self {
        Transition::Stay
    }
}

/// Identity of a state, independent of the context its hooks run with.
pub trait AbilityStateKind {
    type Kind: Copy + Eq + Debug + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;
}

/// Lifecycle hooks of one ability state running against context `C`.
///
/// Hooks never see the machine, so a state cannot swap itself out mid-hook;
/// it returns a [`Transition`] instead and the machine applies it.
pub trait AbilityState<C>: AbilityStateKind + Sized {
    /// Runs once after the state is installed. A returned transition is
    /// queued and applied once the current transition has been recorded.
    fn on_enter(&mut self, _ctx: &mut C) -> Transition<Self> {
        Transition::Stay
    }

    /// Runs once before the state is dropped. No hook reaches it afterwards.
    fn on_exit(&mut self, _ctx: &mut C) {}

    fn on_update(&mut self, _ctx: &mut C) -> Transition<Self> {
        Transition::Stay
    }

    fn on_fixed_update(&mut self, _ctx: &mut C) -> Transition<Self> {
        Transition::Stay
    }
}

/// A completed transition, kept until the owner publishes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange<K> {
    pub from: K,
    pub to: K,
}

/// Owns the current state of one ability and drives its hooks.
#[derive(Debug)]
pub struct AbilityStateMachine<S: AbilityStateKind> {
    current: S,
    pending: Option<S>,
    changes: Vec<StateChange<S::Kind>>,
    started: bool,
    sojourn: f32,
    transition_count: u64,
}

impl<S: AbilityStateKind> AbilityStateMachine<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            pending: None,
            changes: Vec::new(),
            started: false,
            sojourn: 0.0,
            transition_count: 0,
        }
    }

    pub fn state(&self) -> &S {
        &self.current
    }

    pub fn kind(&self) -> S::Kind {
        self.current.kind()
    }

    pub fn is_on(&self, kind: S::Kind) -> bool {
        self.current.kind() == kind
    }

    /// Seconds of fixed updates spent in the current state.
    pub fn sojourn(&self) -> f32 {
        self.sojourn
    }

    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    /// Transitions recorded since the last drain, oldest first.
    pub fn drain_changes(&mut self) -> std::vec::Drain<'_, StateChange<S::Kind>> {
        self.changes.drain(..)
    }

    /// Enter the initial state. Later calls are no-ops.
    pub fn start<C>(&mut self, ctx: &mut C)
    where
        S: AbilityState<C>,
    {
        if self.started {
            return;
        }
        self.started = true;
        debug!("Ability machine started in {:?}", self.current.kind());
        if let Transition::To(next) = self.current.on_enter(ctx) {
            self.set_state(next, ctx);
        }
    }

    /// Exit the current state, enter `next` and record the change. Requests
    /// made by enter hooks are drained afterwards, one at a time.
    pub fn set_state<C>(&mut self, next: S, ctx: &mut C)
    where
        S: AbilityState<C>,
    {
        self.started = true;
        let mut next = Some(next);
        let mut steps = 0;
        while let Some(state) = next.take() {
            if steps == MAX_CHAINED_TRANSITIONS {
                warn!(
                    "Ability transition chain exceeded {} steps, staying in {:?} and dropping {:?}",
                    MAX_CHAINED_TRANSITIONS,
                    self.current.kind(),
                    state.kind()
                );
                break;
            }
            self.commit(state, ctx);
            steps += 1;
            next = self.pending.take();
        }
    }

    pub fn update<C>(&mut self, ctx: &mut C)
    where
        S: AbilityState<C>,
    {
        self.start(ctx);
        if let Transition::To(next) = self.current.on_update(ctx) {
            self.set_state(next, ctx);
        }
    }

    pub fn fixed_update<C>(&mut self, ctx: &mut C, dt: f32)
    where
        S: AbilityState<C>,
    {
        self.start(ctx);
        self.sojourn += dt;
        if let Transition::To(next) = self.current.on_fixed_update(ctx) {
            self.set_state(next, ctx);
        }
    }

    /// Forward an event to the current state and apply whatever it asks for.
    pub fn handle<C, F>(&mut self, ctx: &mut C, event: F)
    where
        S: AbilityState<C>,
        F: FnOnce(&mut S, &mut C) -> Transition<S>,
    {
        self.start(ctx);
        if let Transition::To(next) = event(&mut self.current, ctx) {
            self.set_state(next, ctx);
        }
    }

    /// Like [`Self::handle`] for events that also produce a value.
    pub fn handle_with<C, F, R>(&mut self, ctx: &mut C, event: F) -> R
    where
        S: AbilityState<C>,
        F: FnOnce(&mut S, &mut C) -> (R, Transition<S>),
    {
        self.start(ctx);
        let (out, transition) = event(&mut self.current, ctx);
        if let Transition::To(next) = transition {
            self.set_state(next, ctx);
        }
        out
    }

    fn commit<C>(&mut self, next: S, ctx: &mut C)
    where
        S: AbilityState<C>,
    {
        self.current.on_exit(ctx);
        let from = std::mem::replace(&mut self.current, next).kind();
        self.sojourn = 0.0;
        self.transition_count += 1;
        if let Transition::To(queued) = self.current.on_enter(ctx) {
            self.pending = Some(queued);
        }
        let to = self.current.kind();
        debug!("Ability transition {:?} -> {:?}", from, to);
        self.changes.push(StateChange { from, to });
    }
}
