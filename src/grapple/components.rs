//! Grapple domain: the grappler ability component and sticky zones.

use bevy::prelude::*;

use crate::ability::AbilityStateMachine;
use crate::grapple::{GrappleContext, GrappleKind, GrappleState, GrappleTuning};
use crate::movement::{Actor, MovementState};

/// Grapple ability of one actor.
#[derive(Component, Debug)]
#[require(Actor, MovementState)]
pub struct Grappler {
    machine: AbilityStateMachine<GrappleState>,
    /// Velocity the last fixed tick left on the body
    last_velocity: Vec2,
}

impl Default for Grappler {
    fn default() -> Self {
        Self {
            machine: AbilityStateMachine::new(GrappleState::Idle),
            last_velocity: Vec2::ZERO,
        }
    }
}

impl Grappler {
    pub fn state(&self) -> &GrappleState {
        self.machine.state()
    }

    pub fn kind(&self) -> GrappleKind {
        self.machine.kind()
    }

    pub fn machine(&self) -> &AbilityStateMachine<GrappleState> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut AbilityStateMachine<GrappleState> {
        &mut self.machine
    }

    /// True while a rope is attached to something.
    pub fn is_grappling(&self) -> bool {
        matches!(self.kind(), GrappleKind::Swinging | GrappleKind::Pulling)
    }

    pub fn is_extending(&self) -> bool {
        self.machine.is_on(GrappleKind::ExtendGrapple)
    }

    /// End of the rope, or `position` when there is no rope out.
    pub fn cur_grapple_pos(&self, position: Vec2) -> Vec2 {
        self.state().rope_end().unwrap_or(position)
    }

    /// Per-frame tick: state update, then the input edges collected this frame.
    pub fn update(&mut self, ctx: &mut GrappleContext<'_>) {
        self.machine.update(ctx);
        if ctx.input.grapple_pressed {
            self.machine.handle(ctx, |s, ctx| s.grapple_started(ctx));
        }
        if ctx.input.grapple_released {
            self.machine.handle(ctx, |s, ctx| s.grapple_finished(ctx));
        }
    }

    pub fn fixed_update(&mut self, ctx: &mut GrappleContext<'_>) {
        let dt = ctx.body.fixed_delta();
        self.machine.fixed_update(ctx, dt);
        self.last_velocity = ctx.body.velocity();
    }

    pub fn last_velocity(&self) -> Vec2 {
        self.last_velocity
    }

    pub fn collide_horizontal(&mut self, ctx: &mut GrappleContext<'_>) {
        self.machine.handle(ctx, |s, ctx| s.collide_horizontal(ctx));
    }

    pub fn collide_vertical(&mut self, ctx: &mut GrappleContext<'_>) {
        self.machine.handle(ctx, |s, ctx| s.collide_vertical(ctx));
    }

    pub fn process_collide_horizontal(
        &self,
        old_v: Vec2,
        new_v: Vec2,
        tuning: &GrappleTuning,
    ) -> Vec2 {
        self.state().process_collide_horizontal(old_v, new_v, tuning)
    }

    /// Drop the rope immediately. The target gets no grace period.
    pub fn break_grapple(&mut self, ctx: &mut GrappleContext<'_>) {
        self.machine.handle(ctx, |s, ctx| s.break_grapple(ctx));
    }
}

/// Sensor area that holds pull targets in place while they overlap it.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct StickyZone;
