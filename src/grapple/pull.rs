//! Grapple domain: movable targets that get reeled in, with their own
//! Idle / Attached / Sticky machine.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ability::{AbilityState, AbilityStateKind, AbilityStateMachine, Transition};
use crate::grapple::{AttachmentResult, GrappleType, Grappleable, GrapplerInfo};
use crate::math::{combine_with_reset, decompose};
use crate::movement::PhysicsBody;

/// Tuning for pull targets. The resource holds the defaults new targets
/// are spawned with; each [`PullTarget`] keeps its own copy.
#[derive(Resource, Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PullTuning {
    /// Slowest the target is ever reeled in
    pub min_pull_v: f32,
    /// Speed toward the grappler applied on attach
    pub init_pull_mag: f32,
    /// Blend per tick from current velocity to the pull velocity
    pub grapple_lerp: f32,
    /// Reel speed gained per unit of rope length
    pub distance_scale: f32,
    /// Seconds velocity is retained after a detach or sticky exit
    pub keep_v_grace_time: f32,
}

impl Default for PullTuning {
    fn default() -> Self {
        Self {
            min_pull_v: 220.0,
            init_pull_mag: 260.0,
            grapple_lerp: 0.2,
            distance_scale: 2.0,
            keep_v_grace_time: 0.3,
        }
    }
}

impl PullTuning {
    /// Share of a velocity kept `elapsed` seconds into the grace window.
    pub fn grace_factor(&self, elapsed: f32) -> f32 {
        if self.keep_v_grace_time <= 0.0 || elapsed >= self.keep_v_grace_time {
            0.0
        } else {
            1.0 - elapsed / self.keep_v_grace_time
        }
    }
}

pub struct PullContext<'a> {
    pub body: &'a mut dyn PhysicsBody,
    pub tuning: &'a PullTuning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullKind {
    Idle,
    Attached,
    Sticky,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PullState {
    /// Free. `grace` fades out the horizontal velocity left by a detach.
    Idle { grace: Option<Grace> },
    Attached { grappler: Entity },
    /// Held by a sticky surface. The rope, if any, hangs from it as if fixed.
    Sticky {
        before_sticky_v: Vec2,
        elapsed: f32,
        grappler: Option<Entity>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grace {
    pub velocity: Vec2,
    pub elapsed: f32,
}

impl Default for PullState {
    fn default() -> Self {
        PullState::Idle { grace: None }
    }
}

impl AbilityStateKind for PullState {
    type Kind = PullKind;

    fn kind(&self) -> PullKind {
        match self {
            PullState::Idle { .. } => PullKind::Idle,
            PullState::Attached { .. } => PullKind::Attached,
            PullState::Sticky { .. } => PullKind::Sticky,
        }
    }
}

impl<'a> AbilityState<PullContext<'a>> for PullState {
    fn on_enter(&mut self, ctx: &mut PullContext<'a>) -> Transition<Self> {
        if let PullState::Sticky { .. } = self {
            ctx.body.set_velocity(Vec2::ZERO);
        }
        Transition::Stay
    }

    fn on_fixed_update(&mut self, ctx: &mut PullContext<'a>) -> Transition<Self> {
        let dt = ctx.body.fixed_delta();
        match self {
            PullState::Idle { grace } => {
                let Some(g) = grace else {
                    return Transition::Stay;
                };
                g.elapsed += dt;
                let factor = ctx.tuning.grace_factor(g.elapsed);
                let v = ctx.body.velocity();
                ctx.body.set_velocity(Vec2::new(g.velocity.x * factor, v.y));
                if factor == 0.0 {
                    *grace = None;
                }
            }
            PullState::Sticky { elapsed, .. } => {
                *elapsed += dt;
                ctx.body.set_velocity(Vec2::ZERO);
            }
            PullState::Attached { .. } => {}
        }
        Transition::Stay
    }
}

impl PullState {
    fn attach(
        &mut self,
        ctx: &mut PullContext<'_>,
        me: Entity,
        who: &GrapplerInfo,
        hit_point: Vec2,
    ) -> (AttachmentResult, Transition<Self>) {
        let position = ctx.body.position();
        match self {
            PullState::Idle { .. } => {
                let toward = (who.position - position).normalize_or_zero();
                let v = combine_with_reset(who.velocity, toward * ctx.tuning.init_pull_mag);
                ctx.body.set_velocity(v);
                (
                    AttachmentResult::attached(position, me),
                    Transition::To(PullState::Attached {
                        grappler: who.entity,
                    }),
                )
            }
            PullState::Sticky { grappler, .. } if grappler.is_none() => {
                *grappler = Some(who.entity);
                (AttachmentResult::attached(position, me), Transition::Stay)
            }
            // Already holding a rope
            _ => (AttachmentResult::none(hit_point), Transition::Stay),
        }
    }

    fn pull(&mut self, ctx: &mut PullContext<'_>, who: &GrapplerInfo) -> Vec2 {
        let position = ctx.body.position();
        let PullState::Attached { grappler } = self else {
            return position;
        };
        if *grappler != who.entity {
            return position;
        }
        let rope = who.position - position;
        let v = ctx.body.velocity();
        let Some((_, ortho)) = decompose(v, rope) else {
            return position;
        };
        let speed = ctx
            .tuning
            .min_pull_v
            .max(rope.length() * ctx.tuning.distance_scale);
        let desired = rope.normalize_or_zero() * speed + ortho;
        ctx.body
            .set_velocity(v.lerp(desired, ctx.tuning.grapple_lerp.clamp(0.0, 1.0)));
        position
    }

    fn detach(&mut self, ctx: &mut PullContext<'_>, who: Entity, keep_velocity: bool) -> Transition<Self> {
        match self {
            PullState::Attached { grappler } if *grappler == who => {
                let grace = keep_velocity.then(|| Grace {
                    velocity: ctx.body.velocity(),
                    elapsed: 0.0,
                });
                if !keep_velocity {
                    let v = ctx.body.velocity();
                    ctx.body.set_velocity(Vec2::new(0.0, v.y));
                }
                Transition::To(PullState::Idle { grace })
            }
            PullState::Sticky { grappler, .. } if *grappler == Some(who) => {
                *grappler = None;
                Transition::Stay
            }
            _ => Transition::Stay,
        }
    }

    fn sticky_enter(&mut self, ctx: &mut PullContext<'_>) -> Transition<Self> {
        let before_sticky_v = ctx.body.velocity();
        match self {
            PullState::Idle { .. } => Transition::To(PullState::Sticky {
                before_sticky_v,
                elapsed: 0.0,
                grappler: None,
            }),
            PullState::Attached { grappler } => Transition::To(PullState::Sticky {
                before_sticky_v,
                elapsed: 0.0,
                grappler: Some(*grappler),
            }),
            PullState::Sticky { .. } => Transition::Stay,
        }
    }

    fn sticky_exit(&mut self, ctx: &mut PullContext<'_>) -> Transition<Self> {
        let PullState::Sticky {
            before_sticky_v,
            elapsed,
            grappler,
        } = *self
        else {
            return Transition::Stay;
        };
        ctx.body
            .set_velocity(before_sticky_v * ctx.tuning.grace_factor(elapsed));
        match grappler {
            Some(grappler) => Transition::To(PullState::Attached { grappler }),
            None => Transition::To(PullState::Idle { grace: None }),
        }
    }
}

/// A movable object the grapple reels in.
#[derive(Component, Debug)]
pub struct PullTarget {
    pub tuning: PullTuning,
    machine: AbilityStateMachine<PullState>,
}

impl Default for PullTarget {
    fn default() -> Self {
        Self::new(PullTuning::default())
    }
}

impl PullTarget {
    pub fn new(tuning: PullTuning) -> Self {
        Self {
            tuning,
            machine: AbilityStateMachine::new(PullState::default()),
        }
    }

    pub fn state(&self) -> &PullState {
        self.machine.state()
    }

    pub fn kind(&self) -> PullKind {
        self.machine.kind()
    }

    pub fn is_in_sticky(&self) -> bool {
        self.machine.is_on(PullKind::Sticky)
    }

    pub fn machine_mut(&mut self) -> &mut AbilityStateMachine<PullState> {
        &mut self.machine
    }

    pub fn fixed_update(&mut self, body: &mut dyn PhysicsBody) {
        let dt = body.fixed_delta();
        let mut ctx = PullContext {
            body,
            tuning: &self.tuning,
        };
        self.machine.fixed_update(&mut ctx, dt);
    }

    pub fn sticky_enter(&mut self, body: &mut dyn PhysicsBody) {
        let mut ctx = PullContext {
            body,
            tuning: &self.tuning,
        };
        self.machine.handle(&mut ctx, |s, ctx| s.sticky_enter(ctx));
    }

    pub fn sticky_exit(&mut self, body: &mut dyn PhysicsBody) {
        let mut ctx = PullContext {
            body,
            tuning: &self.tuning,
        };
        self.machine.handle(&mut ctx, |s, ctx| s.sticky_exit(ctx));
    }
}

/// [`Grappleable`] over a pull target and its body for the duration of one call.
pub struct PullTargetMut<'a> {
    pub entity: Entity,
    pub target: &'a mut PullTarget,
    pub body: &'a mut dyn PhysicsBody,
}

impl PullTargetMut<'_> {
    fn ctx(&mut self) -> (&mut AbilityStateMachine<PullState>, PullContext<'_>) {
        (
            &mut self.target.machine,
            PullContext {
                body: &mut *self.body,
                tuning: &self.target.tuning,
            },
        )
    }
}

impl Grappleable for PullTargetMut<'_> {
    fn grapple_type(&self) -> GrappleType {
        GrappleType::Pull
    }

    fn attach_grapple(&mut self, grappler: &GrapplerInfo, hit_point: Vec2) -> AttachmentResult {
        let me = self.entity;
        let (machine, mut ctx) = self.ctx();
        let result = machine.handle_with(&mut ctx, |s, ctx| s.attach(ctx, me, grappler, hit_point));
        if result.is_attached() {
            debug!("Pull target {} attached to {}", me, grappler.entity);
        }
        result
    }

    fn continuous_grapple_pos(&mut self, _grapple_pos: Vec2, grappler: &GrapplerInfo) -> Vec2 {
        let (machine, mut ctx) = self.ctx();
        machine.handle_with(&mut ctx, |s, ctx| (s.pull(ctx, grappler), Transition::Stay))
    }

    fn detach_grapple(&mut self, grappler: Entity) {
        let (machine, mut ctx) = self.ctx();
        machine.handle(&mut ctx, |s, ctx| s.detach(ctx, grappler, true));
    }

    fn break_grapple(&mut self, grappler: Entity) {
        let (machine, mut ctx) = self.ctx();
        machine.handle(&mut ctx, |s, ctx| s.detach(ctx, grappler, false));
    }

    fn is_attached_to(&self, grappler: Entity) -> bool {
        match self.target.state() {
            PullState::Attached { grappler: g } => *g == grappler,
            PullState::Sticky { grappler: g, .. } => *g == Some(grappler),
            PullState::Idle { .. } => false,
        }
    }

    fn velocity(&self) -> Vec2 {
        self.body.velocity()
    }

    fn is_fixed(&self) -> bool {
        self.target.is_in_sticky()
    }
}
